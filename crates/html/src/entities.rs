/// Decode a minimal, explicitly limited subset of HTML entities.
///
/// Contract:
/// - Named entities decoded: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
/// - Numeric entities decoded only when well-formed and semicolon-terminated:
///   `&#123;` (decimal) and `&#x1F4A9;` (hex).
/// - Anything else (unknown names, missing semicolons, invalid scalars) passes through unchanged.
pub(crate) fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    const NAMED: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&nbsp;", '\u{00A0}'),
    ];
    const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
    const MAX_DEC_DIGITS: usize = 7; // 1114111

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    'outer: while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        for (name, ch) in NAMED {
            if rest.starts_with(name) {
                out.push(*ch);
                rest = &rest[name.len()..];
                continue 'outer;
            }
        }

        let numeric = if rest.starts_with("&#x") || rest.starts_with("&#X") {
            Some((3, 16, MAX_HEX_DIGITS))
        } else if rest.starts_with("&#") {
            Some((2, 10, MAX_DEC_DIGITS))
        } else {
            None
        };

        if let Some((prefix, radix, max_digits)) = numeric {
            let digits = &rest[prefix..];
            let run = digits
                .bytes()
                .take(max_digits + 1)
                .take_while(|b| b.is_ascii_alphanumeric())
                .count();
            if run > 0 && run <= max_digits && digits.as_bytes().get(run) == Some(&b';') {
                if let Some(ch) = u32::from_str_radix(&digits[..run], radix)
                    .ok()
                    .and_then(char::from_u32)
                {
                    out.push(ch);
                    rest = &digits[run + 1..];
                    continue;
                }
            }
        }

        // keep '&' as-is
        out.push('&');
        rest = &rest[1..];
    }

    out.push_str(rest);
    out
}

/// Escape text node content for serialization.
pub(crate) fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape a double-quoted attribute value for serialization.
pub(crate) fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
