use crate::Node;
use crate::entities::{escape_attr, escape_text};
use crate::tokenizer::is_void_element;

/// `element.outerHTML`; for a document node, the whole document.
pub fn outer_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, false, &mut out);
    out
}

/// `element.innerHTML`.
pub fn inner_html(node: &Node) -> String {
    let mut out = String::new();
    let rawtext = is_rawtext(node);
    for c in node.children() {
        write_node(c, rawtext, &mut out);
    }
    out
}

fn is_rawtext(node: &Node) -> bool {
    node.is_element_named("script") || node.is_element_named("style")
}

fn write_node(node: &Node, in_rawtext: bool, out: &mut String) {
    match node {
        Node::Document {
            doctype, children, ..
        } => {
            if let Some(dt) = doctype {
                out.push_str("<!");
                out.push_str(dt);
                out.push('>');
            }
            for c in children {
                write_node(c, false, out);
            }
        }
        Node::Element {
            name,
            attributes,
            children,
            ..
        } => {
            out.push('<');
            out.push_str(name);
            for (k, v) in attributes {
                out.push(' ');
                out.push_str(k);
                if let Some(v) = v {
                    out.push_str("=\"");
                    escape_attr(v, out);
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) {
                return;
            }
            let rawtext = is_rawtext(node);
            for c in children {
                write_node(c, rawtext, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Text { text, .. } => {
            if in_rawtext {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        Node::Comment { text, .. } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

/// Indented one-line-per-node outline, capped at `cap` lines.
pub fn outline(root: &Node, cap: usize) -> Vec<String> {
    fn walk(node: &Node, depth: usize, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        *left -= 1;
        let indent = "  ".repeat(depth);
        match node {
            Node::Document {
                doctype, children, ..
            } => {
                match doctype {
                    Some(dt) => out.push(format!("{indent}<!{dt}>")),
                    None => out.push(format!("{indent}#document")),
                }
                for c in children {
                    walk(c, depth + 1, out, left);
                }
            }
            Node::Element {
                name, children, ..
            } => {
                let mut line = format!("{indent}<{name}");
                if let Some(id) = node.attr("id").filter(|v| !v.is_empty()) {
                    line.push_str(&format!(r#" id="{id}""#));
                }
                if let Some(class) = node.attr("class").filter(|v| !v.is_empty()) {
                    line.push_str(&format!(r#" class="{class}""#));
                }
                if let Some(href) = node.attr("href") {
                    line.push_str(&format!(r#" href="{href}""#));
                }
                line.push('>');
                out.push(line);
                for c in children {
                    walk(c, depth + 1, out, left);
                }
            }
            Node::Text { text, .. } => {
                let t = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !t.is_empty() {
                    out.push(format!("{indent}\"{}\"", truncate_chars(&t, 40)));
                } else {
                    *left += 1;
                }
            }
            Node::Comment { text, .. } => {
                let t = text.replace('\n', " ");
                out.push(format!("{indent}<!-- {} -->", truncate_chars(t.trim(), 40)));
            }
        }
    }
    let mut out = Vec::new();
    let mut left = cap;
    walk(root, 0, &mut out, &mut left);
    out
}

/// First `max` chars, with an ellipsis when cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
