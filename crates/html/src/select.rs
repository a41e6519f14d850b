//! A small CSS selector subset: the markers a shared page layout needs, nothing more.
//!
//! Supported: type (`a`), universal (`*`), id (`#x`), class (`.x`), attribute presence
//! (`[href]`) and equality (`[href="about.html"]`), descendant and child (`>`) combinators,
//! and selector lists (`a, b`). No pseudo-classes.
use crate::Node;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    Unexpected { selector: String, at: usize },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::Unexpected { selector, at } => {
                write!(f, "unsupported selector syntax in {selector:?} at byte {at}")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.ids.is_empty() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, node: &Node) -> bool {
        let Some(name) = node.element_name() else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if tag != "*" && !tag.eq_ignore_ascii_case(name) {
                return false;
            }
        }
        self.ids.iter().all(|id| node.attr("id") == Some(id.as_str()))
            && self.classes.iter().all(|c| node.has_class(c))
            && self.attrs.iter().all(|a| match a {
                AttrMatch::Exists(k) => node.has_attr(k),
                AttrMatch::Equals(k, v) => node.attr(k) == Some(v.as_str()),
            })
    }
}

/// One complex selector: compounds joined by combinators, stored left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, node: &Node, ancestors: &[&Node]) -> bool {
        let last = self.parts.len() - 1;
        self.parts[last].1.matches(node) && self.match_rest(last, ancestors)
    }

    // Backtracking right-to-left match; `ancestors` is ordered root first.
    fn match_rest(&self, idx: usize, ancestors: &[&Node]) -> bool {
        if idx == 0 {
            return true;
        }
        let combinator = self.parts[idx].0;
        let prev = &self.parts[idx - 1].1;
        match combinator {
            Combinator::Child => match ancestors.split_last() {
                Some((parent, rest)) => prev.matches(parent) && self.match_rest(idx - 1, rest),
                None => false,
            },
            Combinator::Descendant => (0..ancestors.len())
                .rev()
                .any(|i| prev.matches(ancestors[i]) && self.match_rest(idx - 1, &ancestors[..i])),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl Selector {
    pub fn parse(input: &str) -> Result<Selector, SelectorError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut alternatives = Vec::new();
        let mut offset = 0;
        for group in input.split(',') {
            alternatives.push(parse_complex(group, input, offset)?);
            offset += group.len() + 1;
        }
        Ok(Selector {
            source: source.to_string(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches `node` given its ancestor chain (root first, parent last).
    pub fn matches(&self, node: &Node, ancestors: &[&Node]) -> bool {
        self.alternatives.iter().any(|c| c.matches(node, ancestors))
    }
}

fn parse_complex(group: &str, whole: &str, offset: usize) -> Result<Complex, SelectorError> {
    let unexpected = |at: usize| SelectorError::Unexpected {
        selector: whole.to_string(),
        at: offset + at,
    };
    let bytes = group.as_bytes();
    let mut parts: Vec<(Combinator, Compound)> = Vec::new();
    let mut current = Compound::default();
    let mut pending = Combinator::Descendant;
    let mut saw_space = false;
    let mut i = 0;

    let flush = |current: &mut Compound,
                 parts: &mut Vec<(Combinator, Compound)>,
                 combinator: Combinator| {
        if !current.is_empty() {
            parts.push((combinator, std::mem::take(current)));
        }
    };

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => {
                saw_space = true;
                i += 1;
            }
            b'>' => {
                if current.is_empty() && parts.is_empty() {
                    return Err(unexpected(i));
                }
                flush(&mut current, &mut parts, pending);
                pending = Combinator::Child;
                saw_space = false;
                i += 1;
            }
            _ => {
                if saw_space && !current.is_empty() {
                    flush(&mut current, &mut parts, pending);
                    pending = Combinator::Descendant;
                }
                saw_space = false;
                match b {
                    b'#' | b'.' => {
                        let (ident, next) = read_ident(group, i + 1);
                        if ident.is_empty() {
                            return Err(unexpected(i));
                        }
                        if b == b'#' {
                            current.ids.push(ident.to_string());
                        } else {
                            current.classes.push(ident.to_string());
                        }
                        i = next;
                    }
                    b'[' => {
                        let Some(close) = group[i..].find(']') else {
                            return Err(unexpected(i));
                        };
                        let inner = group[i + 1..i + close].trim();
                        let attr = match inner.split_once('=') {
                            Some((k, v)) => {
                                let v = v.trim();
                                let v = v
                                    .strip_prefix('"')
                                    .and_then(|v| v.strip_suffix('"'))
                                    .or_else(|| v.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                                    .unwrap_or(v);
                                AttrMatch::Equals(k.trim().to_ascii_lowercase(), v.to_string())
                            }
                            None => AttrMatch::Exists(inner.to_ascii_lowercase()),
                        };
                        if matches!(&attr, AttrMatch::Exists(k) | AttrMatch::Equals(k, _) if k.is_empty())
                        {
                            return Err(unexpected(i));
                        }
                        current.attrs.push(attr);
                        i += close + 1;
                    }
                    b'*' => {
                        if current.tag.is_some() {
                            return Err(unexpected(i));
                        }
                        current.tag = Some("*".into());
                        i += 1;
                    }
                    _ => {
                        let (ident, next) = read_ident(group, i);
                        if ident.is_empty() || current.tag.is_some() || !current.is_empty() {
                            return Err(unexpected(i));
                        }
                        current.tag = Some(ident.to_ascii_lowercase());
                        i = next;
                    }
                }
            }
        }
    }

    if current.is_empty() {
        // trailing combinator or empty group
        return Err(if parts.is_empty() {
            SelectorError::Empty
        } else {
            unexpected(group.len())
        });
    }
    parts.push((pending, current));
    Ok(Complex { parts })
}

fn read_ident(s: &str, from: usize) -> (&str, usize) {
    let bytes = s.as_bytes();
    let mut j = from;
    while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-' || bytes[j] == b'_')
    {
        j += 1;
    }
    (&s[from..j], j)
}
