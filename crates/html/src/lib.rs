pub mod document;
pub mod select;
pub mod serialize;

mod dom_builder;
mod entities;
mod tokenizer;
mod types;

use memchr::{memchr, memchr2};

/// True for `text/html` and XHTML content types; an absent content type is not HTML.
pub fn is_html(ct: Option<&str>) -> bool {
    let Some(value) = ct else {
        return false;
    };
    contains_ignore_ascii_case(value, b"text/html")
        || contains_ignore_ascii_case(value, b"application/xhtml")
}

fn contains_ignore_ascii_case(haystack: &str, needle: &[u8]) -> bool {
    let hay = haystack.as_bytes();
    let n = needle.len();
    if n == 0 {
        return true;
    }
    let first = needle[0];
    let (a, b) = (first.to_ascii_lowercase(), first.to_ascii_uppercase());
    let mut i = 0;
    while i + n <= hay.len() {
        let rel = if a == b {
            memchr(a, &hay[i..])
        } else {
            memchr2(a, b, &hay[i..])
        };
        let Some(rel) = rel else {
            return false;
        };
        let pos = i + rel;
        if pos + n <= hay.len() && hay[pos..pos + n].eq_ignore_ascii_case(needle) {
            return true;
        }
        i = pos + 1;
    }
    false
}

pub use crate::document::Document;
pub use crate::dom_builder::{MAX_TREE_DEPTH, build_dom, parse_document, parse_fragment};
pub use crate::select::{Selector, SelectorError};
pub use crate::serialize::{inner_html, outer_html, outline, truncate_chars};
pub use crate::tokenizer::tokenize;
pub use crate::types::{Id, Node, NodeId, Token};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_html_matches_case_insensitively() {
        assert!(is_html(Some("text/html; charset=utf-8")));
        assert!(is_html(Some("Text/HTML")));
        assert!(is_html(Some("application/xhtml+xml")));
        assert!(!is_html(Some("application/json")));
        assert!(!is_html(None));
    }
}
