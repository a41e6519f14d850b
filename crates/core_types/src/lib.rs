use serde::{Deserialize, Serialize};
use std::fmt;

pub type NavigationId = u64;

/// Page shown when a path ends in `/`.
pub const DEFAULT_PAGE: &str = "index.html";

/// A page identifier: the bare filename of a site page, e.g. `about.html`.
///
/// Always the last path segment, with any query string or fragment removed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageName(String);

impl PageName {
    /// Reduces a path, href or filename to its last segment; empty maps to `default`.
    pub fn from_path_or(path: &str, default: &str) -> PageName {
        let end = path.find(['?', '#']).unwrap_or(path.len());
        let path = &path[..end];
        let last = path.rsplit('/').next().unwrap_or("");
        if last.is_empty() {
            PageName(default.to_string())
        } else {
            PageName(last.to_string())
        }
    }

    pub fn from_path(path: &str) -> PageName {
        Self::from_path_or(path, DEFAULT_PAGE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageName {
    fn from(value: &str) -> Self {
        PageName::from_path(value)
    }
}

/// State stored with every history entry pushed by the router: `{ "path": "<filename>" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub path: PageName,
}
