use core_types::HistoryState;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: Url,
    pub state: Option<HistoryState>,
    /// Document the entry was created in. Traversing to an entry of another document
    /// loads that document instead of firing `popstate`.
    pub document: DocumentSeq,
}

/// Sequence number of a full document load within one window.
pub type DocumentSeq = u64;

/// Session history of one window. Never empty: it starts with the entry for the page the
/// window was opened on.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    pub fn new(url: Url) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url,
                state: None,
                document: 0,
            }],
            index: 0,
        }
    }

    /// `history.pushState`: drops the forward branch and appends a new current entry.
    pub fn push(&mut self, url: Url, state: Option<HistoryState>, document: DocumentSeq) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            url,
            state,
            document,
        });
        self.index = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<&HistoryEntry> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        self.go(1)
    }

    /// Moves by `delta` entries. Out-of-range moves (and `go(0)`) leave history unchanged
    /// and return `None`.
    pub fn go(&mut self, delta: isize) -> Option<&HistoryEntry> {
        if delta == 0 {
            return None;
        }
        let target = self.index.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.index = target;
        Some(&self.entries[target])
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn state(&self) -> Option<&HistoryState> {
        self.current().state.as_ref()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::PageName;

    fn url(path: &str) -> Url {
        Url::parse("https://example.com/")
            .and_then(|base| base.join(path))
            .expect("valid url")
    }

    fn state(page: &str) -> Option<HistoryState> {
        Some(HistoryState {
            path: PageName::from_path(page),
        })
    }

    #[test]
    fn push_appends_and_moves_to_new_entry() {
        let mut history = History::new(url("index.html"));
        history.push(url("about.html"), state("about.html"), 0);
        assert_eq!(history.len(), 2);
        assert_eq!(history.index(), 1);
        assert_eq!(history.state(), state("about.html").as_ref());
    }

    #[test]
    fn back_and_forward_walk_entries() {
        let mut history = History::new(url("index.html"));
        history.push(url("about.html"), state("about.html"), 0);
        history.push(url("contact.html"), state("contact.html"), 0);

        let back = history.back().cloned().expect("has previous");
        assert_eq!(back.url, url("about.html"));
        let back = history.back().cloned().expect("has first");
        assert_eq!(back.url, url("index.html"));
        assert_eq!(back.state, None);
        assert!(history.back().is_none());
        assert_eq!(history.index(), 0);

        assert_eq!(history.forward().map(|e| e.url.clone()), Some(url("about.html")));
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn push_after_back_truncates_forward_branch() {
        let mut history = History::new(url("index.html"));
        history.push(url("about.html"), state("about.html"), 0);
        history.push(url("contact.html"), state("contact.html"), 0);
        history.back();
        history.push(url("team.html"), state("team.html"), 1);

        let urls: Vec<_> = history.entries().iter().map(|e| e.url.path().to_string()).collect();
        assert_eq!(urls, vec!["/index.html", "/about.html", "/team.html"]);
        assert_eq!(history.current().document, 1);
        assert!(history.forward().is_none());
    }

    #[test]
    fn go_rejects_out_of_range_moves() {
        let mut history = History::new(url("index.html"));
        assert!(history.go(0).is_none());
        assert!(history.go(-1).is_none());
        assert!(history.go(5).is_none());
        assert_eq!(history.index(), 0);
    }
}
