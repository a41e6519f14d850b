use core_types::{HistoryState, PageName};
use html::Document;
use url::Url;

use crate::history::{DocumentSeq, History};

/// The host environment the loader runs in: the live document, its location and the
/// session history.
#[derive(Debug, Clone)]
pub struct Window {
    pub document: Document,
    pub location: Url,
    pub history: History,
    document_seq: DocumentSeq,
    loads: DocumentSeq,
}

impl Window {
    pub fn new(document: Document, location: Url) -> Self {
        Self {
            history: History::new(location.clone()),
            document,
            location,
            document_seq: 0,
            loads: 0,
        }
    }

    /// Sequence number of the current document; see [`crate::HistoryEntry::document`].
    pub fn document_seq(&self) -> DocumentSeq {
        self.document_seq
    }

    /// Page identifier for the current location.
    pub fn page_name(&self, default_page: &str) -> PageName {
        PageName::from_path_or(self.location.path(), default_page)
    }

    /// `history.pushState(state, "", url)`: records the entry and moves the location without
    /// loading anything.
    pub fn push_state(&mut self, state: HistoryState, url: Url) {
        self.history.push(url.clone(), Some(state), self.document_seq);
        self.location = url;
    }

    /// Full-document navigation: swaps the document and records a stateless history entry.
    pub fn replace_document(&mut self, document: Document, url: Url) {
        self.loads += 1;
        self.document_seq = self.loads;
        self.history.push(url.clone(), None, self.document_seq);
        self.document = document;
        self.location = url;
    }

    /// Reloads the document of an existing history entry during traversal. History is left
    /// as it is; the entries of that document become same-document entries again.
    pub fn restore_document(&mut self, document: Document, url: Url, seq: DocumentSeq) {
        self.document_seq = seq;
        self.document = document;
        self.location = url;
    }

    /// Resolves `href` against the current location.
    pub fn resolve(&self, href: &str) -> Result<Url, url::ParseError> {
        self.location.join(href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(url: &str) -> Window {
        Window::new(
            Document::parse("<html><head><title>Home</title></head><body></body></html>"),
            Url::parse(url).expect("valid url"),
        )
    }

    #[test]
    fn page_name_uses_last_segment_or_default() {
        assert_eq!(window("https://example.com/docs/about.html").page_name("index.html").as_str(), "about.html");
        assert_eq!(window("https://example.com/docs/").page_name("index.html").as_str(), "index.html");
    }

    #[test]
    fn push_state_moves_location_and_history_together() {
        let mut win = window("https://example.com/index.html");
        let target = win.resolve("about.html").expect("resolves");
        win.push_state(
            HistoryState {
                path: PageName::from_path("about.html"),
            },
            target.clone(),
        );
        assert_eq!(win.location, target);
        assert_eq!(win.history.len(), 2);
        assert_eq!(win.history.current().url, target);
        assert_eq!(win.history.current().document, win.document_seq());
        assert_eq!(win.document.title().as_deref(), Some("Home"));
    }

    #[test]
    fn replace_document_starts_a_new_document_entry() {
        let mut win = window("https://example.com/index.html");
        let target = Url::parse("https://example.com/blog/").expect("url");
        win.replace_document(Document::parse("<p>blog</p>"), target.clone());
        assert_eq!(win.location, target);
        assert_eq!(win.history.state(), None);
        assert_eq!(win.history.len(), 2);
        assert_eq!(win.document_seq(), 1);
        assert_eq!(win.history.current().document, 1);
        assert!(win.document.title().is_none());
    }

    #[test]
    fn document_seq_is_not_reused_after_restore() {
        let mut win = window("https://example.com/index.html");
        let blog = Url::parse("https://example.com/blog.html").expect("url");
        win.replace_document(Document::parse("<p>blog</p>"), blog);

        let first = win.history.back().cloned().expect("first entry");
        win.restore_document(Document::parse("<p>home</p>"), first.url, first.document);
        assert_eq!(win.document_seq(), 0);

        let news = Url::parse("https://example.com/news.html").expect("url");
        win.replace_document(Document::parse("<p>news</p>"), news);
        assert_eq!(win.document_seq(), 2);
        assert_eq!(win.history.len(), 2);
    }
}
