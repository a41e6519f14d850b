use super::{LoadOutcome, Session};
use html::{Id, Node};
use log::{error, info, warn};
use net::Fetcher;

/// What the initializer managed to set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// The placeholder had to be created rather than found in the page.
    pub placeholder_created: bool,
    pub header_loaded: bool,
    pub interceptor_attached: bool,
    pub content: LoadOutcome,
    pub hardened_links: usize,
}

impl<F: Fetcher> Session<F> {
    pub fn header_placeholder(&self) -> Option<Id> {
        self.window
            .document
            .element_by_html_id(&self.config.markers.header_placeholder_id)
    }

    /// Finds the header placeholder, creating it as the first child of the container (or
    /// of the body, or of the document) when the page lacks one.
    pub fn ensure_header_placeholder(&mut self) -> (Option<Id>, bool) {
        if let Some(existing) = self.header_placeholder() {
            return (Some(existing), false);
        }
        let doc = &self.window.document;
        let parent = match doc.query_selector(&self.selectors.container) {
            Some(container) => container,
            None => {
                warn!(
                    target: "navshell.init",
                    "no {} in page; inserting header placeholder into the body",
                    self.selectors.container
                );
                doc.body().unwrap_or_else(|| doc.root().id())
            }
        };
        let mut placeholder = Node::element("div");
        placeholder.set_attr("id", &self.config.markers.header_placeholder_id);
        let created = self.window.document.prepend_child(parent, placeholder);
        (created, created.is_some())
    }

    /// Fetches the shared header into `placeholder` and attaches the click interceptor to
    /// its navigation region. Returns whether the header loaded.
    fn inject_header(&mut self, placeholder: Id) -> bool {
        let url = match self.window.resolve(&self.config.site.header_url) {
            Ok(url) => url,
            Err(err) => {
                error!(
                    target: "navshell.init",
                    "invalid header URL {:?}: {err}",
                    self.config.site.header_url
                );
                self.show_header_error(placeholder, true);
                return false;
            }
        };
        let fetched = self.fetcher.fetch_text(&url);
        if !fetched.is_success() {
            // no status at all means the request itself failed
            let network = fetched.error.is_some();
            error!(
                target: "navshell.init",
                "shared header {}: {}",
                if network { "unreachable" } else { "failed" },
                fetched.describe_failure()
            );
            self.show_header_error(placeholder, network);
            return false;
        }
        let header = fetched.into_text().unwrap_or_default();

        self.window.document.set_inner_html(placeholder, &header);
        self.interceptor = self
            .window
            .document
            .query_selector_within(placeholder, &self.selectors.nav);
        if self.interceptor.is_none() {
            warn!(
                target: "navshell.init",
                "shared header has no {}; links will navigate natively",
                self.selectors.nav
            );
        }
        true
    }

    fn show_header_error(&mut self, placeholder: Id, network: bool) {
        let messages = &self.config.messages;
        let message = if network {
            &messages.header_network_error
        } else {
            &messages.header_error
        };
        self.window.document.set_inner_html(placeholder, message);
    }

    /// Site initializer, run once per full document load: header, content for the current
    /// page, history handling, and link hardening, in that order.
    pub fn init(&mut self) -> InitReport {
        let (placeholder, placeholder_created) = self.ensure_header_placeholder();
        let header_loaded = match placeholder {
            Some(placeholder) => self.inject_header(placeholder),
            None => {
                error!(target: "navshell.init", "could not place the header placeholder");
                false
            }
        };

        let page = self.window.page_name(&self.config.site.default_page);
        let content = self.load_page_content(&page);
        self.popstate_handler = true;
        let hardened_links = self.secure_external_links();

        let report = InitReport {
            placeholder_created,
            header_loaded,
            interceptor_attached: self.interceptor.is_some(),
            content,
            hardened_links,
        };
        info!(
            target: "navshell.init",
            "initialized {}: header {}, content {:?}",
            self.window.location,
            if report.header_loaded { "loaded" } else { "failed" },
            report.content
        );
        self.init_report = Some(report.clone());
        report
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ShellConfig;
    use crate::session::{LoadOutcome, Session};
    use html::Document;
    use net::MemoryFetcher;
    use url::Url;

    const HEADER: &str = r#"<header><nav class="main-nav"><a class="nav-item" href="index.html">Home</a><a class="nav-item" href="about.html">About</a><a href="https://github.com/site">Source</a></nav></header>"#;

    fn session(page: &str, fetcher: MemoryFetcher) -> Session<MemoryFetcher> {
        let location = Url::parse("https://example.com/about.html").expect("url");
        Session::with_document(fetcher, ShellConfig::default(), location, Document::parse(page)).expect("session")
    }

    fn site() -> MemoryFetcher {
        MemoryFetcher::new()
            .with_page("https://example.com/shared-header.html", HEADER)
            .with_page("https://example.com/about.html", r#"<main class="main-content"><p>About</p></main>"#)
    }

    #[test]
    fn placeholder_is_created_first_in_container() {
        let mut s = session(
            r#"<body><div class="container"><main class="main-content"></main></div></body>"#,
            MemoryFetcher::new(),
        );
        let (id, created) = s.ensure_header_placeholder();
        assert!(created);
        let container = s.document().first_element_named("div").expect("container");
        assert_eq!(s.document().get(container).map(|n| n.children()[0].id()), id);
        assert_eq!(s.ensure_header_placeholder(), (id, false));
    }

    #[test]
    fn placeholder_falls_back_to_body() {
        let mut s = session(r#"<body><main class="main-content"></main></body>"#, MemoryFetcher::new());
        let (id, created) = s.ensure_header_placeholder();
        assert!(created);
        let body = s.document().body().expect("body");
        assert_eq!(s.document().get(body).map(|n| n.children()[0].id()), id);
    }

    #[test]
    fn init_injects_header_loads_content_and_hardens() {
        let mut s = session(
            r#"<body><div class="container"><div id="shared-header-placeholder"></div><main class="main-content"></main></div></body>"#,
            site(),
        );
        let report = s.init();
        assert!(!report.placeholder_created);
        assert!(report.header_loaded);
        assert!(report.interceptor_attached);
        assert!(report.content.is_loaded());
        assert_eq!(report.hardened_links, 1);
        assert!(s.popstate_registered());
        assert_eq!(s.init_report(), Some(&report));

        let active: Vec<_> = s
            .active_nav_entries()
            .into_iter()
            .filter_map(|id| s.document().get(id).map(|n| n.text_content()))
            .collect();
        assert_eq!(active, vec!["About"]);
    }

    #[test]
    fn header_failure_shows_error_and_content_still_loads() {
        let fetcher = MemoryFetcher::new()
            .with_page("https://example.com/about.html", r#"<main class="main-content"><p>About</p></main>"#);
        let mut s = session(
            r#"<body><div class="container"><main class="main-content"></main></div></body>"#,
            fetcher,
        );
        let report = s.init();
        assert!(report.placeholder_created);
        assert!(!report.header_loaded);
        assert!(!report.interceptor_attached);
        assert!(report.content.is_loaded());

        let placeholder = s.header_placeholder().expect("placeholder");
        let text = s.document().get(placeholder).map(|n| n.text_content()).unwrap_or_default();
        assert!(text.contains("Could not load shared navigation"), "{text}");
        assert!(!text.contains("network or script error"), "{text}");
    }

    #[test]
    fn unreachable_header_shows_network_error() {
        let fetcher = site().with_transport_error("https://example.com/shared-header.html", "connection reset");
        let mut s = session(
            r#"<body><div class="container"><div id="shared-header-placeholder"></div><main class="main-content"></main></div></body>"#,
            fetcher,
        );
        let report = s.init();
        assert!(!report.header_loaded);
        assert!(!report.interceptor_attached);
        assert!(report.content.is_loaded());

        let placeholder = s.header_placeholder().expect("placeholder");
        let text = s.document().get(placeholder).map(|n| n.text_content()).unwrap_or_default();
        assert_eq!(
            text,
            "Error: Could not load shared navigation due to a network or script error. Check console."
        );
    }

    #[test]
    fn header_without_nav_does_not_attach_interceptor() {
        let fetcher = site().with_page("https://example.com/shared-header.html", "<header><h1>Site</h1></header>");
        let mut s = session(
            r#"<body><div class="container"><main class="main-content"></main></div></body>"#,
            fetcher,
        );
        let report = s.init();
        assert!(report.header_loaded);
        assert!(!report.interceptor_attached);
    }

    #[test]
    fn page_without_content_region_still_gets_header() {
        let mut s = session(r#"<body><div class="container"></div></body>"#, site());
        let report = s.init();
        assert!(report.header_loaded);
        assert!(matches!(report.content, LoadOutcome::NoContentRegion { .. }));
        assert_eq!(s.fetcher().request_count("https://example.com/about.html"), 0);
    }
}
