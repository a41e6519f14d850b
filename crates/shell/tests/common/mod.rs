#![allow(dead_code)]

use net::MemoryFetcher;
use shell::{ShellConfig, Session};
use url::Url;

pub const ORIGIN: &str = "https://example.com/";

pub const HEADER: &str = r#"<header class="site-header">
  <a class="logo" href="index.html">Site</a>
  <nav class="main-nav">
    <a class="nav-item" href="index.html">Home</a>
    <a class="nav-item" href="about.html">About</a>
    <a class="nav-item" href="contact.html">Contact</a>
    <a class="nav-item" href="https://github.com/example/site">Source</a>
  </nav>
</header>"#;

/// A full site page the way the server would send it.
pub fn page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>{title}</title></head>
<body><div class="container"><div id="shared-header-placeholder"></div>
<main class="main-content">{content}</main>
<footer><a href="https://elsewhere.net/">Footer link</a></footer>
</div></body></html>"#
    )
}

pub fn url(path: &str) -> Url {
    Url::parse(ORIGIN)
        .and_then(|origin| origin.join(path))
        .expect("valid fixture url")
}

pub fn site() -> MemoryFetcher {
    MemoryFetcher::new()
        .with_page(&url("shared-header.html").to_string(), HEADER)
        .with_page(&url("index.html").to_string(), &page("Home", "<h1>Welcome</h1>"))
        .with_page(
            &url("about.html").to_string(),
            &page("About", r#"<h1>About</h1><p>See <a href="https://docs.rs/">docs</a>.</p>"#),
        )
        .with_page(&url("contact.html").to_string(), &page("Contact", "<h1>Contact</h1>"))
}

pub fn open(path: &str, fetcher: MemoryFetcher) -> Session<MemoryFetcher> {
    Session::open(fetcher, ShellConfig::default(), url(path)).expect("page opens")
}

pub fn nav_link(session: &Session<MemoryFetcher>, label: &str) -> html::Id {
    session
        .nav_entries()
        .into_iter()
        .find(|&id| {
            session
                .document()
                .get(id)
                .is_some_and(|n| n.text_content() == label)
        })
        .unwrap_or_else(|| panic!("no nav entry labelled {label:?}"))
}

pub fn active_labels(session: &Session<MemoryFetcher>) -> Vec<String> {
    session
        .active_nav_entries()
        .into_iter()
        .filter_map(|id| session.document().get(id).map(|n| n.text_content()))
        .collect()
}
