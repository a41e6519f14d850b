mod common;

use common::{ORIGIN, active_labels, nav_link, open, page, site, url};
use html::Selector;
use shell::{ClickEvent, ClickOutcome, ContentSource, LoadOutcome, Modifiers};

#[test]
fn opening_a_page_builds_the_shared_layout() {
    let session = open("index.html", site());
    let report = session.init_report().expect("initialized").clone();

    assert!(report.header_loaded);
    assert!(report.interceptor_attached);
    assert_eq!(
        report.content,
        LoadOutcome::Loaded {
            page: "index.html".into(),
            source: ContentSource::Primary
        }
    );
    assert_eq!(active_labels(&session), vec!["Home"]);
    assert_eq!(session.content_html().as_deref(), Some("<h1>Welcome</h1>"));
    assert_eq!(session.document().title().as_deref(), Some("Home"));

    // the Source entry lives in the header, so it is hardened; the footer is not scanned
    let source = nav_link(&session, "Source");
    let node = session.document().get(source).expect("source link");
    assert_eq!(node.attr("target"), Some("_blank"));
    assert_eq!(node.attr("rel"), Some("noopener noreferrer"));
    let footer = session
        .find_link("https://elsewhere.net/")
        .and_then(|id| session.document().get(id))
        .expect("footer link");
    assert_eq!(footer.attr("target"), None);
}

#[test]
fn directory_location_loads_the_default_page() {
    let session = open("", site().with_page(ORIGIN, &page("Home", "<h1>Welcome</h1>")));
    assert_eq!(session.location().as_str(), "https://example.com/");
    assert_eq!(active_labels(&session), vec!["Home"]);
    assert_eq!(session.fetcher().request_count(url("index.html").as_str()), 1);
}

#[test]
fn nav_click_swaps_content_without_reloading_the_header() {
    let mut session = open("index.html", site());
    let about = nav_link(&session, "About");

    let outcome = session.click(about);
    assert!(matches!(outcome, ClickOutcome::Intercepted { ref load, .. } if load.is_loaded()));
    assert_eq!(session.location(), &url("about.html"));
    assert_eq!(session.window().history.len(), 2);
    assert_eq!(active_labels(&session), vec!["About"]);
    assert_eq!(session.document().title().as_deref(), Some("About"));
    assert_eq!(
        session.content_html().as_deref(),
        Some(r#"<h1>About</h1><p>See <a href="https://docs.rs/" target="_blank" rel="noopener noreferrer">docs</a>.</p>"#)
    );
    assert_eq!(session.fetcher().request_count(url("shared-header.html").as_str()), 1);
    assert_eq!(session.fetcher().request_count(url("about.html").as_str()), 1);
}

#[test]
fn back_and_forward_follow_history() {
    let mut session = open("index.html", site());
    session.click(nav_link(&session, "About"));
    session.click(nav_link(&session, "Contact"));

    let back = session.back().expect("popstate handled");
    assert_eq!(back.page().as_str(), "about.html");
    assert_eq!(active_labels(&session), vec!["About"]);

    let back = session.back().expect("popstate handled");
    assert_eq!(back.page().as_str(), "index.html");
    assert_eq!(session.location(), &url("index.html"));
    assert_eq!(session.content_html().as_deref(), Some("<h1>Welcome</h1>"));
    assert!(session.back().is_none());

    let forward = session.forward().expect("popstate handled");
    assert_eq!(forward.page().as_str(), "about.html");

    // navigating from the middle of history drops the forward entries
    session.click(nav_link(&session, "Home"));
    assert_eq!(session.window().history.len(), 3);
    assert!(session.forward().is_none());
}

#[test]
fn external_and_modified_clicks_are_left_to_the_browser() {
    let mut session = open("index.html", site());
    let requests_before = session.fetcher().requests().len();

    let source = nav_link(&session, "Source");
    assert!(matches!(session.click(source), ClickOutcome::Native { new_tab: true, .. }));

    let about = nav_link(&session, "About");
    let meta_click = ClickEvent {
        modifiers: Modifiers {
            meta: true,
            ..Modifiers::default()
        },
        ..ClickEvent::primary(about)
    };
    assert!(matches!(session.handle_click(meta_click), ClickOutcome::Native { new_tab: true, .. }));

    assert_eq!(session.fetcher().requests().len(), requests_before);
    assert_eq!(session.window().history.len(), 1);
}

#[test]
fn failed_page_load_keeps_previous_active_entry() {
    let fetcher = site().with_status(url("contact.html").as_str(), 500, "boom");
    let mut session = open("index.html", fetcher);

    let outcome = session.click(nav_link(&session, "Contact"));
    let ClickOutcome::Intercepted { load, .. } = outcome else {
        panic!("contact link should be intercepted");
    };
    assert!(matches!(load, LoadOutcome::FetchFailed { .. }));
    // the history entry was pushed before the fetch
    assert_eq!(session.location(), &url("contact.html"));
    assert_eq!(active_labels(&session), vec!["Home"]);
    let html = session.content_html().unwrap_or_default();
    assert!(html.contains("Could not load content"), "{html}");
}

#[test]
fn page_without_marker_uses_section_fallback() {
    let fetcher = site().with_page(
        url("contact.html").as_str(),
        "<html><body><section><h1>Old contact</h1></section></body></html>",
    );
    let mut session = open("index.html", fetcher);
    let outcome = session.click(nav_link(&session, "Contact"));
    let ClickOutcome::Intercepted { load, .. } = outcome else {
        panic!("contact link should be intercepted");
    };
    assert_eq!(
        load,
        LoadOutcome::Loaded {
            page: "contact.html".into(),
            source: ContentSource::Fallback
        }
    );
    assert_eq!(session.content_html().as_deref(), Some("<h1>Old contact</h1>"));
}

#[test]
fn activating_an_unclaimed_link_performs_a_full_load() {
    let fetcher = site().with_page(
        url("index.html").as_str(),
        &page("Home", r#"<h1>Welcome</h1><a href="contact.html">write to us</a>"#),
    );
    let mut session = open("index.html", fetcher);
    // the header's Contact entry comes first in document order, so look inside the content
    let main = session.content_region().expect("content region");
    let inline = session
        .document()
        .query_selector_within(main, &Selector::parse("a").expect("selector"))
        .expect("inline link");
    let header_fetches = session.fetcher().request_count(url("shared-header.html").as_str());

    let outcome = session.activate(ClickEvent::primary(inline)).expect("navigates");
    assert!(matches!(outcome, ClickOutcome::Native { new_tab: false, .. }));
    assert_eq!(session.location(), &url("contact.html"));
    assert_eq!(session.window().history.len(), 2);
    assert_eq!(session.window().history.state(), None);
    assert_eq!(
        session.fetcher().request_count(url("shared-header.html").as_str()),
        header_fetches + 1
    );
    assert_eq!(active_labels(&session), vec!["Contact"]);
}

#[test]
fn opening_a_missing_page_is_an_error() {
    let fetcher = site();
    let result = shell::Session::open(fetcher, shell::ShellConfig::default(), url("nope.html"));
    assert!(matches!(result, Err(shell::ShellError::DocumentUnavailable(_))));
}

#[test]
fn back_across_a_full_navigation_reloads_the_earlier_document() {
    let fetcher = site()
        .with_page(
            url("about.html").as_str(),
            &page("About", r#"<h1>About</h1><a href="plain.html">plain</a>"#),
        )
        .with_page(url("plain.html").as_str(), &page("Plain", "<p>plain</p>"));
    let mut session = open("index.html", fetcher);
    session.click(nav_link(&session, "About"));
    let inline = session.find_link("plain.html").expect("inline link");
    session
        .activate(ClickEvent::primary(inline))
        .expect("full navigation");
    assert_eq!(session.document().title().as_deref(), Some("Plain"));
    let header_fetches = session.fetcher().request_count(url("shared-header.html").as_str());

    // about.html was pushed by the index document, so going back loads it as a document
    let back = session.back().expect("traversed");
    assert!(back.is_loaded(), "{back:?}");
    assert_eq!(session.location(), &url("about.html"));
    assert_eq!(session.document().title().as_deref(), Some("About"));
    assert_eq!(active_labels(&session), vec!["About"]);
    assert_eq!(
        session.fetcher().request_count(url("shared-header.html").as_str()),
        header_fetches + 1
    );
    assert_eq!(session.window().history.len(), 3);

    // index.html shares the restored document, so this is a plain popstate
    let back = session.back().expect("popstate handled");
    assert_eq!(back.page().as_str(), "index.html");
    assert_eq!(session.content_html().as_deref(), Some("<h1>Welcome</h1>"));
    assert_eq!(
        session.fetcher().request_count(url("shared-header.html").as_str()),
        header_fetches + 1
    );

    session.forward();
    let forward = session.forward().expect("traversed");
    assert!(forward.is_loaded());
    assert_eq!(session.document().title().as_deref(), Some("Plain"));
    assert_eq!(session.content_html().as_deref(), Some("<p>plain</p>"));
}

#[test]
fn opening_a_deeply_nested_page_does_not_abort() {
    let unclosed = "<div>".repeat(10_000);
    let fetcher = site().with_page(url("index.html").as_str(), &page("Home", &unclosed));
    let session = open("index.html", fetcher);
    let report = session.init_report().expect("initialized");
    assert!(report.content.is_loaded());
    assert!(report.interceptor_attached);
    assert_eq!(active_labels(&session), vec!["Home"]);
}
