use super::Session;
use core_types::PageName;
use html::Id;
use log::{debug, warn};
use net::Fetcher;
use url::Url;

const EXTERNAL_TARGET: &str = "_blank";
const EXTERNAL_REL: &str = "noopener noreferrer";

/// True when `href` is an absolute `http(s)` URL whose host differs from `current`'s.
///
/// Relative and non-web hrefs are never external. A malformed absolute href is an error
/// so the caller can skip and report it.
pub fn is_external_link(href: &str, current: &Url) -> Result<bool, url::ParseError> {
    let href = href.trim();
    let is_web = ["http://", "https://"].iter().any(|scheme| {
        href.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    if !is_web {
        return Ok(false);
    }
    let target = Url::parse(href)?;
    Ok(target.host_str() != current.host_str())
}

impl<F: Fetcher> Session<F> {
    /// Navigation entries inside every navigation region, in document order.
    pub fn nav_entries(&self) -> Vec<Id> {
        let doc = &self.window.document;
        let mut out = Vec::new();
        for nav in doc.query_selector_all(&self.selectors.nav) {
            for item in doc.query_selector_all_within(nav, &self.selectors.nav_item) {
                if !out.contains(&item) {
                    out.push(item);
                }
            }
        }
        out
    }

    pub fn active_nav_entries(&self) -> Vec<Id> {
        let class = &self.config.markers.active_class;
        self.nav_entries()
            .into_iter()
            .filter(|&id| {
                self.window
                    .document
                    .get(id)
                    .is_some_and(|node| node.has_class(class))
            })
            .collect()
    }

    /// Marks the entries whose href names `page` as active and clears every other entry.
    /// Entries without an href are left alone. Returns how many entries ended up active.
    pub fn set_active_nav_link(&mut self, page: &PageName) -> usize {
        let entries = self.nav_entries();
        if entries.is_empty() {
            debug!(target: "navshell.links", "no navigation entries to mark for {page}");
            return 0;
        }
        let class = self.config.markers.active_class.clone();
        let default_page = self.config.site.default_page.clone();

        let mut active = 0;
        for id in entries {
            let Some(node) = self.window.document.get_mut(id) else {
                continue;
            };
            let Some(href) = node.attr("href") else {
                continue;
            };
            let matches = PageName::from_path_or(href, &default_page) == *page;
            node.remove_class(&class);
            if matches {
                node.add_class(&class);
                active += 1;
            }
        }
        debug!(target: "navshell.links", "{active} navigation entries active for {page}");
        active
    }

    /// Opens off-site links in the content region and the header in a new context with
    /// no opener. Returns how many links were updated.
    pub fn secure_external_links(&mut self) -> usize {
        let doc = &self.window.document;
        let scopes = [self.content_region(), self.header_placeholder()];
        let mut links: Vec<(Id, String)> = Vec::new();
        for scope in scopes.into_iter().flatten() {
            for id in doc.query_selector_all_within(scope, &self.selectors.any_link) {
                if links.iter().any(|(seen, _)| *seen == id) {
                    continue;
                }
                if let Some(href) = doc.get(id).and_then(|n| n.attr("href")) {
                    links.push((id, href.to_string()));
                }
            }
        }

        let mut hardened = 0;
        for (id, href) in links {
            match is_external_link(&href, &self.window.location) {
                Ok(true) => {
                    if let Some(node) = self.window.document.get_mut(id) {
                        node.set_attr("target", EXTERNAL_TARGET);
                        node.set_attr("rel", EXTERNAL_REL);
                        hardened += 1;
                    }
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(target: "navshell.links", "skipping malformed link {href:?}: {err}");
                }
            }
        }
        if hardened > 0 {
            debug!(target: "navshell.links", "hardened {hardened} external links");
        }
        hardened
    }
}
