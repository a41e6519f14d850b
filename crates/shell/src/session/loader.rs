use super::Session;
use core_types::{NavigationId, PageName};
use html::{Document, Id};
use log::{debug, error, info, warn};
use net::Fetcher;
use url::Url;

/// Which marker the content was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { page: PageName, source: ContentSource },
    /// Fetched, but neither content marker was present.
    MarkerMissing { page: PageName },
    FetchFailed { page: PageName },
    /// The current document has no content region to load into.
    NoContentRegion { page: PageName },
}

impl LoadOutcome {
    pub fn page(&self) -> &PageName {
        match self {
            LoadOutcome::Loaded { page, .. }
            | LoadOutcome::MarkerMissing { page }
            | LoadOutcome::FetchFailed { page }
            | LoadOutcome::NoContentRegion { page } => page,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// A load whose placeholder is shown but whose response has not been applied yet.
///
/// Loads carry no cancellation: finishing a stale `PendingLoad` after a newer one still
/// overwrites the content region (last write wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub id: NavigationId,
    pub page: PageName,
    pub url: Option<Url>,
}

const BODY_SNIPPET_CHARS: usize = 500;

impl<F: Fetcher> Session<F> {
    pub fn content_region(&self) -> Option<Id> {
        self.window.document.query_selector(&self.selectors.content)
    }

    /// Fetches `url`, returning the body on success. Failures are logged and become `None`.
    pub fn fetch_text(&self, url: &Url) -> Option<String> {
        let result = self.fetcher.fetch_text(url);
        if !result.is_success() {
            error!(target: "navshell.fetch", "failed to fetch {}", result.describe_failure());
            return None;
        }
        debug!(
            target: "navshell.fetch",
            "fetched {} ({} bytes, {} ms)",
            result.url,
            result.body.len(),
            result.duration_ms
        );
        result.into_text()
    }

    /// Shows the loading placeholder and resolves the page URL. `None` when the current
    /// document has no content region.
    pub fn begin_load(&mut self, page: &PageName) -> Option<PendingLoad> {
        let Some(region) = self.content_region() else {
            warn!(
                target: "navshell.loader",
                "content region {} not found; cannot load {page}",
                self.selectors.content
            );
            return None;
        };
        self.nav_gen = self.nav_gen.wrapping_add(1);
        self.window
            .document
            .set_inner_html(region, &self.config.messages.loading);

        let url = match self.window.resolve(page.as_str()) {
            Ok(url) => Some(url),
            Err(err) => {
                warn!(target: "navshell.loader", "cannot resolve page {page:?}: {err}");
                None
            }
        };
        debug!(target: "navshell.loader", "load #{} started for {page}", self.nav_gen);
        Some(PendingLoad {
            id: self.nav_gen,
            page: page.clone(),
            url,
        })
    }

    pub fn fetch_pending(&self, pending: &PendingLoad) -> Option<String> {
        pending.url.as_ref().and_then(|url| self.fetch_text(url))
    }

    /// Applies a fetched body (or its absence) to the content region.
    pub fn finish_load(&mut self, pending: PendingLoad, body: Option<String>) -> LoadOutcome {
        if pending.id != self.nav_gen {
            debug!(
                target: "navshell.loader",
                "load #{} for {} finished after newer load #{}",
                pending.id,
                pending.page,
                self.nav_gen
            );
        }
        let page = pending.page;
        let Some(region) = self.content_region() else {
            warn!(target: "navshell.loader", "content region vanished before {page} arrived");
            return LoadOutcome::NoContentRegion { page };
        };

        let Some(body) = body else {
            self.window
                .document
                .set_inner_html(region, &self.config.messages.content_error);
            return LoadOutcome::FetchFailed { page };
        };

        let fetched = Document::parse(&body);
        let found = match fetched.query_selector(&self.selectors.content) {
            Some(marker) => Some((marker, ContentSource::Primary)),
            None => fetched
                .query_selector(&self.selectors.content_fallback)
                .map(|marker| (marker, ContentSource::Fallback)),
        };
        let Some((marker, source)) = found else {
            error!(
                target: "navshell.loader",
                "no {} or {} in {page}; body starts with: {}",
                self.selectors.content,
                self.selectors.content_fallback,
                body.chars().take(BODY_SNIPPET_CHARS).collect::<String>()
            );
            self.window
                .document
                .set_inner_html(region, &self.config.messages.content_missing);
            return LoadOutcome::MarkerMissing { page };
        };

        let children = fetched
            .get(marker)
            .map(|node| node.children().to_vec())
            .unwrap_or_default();
        self.window.document.replace_children(region, children);
        if let Some(title) = fetched.title() {
            self.window.document.set_title(&title);
        }

        self.secure_external_links();
        self.set_active_nav_link(&page);
        info!(target: "navshell.loader", "loaded {page} ({source:?} marker)");
        LoadOutcome::Loaded { page, source }
    }

    /// Placeholder, fetch, swap: the whole content transition for one page.
    pub fn load_page_content(&mut self, page: &PageName) -> LoadOutcome {
        let Some(pending) = self.begin_load(page) else {
            return LoadOutcome::NoContentRegion { page: page.clone() };
        };
        let body = self.fetch_pending(&pending);
        self.finish_load(pending, body)
    }
}
