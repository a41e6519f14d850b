use super::{LoadOutcome, Session};
use crate::error::ShellError;
use core_types::{HistoryState, PageName};
use html::Id;
use log::{debug, info, warn};
use net::Fetcher;
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(self) -> bool {
        self.ctrl || self.meta || self.shift || self.alt
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseButton {
    #[default]
    Primary,
    /// Middle button; opens links in a new tab.
    Auxiliary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: Id,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl ClickEvent {
    pub fn primary(target: Id) -> Self {
        Self {
            target,
            button: MouseButton::Primary,
            modifiers: Modifiers::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Default action prevented; the page was loaded into the content region.
    Intercepted {
        page: PageName,
        url: Url,
        load: LoadOutcome,
    },
    /// Left to the browser's own link handling.
    Native { url: Url, new_tab: bool },
    /// Not a link click, or a link whose href cannot be resolved.
    Ignored,
}

impl<F: Fetcher> Session<F> {
    pub fn interceptor_attached(&self) -> bool {
        self.interceptor.is_some()
    }

    pub fn popstate_registered(&self) -> bool {
        self.popstate_handler
    }

    /// Click handling for the whole document: the interceptor on the header's navigation
    /// region runs first, and anything it does not claim falls through to native link
    /// behavior.
    pub fn handle_click(&mut self, event: ClickEvent) -> ClickOutcome {
        let doc = &self.window.document;
        let Some(link) = doc.closest(event.target, &self.selectors.link) else {
            return ClickOutcome::Ignored;
        };
        let Some(node) = doc.get(link) else {
            return ClickOutcome::Ignored;
        };
        let href = node.attr("href").unwrap_or("").to_string();
        let blank_target = node
            .attr("target")
            .is_some_and(|t| t.eq_ignore_ascii_case("_blank"));
        let download = node.has_attr("download");
        let in_nav = self
            .interceptor
            .is_some_and(|nav| doc.contains(nav, link));

        let url = match self.window.resolve(&href) {
            Ok(url) => url,
            Err(err) => {
                warn!(target: "navshell.router", "ignoring click on unresolvable href {href:?}: {err}");
                return ClickOutcome::Ignored;
            }
        };
        let new_tab = blank_target
            || event.modifiers.ctrl
            || event.modifiers.meta
            || event.button == MouseButton::Auxiliary;

        if !in_nav {
            return ClickOutcome::Native { url, new_tab };
        }
        if event.button != MouseButton::Primary || event.modifiers.any() || blank_target || download {
            debug!(target: "navshell.router", "not intercepting {url}: modified click or special link");
            return ClickOutcome::Native { url, new_tab };
        }
        if !self.is_internal_page(&url) {
            return ClickOutcome::Native { url, new_tab };
        }

        let page = PageName::from_path_or(url.path(), &self.config.site.default_page);
        info!(target: "navshell.router", "intercepted navigation to {page}");
        let pending = self.begin_load(&page);
        self.window
            .push_state(HistoryState { path: page.clone() }, url.clone());
        let load = match pending {
            Some(pending) => {
                let body = self.fetch_pending(&pending);
                self.finish_load(pending, body)
            }
            None => LoadOutcome::NoContentRegion { page: page.clone() },
        };
        ClickOutcome::Intercepted { page, url, load }
    }

    /// Same host, an `.html` page, and somewhere other than the current location.
    fn is_internal_page(&self, url: &Url) -> bool {
        url.host_str() == self.window.location.host_str()
            && url.path().ends_with(".html")
            && *url != self.window.location
    }

    pub fn click(&mut self, target: Id) -> ClickOutcome {
        self.handle_click(ClickEvent::primary(target))
    }

    /// First link in document order whose raw href equals `href`.
    pub fn find_link(&self, href: &str) -> Option<Id> {
        let doc = &self.window.document;
        doc.query_selector_all(&self.selectors.link)
            .into_iter()
            .find(|&id| doc.get(id).and_then(|n| n.attr("href")) == Some(href))
    }

    pub fn click_link(&mut self, href: &str) -> Result<ClickOutcome, ShellError> {
        let link = self
            .find_link(href)
            .ok_or_else(|| ShellError::LinkNotFound(href.to_string()))?;
        Ok(self.click(link))
    }

    /// Dispatches a click and then performs the native action for unclaimed same-window
    /// web links, as a browser would.
    pub fn activate(&mut self, event: ClickEvent) -> Result<ClickOutcome, ShellError> {
        let outcome = self.handle_click(event);
        if let ClickOutcome::Native { url, new_tab: false } = &outcome {
            if matches!(url.scheme(), "http" | "https" | "file") {
                self.navigate(url.clone())?;
            } else {
                debug!(target: "navshell.router", "leaving {url} to an external handler");
            }
        }
        Ok(outcome)
    }

    /// The `popstate` handler: reloads the content for the entry's page. `None` when no
    /// handler is registered.
    pub fn handle_popstate(&mut self, state: Option<HistoryState>) -> Option<LoadOutcome> {
        if !self.popstate_handler {
            return None;
        }
        let page = match state {
            Some(state) => state.path,
            None => self.window.page_name(&self.config.site.default_page),
        };
        info!(target: "navshell.router", "history traversal to {page}");
        Some(self.load_page_content(&page))
    }

    /// `history.back()`. `None` at the start of history, or for a same-document entry when
    /// no popstate handler is registered.
    pub fn back(&mut self) -> Option<LoadOutcome> {
        self.traverse(-1)
    }

    pub fn forward(&mut self) -> Option<LoadOutcome> {
        self.traverse(1)
    }

    fn traverse(&mut self, delta: isize) -> Option<LoadOutcome> {
        let entry = self.window.history.go(delta)?.clone();
        if entry.document != self.window.document_seq() {
            return Some(self.restore_entry(entry));
        }
        self.window.location = entry.url;
        self.handle_popstate(entry.state)
    }
}
