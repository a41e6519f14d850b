use core_types::{NavigationId, PageName};
use html::{Document, Id};
use log::{error, info, warn};
use net::Fetcher;
use url::Url;

use crate::config::{ShellConfig, SiteSelectors};
use crate::error::ShellError;
use crate::history::HistoryEntry;
use crate::window::Window;

mod init;
mod links;
mod loader;
mod router;

pub use init::InitReport;
pub use links::is_external_link;
pub use loader::{ContentSource, LoadOutcome, PendingLoad};
pub use router::{ClickEvent, ClickOutcome, Modifiers, MouseButton};

/// One browsing context running the shared-layout loader: the window, the fetcher it
/// loads through, and the listeners the initializer registered.
pub struct Session<F: Fetcher> {
    fetcher: F,
    config: ShellConfig,
    selectors: SiteSelectors,
    window: Window,

    // Nav region the click interceptor is attached to.
    interceptor: Option<Id>,
    popstate_handler: bool,
    nav_gen: NavigationId,
    init_report: Option<InitReport>,
}

impl<F: Fetcher> Session<F> {
    /// Wraps an already-parsed document. Nothing is fetched and the initializer has not run.
    pub fn with_document(
        fetcher: F,
        config: ShellConfig,
        location: Url,
        document: Document,
    ) -> Result<Self, ShellError> {
        let selectors = config.selectors()?;
        Ok(Self {
            fetcher,
            config,
            selectors,
            window: Window::new(document, location),
            interceptor: None,
            popstate_handler: false,
            nav_gen: 0,
            init_report: None,
        })
    }

    /// Loads the page at `url` and runs the initializer on it, like a browser opening a
    /// new tab on the site.
    pub fn open(fetcher: F, config: ShellConfig, url: Url) -> Result<Self, ShellError> {
        let document = fetch_document(&fetcher, &url)?;
        let mut session = Self::with_document(fetcher, config, url, document)?;
        session.init();
        Ok(session)
    }

    /// Full-document navigation within the same window: history is kept, listeners are
    /// dropped with the old document and the initializer runs again.
    pub fn navigate(&mut self, url: Url) -> Result<InitReport, ShellError> {
        let document = fetch_document(&self.fetcher, &url)?;
        info!(target: "navshell.router", "full navigation to {url}");
        self.window.replace_document(document, url);
        Ok(self.reset_and_init())
    }

    /// History traversal to an entry created by another document: reloads that document
    /// and initializes it, leaving the history list untouched.
    pub(crate) fn restore_entry(&mut self, entry: HistoryEntry) -> LoadOutcome {
        match fetch_document(&self.fetcher, &entry.url) {
            Ok(document) => {
                info!(target: "navshell.router", "reloading {} for history traversal", entry.url);
                self.window.restore_document(document, entry.url, entry.document);
                self.reset_and_init().content
            }
            Err(err) => {
                error!(target: "navshell.router", "history traversal failed: {err}");
                let page = PageName::from_path_or(entry.url.path(), &self.config.site.default_page);
                LoadOutcome::FetchFailed { page }
            }
        }
    }

    // Listeners belong to the replaced document.
    fn reset_and_init(&mut self) -> InitReport {
        self.interceptor = None;
        self.popstate_handler = false;
        self.init()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.window.document
    }

    pub fn location(&self) -> &Url {
        &self.window.location
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Report of the most recent initializer run.
    pub fn init_report(&self) -> Option<&InitReport> {
        self.init_report.as_ref()
    }

    /// Serialized children of the content region.
    pub fn content_html(&self) -> Option<String> {
        let region = self.content_region()?;
        self.window.document.get(region).map(html::inner_html)
    }
}

fn fetch_document<F: Fetcher>(fetcher: &F, url: &Url) -> Result<Document, ShellError> {
    let result = fetcher.fetch_text(url);
    if !result.is_success() {
        warn!(target: "navshell.init", "could not open {}", result.describe_failure());
        return Err(ShellError::DocumentUnavailable(result.describe_failure()));
    }
    if let Some(ct) = result.content_type.as_deref() {
        if !html::is_html(Some(ct)) {
            warn!(target: "navshell.init", "{url} is served as {ct:?}; parsing as HTML anyway");
        }
    }
    Ok(Document::parse(&result.body))
}
