//! Shared-layout loader for static multi-page sites.
//!
//! A [`Session`] owns one window: it injects the shared header into every page, loads
//! page content into the content region on in-site navigation, keeps the active
//! navigation entry in sync and hardens off-site links.

use std::path::Path;

use url::Url;

pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod step;
pub mod window;

pub use config::{Markers, Messages, ShellConfig, Site, SiteSelectors};
pub use error::ShellError;
pub use history::{DocumentSeq, History, HistoryEntry};
pub use session::{
    ClickEvent, ClickOutcome, ContentSource, InitReport, LoadOutcome, Modifiers, MouseButton,
    PendingLoad, Session, is_external_link,
};
pub use step::{Step, StepOutcome};
pub use window::Window;

/// Interprets `input` as an absolute URL, or else as a filesystem path to open via `file://`.
pub fn parse_location(input: &str) -> Result<Url, ShellError> {
    if let Ok(url) = Url::parse(input) {
        // a single letter is a Windows drive, not a scheme
        if url.scheme().len() > 1 {
            return Ok(url);
        }
    }
    let path = std::path::absolute(Path::new(input))
        .map_err(|_| ShellError::InvalidLocation(input.to_string()))?;
    let url = if path.is_dir() {
        Url::from_directory_path(&path)
    } else {
        Url::from_file_path(&path)
    };
    url.map_err(|()| ShellError::InvalidLocation(input.to_string()))
}
