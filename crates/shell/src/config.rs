//! Site markers, resource names and inline messages, optionally loaded from TOML.
//!
//! Every field has a default matching the stock shared-header markup, so an empty file
//! (or no file at all) yields a working configuration.

use std::fs;
use std::path::Path;

use html::Selector;
use serde::{Deserialize, Serialize};

use crate::error::ShellError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShellConfig {
    #[serde(default)]
    pub site: Site,
    #[serde(default)]
    pub markers: Markers,
    #[serde(default)]
    pub messages: Messages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Header fragment, resolved against the current page URL.
    #[serde(default = "Site::default_header_url")]
    pub header_url: String,
    /// Page used when the location path ends in `/`.
    #[serde(default = "Site::default_page")]
    pub default_page: String,
}

impl Site {
    fn default_header_url() -> String {
        "shared-header.html".into()
    }

    fn default_page() -> String {
        core_types::DEFAULT_PAGE.into()
    }
}

impl Default for Site {
    fn default() -> Self {
        Self {
            header_url: Self::default_header_url(),
            default_page: Self::default_page(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    #[serde(default = "Markers::default_container")]
    pub container: String,
    #[serde(default = "Markers::default_content")]
    pub content: String,
    #[serde(default = "Markers::default_content_fallback")]
    pub content_fallback: String,
    /// Plain element id, not a selector.
    #[serde(default = "Markers::default_header_placeholder_id")]
    pub header_placeholder_id: String,
    #[serde(default = "Markers::default_nav")]
    pub nav: String,
    #[serde(default = "Markers::default_nav_item")]
    pub nav_item: String,
    #[serde(default = "Markers::default_active_class")]
    pub active_class: String,
}

impl Markers {
    fn default_container() -> String {
        ".container".into()
    }

    fn default_content() -> String {
        ".main-content".into()
    }

    fn default_content_fallback() -> String {
        "section".into()
    }

    fn default_header_placeholder_id() -> String {
        "shared-header-placeholder".into()
    }

    fn default_nav() -> String {
        ".main-nav".into()
    }

    fn default_nav_item() -> String {
        ".nav-item".into()
    }

    fn default_active_class() -> String {
        "active".into()
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            container: Self::default_container(),
            content: Self::default_content(),
            content_fallback: Self::default_content_fallback(),
            header_placeholder_id: Self::default_header_placeholder_id(),
            nav: Self::default_nav(),
            nav_item: Self::default_nav_item(),
            active_class: Self::default_active_class(),
        }
    }
}

/// Inline HTML rendered into the page on loading and failure paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "Messages::default_loading")]
    pub loading: String,
    #[serde(default = "Messages::default_content_error")]
    pub content_error: String,
    #[serde(default = "Messages::default_content_missing")]
    pub content_missing: String,
    /// Header answered with a non-success status.
    #[serde(default = "Messages::default_header_error")]
    pub header_error: String,
    /// Header request never got a response.
    #[serde(default = "Messages::default_header_network_error")]
    pub header_network_error: String,
}

impl Messages {
    fn default_loading() -> String {
        r#"<p class="loading-message">Loading…</p>"#.into()
    }

    fn default_content_error() -> String {
        r#"<p class="load-error">Error: Could not load content. Please check the console and make sure the site is served over HTTP.</p>"#.into()
    }

    fn default_content_missing() -> String {
        r#"<p class="load-error">Error: Could not find the main content in the requested page.</p>"#.into()
    }

    fn default_header_error() -> String {
        r#"<p style="color: red; text-align: center; padding: 20px; background: #fff2f2; border: 1px solid red;">Error: Could not load shared navigation. Please check console and ensure you are using a local web server.</p>"#.into()
    }

    fn default_header_network_error() -> String {
        r#"<p style="color: red; text-align: center; padding: 20px; background: #fff2f2; border: 1px solid red;">Error: Could not load shared navigation due to a network or script error. Check console.</p>"#.into()
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            loading: Self::default_loading(),
            content_error: Self::default_content_error(),
            content_missing: Self::default_content_missing(),
            header_error: Self::default_header_error(),
            header_network_error: Self::default_header_network_error(),
        }
    }
}

impl ShellConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn load(path: &Path) -> Result<Self, ShellError> {
        let raw = fs::read_to_string(path).map_err(|source| ShellError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ShellError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses every selector marker once, up front.
    pub fn selectors(&self) -> Result<SiteSelectors, ShellError> {
        let parse = |field: &'static str, value: &str| {
            Selector::parse(value).map_err(|source| ShellError::Selector { field, source })
        };
        let m = &self.markers;
        Ok(SiteSelectors {
            container: parse("markers.container", &m.container)?,
            content: parse("markers.content", &m.content)?,
            content_fallback: parse("markers.content_fallback", &m.content_fallback)?,
            nav: parse("markers.nav", &m.nav)?,
            nav_item: parse("markers.nav_item", &m.nav_item)?,
            link: parse("link", "a[href]")?,
            any_link: parse("link", "a")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub container: Selector,
    pub content: Selector,
    pub content_fallback: Selector,
    pub nav: Selector,
    pub nav_item: Selector,
    pub link: Selector,
    pub any_link: Selector,
}
