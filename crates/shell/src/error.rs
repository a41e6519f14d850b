use std::path::PathBuf;

use html::SelectorError;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("could not load page {0}")]
    DocumentUnavailable(String),
    #[error("invalid URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid selector in `{field}`: {source}")]
    Selector {
        field: &'static str,
        #[source]
        source: SelectorError,
    },
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot use {0:?} as a page location")]
    InvalidLocation(String),
    #[error("unknown step {0:?}; expected click:<href>, back or forward")]
    InvalidStep(String),
    #[error("no link with href {0:?} in the current document")]
    LinkNotFound(String),
}
