//! Library error type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by configuration loading, section registration and
/// source reads. Docstring content never produces one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("section keyword `{0}` is already registered")]
    DuplicateSection(String),

    #[error("section keyword must not be empty")]
    EmptyKeyword,
}

pub type Result<T> = std::result::Result<T, Error>;
