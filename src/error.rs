//! Error type shared by the engine, the settings loader and the bot layer.
//!
//! Every failure carries a [`Severity`] so callers can tell a condition that
//! must stop the process apart from one that should only be reported.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// How a caller is expected to react to an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Terminate the process with a diagnostic.
    Fatal,
    /// Log it, report failure, keep serving.
    Soft,
    /// Hand it to whoever asked and let them decide.
    Propagate,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("No service file found in {0}")]
    SourceListMissing(String),

    #[error("Issue in loading source data from {path}: {reason}")]
    SourceList { path: String, reason: String },

    #[error("No data file found in {0}")]
    CacheMissing(String),

    #[error("Issue in loading proxy data from {path}: {source}")]
    CacheRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Issue in decoding data from {url} using base-64: {reason}")]
    Base64 { url: String, reason: String },

    #[error("Request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("Cannot write proxy data to {path}: {source}")]
    CacheWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Telegram error: {0}")]
    Telegram(String),
}

impl Error {
    pub fn severity(&self) -> Severity {
        match self {
            Error::SourceListMissing(_)
            | Error::SourceList { .. }
            | Error::CacheMissing(_)
            | Error::CacheRead { .. }
            | Error::Base64 { .. }
            | Error::Config(_) => Severity::Fatal,
            Error::CacheWrite { .. } => Severity::Soft,
            Error::Fetch { .. } | Error::Malformed { .. } | Error::Telegram(_) => {
                Severity::Propagate
            }
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
