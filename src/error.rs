//! Error types.
//!
//! Each concern gets its own enum so callers can match on the cases they
//! care about.  Only [`ConfigError`] is fatal, and only at startup; fetch
//! and storage errors are shown or logged and the dashboard keeps going.

use thiserror::Error;

/// Invalid configuration, from the command line or the options form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The URL parameter is not valid! Try harder. ({0})")]
    InvalidSource(String),
    #[error("frequency must be a whole number from 1 up to one year's worth (got {0:?})")]
    InvalidFrequency(String),
}

/// Why a single fetch did not produce a snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No response was received at all.
    #[error("{0}")]
    Network(String),
    /// The server answered, but not with a 2xx status.
    #[error("{status} on {url}")]
    Server { status: u16, url: String },
    /// A 2xx response whose body was not the expected aggregation payload.
    #[error("{0}")]
    Payload(String),
}

impl FetchError {
    /// Banner heading for this kind of error.
    pub fn title(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "Network Error",
            FetchError::Server { .. } => "Server Error",
            FetchError::Payload(_) => "Invalid Response",
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
