//! Data source abstraction layer.
//!
//! This module defines the [`DataSource`] trait and the [`Snapshot`] type
//! every source produces.  The only real implementation is
//! [`BuildhubSource`]; tests drive the poll loop with scripted sources.

mod buildhub;
mod snapshot;

pub use buildhub::BuildhubSource;
pub use snapshot::Snapshot;

#[cfg(test)]
pub(crate) use snapshot::tests::{response_body, snapshot_of};

use serde_json::Value;

use crate::error::FetchError;

/// One successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// The response body as received; this is what gets persisted.
    pub raw: Value,
    pub snapshot: Snapshot,
}

impl FetchResponse {
    pub fn from_body(raw: Value) -> Result<Self, FetchError> {
        let snapshot = Snapshot::from_response(&raw)?;
        Ok(Self { raw, snapshot })
    }
}

/// Trait that every data source must implement.
///
/// The poll loop awaits [`fetch()`](DataSource::fetch) to completion before
/// it schedules anything else, so an implementation never sees two calls in
/// flight at once.
pub trait DataSource: Send {
    /// Human-readable label used in logs.
    fn name(&self) -> &str;

    /// Perform one lookup.
    ///
    /// Errors are not retried; they are shown to the user until the next
    /// successful lookup.
    async fn fetch(&self) -> Result<FetchResponse, FetchError>;
}
