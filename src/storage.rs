//! Last-visit persistence.
//!
//! After every successful lookup the raw response is written to a small JSON
//! file together with the time it was taken.  The next session reads it once
//! at startup to offer a "since your last visit" comparison.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::source::Snapshot;

const FILE_NAME: &str = "lastresult.json";

/// What was seen the last time a lookup succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastVisit {
    /// The full response body.
    pub result: Value,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl LastVisit {
    pub fn new(result: Value, at: DateTime<Utc>) -> Self {
        Self {
            result,
            timestamp: at.timestamp_millis(),
        }
    }

    /// The comparable snapshot, if the stored result still has the expected
    /// shape.
    pub fn snapshot(&self) -> Option<Snapshot> {
        Snapshot::from_response(&self.result).ok()
    }

    pub fn taken_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

#[derive(Debug, Clone)]
pub struct LastVisitStore {
    path: PathBuf,
}

impl LastVisitStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/freshoffthebuild/lastresult.json`, falling back to the
    /// working directory when the platform has no data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("freshoffthebuild"))
            .unwrap_or_default()
            .join(FILE_NAME)
    }

    /// Read the stored record.  A missing file is not an error.
    pub fn load(&self) -> Result<Option<LastVisit>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                path: self.path.display().to_string(),
                source,
            })
    }

    /// Overwrite the stored record.
    pub fn save(&self, visit: &LastVisit) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let content = serde_json::to_string(visit).map_err(|source| StorageError::Decode {
            path: self.path.display().to_string(),
            source,
        })?;
        fs::write(&self.path, content).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
