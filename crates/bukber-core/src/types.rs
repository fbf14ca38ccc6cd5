//! Core identifier types for Bukber

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{BukberError, BukberResult};

/// Unique identifier for a guestbook entry
///
/// Opaque to the reconciler: two entries are the same record iff their ids
/// are equal. Ids assigned locally are ULIDs; ids coming from an external
/// database may be any non-empty string (e.g. a serial number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Create a new EntryId backed by a fresh ULID
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Parse an id, rejecting empty or whitespace-only strings
    pub fn parse(s: &str) -> BukberResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(BukberError::MalformedEntry("empty id".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for EntryId {
    fn from(serial: u64) -> Self {
        Self(serial.to_string())
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
