//! Synthetic record model and the hash metadata contract.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Metadata key carried by every synthetic record.
///
/// This is the only contract persisted in the store: Counter and Cleanup find
/// synthetic records by this key alone.
pub const HASH_META_KEY: &str = "_mysql_stress_test_hash";

/// Lowercase hex SHA-256 of the decimal string form of `value`.
pub fn hash_id(value: impl fmt::Display) -> String {
    hex::encode(Sha256::digest(value.to_string().as_bytes()))
}

/// Title given to the `index`-th seeded record.
pub fn synthetic_title(index: u64) -> String {
    format!("Test Post {index}")
}

/// Publication status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Visible to queries.
    Publish,
    /// Soft-deleted; hidden from every query.
    Trash,
}

impl RecordStatus {
    /// Status as stored in the `post_status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Publish => "publish",
            RecordStatus::Trash => "trash",
        }
    }

    /// Parse a stored status; unknown values are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "publish" => Some(RecordStatus::Publish),
            "trash" => Some(RecordStatus::Trash),
            _ => None,
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insert payload. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub title: String,
    pub status: RecordStatus,
}

impl NewRecord {
    /// A published record with the given title.
    pub fn published(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: RecordStatus::Publish,
        }
    }
}

/// A stored record as returned by a full-projection query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: u64,
    pub title: String,
    pub status: RecordStatus,
}

impl Record {
    /// Hash this record is expected to carry under [`HASH_META_KEY`].
    ///
    /// Recomputed from the id; the stored value is never read back.
    pub fn expected_hash(&self) -> String {
        hash_id(self.id)
    }
}
