//! Store snapshot format
//!
//! The persisted form of the store is a single versioned JSON document:
//! a format version plus a `BTreeMap` of entries (stable ordering, so the
//! serialized bytes are deterministic). Unsupported versions are rejected
//! rather than guessed at.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A typed value held by the store.
///
/// Reads across widths are lenient: any stored variant satisfies a typed
/// `get` whenever the value converts losslessly; a lossy conversion is
/// treated as absent rather than truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    /// Signed 32-bit integer
    I32(i32),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Unsigned 8-bit integer
    U8(u8),
}

impl StoredValue {
    /// Returns the value as `i32` if it converts losslessly.
    pub fn as_i32(self) -> Option<i32> {
        match self {
            StoredValue::I32(value) => Some(value),
            StoredValue::U32(value) => i32::try_from(value).ok(),
            StoredValue::U8(value) => Some(i32::from(value)),
        }
    }

    /// Returns the value as `u32` if it converts losslessly.
    pub fn as_u32(self) -> Option<u32> {
        match self {
            StoredValue::I32(value) => u32::try_from(value).ok(),
            StoredValue::U32(value) => Some(value),
            StoredValue::U8(value) => Some(u32::from(value)),
        }
    }

    /// Returns the value as `u8` if it converts losslessly.
    pub fn as_u8(self) -> Option<u8> {
        match self {
            StoredValue::I32(value) => u8::try_from(value).ok(),
            StoredValue::U32(value) => u8::try_from(value).ok(),
            StoredValue::U8(value) => Some(value),
        }
    }
}

/// Serializable container for the committed entry set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    /// Version of the snapshot format (for future migrations)
    pub version: u32,
    /// Committed entries, keyed by name (stable ordering via BTreeMap)
    pub entries: BTreeMap<String, StoredValue>,
}

impl SnapshotData {
    /// Current version of the snapshot format
    pub const CURRENT_VERSION: u32 = 1;

    /// Creates an empty snapshot
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

impl Default for SnapshotData {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from snapshot encoding and decoding.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnapshotError {
    /// Failed to serialize the snapshot
    #[error("Failed to serialize snapshot: {0}")]
    SerializationFailed(String),

    /// The file contents are not a valid snapshot
    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),

    /// The snapshot was written by an unsupported format version
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

/// Serializes a snapshot to JSON bytes.
pub fn serialize_snapshot(data: &SnapshotData) -> Result<Vec<u8>, SnapshotError> {
    serde_json::to_vec_pretty(data)
        .map_err(|err| SnapshotError::SerializationFailed(err.to_string()))
}

/// Deserializes a snapshot from JSON bytes, rejecting unsupported versions.
pub fn deserialize_snapshot(bytes: &[u8]) -> Result<SnapshotData, SnapshotError> {
    let data: SnapshotData =
        serde_json::from_slice(bytes).map_err(|err| SnapshotError::Corrupt(err.to_string()))?;

    if data.version != SnapshotData::CURRENT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(data.version));
    }

    Ok(data)
}
