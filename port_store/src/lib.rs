//! # Port Store
//!
//! This crate implements the persisted key/value settings store the ported
//! applications use for configuration.
//!
//! ## Philosophy
//!
//! Writes are staged in memory per handle and made durable by an explicit
//! `commit`, which merges them into a versioned snapshot file (last write for
//! a key wins). Reads consult the handle's staged writes first, then the
//! committed snapshot, so committed values are visible to every handle —
//! including future process runs.
//!
//! The store is keyed by name only: the namespace passed at `open` is kept
//! for diagnostics but provides no isolation. Single-writer discipline across
//! processes is the caller's obligation.
//!
//! ## Non-Goals
//!
//! Atomic commit and crash consistency are not provided; a torn write
//! surfaces as a corrupt snapshot on the next open.

pub mod snapshot;

pub use snapshot::{SnapshotData, SnapshotError, StoredValue};

use port_types::StatusCode;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from store operations. A missing key is recoverable, not fatal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// The key was never committed (or holds a value that does not convert
    /// losslessly to the requested width).
    #[error("Key not found: {0}")]
    NotFound(String),

    /// The handle was opened read-only.
    #[error("Store handle is read-only")]
    ReadOnly,

    /// Filesystem access failed.
    #[error("Store I/O failed: {0}")]
    Io(String),

    /// The snapshot file is not decodable.
    #[error("Store snapshot is corrupt: {0}")]
    Corrupt(String),

    /// The snapshot was written by an unsupported format version.
    #[error("Unsupported store version: {0}")]
    UnsupportedVersion(u32),
}

impl StoreError {
    /// Maps this error into the closed status-code table.
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NvsNotFound,
            StoreError::ReadOnly => StatusCode::InvalidState,
            StoreError::Io(_) | StoreError::Corrupt(_) => StatusCode::Fail,
            StoreError::UnsupportedVersion(_) => StatusCode::NvsNewVersionFound,
        }
    }
}

impl From<SnapshotError> for StoreError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::SerializationFailed(msg) => StoreError::Io(msg),
            SnapshotError::Corrupt(msg) => StoreError::Corrupt(msg),
            SnapshotError::UnsupportedVersion(version) => {
                StoreError::UnsupportedVersion(version)
            }
        }
    }
}

/// Access mode requested at open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Reads only; every set fails.
    ReadOnly,
    /// Reads and staged writes.
    ReadWrite,
}

/// Handle to the key/value store.
///
/// Dropping the handle releases it without touching persisted data.
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    namespace: String,
    mode: StoreMode,
    pending: BTreeMap<String, StoredValue>,
}

impl KvStore {
    /// Opens a handle bound to the snapshot file at `path`.
    ///
    /// The namespace is recorded for diagnostics only — handles opened with
    /// different namespaces share one flat keyspace (documented
    /// simplification). An existing snapshot is validated eagerly so a
    /// corrupt or newer-format file fails at open, not mid-read.
    pub fn open(
        path: impl Into<PathBuf>,
        namespace: impl Into<String>,
        mode: StoreMode,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        if path.exists() {
            load_snapshot(&path)?;
        }
        Ok(Self {
            path,
            namespace: namespace.into(),
            mode,
            pending: BTreeMap::new(),
        })
    }

    /// Returns the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the namespace recorded at open.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the access mode.
    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    /// Stages `key = value` as a signed 32-bit integer.
    pub fn set_i32(&mut self, key: &str, value: i32) -> Result<(), StoreError> {
        self.stage(key, StoredValue::I32(value))
    }

    /// Stages `key = value` as an unsigned 32-bit integer.
    pub fn set_u32(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.stage(key, StoredValue::U32(value))
    }

    /// Stages `key = value` as an unsigned 8-bit integer.
    pub fn set_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError> {
        self.stage(key, StoredValue::U8(value))
    }

    /// Reads the current value for `key` as `i32`.
    pub fn get_i32(&self, key: &str) -> Result<i32, StoreError> {
        self.lookup(key)?
            .as_i32()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Reads the current value for `key` as `u32`.
    pub fn get_u32(&self, key: &str) -> Result<u32, StoreError> {
        self.lookup(key)?
            .as_u32()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Reads the current value for `key` as `u8`.
    pub fn get_u8(&self, key: &str) -> Result<u8, StoreError> {
        self.lookup(key)?
            .as_u8()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Makes staged writes durable and visible to every handle.
    ///
    /// Read-modify-write against the snapshot: the committed entry set is
    /// loaded, staged writes are merged over it (last write per key wins),
    /// and the result replaces the file. Staged writes are kept until the
    /// file write succeeds, so a failed commit can be retried without
    /// losing them.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut data = if self.path.exists() {
            load_snapshot(&self.path)?
        } else {
            SnapshotData::new()
        };
        data.entries
            .extend(self.pending.iter().map(|(key, value)| (key.clone(), *value)));
        let bytes = snapshot::serialize_snapshot(&data)?;
        fs::write(&self.path, bytes).map_err(|err| StoreError::Io(err.to_string()))?;
        self.pending.clear();
        Ok(())
    }

    fn stage(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        if self.mode == StoreMode::ReadOnly {
            return Err(StoreError::ReadOnly);
        }
        self.pending.insert(key.to_string(), value);
        Ok(())
    }

    fn lookup(&self, key: &str) -> Result<StoredValue, StoreError> {
        if let Some(value) = self.pending.get(key) {
            return Ok(*value);
        }
        if self.path.exists() {
            if let Some(value) = load_snapshot(&self.path)?.entries.get(key) {
                return Ok(*value);
            }
        }
        Err(StoreError::NotFound(key.to_string()))
    }
}

/// Prepares the directory that will hold the snapshot file.
pub fn init(path: impl AsRef<Path>) -> Result<(), StoreError> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent).map_err(|err| StoreError::Io(err.to_string()))?;
    }
    Ok(())
}

/// Removes the persisted snapshot entirely. Missing files are fine.
pub fn erase(path: impl AsRef<Path>) -> Result<(), StoreError> {
    match fs::remove_file(path.as_ref()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(StoreError::Io(err.to_string())),
    }
}

fn load_snapshot(path: &Path) -> Result<SnapshotData, StoreError> {
    let bytes = fs::read(path).map_err(|err| StoreError::Io(err.to_string()))?;
    Ok(snapshot::deserialize_snapshot(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("settings.json")
    }

    #[test]
    fn test_round_trip_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let mut store = KvStore::open(&path, "config", StoreMode::ReadWrite).unwrap();
        store.set_i32("k", 42).unwrap();
        store.commit().unwrap();
        drop(store);

        let store = KvStore::open(&path, "config", StoreMode::ReadOnly).unwrap();
        assert_eq!(store.get_i32("k").unwrap(), 42);
    }

    #[test]
    fn test_unset_key_is_not_found() {
        let dir = tempdir().unwrap();
        let store = KvStore::open(store_path(&dir), "config", StoreMode::ReadOnly).unwrap();
        let err = store.get_u32("missing").unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".to_string()));
        assert_eq!(err.status(), StatusCode::NvsNotFound);
    }

    #[test]
    fn test_last_write_wins() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let mut store = KvStore::open(&path, "config", StoreMode::ReadWrite).unwrap();
        store.set_i32("mode", 1).unwrap();
        store.set_i32("mode", 2).unwrap();
        store.commit().unwrap();
        store.set_i32("mode", 3).unwrap();
        store.commit().unwrap();

        let store = KvStore::open(&path, "config", StoreMode::ReadOnly).unwrap();
        assert_eq!(store.get_i32("mode").unwrap(), 3);
    }

    #[test]
    fn test_staged_writes_visible_to_own_handle_before_commit() {
        let dir = tempdir().unwrap();
        let mut store =
            KvStore::open(store_path(&dir), "config", StoreMode::ReadWrite).unwrap();
        store.set_u8("level", 9).unwrap();
        assert_eq!(store.get_u8("level").unwrap(), 9);
    }

    #[test]
    fn test_uncommitted_writes_invisible_to_other_handles() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let mut writer = KvStore::open(&path, "config", StoreMode::ReadWrite).unwrap();
        writer.set_i32("k", 1).unwrap();

        let reader = KvStore::open(&path, "other", StoreMode::ReadOnly).unwrap();
        assert!(reader.get_i32("k").is_err());

        writer.commit().unwrap();
        assert_eq!(reader.get_i32("k").unwrap(), 1);
    }

    #[test]
    fn test_no_namespace_isolation() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let mut a = KvStore::open(&path, "alpha", StoreMode::ReadWrite).unwrap();
        a.set_u32("shared", 7).unwrap();
        a.commit().unwrap();

        let b = KvStore::open(&path, "beta", StoreMode::ReadOnly).unwrap();
        assert_eq!(b.get_u32("shared").unwrap(), 7);
        assert_eq!(b.namespace(), "beta");
    }

    #[test]
    fn test_read_only_handle_rejects_writes() {
        let dir = tempdir().unwrap();
        let mut store =
            KvStore::open(store_path(&dir), "config", StoreMode::ReadOnly).unwrap();
        let err = store.set_i32("k", 1).unwrap_err();
        assert_eq!(err, StoreError::ReadOnly);
        assert_eq!(err.status(), StatusCode::InvalidState);
    }

    #[test]
    fn test_typed_values_round_trip() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let mut store = KvStore::open(&path, "config", StoreMode::ReadWrite).unwrap();
        store.set_i32("offset", -40).unwrap();
        store.set_u32("interval", 3_000_000_000).unwrap();
        store.set_u8("brightness", 200).unwrap();
        store.commit().unwrap();
        drop(store);

        let store = KvStore::open(&path, "config", StoreMode::ReadOnly).unwrap();
        assert_eq!(store.get_i32("offset").unwrap(), -40);
        assert_eq!(store.get_u32("interval").unwrap(), 3_000_000_000);
        assert_eq!(store.get_u8("brightness").unwrap(), 200);
    }

    #[test]
    fn test_cross_width_reads_are_lossless_only() {
        let dir = tempdir().unwrap();
        let mut store =
            KvStore::open(store_path(&dir), "config", StoreMode::ReadWrite).unwrap();
        store.set_u8("small", 5).unwrap();
        store.set_i32("negative", -1).unwrap();
        store.set_u32("huge", u32::MAX).unwrap();

        assert_eq!(store.get_i32("small").unwrap(), 5);
        assert_eq!(store.get_u32("small").unwrap(), 5);
        assert!(matches!(
            store.get_u32("negative"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.get_i32("huge"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_commit_with_nothing_staged_is_a_no_op() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);
        let mut store = KvStore::open(&path, "config", StoreMode::ReadWrite).unwrap();
        store.commit().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_commit_keeps_staged_writes_for_retry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent/settings.json");

        // Parent directory does not exist yet, so the file write fails.
        let mut store = KvStore::open(&path, "config", StoreMode::ReadWrite).unwrap();
        store.set_i32("k", 42).unwrap();
        assert!(matches!(store.commit(), Err(StoreError::Io(_))));

        // The staged value survives the failure and a retry persists it.
        assert_eq!(store.get_i32("k").unwrap(), 42);
        init(&path).unwrap();
        store.commit().unwrap();
        drop(store);

        assert!(path.exists());
        let store = KvStore::open(&path, "config", StoreMode::ReadOnly).unwrap();
        assert_eq!(store.get_i32("k").unwrap(), 42);
    }

    #[test]
    fn test_erase_removes_persisted_data() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);

        let mut store = KvStore::open(&path, "config", StoreMode::ReadWrite).unwrap();
        store.set_i32("k", 42).unwrap();
        store.commit().unwrap();
        drop(store);

        erase(&path).unwrap();
        assert!(!path.exists());
        // Erasing an already-missing snapshot succeeds too.
        erase(&path).unwrap();

        let store = KvStore::open(&path, "config", StoreMode::ReadOnly).unwrap();
        assert!(store.get_i32("k").is_err());
    }

    #[test]
    fn test_init_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/settings.json");
        init(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_corrupt_snapshot_fails_at_open() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);
        fs::write(&path, b"not json at all").unwrap();

        let err = KvStore::open(&path, "config", StoreMode::ReadOnly).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
        assert_eq!(err.status(), StatusCode::Fail);
    }

    #[test]
    fn test_newer_format_version_fails_at_open() {
        let dir = tempdir().unwrap();
        let path = store_path(&dir);
        fs::write(&path, br#"{ "version": 2, "entries": {} }"#).unwrap();

        let err = KvStore::open(&path, "config", StoreMode::ReadOnly).unwrap_err();
        assert_eq!(err, StoreError::UnsupportedVersion(2));
        assert_eq!(err.status(), StatusCode::NvsNewVersionFound);
    }
}
