//! JSON Record Store - file-backed persistence for records.
//!
//! The [`JsonRecordStore`] keeps every record in memory and replaces the
//! whole record file after each mutation:
//! - Creating and opening the record file
//! - Decoding it on open
//! - Writing a staged copy to a temp file and renaming it into place

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::common::{Error, Key, Result};
use crate::storage::{MemoryRecordStore, Record, RecordStore};

/// A [`RecordStore`] persisted as a JSON array in a single file.
///
/// # File Format
/// ```text
/// [
///   {
///     "rollNo": 42,
///     "name": "Ada",
///     "department": "CS"
///   },
///   ...
/// ]
/// ```
///
/// # Durability
/// A mutation is applied to a copy of the records, written to a temp file
/// next to the record file, synced, then renamed over it. The in-memory
/// records are replaced only after the rename succeeds, so a failed write
/// leaves both the file and memory as they were.
///
/// # Thread Safety
/// `JsonRecordStore` is **single-threaded**. The `IndexService` serializes
/// access to it together with the tree.
pub struct JsonRecordStore {
    path: PathBuf,
    records: MemoryRecordStore,
}

impl JsonRecordStore {
    /// Create a new record file holding an empty array.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        OpenOptions::new().write(true).create_new(true).open(&path)?;

        let store = Self {
            path: path.as_ref().to_path_buf(),
            records: MemoryRecordStore::new(),
        };
        store.persist(&store.records)?;
        Ok(store)
    }

    /// Open an existing record file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist, cannot be read, or does
    /// not hold a JSON array of records.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)?;
        let records: Vec<Record> = serde_json::from_str(&raw)?;

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            records: MemoryRecordStore::from_records(records),
        })
    }

    /// Open an existing record file, or create it if it doesn't exist.
    ///
    /// A file that exists but cannot be decoded is reset to an empty array,
    /// and a warning is logged.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Self::create(path);
        }

        match Self::open(path) {
            Ok(store) => Ok(store),
            Err(Error::Serialization(err)) => {
                warn!(
                    "record file {} is unreadable ({}), starting empty",
                    path.display(),
                    err
                );
                let store = Self {
                    path: path.to_path_buf(),
                    records: MemoryRecordStore::new(),
                };
                store.persist(&store.records)?;
                Ok(store)
            }
            Err(err) => Err(err),
        }
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the record file with `records`.
    ///
    /// The live file is only touched by the final rename.
    fn persist(&self, records: &MemoryRecordStore) -> Result<()> {
        let encoded = serde_json::to_vec_pretty(&records.records())?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&encoded)?;
        staged.as_file().sync_all()?; // fsync before the rename
        staged.persist(&self.path).map_err(|err| err.error)?;

        debug!("persisted {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Apply `change` to a copy of the records, persist the copy, then
    /// adopt it.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryRecordStore) -> Result<T>,
    ) -> Result<T> {
        let mut staged = self.records.clone();
        let value = change(&mut staged)?;
        self.persist(&staged)?;
        self.records = staged;
        Ok(value)
    }
}

impl RecordStore for JsonRecordStore {
    fn get(&self, key: Key) -> Option<Record> {
        self.records.get(key)
    }

    fn records(&self) -> Vec<Record> {
        self.records.records()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn upsert(&mut self, record: Record) -> Result<()> {
        self.commit(|records| records.upsert(record))
    }

    fn remove(&mut self, key: Key) -> Result<Option<Record>> {
        if self.records.get(key).is_none() {
            return Ok(None);
        }
        self.commit(|records| records.remove(key))
    }

    fn clear(&mut self) -> Result<()> {
        self.commit(|records| records.clear())
    }
}
