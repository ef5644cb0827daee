//! The record store interface and its in-memory implementation.

use crate::common::{Key, Result};
use crate::storage::Record;

/// Key-value persistence for [`Record`]s, keyed by roll number.
///
/// The tree never reads the store. Callers keep the two in sync: every
/// successful tree insert pairs with an [`upsert`](Self::upsert) and every
/// successful tree delete with a [`remove`](Self::remove).
pub trait RecordStore {
    /// Find the record for `key`.
    fn get(&self, key: Key) -> Option<Record>;

    /// All records, in store order.
    fn records(&self) -> Vec<Record>;

    /// Number of records.
    fn len(&self) -> usize;

    /// True when the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the record with the same key in place, or append it.
    fn upsert(&mut self, record: Record) -> Result<()>;

    /// Remove the record for `key`, returning it if it existed.
    fn remove(&mut self, key: Key) -> Result<Option<Record>>;

    /// Remove every record.
    fn clear(&mut self) -> Result<()>;
}

/// A [`RecordStore`] that lives only in memory.
///
/// Records keep their insertion order; an upsert of an existing key keeps
/// the record's original position.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecordStore {
    records: Vec<Record>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    fn position(&self, key: Key) -> Option<usize> {
        self.records.iter().position(|r| r.roll_no == key)
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, key: Key) -> Option<Record> {
        self.position(key).map(|idx| self.records[idx].clone())
    }

    fn records(&self) -> Vec<Record> {
        self.records.clone()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn upsert(&mut self, record: Record) -> Result<()> {
        match self.position(record.roll_no) {
            Some(idx) => self.records[idx] = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    fn remove(&mut self, key: Key) -> Result<Option<Record>> {
        Ok(self.position(key).map(|idx| self.records.remove(idx)))
    }

    fn clear(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_appends_then_replaces() {
        let mut store = MemoryRecordStore::new();
        store.upsert(Record::new(2, "Bo", "EE")).unwrap();
        store.upsert(Record::new(1, "Ada", "CS")).unwrap();
        store.upsert(Record::new(2, "Bo", "ME")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.records(),
            vec![Record::new(2, "Bo", "ME"), Record::new(1, "Ada", "CS")]
        );
    }

    #[test]
    fn test_get_and_remove() {
        let mut store = MemoryRecordStore::from_records(vec![Record::new(5, "Cy", "Math")]);

        assert_eq!(store.get(5), Some(Record::new(5, "Cy", "Math")));
        assert_eq!(store.get(6), None);

        assert_eq!(store.remove(6).unwrap(), None);
        assert_eq!(store.remove(5).unwrap(), Some(Record::new(5, "Cy", "Math")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = MemoryRecordStore::from_records(vec![
            Record::new(1, "Ada", "CS"),
            Record::new(2, "Bo", "EE"),
        ]);

        store.clear().unwrap();

        assert!(store.is_empty());
        assert!(store.records().is_empty());
    }
}
