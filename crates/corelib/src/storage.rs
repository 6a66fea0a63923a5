//! Local key/value storage.

use crate::key::{EntryKey, ValueRecord};
use dashmap::DashMap;

/// Records held by this node, as owner or as replica.
///
/// Implementations must tolerate concurrent callers. No ordering between
/// writes to the same key from different replication chains is promised.
pub trait Storage: Send + Sync {
    fn get(&self, key: &EntryKey) -> Option<ValueRecord>;

    /// Store `payload` under `key`, tagged with the replication depth it was
    /// written at. Overwrites any previous record.
    fn put(&self, key: EntryKey, payload: Vec<u8>, depth: u32);

    /// Remove the record, returning it if one existed.
    fn remove(&self, key: &EntryKey) -> Option<ValueRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `DashMap`-backed storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: DashMap<EntryKey, ValueRecord>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &EntryKey) -> Option<ValueRecord> {
        self.records.get(key).map(|record| record.value().clone())
    }

    fn put(&self, key: EntryKey, payload: Vec<u8>, depth: u32) {
        self.records.insert(key, ValueRecord::new(payload, depth));
    }

    fn remove(&self, key: &EntryKey) -> Option<ValueRecord> {
        self.records.remove(key).map(|(_, record)| record)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
