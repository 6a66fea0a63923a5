//! Entry keys and stored values.

use crate::partitioner::Partitioner;
use crate::token::KeyId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key of a stored record.
///
/// Only the identifier takes part in equality and hashing; the name is kept
/// for display.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryKey {
    pub id: KeyId,
    pub name: Option<String>,
}

impl EntryKey {
    pub fn new(id: KeyId) -> Self {
        Self { id, name: None }
    }

    /// Hash `name` onto the ring and keep it for display.
    pub fn from_name<P: Partitioner + ?Sized>(partitioner: &P, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: partitioner.partition(name.as_bytes()),
            name: Some(name),
        }
    }
}

impl PartialEq for EntryKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntryKey {}

impl Hash for EntryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// A locally stored payload.
///
/// `depth` is the replication depth the copy was written at: the owner writes
/// at the full replication factor and every hop down the chain writes one
/// less.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub payload: Vec<u8>,
    pub depth: u32,
}

impl ValueRecord {
    pub fn new(payload: Vec<u8>, depth: u32) -> Self {
        Self { payload, depth }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality_is_by_id() {
        let named = EntryKey {
            id: KeyId(15),
            name: Some("fifteen".into()),
        };
        assert_eq!(named, EntryKey::new(KeyId(15)));
        assert_eq!(named.to_string(), format!("fifteen ({})", KeyId(15)));
    }
}
