//! Node abstractions for the ring.
//!
//! A `NodeDescriptor` names a participant: its identifier on the ring plus
//! enough addressing information to reach it. Descriptors are value objects,
//! compared and hashed by identifier only.

use crate::partitioner::Partitioner;
use crate::token::KeyId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Participant in the ring.
///
/// Keep this struct small and cheap to clone; it crosses the wire in nearly
/// every response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: KeyId,
    pub host: String,
    pub port: u16,
    /// Human‑readable name, used only for logging.
    pub name: String,
}

impl NodeDescriptor {
    /// Construct a descriptor with an explicit identifier.
    pub fn new(id: KeyId, host: impl Into<String>, port: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            host: host.into(),
            port,
            name: name.into(),
        }
    }

    /// Construct a descriptor whose identifier is the hash of `host:port`.
    pub fn from_address<P: Partitioner + ?Sized>(
        partitioner: &P,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        let host = host.into();
        let address = format!("{}:{}", host, port);
        let id = partitioner.partition(address.as_bytes());
        Self {
            id,
            host,
            port,
            name: address,
        }
    }

    /// `host:port` form of this node's address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl PartialEq for NodeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NodeDescriptor {}

impl Hash for NodeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
