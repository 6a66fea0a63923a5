//! Core library for a Chord-style ring node.
//!
//! This crate provides the fundamental abstractions the node is built from:
//! - Identifiers and the hashing that produces them
//! - Wraparound-aware interval tests on the ring
//! - Node descriptors, entry keys and stored records
//! - The error taxonomy shared by every node
//! - Ring state and local storage collaborators
//! - The RPC contract between nodes

pub mod config;
pub mod error;
pub mod key;
pub mod network;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod state;
pub mod storage;
pub mod token;

pub use config::{NodeConfig, RetryConfig};
pub use error::{ClientError, ConfigError, DhtError, Result};
pub use key::{EntryKey, ValueRecord};
pub use network::{ClientFactory, KeyLocator, RemoteHandle};
pub use node::NodeDescriptor;
pub use partitioner::{Partitioner, Xxh3Partitioner};
pub use state::{LocalNodeState, RingState};
pub use storage::{MemoryStorage, Storage};
pub use token::{KeyId, Token};
