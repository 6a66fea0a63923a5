//! Replication for the ring.
//!
//! This crate provides:
//! - Replication strategies deciding how deep a write travels down the ring
//! - The `Replicator` that performs one hop of a replication chain

pub mod chain;
pub mod error;
pub mod strategy;

pub use chain::{ReplicaOp, Replicator};
pub use error::ReplicationError;
pub use strategy::{ChainStrategy, ReplicationStrategy};
