//! One hop of a replication chain.

use crate::error::ReplicationError;
use crate::strategy::{ChainStrategy, ReplicationStrategy};
use corelib::{ClientFactory, EntryKey, NodeDescriptor};
use std::sync::Arc;
use tracing::debug;

/// Mutation carried down the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicaOp {
    Put(Vec<u8>),
    Remove,
}

/// Forwards mutations to the next node of the ring.
pub struct Replicator<S = ChainStrategy> {
    clients: Arc<dyn ClientFactory>,
    strategy: S,
}

impl<S: ReplicationStrategy> Replicator<S> {
    pub fn new(clients: Arc<dyn ClientFactory>, strategy: S) -> Self {
        Self { clients, strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Issue one `replicate_*` call to `successor` at `depth`.
    ///
    /// The handle is released whether or not the call succeeds.
    pub async fn forward(
        &self,
        successor: &NodeDescriptor,
        key: EntryKey,
        op: ReplicaOp,
        depth: u32,
    ) -> Result<(), ReplicationError> {
        debug!(successor = %successor, key = %key, depth, "forwarding replica");
        let hop_failed = |source| ReplicationError::HopFailed {
            successor: successor.to_string(),
            depth,
            source,
        };

        let handle = self.clients.acquire(successor).await.map_err(hop_failed)?;
        let outcome = match op {
            ReplicaOp::Put(payload) => handle.replicate_put(key, payload, depth).await,
            ReplicaOp::Remove => handle.replicate_remove(key, depth).await,
        };
        self.clients.release(successor);
        outcome.map_err(hop_failed)
    }
}
