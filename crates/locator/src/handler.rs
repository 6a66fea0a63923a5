//! The request handler behind a node's RPC surface.
//!
//! Every inbound call lands here. Routing questions are answered from the
//! ring state, mutations are gated on ownership of `(predecessor, self]`, and
//! accepted writes are pushed down the replication chain one successor at a
//! time.

use async_trait::async_trait;
use corelib::ring::in_half_open;
use corelib::{
    ClientFactory, ConfigError, DhtError, EntryKey, KeyId, KeyLocator, NodeConfig, NodeDescriptor,
    Result, RingState, Storage,
};
use replication::{ChainStrategy, ReplicaOp, ReplicationStrategy, Replicator};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handler for every RPC one ring node answers.
///
/// Owns nothing but its collaborators: ring state and storage are shared
/// with whoever maintains them, and outbound calls go through `clients`.
/// Safe to share behind an `Arc` and call concurrently.
pub struct NodeLocator {
    config: NodeConfig,
    state: Arc<dyn RingState>,
    storage: Arc<dyn Storage>,
    clients: Arc<dyn ClientFactory>,
    replicator: Replicator<ChainStrategy>,
}

impl NodeLocator {
    /// Create a handler for the node described by `state.local()`.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated before use; replication factor and identifier
    ///   width must agree across the ring
    /// * `state` - Predecessor, successors and fingers of this node
    /// * `storage` - Local records, including replicas held for predecessors
    /// * `clients` - Source of handles to remote nodes
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` when `config` fails validation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let locator = NodeLocator::new(NodeConfig::default(), state, storage, clients)?;
    /// let owner = locator.lookup(KeyId(42)).await?;
    /// ```
    pub fn new(
        config: NodeConfig,
        state: Arc<dyn RingState>,
        storage: Arc<dyn Storage>,
        clients: Arc<dyn ClientFactory>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let strategy = ChainStrategy::new(config.replication_factor);
        Ok(Self {
            replicator: Replicator::new(Arc::clone(&clients), strategy),
            config,
            state,
            storage,
            clients,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn state(&self) -> &Arc<dyn RingState> {
        &self.state
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn local(&self) -> NodeDescriptor {
        self.state.local()
    }

    /// Resolve the owner of `id` with the configured hop budget.
    pub async fn lookup(&self, id: KeyId) -> Result<NodeDescriptor> {
        self.find_successor(id, self.config.max_lookup_hops).await
    }

    /// `Ok` when `id` lies inside the configured identifier space.
    fn check_identifier(&self, id: KeyId) -> Result<()> {
        if id.fits(self.config.id_bits) {
            return Ok(());
        }
        info!(node = %self.state.local(), id = %id, bits = self.config.id_bits, "identifier outside space");
        Err(DhtError::InvalidIdentifier {
            id,
            bits: self.config.id_bits,
        })
    }

    /// `Ok` when `id` falls in `(predecessor, self]`.
    fn check_ownership(&self, id: KeyId) -> Result<()> {
        self.check_identifier(id)?;
        let local = self.state.local();
        match self.state.predecessor() {
            Some(predecessor) if in_half_open(id, predecessor.id, local.id) => Ok(()),
            _ => {
                info!(node = %local, id = %id, "not responsible for identifier");
                Err(DhtError::NotResponsible(id))
            }
        }
    }

    async fn forward(&self, key: EntryKey, op: ReplicaOp, depth: u32) -> Result<()> {
        let successor = self.state.successor();
        self.replicator
            .forward(&successor, key, op, depth)
            .await
            .map_err(|e| {
                warn!(error = %e, "replication chain broken");
                DhtError::from(e)
            })
    }
}

#[async_trait]
impl KeyLocator for NodeLocator {
    type Error = DhtError;

    async fn find_successor(&self, id: KeyId, hops: u32) -> Result<NodeDescriptor> {
        self.check_identifier(id)?;
        let local = self.state.local();
        let next = self.state.closest_preceding_node(id);
        if next == local {
            debug!(node = %local, id = %id, "predecessor of owner, answering with successor");
            return Ok(self.state.successor());
        }
        if hops == 0 {
            warn!(node = %local, id = %id, "lookup hop budget exhausted");
            return Err(DhtError::RoutingFailed { id, budget: 0 });
        }

        debug!(node = %local, id = %id, next = %next, hops, "delegating lookup");
        let handle = self.clients.acquire(&next).await?;
        let answer = handle.find_successor(id, hops - 1).await;
        self.clients.release(&next);
        answer.map_err(|e| match DhtError::from(e) {
            DhtError::RoutingFailed { id, .. } => DhtError::RoutingFailed { id, budget: hops },
            other => other,
        })
    }

    async fn get(&self, key: EntryKey) -> Result<Vec<u8>> {
        self.check_identifier(key.id)?;
        debug!(key = %key, "get");
        self.storage
            .get(&key)
            .map(|record| record.payload)
            .ok_or(DhtError::DataNotFound(key.id))
    }

    async fn put(&self, key: EntryKey, payload: Vec<u8>) -> Result<()> {
        self.check_ownership(key.id)?;
        let strategy = self.replicator.strategy();
        info!(key = %key, bytes = payload.len(), "put");
        self.storage
            .put(key.clone(), payload.clone(), strategy.owner_depth());

        match strategy.first_hop_depth() {
            Some(depth) => self.forward(key, ReplicaOp::Put(payload), depth).await,
            None => Ok(()),
        }
    }

    async fn remove(&self, key: EntryKey) -> Result<()> {
        self.check_ownership(key.id)?;
        info!(key = %key, "remove");
        self.storage.remove(&key);

        match self.replicator.strategy().first_hop_depth() {
            Some(depth) => self.forward(key, ReplicaOp::Remove, depth).await,
            None => Ok(()),
        }
    }

    async fn replicate_put(&self, key: EntryKey, payload: Vec<u8>, depth: u32) -> Result<()> {
        self.check_identifier(key.id)?;
        debug!(key = %key, depth, "replicate put");
        self.storage.put(key.clone(), payload.clone(), depth);

        match self.replicator.strategy().next_hop_depth(depth) {
            Some(next) => self.forward(key, ReplicaOp::Put(payload), next).await,
            None => Ok(()),
        }
    }

    async fn replicate_remove(&self, key: EntryKey, depth: u32) -> Result<()> {
        self.check_identifier(key.id)?;
        debug!(key = %key, depth, "replicate remove");
        self.storage.remove(&key);

        match self.replicator.strategy().next_hop_depth(depth) {
            Some(next) => self.forward(key, ReplicaOp::Remove, next).await,
            None => Ok(()),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get_predecessor(&self) -> Result<NodeDescriptor> {
        self.state.predecessor().ok_or(DhtError::NodeNotFound)
    }

    async fn notify(&self, candidate: NodeDescriptor) -> Result<Vec<NodeDescriptor>> {
        let local = self.state.local();
        let adopt = match self.state.predecessor() {
            None => true,
            Some(current) => in_half_open(candidate.id, current.id, local.id),
        };
        if adopt {
            info!(node = %local, predecessor = %candidate, "adopting predecessor");
            self.state.set_predecessor(Some(candidate));
        }
        Ok(self.state.successor_list())
    }

    async fn get_fingers(&self) -> Result<Vec<NodeDescriptor>> {
        Ok(self.state.fingers())
    }
}
