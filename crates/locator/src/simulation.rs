//! In-process ring.
//!
//! Builds a set of nodes that talk to each other through a
//! `LoopbackTransport` and gives them the routing state stabilization would
//! converge to. Used by the CLI and by integration tests.

use crate::client::{LoopbackTransport, PooledClientFactory, RetryPolicy};
use crate::handler::NodeLocator;
use corelib::ring::in_half_open;
use corelib::state::finger_start;
use corelib::{
    ConfigError, KeyId, LocalNodeState, MemoryStorage, NodeConfig, NodeDescriptor, Partitioner,
    RingState, Xxh3Partitioner,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

const BASE_PORT: u16 = 7000;

/// A ring of `NodeLocator`s sharing one loopback transport and client pool.
///
/// Membership changes go through [`Simulation::add_node`], which recomputes
/// every member's routing state; tests may still overwrite a node's state to
/// model a ring that has not converged.
///
/// # Example
///
/// ```ignore
/// let sim = Simulation::with_ids(NodeConfig::default().with_id_bits(5), [0, 10, 20])?;
/// let owner = sim.node(KeyId(0)).unwrap().lookup(KeyId(15)).await?;
/// assert_eq!(owner.id, KeyId(20));
/// ```
pub struct Simulation {
    config: NodeConfig,
    transport: Arc<LoopbackTransport>,
    clients: Arc<PooledClientFactory<LoopbackTransport>>,
    nodes: BTreeMap<KeyId, Arc<NodeLocator>>,
}

impl Simulation {
    /// An empty ring.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` when `config` fails validation.
    pub fn new(config: NodeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = Arc::new(LoopbackTransport::new());
        let clients = Arc::new(PooledClientFactory::new(
            Arc::clone(&transport),
            RetryPolicy::from(&config.retry),
        ));
        Ok(Self {
            config,
            transport,
            clients,
            nodes: BTreeMap::new(),
        })
    }

    /// A ring whose members sit at exactly `ids`.
    pub fn with_ids(
        config: NodeConfig,
        ids: impl IntoIterator<Item = u128>,
    ) -> Result<Self, ConfigError> {
        let mut sim = Self::new(config)?;
        for id in ids {
            let port = BASE_PORT.wrapping_add(sim.nodes.len() as u16);
            sim.insert(NodeDescriptor::new(
                KeyId(id),
                "127.0.0.1",
                port,
                format!("node-{}", id),
            ))?;
        }
        sim.stabilize();
        Ok(sim)
    }

    /// A ring of `count` nodes placed by hashing their addresses.
    ///
    /// Addresses whose identifier collides with an existing member are
    /// skipped, so a tiny identifier space may end up with fewer nodes.
    pub fn with_addresses(config: NodeConfig, count: usize) -> Result<Self, ConfigError> {
        let partitioner = Xxh3Partitioner::new(config.id_bits);
        let mut sim = Self::new(config)?;
        for i in 0..count {
            let port = BASE_PORT.wrapping_add(i as u16);
            let descriptor = NodeDescriptor::from_address(&partitioner, "127.0.0.1", port);
            if sim.nodes.contains_key(&descriptor.id) {
                debug!(node = %descriptor, "identifier collision, skipping");
                continue;
            }
            sim.insert(descriptor)?;
        }
        sim.stabilize();
        Ok(sim)
    }

    /// Add a node and recompute every member's routing state.
    pub fn add_node(&mut self, descriptor: NodeDescriptor) -> Result<Arc<NodeLocator>, ConfigError> {
        let locator = self.insert(descriptor)?;
        self.stabilize();
        Ok(locator)
    }

    fn insert(&mut self, descriptor: NodeDescriptor) -> Result<Arc<NodeLocator>, ConfigError> {
        let state = LocalNodeState::new(
            descriptor.clone(),
            self.config.replication_factor as usize,
            self.config.id_bits as usize,
        );
        let locator = Arc::new(NodeLocator::new(
            self.config.clone(),
            Arc::new(state),
            Arc::new(MemoryStorage::new()),
            self.clients.clone(),
        )?);
        self.transport.register(descriptor.id, &locator);
        self.nodes.insert(descriptor.id, Arc::clone(&locator));
        Ok(locator)
    }

    /// Give every node the predecessor, successors and fingers a converged
    /// ring would have.
    pub fn stabilize(&self) {
        let members: Vec<NodeDescriptor> = self.nodes.values().map(|n| n.local()).collect();
        let count = members.len();
        let list_len = (self.config.replication_factor as usize).min(count.saturating_sub(1)).max(1);

        for (index, locator) in self.nodes.values().enumerate() {
            let state = locator.state();
            let local = &members[index];

            let predecessor = members[(index + count - 1) % count].clone();
            state.set_predecessor(Some(predecessor));

            let successors: Vec<NodeDescriptor> = (1..=list_len)
                .map(|offset| members[(index + offset) % count].clone())
                .collect();
            state.set_successor(successors[0].clone());
            state.set_successor_list(successors);

            let fingers = (0..self.config.id_bits)
                .map(|i| owner_among(&members, finger_start(local.id, i, self.config.id_bits)))
                .collect();
            state.set_fingers(fingers);
        }
    }

    /// Owner of `id` according to the global membership.
    pub fn owner_of(&self, id: KeyId) -> Option<NodeDescriptor> {
        let members: Vec<NodeDescriptor> = self.nodes.values().map(|n| n.local()).collect();
        if members.is_empty() {
            return None;
        }
        Some(owner_among(&members, id))
    }

    pub fn node(&self, id: KeyId) -> Option<&Arc<NodeLocator>> {
        self.nodes.get(&id)
    }

    /// Members in ring order.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<NodeLocator>> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn partitioner(&self) -> Xxh3Partitioner {
        Xxh3Partitioner::new(self.config.id_bits)
    }

    pub fn transport(&self) -> &Arc<LoopbackTransport> {
        &self.transport
    }

    pub fn clients(&self) -> &Arc<PooledClientFactory<LoopbackTransport>> {
        &self.clients
    }

    /// Hash `name` with this ring's partitioner.
    pub fn identify(&self, name: &str) -> KeyId {
        self.partitioner().partition(name.as_bytes())
    }
}

/// First member at or clockwise after `id`; `members` must be sorted by id.
fn owner_among(members: &[NodeDescriptor], id: KeyId) -> NodeDescriptor {
    let count = members.len();
    (0..count)
        .find(|&i| {
            let predecessor = &members[(i + count - 1) % count];
            in_half_open(id, predecessor.id, members[i].id)
        })
        .map(|i| members[i].clone())
        .unwrap_or_else(|| members[0].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NodeConfig {
        NodeConfig::default().with_id_bits(5).with_replication_factor(2)
    }

    #[test]
    fn test_three_node_state() {
        let sim = Simulation::with_ids(config(), [0, 10, 20]).unwrap();
        let state = sim.node(KeyId(20)).unwrap().state();

        assert_eq!(state.predecessor().unwrap().id, KeyId(10));
        assert_eq!(state.successor().id, KeyId(0));
        assert_eq!(
            state.successor_list().iter().map(|n| n.id.0).collect::<Vec<_>>(),
            vec![0, 10]
        );
        // starts 21, 22, 24, 28, 4
        assert_eq!(
            state.fingers().iter().map(|n| n.id.0).collect::<Vec<_>>(),
            vec![0, 0, 0, 0, 10]
        );
    }

    #[test]
    fn test_single_node_owns_everything() {
        let sim = Simulation::with_ids(config(), [7]).unwrap();
        let state = sim.node(KeyId(7)).unwrap().state();
        assert_eq!(state.predecessor().unwrap().id, KeyId(7));
        assert_eq!(state.successor().id, KeyId(7));
        assert_eq!(sim.owner_of(KeyId(31)).unwrap().id, KeyId(7));
    }

    #[test]
    fn test_owner_of_wraps() {
        let sim = Simulation::with_ids(config(), [0, 10, 20]).unwrap();
        assert_eq!(sim.owner_of(KeyId(15)).unwrap().id, KeyId(20));
        assert_eq!(sim.owner_of(KeyId(10)).unwrap().id, KeyId(10));
        assert_eq!(sim.owner_of(KeyId(25)).unwrap().id, KeyId(0));
        assert!(Simulation::new(config()).unwrap().owner_of(KeyId(1)).is_none());
    }

    #[test]
    fn test_invalid_config_is_refused() {
        assert!(Simulation::new(config().with_replication_factor(0)).is_err());
        assert!(Simulation::with_ids(config().with_id_bits(0), [1]).is_err());
    }

    #[test]
    fn test_add_node_recomputes_routing() {
        let mut sim = Simulation::with_ids(config(), [0, 20]).unwrap();
        sim.add_node(NodeDescriptor::new(KeyId(10), "127.0.0.1", 7010, "node-10"))
            .unwrap();
        let state = sim.node(KeyId(20)).unwrap().state();
        assert_eq!(state.predecessor().unwrap().id, KeyId(10));
        assert_eq!(sim.owner_of(KeyId(5)).unwrap().id, KeyId(10));
    }

    #[test]
    fn test_hashed_members_are_distinct() {
        let sim = Simulation::with_addresses(NodeConfig::default().with_id_bits(64), 8).unwrap();
        assert_eq!(sim.len(), 8);
        let ids: Vec<KeyId> = sim.nodes().map(|n| n.local().id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
