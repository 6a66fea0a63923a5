//! Local ring state.
//!
//! The node's view of its neighbourhood: predecessor, successor, successor
//! list and finger table. Read by every routing and ownership decision,
//! written by `notify` and by whatever runs stabilization.
//!
//! # Concurrency Model
//!
//! Each field sits behind its own `RwLock`. No decision needs more than one or
//! two fields at a time, so there is no lock spanning fields and readers never
//! wait on an unrelated writer.

use crate::node::NodeDescriptor;
use crate::ring::in_open;
use crate::token::KeyId;
use parking_lot::RwLock;

/// Read/update access to the local node's ring state.
pub trait RingState: Send + Sync {
    /// Descriptor of the local node.
    fn local(&self) -> NodeDescriptor;

    fn predecessor(&self) -> Option<NodeDescriptor>;

    fn set_predecessor(&self, predecessor: Option<NodeDescriptor>);

    fn successor(&self) -> NodeDescriptor;

    fn set_successor(&self, successor: NodeDescriptor);

    /// Up to replication-factor nearest successors, nearest first.
    fn successor_list(&self) -> Vec<NodeDescriptor>;

    fn set_successor_list(&self, successors: Vec<NodeDescriptor>);

    /// Snapshot of the finger table, indexed by exponent.
    fn fingers(&self) -> Vec<NodeDescriptor>;

    fn set_finger(&self, index: usize, node: NodeDescriptor);

    fn set_fingers(&self, fingers: Vec<NodeDescriptor>);

    /// The closest node this node knows of that strictly precedes `id`.
    ///
    /// Returns the local node when no known node lies between it and `id`.
    fn closest_preceding_node(&self, id: KeyId) -> NodeDescriptor;
}

/// In-memory ring state with field-level locking.
#[derive(Debug)]
pub struct LocalNodeState {
    local: NodeDescriptor,
    successor_list_len: usize,
    predecessor: RwLock<Option<NodeDescriptor>>,
    successor: RwLock<NodeDescriptor>,
    successor_list: RwLock<Vec<NodeDescriptor>>,
    fingers: RwLock<Vec<NodeDescriptor>>,
}

impl LocalNodeState {
    /// State of a node alone on the ring.
    ///
    /// Its successor and every finger point at itself and it has no
    /// predecessor until someone calls `notify`.
    ///
    /// # Arguments
    /// * `local` - The node's own descriptor
    /// * `successor_list_len` - Replication factor; bounds the successor list
    /// * `finger_count` - Number of fingers, one per bit of the identifier space
    pub fn new(local: NodeDescriptor, successor_list_len: usize, finger_count: usize) -> Self {
        Self {
            successor_list_len,
            predecessor: RwLock::new(None),
            successor: RwLock::new(local.clone()),
            successor_list: RwLock::new(vec![local.clone()]),
            fingers: RwLock::new(vec![local.clone(); finger_count]),
            local,
        }
    }

    pub fn successor_list_len(&self) -> usize {
        self.successor_list_len
    }
}

impl RingState for LocalNodeState {
    fn local(&self) -> NodeDescriptor {
        self.local.clone()
    }

    fn predecessor(&self) -> Option<NodeDescriptor> {
        self.predecessor.read().clone()
    }

    fn set_predecessor(&self, predecessor: Option<NodeDescriptor>) {
        *self.predecessor.write() = predecessor;
    }

    fn successor(&self) -> NodeDescriptor {
        self.successor.read().clone()
    }

    fn set_successor(&self, successor: NodeDescriptor) {
        *self.successor.write() = successor;
    }

    fn successor_list(&self) -> Vec<NodeDescriptor> {
        self.successor_list.read().clone()
    }

    fn set_successor_list(&self, mut successors: Vec<NodeDescriptor>) {
        successors.truncate(self.successor_list_len);
        *self.successor_list.write() = successors;
    }

    fn fingers(&self) -> Vec<NodeDescriptor> {
        self.fingers.read().clone()
    }

    fn set_finger(&self, index: usize, node: NodeDescriptor) {
        let mut fingers = self.fingers.write();
        if let Some(slot) = fingers.get_mut(index) {
            *slot = node;
        }
    }

    fn set_fingers(&self, fingers: Vec<NodeDescriptor>) {
        *self.fingers.write() = fingers;
    }

    fn closest_preceding_node(&self, id: KeyId) -> NodeDescriptor {
        let fingers = self.fingers.read();
        fingers
            .iter()
            .rev()
            .find(|finger| in_open(finger.id, self.local.id, id))
            .cloned()
            .unwrap_or_else(|| self.local.clone())
    }
}

/// Identifier the finger with index `index` is responsible for:
/// `node + 2^index mod 2^bits`.
pub fn finger_start(node: KeyId, index: u32, bits: u32) -> KeyId {
    node.offset_pow2(index, bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u128) -> NodeDescriptor {
        NodeDescriptor::new(KeyId(id), "127.0.0.1", 4000 + id as u16, format!("n{}", id))
    }

    /// Node 0 on a 32-slot ring with members 0, 10, 20.
    fn node_zero() -> LocalNodeState {
        let state = LocalNodeState::new(node(0), 2, 5);
        // starts 1, 2, 4, 8 -> 10; start 16 -> 20
        state.set_fingers(vec![node(10), node(10), node(10), node(10), node(20)]);
        state.set_successor(node(10));
        state.set_predecessor(Some(node(20)));
        state
    }

    #[test]
    fn test_fresh_state_is_single_node_ring() {
        let state = LocalNodeState::new(node(5), 3, 4);
        assert_eq!(state.predecessor(), None);
        assert_eq!(state.successor(), node(5));
        assert_eq!(state.successor_list(), vec![node(5)]);
        assert_eq!(state.fingers().len(), 4);
        assert_eq!(state.closest_preceding_node(KeyId(9)), node(5));
    }

    #[test]
    fn test_closest_preceding_picks_highest_matching_finger() {
        let state = node_zero();
        assert_eq!(state.closest_preceding_node(KeyId(25)), node(20));
        assert_eq!(state.closest_preceding_node(KeyId(15)), node(10));
    }

    #[test]
    fn test_closest_preceding_is_self_when_successor_owns() {
        let state = node_zero();
        assert_eq!(state.closest_preceding_node(KeyId(5)), node(0));
        assert_eq!(state.closest_preceding_node(KeyId(10)), node(0));
    }

    #[test]
    fn test_successor_list_is_bounded() {
        let state = LocalNodeState::new(node(0), 2, 5);
        state.set_successor_list(vec![node(10), node(20), node(30)]);
        assert_eq!(state.successor_list(), vec![node(10), node(20)]);
    }

    #[test]
    fn test_set_finger_out_of_range_is_ignored() {
        let state = LocalNodeState::new(node(0), 2, 2);
        state.set_finger(1, node(10));
        state.set_finger(7, node(20));
        assert_eq!(state.fingers(), vec![node(0), node(10)]);
    }

    #[test]
    fn test_finger_start() {
        assert_eq!(finger_start(KeyId(20), 4, 5), KeyId(4));
        assert_eq!(finger_start(KeyId(0), 0, 5), KeyId(1));
    }
}
