//! Tests for ring arithmetic and routing state.
//!
//! # Test Strategy
//!
//! 1. **Interval properties**: compare against a step-by-step walk around small rings
//! 2. **Full width**: wraparound at `u128::MAX`
//! 3. **Routing**: closest preceding node on a hand-built finger table

use corelib::ring::{in_half_open, in_open};
use corelib::state::finger_start;
use corelib::{KeyId, LocalNodeState, NodeDescriptor, RingState};
use proptest::prelude::*;

/// Walk clockwise from `low` one slot at a time until `high`, recording
/// every slot passed after `low` (inclusive of `high`).
fn walk(low: u128, high: u128, bits: u32) -> Vec<u128> {
    let size = 1u128 << bits;
    let mut slots = Vec::new();
    let mut cursor = low;
    loop {
        cursor = (cursor + 1) % size;
        slots.push(cursor);
        if cursor == high {
            return slots;
        }
    }
}

fn node(id: u128) -> NodeDescriptor {
    NodeDescriptor::new(KeyId(id), "127.0.0.1", 7000, format!("n{}", id))
}

// ============================================================================
// Interval properties
// ============================================================================

proptest! {
    #[test]
    fn half_open_matches_walk(bits in 1u32..=8, a in any::<u128>(), b in any::<u128>(), c in any::<u128>()) {
        let size = 1u128 << bits;
        let (id, low, high) = (a % size, b % size, c % size);
        let expected = walk(low, high, bits).contains(&id);
        prop_assert_eq!(in_half_open(KeyId(id), KeyId(low), KeyId(high)), expected);
    }

    #[test]
    fn half_open_always_contains_high(low in any::<u128>(), high in any::<u128>()) {
        prop_assert!(in_half_open(KeyId(high), KeyId(low), KeyId(high)));
    }

    #[test]
    fn open_matches_walk(bits in 1u32..=8, a in any::<u128>(), b in any::<u128>(), c in any::<u128>()) {
        let size = 1u128 << bits;
        let (id, low, high) = (a % size, b % size, c % size);
        let mut slots = walk(low, high, bits);
        slots.pop();
        prop_assert_eq!(in_open(KeyId(id), KeyId(low), KeyId(high)), slots.contains(&id));
    }

    #[test]
    fn arcs_partition_the_ring(a in any::<u128>(), b in any::<u128>(), id in any::<u128>()) {
        prop_assume!(a != b);
        // Every identifier belongs to exactly one of (a, b] and (b, a].
        let first = in_half_open(KeyId(id), KeyId(a), KeyId(b));
        let second = in_half_open(KeyId(id), KeyId(b), KeyId(a));
        prop_assert!(first ^ second);
    }
}

// ============================================================================
// Full width
// ============================================================================

#[test]
fn test_wraparound_at_full_width() {
    let low = KeyId(u128::MAX - 10);
    let high = KeyId(10);
    assert!(in_half_open(KeyId(u128::MAX), low, high));
    assert!(in_half_open(KeyId(0), low, high));
    assert!(in_half_open(KeyId(10), low, high));
    assert!(!in_half_open(KeyId(11), low, high));
    assert!(!in_half_open(low, low, high));
}

// ============================================================================
// Routing
// ============================================================================

#[test]
fn test_routing_on_sparse_ring() {
    // 64-slot ring, members 1, 9, 30, 50; view from node 9.
    let bits = 6;
    let members = [1u128, 9, 30, 50];
    let owner = |id: u128| {
        members
            .iter()
            .copied()
            .find(|m| *m >= id)
            .unwrap_or(members[0])
    };

    let state = LocalNodeState::new(node(9), 3, bits as usize);
    let fingers = (0..bits)
        .map(|i| node(owner(finger_start(KeyId(9), i, bits).0)))
        .collect();
    state.set_fingers(fingers);

    assert_eq!(
        state.fingers().iter().map(|n| n.id.0).collect::<Vec<_>>(),
        vec![30, 30, 30, 30, 30, 50]
    );
    assert_eq!(state.closest_preceding_node(KeyId(20)), node(9));
    assert_eq!(state.closest_preceding_node(KeyId(45)), node(30));
    assert_eq!(state.closest_preceding_node(KeyId(60)), node(50));
    assert_eq!(state.closest_preceding_node(KeyId(5)), node(50));
}
