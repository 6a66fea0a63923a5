//! Chained replication strategy.
//!
//! The owner of a key stores it at depth `R` (the replication factor) and
//! forwards to its successor at depth `R - 1`. A replica receiving depth `d`
//! stores the copy and, while `d > 0`, forwards to its own successor at
//! `d - 1`.
//!
//! A chain started at depth `d` therefore performs exactly `d + 1` writes,
//! and a full write touches the owner plus `R` successors.
//!
//! # Limitations
//!
//! - Hops are strictly sequential: the latency of a write grows with `R`
//! - A failed hop leaves earlier replicas updated and later ones stale
//! - On a ring smaller than `R + 1` nodes the chain revisits nodes

use crate::strategy::ReplicationStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStrategy {
    replication_factor: u32,
}

impl ChainStrategy {
    pub fn new(replication_factor: u32) -> Self {
        Self { replication_factor }
    }
}

impl ReplicationStrategy for ChainStrategy {
    fn replication_factor(&self) -> u32 {
        self.replication_factor
    }

    fn first_hop_depth(&self) -> Option<u32> {
        self.replication_factor.checked_sub(1)
    }

    fn next_hop_depth(&self, depth: u32) -> Option<u32> {
        depth.checked_sub(1)
    }

    fn name(&self) -> &'static str {
        "ChainStrategy"
    }
}
