//! Replication strategy abstractions.
//!
//! A strategy fixes the replication depth each copy is written at. Writes
//! travel as a chain: the owner stores first, then hands the write to its
//! successor one hop at a time until the depth is spent.

pub mod chain;

pub use chain::ChainStrategy;

/// Trait for replication strategies.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they are shared by
/// every concurrent request on a node.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Replication factor every node of the ring is configured with.
    fn replication_factor(&self) -> u32;

    /// Depth the owning node stores its own copy at.
    fn owner_depth(&self) -> u32 {
        self.replication_factor()
    }

    /// Depth of the first `replicate_*` call issued by the owner, or `None`
    /// when the owner keeps the only copy.
    fn first_hop_depth(&self) -> Option<u32>;

    /// Depth a replica at `depth` forwards with, or `None` when the chain
    /// ends at that replica.
    fn next_hop_depth(&self, depth: u32) -> Option<u32>;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
