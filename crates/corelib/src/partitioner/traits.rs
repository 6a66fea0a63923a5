//! Core partitioner trait definitions.

use crate::token::KeyId;

/// A partitioner converts names and addresses into identifiers on the ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// identifier generation without synchronization overhead.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts raw bytes into an identifier.
    ///
    /// # Returns
    ///
    /// An identifier in `[0, 2^bits)`
    fn partition(&self, key: &[u8]) -> KeyId;

    /// Width of the identifier space in bits.
    fn bits(&self) -> u32;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
