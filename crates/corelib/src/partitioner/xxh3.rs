//! XXH3 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::token::KeyId;
use xxhash_rust::xxh3::xxh3_128;

/// XXH3-128 partitioner, masked to the configured identifier width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Xxh3Partitioner {
    bits: u32,
}

impl Xxh3Partitioner {
    /// Create a partitioner over a space of `2^bits` identifiers.
    ///
    /// `bits` is clamped into `1..=128`.
    pub fn new(bits: u32) -> Self {
        Self {
            bits: bits.clamp(1, 128),
        }
    }
}

impl Default for Xxh3Partitioner {
    fn default() -> Self {
        Self::new(128)
    }
}

impl Partitioner for Xxh3Partitioner {
    fn partition(&self, key: &[u8]) -> KeyId {
        KeyId(xxh3_128(key)).truncate(self.bits)
    }

    fn bits(&self) -> u32 {
        self.bits
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}
