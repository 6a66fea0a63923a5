//! Partitioner abstraction for the ring.
//!
//! Partitioners are responsible for converting node addresses and entry names
//! into identifiers that can be placed on the ring.

pub mod traits;
pub mod xxh3;

pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;
