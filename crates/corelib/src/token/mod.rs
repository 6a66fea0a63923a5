//! Identifier abstraction for the ring.
//!
//! Identifiers are positions on the circular space that both nodes and keys
//! are hashed onto; they must be comparable, hashable, and thread-safe.

pub mod key_id;
pub mod traits;

pub use key_id::KeyId;
pub use traits::Token;
