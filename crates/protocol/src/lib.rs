//! Wire protocol between ring nodes.
//!
//! This crate provides the canonical representation of the node RPC surface:
//! - Request and response messages
//! - The codec turning them into frames
//! - Server-side dispatch of a decoded request onto a node

pub mod codec;
pub mod dispatch;
pub mod message;

pub use codec::{decode, encode, CodecError};
pub use dispatch::{dispatch, serve_frame};
pub use message::{Request, Response};
