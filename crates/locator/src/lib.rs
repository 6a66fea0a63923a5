//! Request handling for a ring node.
//!
//! This crate provides:
//! - `NodeLocator`, the handler behind every RPC a node answers
//! - Remote client access: a retrying RPC client, a pooled client factory
//!   and an in-process loopback transport
//! - `Simulation`, an in-process ring with consistent routing state

pub mod client;
pub mod handler;
pub mod simulation;

pub use client::{LoopbackTransport, PooledClientFactory, RetryPolicy, RpcClient, Transport, TransportError};
pub use handler::NodeLocator;
pub use simulation::Simulation;
