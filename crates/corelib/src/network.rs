//! Core networking abstractions shared across the workspace.
//!
//! `KeyLocator` is the node-to-node RPC surface. The local request handler
//! implements it with `Error = DhtError`; a handle to a remote node implements
//! it with `Error = ClientError`. Code that forwards a request therefore reads
//! the same whether the target is local or remote.

use crate::error::ClientError;
use crate::key::EntryKey;
use crate::node::NodeDescriptor;
use crate::token::KeyId;
use async_trait::async_trait;
use std::sync::Arc;

/// Operations every node answers.
#[async_trait]
pub trait KeyLocator: Send + Sync {
    type Error: Send;

    /// Find the node owning `id`, delegating at most `hops` more times.
    async fn find_successor(&self, id: KeyId, hops: u32) -> Result<NodeDescriptor, Self::Error>;

    async fn get(&self, key: EntryKey) -> Result<Vec<u8>, Self::Error>;

    async fn put(&self, key: EntryKey, payload: Vec<u8>) -> Result<(), Self::Error>;

    async fn remove(&self, key: EntryKey) -> Result<(), Self::Error>;

    async fn replicate_put(
        &self,
        key: EntryKey,
        payload: Vec<u8>,
        depth: u32,
    ) -> Result<(), Self::Error>;

    async fn replicate_remove(&self, key: EntryKey, depth: u32) -> Result<(), Self::Error>;

    async fn ping(&self) -> Result<(), Self::Error>;

    async fn get_predecessor(&self) -> Result<NodeDescriptor, Self::Error>;

    /// `candidate` believes it may be our predecessor. Answers with our
    /// successor list.
    async fn notify(&self, candidate: NodeDescriptor) -> Result<Vec<NodeDescriptor>, Self::Error>;

    async fn get_fingers(&self) -> Result<Vec<NodeDescriptor>, Self::Error>;
}

/// Callable proxy to a remote node.
pub type RemoteHandle = Arc<dyn KeyLocator<Error = ClientError>>;

/// Hands out handles to remote nodes.
///
/// Every successful `acquire` should be paired with a `release` of the same
/// node so pooled connections can be reclaimed.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn acquire(&self, node: &NodeDescriptor) -> Result<RemoteHandle, ClientError>;

    fn release(&self, node: &NodeDescriptor);
}
