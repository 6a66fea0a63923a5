//! Pooled client factory.

use crate::client::retry::RetryPolicy;
use crate::client::rpc_client::RpcClient;
use crate::client::transport::Transport;
use async_trait::async_trait;
use corelib::{ClientError, ClientFactory, KeyId, NodeDescriptor, RemoteHandle};
use dashmap::DashMap;
use std::sync::Arc;

struct PoolEntry<T> {
    client: Arc<RpcClient<T>>,
    leases: usize,
}

/// Keeps one `RpcClient` per remote node and counts outstanding leases.
///
/// Clients connect lazily, so `acquire` itself does not fail here; the first
/// call on the handle reports an unreachable node. An entry is evicted when
/// its last lease is released, so the pool only holds nodes with calls in
/// flight and a later `acquire` picks up the node's current address.
pub struct PooledClientFactory<T> {
    transport: Arc<T>,
    policy: RetryPolicy,
    pool: DashMap<KeyId, PoolEntry<T>>,
}

impl<T: Transport> PooledClientFactory<T> {
    /// Create an empty pool.
    ///
    /// # Arguments
    ///
    /// * `transport` - Shared by every client the pool creates
    /// * `policy` - Retry behaviour applied to each call
    pub fn new(transport: Arc<T>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            pool: DashMap::new(),
        }
    }

    /// Outstanding leases on `node`'s client.
    pub fn leases(&self, node: &NodeDescriptor) -> usize {
        self.pool.get(&node.id).map_or(0, |entry| entry.leases)
    }

    /// Number of nodes with outstanding leases.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

#[async_trait]
impl<T: Transport> ClientFactory for PooledClientFactory<T> {
    async fn acquire(&self, node: &NodeDescriptor) -> Result<RemoteHandle, ClientError> {
        let mut entry = self.pool.entry(node.id).or_insert_with(|| PoolEntry {
            client: Arc::new(RpcClient::new(
                node.clone(),
                Arc::clone(&self.transport),
                self.policy,
            )),
            leases: 0,
        });
        entry.leases += 1;
        let handle: RemoteHandle = entry.client.clone();
        Ok(handle)
    }

    fn release(&self, node: &NodeDescriptor) {
        if let Some(mut entry) = self.pool.get_mut(&node.id) {
            entry.leases = entry.leases.saturating_sub(1);
        }
        // Checked again under the shard lock; a concurrent acquire keeps it.
        self.pool.remove_if(&node.id, |_, entry| entry.leases == 0);
    }
}
