//! In-process transport.
//!
//! Routes frames straight into registered handlers, exercising the full codec
//! path without sockets. Handlers are held weakly so the transport never
//! keeps a node alive.

use crate::client::transport::{Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use corelib::{DhtError, KeyId, KeyLocator, NodeDescriptor};
use dashmap::{DashMap, DashSet};
use protocol::serve_frame;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Handler = dyn KeyLocator<Error = DhtError>;

#[derive(Default)]
pub struct LoopbackTransport {
    handlers: DashMap<KeyId, Weak<Handler>>,
    unreachable: DashSet<KeyId>,
    frames: AtomicU64,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route frames addressed to `id` into `handler`.
    pub fn register<L>(&self, id: KeyId, handler: &Arc<L>)
    where
        L: KeyLocator<Error = DhtError> + 'static,
    {
        let handler: Arc<Handler> = handler.clone();
        self.handlers.insert(id, Arc::downgrade(&handler));
    }

    pub fn deregister(&self, id: KeyId) {
        self.handlers.remove(&id);
    }

    /// Make every call to `id` fail (or succeed again) at the transport level.
    pub fn set_reachable(&self, id: KeyId, reachable: bool) {
        if reachable {
            self.unreachable.remove(&id);
        } else {
            self.unreachable.insert(id);
        }
    }

    /// Frames delivered or refused so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn call(&self, target: &NodeDescriptor, frame: Bytes) -> Result<Bytes, TransportError> {
        self.frames.fetch_add(1, Ordering::Relaxed);
        if self.unreachable.contains(&target.id) {
            return Err(TransportError::Refused(target.to_string()));
        }
        let handler = self
            .handlers
            .get(&target.id)
            .and_then(|entry| entry.upgrade())
            .ok_or_else(|| TransportError::Refused(target.to_string()))?;
        Ok(serve_frame(handler.as_ref(), &frame).await)
    }
}
