//! Frame transport.

use async_trait::async_trait;
use bytes::Bytes;
use corelib::NodeDescriptor;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("connection to {0} refused")]
    Refused(String),

    #[error("i/o error talking to {node}: {reason}")]
    Io { node: String, reason: String },
}

/// Delivers one request frame and waits for the response frame.
///
/// A transport reports only delivery failures; application signals travel
/// inside the response frame.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn call(&self, target: &NodeDescriptor, frame: Bytes) -> Result<Bytes, TransportError>;
}
