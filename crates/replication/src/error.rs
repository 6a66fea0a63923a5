//! Replication errors.

use corelib::{ClientError, DhtError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ReplicationError {
    /// Forwarding to the successor failed. Everything before this hop is
    /// already written; nothing after it is.
    #[error("replication hop to {successor} at depth {depth} failed: {source}")]
    HopFailed {
        successor: String,
        depth: u32,
        #[source]
        source: ClientError,
    },
}

impl From<ReplicationError> for DhtError {
    fn from(err: ReplicationError) -> Self {
        match err {
            ReplicationError::HopFailed { source, .. } => source.flatten(),
        }
    }
}
