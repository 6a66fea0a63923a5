//! Error types for the core library.
//!
//! `DhtError` is the set of signals a node is allowed to send back across the
//! RPC boundary; callers branch on its variants. `ClientError` belongs to the
//! outbound side and never leaves the node that produced it.

use crate::token::KeyId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for node operations.
pub type Result<T> = std::result::Result<T, DhtError>;

/// Signals returned by a node's RPC surface.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DhtError {
    /// The key lies outside `(predecessor, self]`; re-route and retry.
    #[error("not responsible for identifier {0}")]
    NotResponsible(KeyId),

    #[error("no data stored for identifier {0}")]
    DataNotFound(KeyId),

    /// No predecessor is currently known.
    #[error("node not found")]
    NodeNotFound,

    /// The identifier does not fit the ring's `bits`-wide space.
    #[error("identifier {id} outside the {bits}-bit identifier space")]
    InvalidIdentifier { id: KeyId, bits: u32 },

    /// A lookup ran out of hop budget before reaching the owner. `budget` is
    /// the hop count the failing call was given.
    #[error("routing for identifier {id} exhausted a budget of {budget} hops")]
    RoutingFailed { id: KeyId, budget: u32 },

    /// Catch-all for failures of outbound calls.
    #[error("rpc failure: {0}")]
    Rpc(String),
}

/// Failures of the remote client access layer.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("node {node} unavailable: {reason}")]
    Unavailable { node: String, reason: String },

    #[error("call to {node} failed after {attempts} attempts: {last}")]
    RetryExhausted {
        node: String,
        attempts: u32,
        last: String,
    },

    #[error("codec error: {0}")]
    Codec(String),

    /// The remote node answered with one of its own signals.
    #[error(transparent)]
    Remote(DhtError),
}

impl ClientError {
    /// Collapse any client failure into the generic RPC signal.
    ///
    /// Replication uses this: a caller cannot tell an unreachable successor
    /// apart from a failure further down the chain.
    pub fn flatten(self) -> DhtError {
        match self {
            ClientError::Remote(DhtError::Rpc(msg)) => DhtError::Rpc(msg),
            other => DhtError::Rpc(other.to_string()),
        }
    }
}

impl From<ClientError> for DhtError {
    /// Remote domain signals pass through; transport failures become `Rpc`.
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Remote(inner) => inner,
            other => DhtError::Rpc(other.to_string()),
        }
    }
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: u64,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_signals_survive_conversion() {
        let err: DhtError = ClientError::Remote(DhtError::NotResponsible(KeyId(3))).into();
        assert_eq!(err, DhtError::NotResponsible(KeyId(3)));
    }

    #[test]
    fn test_retry_exhaustion_becomes_rpc_failure() {
        let err: DhtError = ClientError::RetryExhausted {
            node: "n1".into(),
            attempts: 3,
            last: "connection refused".into(),
        }
        .into();
        assert!(matches!(err, DhtError::Rpc(msg) if msg.contains("3 attempts")));
    }

    #[test]
    fn test_flatten_hides_remote_signals() {
        let err = ClientError::Remote(DhtError::DataNotFound(KeyId(1))).flatten();
        assert!(matches!(err, DhtError::Rpc(_)));

        let err = ClientError::Remote(DhtError::Rpc("hop 2".into())).flatten();
        assert_eq!(err, DhtError::Rpc("hop 2".into()));
    }
}
