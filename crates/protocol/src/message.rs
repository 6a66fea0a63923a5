//! Request and response messages.

use corelib::{DhtError, EntryKey, KeyId, NodeDescriptor};
use serde::{Deserialize, Serialize};

/// One variant per RPC a node answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    FindSuccessor { id: KeyId, hops: u32 },
    Get { key: EntryKey },
    Put { key: EntryKey, payload: Vec<u8> },
    Remove { key: EntryKey },
    ReplicatePut { key: EntryKey, payload: Vec<u8>, depth: u32 },
    ReplicateRemove { key: EntryKey, depth: u32 },
    Ping,
    GetPredecessor,
    Notify { candidate: NodeDescriptor },
    GetFingers,
}

impl Request {
    /// Operation name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Request::FindSuccessor { .. } => "find_successor",
            Request::Get { .. } => "get",
            Request::Put { .. } => "put",
            Request::Remove { .. } => "remove",
            Request::ReplicatePut { .. } => "replicate_put",
            Request::ReplicateRemove { .. } => "replicate_remove",
            Request::Ping => "ping",
            Request::GetPredecessor => "get_predecessor",
            Request::Notify { .. } => "notify",
            Request::GetFingers => "get_fingers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// Completed with nothing to return.
    Done,
    Node(NodeDescriptor),
    Nodes(Vec<NodeDescriptor>),
    Payload(Vec<u8>),
    Error(DhtError),
}
