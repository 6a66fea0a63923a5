//! Dispatch tests against a scripted node.

use async_trait::async_trait;
use corelib::{DhtError, EntryKey, KeyId, KeyLocator, NodeDescriptor};
use protocol::{decode, encode, dispatch, serve_frame, Request, Response};
use parking_lot::Mutex;

fn node(id: u128) -> NodeDescriptor {
    NodeDescriptor::new(KeyId(id), "127.0.0.1", 7000, format!("n{}", id))
}

/// Answers from a fixed script and records the last call.
#[derive(Default)]
struct ScriptedNode {
    calls: Mutex<Vec<String>>,
}

impl ScriptedNode {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

#[async_trait]
impl KeyLocator for ScriptedNode {
    type Error = DhtError;

    async fn find_successor(&self, id: KeyId, hops: u32) -> Result<NodeDescriptor, DhtError> {
        self.record(format!("find_successor {} {}", id.0, hops));
        Ok(node(20))
    }

    async fn get(&self, key: EntryKey) -> Result<Vec<u8>, DhtError> {
        Err(DhtError::DataNotFound(key.id))
    }

    async fn put(&self, key: EntryKey, _payload: Vec<u8>) -> Result<(), DhtError> {
        Err(DhtError::NotResponsible(key.id))
    }

    async fn remove(&self, key: EntryKey) -> Result<(), DhtError> {
        self.record(format!("remove {}", key.id.0));
        Ok(())
    }

    async fn replicate_put(&self, key: EntryKey, payload: Vec<u8>, depth: u32) -> Result<(), DhtError> {
        self.record(format!("replicate_put {} {} {}", key.id.0, payload.len(), depth));
        Ok(())
    }

    async fn replicate_remove(&self, _key: EntryKey, _depth: u32) -> Result<(), DhtError> {
        Err(DhtError::Rpc("successor unreachable".into()))
    }

    async fn ping(&self) -> Result<(), DhtError> {
        Ok(())
    }

    async fn get_predecessor(&self) -> Result<NodeDescriptor, DhtError> {
        Err(DhtError::NodeNotFound)
    }

    async fn notify(&self, candidate: NodeDescriptor) -> Result<Vec<NodeDescriptor>, DhtError> {
        self.record(format!("notify {}", candidate.id.0));
        Ok(vec![node(10), node(20)])
    }

    async fn get_fingers(&self) -> Result<Vec<NodeDescriptor>, DhtError> {
        Ok(vec![node(10)])
    }
}

#[tokio::test]
async fn test_dispatch_routes_each_request() {
    let target = ScriptedNode::default();

    assert_eq!(
        dispatch(&target, Request::FindSuccessor { id: KeyId(15), hops: 3 }).await,
        Response::Node(node(20))
    );
    assert_eq!(
        dispatch(&target, Request::ReplicatePut {
            key: EntryKey::new(KeyId(15)),
            payload: b"abc".to_vec(),
            depth: 1,
        })
        .await,
        Response::Done
    );
    assert_eq!(
        dispatch(&target, Request::Notify { candidate: node(5) }).await,
        Response::Nodes(vec![node(10), node(20)])
    );
    assert_eq!(dispatch(&target, Request::Ping).await, Response::Done);

    let calls = target.calls.lock().clone();
    assert_eq!(
        calls,
        vec!["find_successor 15 3", "replicate_put 15 3 1", "notify 5"]
    );
}

#[tokio::test]
async fn test_dispatch_preserves_signals() {
    let target = ScriptedNode::default();
    let key = EntryKey::new(KeyId(8));

    assert_eq!(
        dispatch(&target, Request::Get { key: key.clone() }).await,
        Response::Error(DhtError::DataNotFound(KeyId(8)))
    );
    assert_eq!(
        dispatch(&target, Request::Put { key, payload: vec![] }).await,
        Response::Error(DhtError::NotResponsible(KeyId(8)))
    );
    assert_eq!(
        dispatch(&target, Request::GetPredecessor).await,
        Response::Error(DhtError::NodeNotFound)
    );
}

#[tokio::test]
async fn test_serve_frame_round_trip() {
    let target = ScriptedNode::default();
    let frame = encode(&Request::Remove { key: EntryKey::new(KeyId(2)) }).unwrap();
    let reply: Response = decode(&serve_frame(&target, &frame).await).unwrap();
    assert_eq!(reply, Response::Done);
    assert_eq!(target.calls.lock().as_slice(), ["remove 2"]);
}

#[tokio::test]
async fn test_serve_frame_answers_garbage() {
    let target = ScriptedNode::default();
    let reply: Response = decode(&serve_frame(&target, &[0xff, 0xff, 0xff, 0xff, 0xff]).await).unwrap();
    assert!(matches!(reply, Response::Error(DhtError::Rpc(_))));
}
