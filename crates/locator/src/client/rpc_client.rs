//! RPC client for one remote node.

use crate::client::retry::RetryPolicy;
use crate::client::transport::Transport;
use async_trait::async_trait;
use corelib::{ClientError, EntryKey, KeyId, KeyLocator, NodeDescriptor};
use protocol::{decode, encode, Request, Response};
use std::sync::Arc;
use tracing::warn;

/// Speaks the node protocol to `target` over a transport.
///
/// Transport failures are retried according to the policy; once attempts run
/// out the call fails with `ClientError::RetryExhausted`. Signals sent back by
/// the remote node are never retried and surface as `ClientError::Remote`.
pub struct RpcClient<T> {
    target: NodeDescriptor,
    transport: Arc<T>,
    policy: RetryPolicy,
}

impl<T: Transport> RpcClient<T> {
    pub fn new(target: NodeDescriptor, transport: Arc<T>, policy: RetryPolicy) -> Self {
        Self {
            target,
            transport,
            policy,
        }
    }

    pub fn target(&self) -> &NodeDescriptor {
        &self.target
    }

    async fn call(&self, request: Request) -> Result<Response, ClientError> {
        let frame = encode(&request).map_err(|e| ClientError::Codec(e.to_string()))?;
        let attempts = self.policy.attempts();
        let mut last = String::new();

        for attempt in 1..=attempts {
            match self.transport.call(&self.target, frame.clone()).await {
                Ok(reply) => {
                    return match decode::<Response>(&reply) {
                        Ok(Response::Error(signal)) => Err(ClientError::Remote(signal)),
                        Ok(response) => Ok(response),
                        Err(e) => Err(ClientError::Codec(e.to_string())),
                    };
                }
                Err(e) => {
                    warn!(
                        node = %self.target,
                        op = request.name(),
                        attempt,
                        attempts,
                        error = %e,
                        "transport failure"
                    );
                    last = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(self.policy.delay_after(attempt)).await;
                    }
                }
            }
        }

        Err(ClientError::RetryExhausted {
            node: self.target.to_string(),
            attempts,
            last,
        })
    }

    fn unexpected(&self, op: &str, response: Response) -> ClientError {
        ClientError::Codec(format!(
            "unexpected response to {} from {}: {:?}",
            op, self.target, response
        ))
    }

    async fn call_for_node(&self, request: Request) -> Result<NodeDescriptor, ClientError> {
        let op = request.name();
        match self.call(request).await? {
            Response::Node(node) => Ok(node),
            other => Err(self.unexpected(op, other)),
        }
    }

    async fn call_for_nodes(&self, request: Request) -> Result<Vec<NodeDescriptor>, ClientError> {
        let op = request.name();
        match self.call(request).await? {
            Response::Nodes(nodes) => Ok(nodes),
            other => Err(self.unexpected(op, other)),
        }
    }

    async fn call_for_done(&self, request: Request) -> Result<(), ClientError> {
        let op = request.name();
        match self.call(request).await? {
            Response::Done => Ok(()),
            other => Err(self.unexpected(op, other)),
        }
    }
}

#[async_trait]
impl<T: Transport> KeyLocator for RpcClient<T> {
    type Error = ClientError;

    async fn find_successor(&self, id: KeyId, hops: u32) -> Result<NodeDescriptor, ClientError> {
        self.call_for_node(Request::FindSuccessor { id, hops }).await
    }

    async fn get(&self, key: EntryKey) -> Result<Vec<u8>, ClientError> {
        match self.call(Request::Get { key }).await? {
            Response::Payload(payload) => Ok(payload),
            other => Err(self.unexpected("get", other)),
        }
    }

    async fn put(&self, key: EntryKey, payload: Vec<u8>) -> Result<(), ClientError> {
        self.call_for_done(Request::Put { key, payload }).await
    }

    async fn remove(&self, key: EntryKey) -> Result<(), ClientError> {
        self.call_for_done(Request::Remove { key }).await
    }

    async fn replicate_put(&self, key: EntryKey, payload: Vec<u8>, depth: u32) -> Result<(), ClientError> {
        self.call_for_done(Request::ReplicatePut {
            key,
            payload,
            depth,
        })
        .await
    }

    async fn replicate_remove(&self, key: EntryKey, depth: u32) -> Result<(), ClientError> {
        self.call_for_done(Request::ReplicateRemove { key, depth }).await
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.call_for_done(Request::Ping).await
    }

    async fn get_predecessor(&self) -> Result<NodeDescriptor, ClientError> {
        self.call_for_node(Request::GetPredecessor).await
    }

    async fn notify(&self, candidate: NodeDescriptor) -> Result<Vec<NodeDescriptor>, ClientError> {
        self.call_for_nodes(Request::Notify { candidate }).await
    }

    async fn get_fingers(&self) -> Result<Vec<NodeDescriptor>, ClientError> {
        self.call_for_nodes(Request::GetFingers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::TransportError;
    use bytes::Bytes;
    use corelib::DhtError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Fails the first `failures` calls, then answers with `reply`.
    struct FlakyTransport {
        failures: u32,
        calls: AtomicU32,
        reply: Response,
    }

    impl FlakyTransport {
        fn new(failures: u32, reply: Response) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: AtomicU32::new(0),
                reply,
            })
        }
    }

    #[async_trait]
    impl Transport for FlakyTransport {
        async fn call(&self, target: &NodeDescriptor, _frame: Bytes) -> Result<Bytes, TransportError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(TransportError::Refused(target.to_string()));
            }
            Ok(encode(&self.reply).unwrap())
        }
    }

    fn target() -> NodeDescriptor {
        NodeDescriptor::new(KeyId(20), "127.0.0.1", 7020, "n20")
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let transport = FlakyTransport::new(2, Response::Done);
        let client = RpcClient::new(target(), Arc::clone(&transport), RetryPolicy::new(3, Duration::from_millis(50)));
        client.ping().await.unwrap();
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_attempts() {
        let transport = FlakyTransport::new(10, Response::Done);
        let client = RpcClient::new(target(), Arc::clone(&transport), RetryPolicy::new(3, Duration::from_millis(50)));
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, ClientError::RetryExhausted { attempts: 3, .. }));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_remote_signal_is_not_retried() {
        let transport = FlakyTransport::new(0, Response::Error(DhtError::NotResponsible(KeyId(15))));
        let client = RpcClient::new(target(), Arc::clone(&transport), RetryPolicy::new(3, Duration::ZERO));
        let err = client.put(EntryKey::new(KeyId(15)), vec![1]).await.unwrap_err();
        assert!(matches!(err, ClientError::Remote(DhtError::NotResponsible(KeyId(15)))));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mismatched_response_is_codec_error() {
        let transport = FlakyTransport::new(0, Response::Done);
        let client = RpcClient::new(target(), transport, RetryPolicy::once());
        let err = client.get_fingers().await.unwrap_err();
        assert!(matches!(err, ClientError::Codec(msg) if msg.contains("get_fingers")));
    }
}
