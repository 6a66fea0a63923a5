//! Server side of the protocol.

use crate::codec::{decode, encode};
use crate::message::{Request, Response};
use bytes::Bytes;
use corelib::{DhtError, KeyLocator};
use tracing::warn;

/// Run `request` against `locator` and package the outcome.
pub async fn dispatch<L>(locator: &L, request: Request) -> Response
where
    L: KeyLocator<Error = DhtError> + ?Sized,
{
    let outcome = match request {
        Request::FindSuccessor { id, hops } => locator.find_successor(id, hops).await.map(Response::Node),
        Request::Get { key } => locator.get(key).await.map(Response::Payload),
        Request::Put { key, payload } => locator.put(key, payload).await.map(|_| Response::Done),
        Request::Remove { key } => locator.remove(key).await.map(|_| Response::Done),
        Request::ReplicatePut {
            key,
            payload,
            depth,
        } => locator
            .replicate_put(key, payload, depth)
            .await
            .map(|_| Response::Done),
        Request::ReplicateRemove { key, depth } => locator
            .replicate_remove(key, depth)
            .await
            .map(|_| Response::Done),
        Request::Ping => locator.ping().await.map(|_| Response::Done),
        Request::GetPredecessor => locator.get_predecessor().await.map(Response::Node),
        Request::Notify { candidate } => locator.notify(candidate).await.map(Response::Nodes),
        Request::GetFingers => locator.get_fingers().await.map(Response::Nodes),
    };
    outcome.unwrap_or_else(Response::Error)
}

/// Decode a request frame, dispatch it and encode the response frame.
///
/// A frame that does not decode is answered with an `Rpc` error rather than
/// dropped, so the caller is not left waiting.
pub async fn serve_frame<L>(locator: &L, frame: &[u8]) -> Bytes
where
    L: KeyLocator<Error = DhtError> + ?Sized,
{
    let response = match decode::<Request>(frame) {
        Ok(request) => dispatch(locator, request).await,
        Err(e) => {
            warn!(error = %e, "rejecting malformed request frame");
            Response::Error(DhtError::Rpc(e.to_string()))
        }
    };
    match encode(&response) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "response did not encode");
            // An error carrying only a string always encodes.
            encode(&Response::Error(DhtError::Rpc(e.to_string()))).unwrap_or_default()
        }
    }
}
