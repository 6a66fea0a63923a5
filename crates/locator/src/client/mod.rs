//! Remote client access.
//!
//! A `Transport` moves frames; `RpcClient` turns the node RPC surface into
//! frames and retries transport failures; `PooledClientFactory` hands out one
//! client per remote node.

pub mod loopback;
pub mod pool;
pub mod retry;
pub mod rpc_client;
pub mod transport;

pub use loopback::LoopbackTransport;
pub use pool::PooledClientFactory;
pub use retry::RetryPolicy;
pub use rpc_client::RpcClient;
pub use transport::{Transport, TransportError};
