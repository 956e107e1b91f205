//! Node RPC abstraction layer.
//!
//! Defines the [`NodeChannel`] / [`NodeSession`] traits and provides a Unix
//! domain socket implementation ([`IpcChannel`]) plus a test mock
//! (`mock::MockChannel`).

mod ipc_adapter;
#[cfg(test)]
pub mod mock;

pub use ipc_adapter::{IpcChannel, IpcConfig};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{BlockHeight, Coin};

/// Factory for node-control connections.
///
/// The connection lifecycle is part of the balance contract: each balance
/// computation opens exactly one session, issues its requests on it, and
/// releases it on every exit path. Implementations own the endpoint identity
/// and retry policy; they must not share live connections between sessions.
#[async_trait]
pub trait NodeChannel: Send + Sync {
    /// Open a fresh session to the node, acknowledged and ready for requests.
    async fn open(&self) -> Result<Box<dyn NodeSession>, CoreError>;
}

/// One open connection to the node.
///
/// Methods take `&mut self`: the channel is not request-correlated enough to
/// allow interleaving from one session, so calls are strictly sequential.
/// Dropping a session releases its connection.
#[async_trait]
pub trait NodeSession: Send {
    /// Fetch the unspent outputs currently credited to `address`.
    ///
    /// The address is passed through opaquely; format validation is the
    /// node's responsibility.
    async fn get_coins_by_address(&mut self, address: &str) -> Result<Vec<Coin>, CoreError>;

    /// Fetch the current best block height.
    async fn get_block_count(&mut self) -> Result<BlockHeight, CoreError>;
}
