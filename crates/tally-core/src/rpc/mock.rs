use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CoreError, RpcError};
use crate::types::{BlockHeight, Coin};

use super::{NodeChannel, NodeSession};

/// Counters shared between a [`MockChannel`] and the sessions it hands out.
///
/// `opened`/`released` let tests assert the one-connection-per-computation
/// discipline on both success and failure paths; the per-method counters
/// let tests assert request ordering (no height query after a coins failure).
#[derive(Default)]
pub struct SessionStats {
    pub opened: AtomicUsize,
    pub released: AtomicUsize,
    pub coins_calls: AtomicUsize,
    pub height_calls: AtomicUsize,
}

/// A mock node channel for testing. Returns canned coin sets keyed by
/// address, a canned block count, and optionally scripted failures,
/// configured via the builder pattern.
pub struct MockChannel {
    coins: HashMap<String, Vec<Coin>>,
    block_count: BlockHeight,
    refuse_connections: bool,
    coins_error: Option<(i64, String)>,
    height_error: Option<(i64, String)>,
    stats: Arc<SessionStats>,
}

impl MockChannel {
    pub fn builder() -> MockChannelBuilder {
        MockChannelBuilder {
            coins: HashMap::new(),
            block_count: BlockHeight(100),
            refuse_connections: false,
            coins_error: None,
            height_error: None,
        }
    }

    pub fn stats(&self) -> Arc<SessionStats> {
        Arc::clone(&self.stats)
    }
}

pub struct MockChannelBuilder {
    coins: HashMap<String, Vec<Coin>>,
    block_count: BlockHeight,
    refuse_connections: bool,
    coins_error: Option<(i64, String)>,
    height_error: Option<(i64, String)>,
}

impl MockChannelBuilder {
    pub fn with_coins(mut self, address: &str, coins: Vec<Coin>) -> Self {
        self.coins.insert(address.to_owned(), coins);
        self
    }

    pub fn with_block_count(mut self, block_count: BlockHeight) -> Self {
        self.block_count = block_count;
        self
    }

    /// Make every `open` fail as if the socket never accepted.
    pub fn refuse_connections(mut self) -> Self {
        self.refuse_connections = true;
        self
    }

    /// Answer the coins query with a node error envelope.
    pub fn fail_coins(mut self, code: i64, message: &str) -> Self {
        self.coins_error = Some((code, message.to_owned()));
        self
    }

    /// Answer the height query with a node error envelope.
    pub fn fail_height(mut self, code: i64, message: &str) -> Self {
        self.height_error = Some((code, message.to_owned()));
        self
    }

    pub fn build(self) -> MockChannel {
        MockChannel {
            coins: self.coins,
            block_count: self.block_count,
            refuse_connections: self.refuse_connections,
            coins_error: self.coins_error,
            height_error: self.height_error,
            stats: Arc::new(SessionStats::default()),
        }
    }
}

#[async_trait]
impl NodeChannel for MockChannel {
    async fn open(&self) -> Result<Box<dyn NodeSession>, CoreError> {
        if self.refuse_connections {
            return Err(RpcError::Connect {
                endpoint: "mock".to_owned(),
                attempts: 1,
                source: std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "mock channel refuses connections",
                ),
            }
            .into());
        }
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            coins: self.coins.clone(),
            block_count: self.block_count,
            coins_error: self.coins_error.clone(),
            height_error: self.height_error.clone(),
            stats: Arc::clone(&self.stats),
        }))
    }
}

pub struct MockSession {
    coins: HashMap<String, Vec<Coin>>,
    block_count: BlockHeight,
    coins_error: Option<(i64, String)>,
    height_error: Option<(i64, String)>,
    stats: Arc<SessionStats>,
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.stats.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl NodeSession for MockSession {
    async fn get_coins_by_address(&mut self, address: &str) -> Result<Vec<Coin>, CoreError> {
        self.stats.coins_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((code, message)) = &self.coins_error {
            return Err(RpcError::Server {
                code: *code,
                message: message.clone(),
            }
            .into());
        }
        // Addresses the node has never seen simply have no coins.
        Ok(self.coins.get(address).cloned().unwrap_or_default())
    }

    async fn get_block_count(&mut self) -> Result<BlockHeight, CoreError> {
        self.stats.height_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((code, message)) = &self.height_error {
            return Err(RpcError::Server {
                code: *code,
                message: message.clone(),
            }
            .into());
        }
        Ok(self.block_count)
    }
}
