use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::time::sleep;
use tracing::{debug, trace, warn};

use crate::error::{CoreError, RpcError};
use crate::types::{BlockHeight, Coin};

use super::super::{NodeChannel, NodeSession};
use super::protocol::{match_response, IpcRequest, IpcResponse};

/// Connect attempts before giving up, matching the node-ipc defaults the
/// balance pipeline has always run with.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Fixed delay between connect attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Connection parameters for the node-control socket.
///
/// Passed in explicitly rather than read from ambient state, so multiple
/// channels against different nodes can coexist in one process.
#[derive(Debug, Clone)]
pub struct IpcConfig {
    /// Filesystem path of the node's control socket.
    pub socket_path: PathBuf,
    /// Connect attempts before the call fails with a connection error.
    pub max_retries: u32,
    /// Delay between consecutive connect attempts.
    pub retry_delay: Duration,
}

impl IpcConfig {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }
}

/// Node-control channel over a Unix domain socket.
///
/// Each [`open`](NodeChannel::open) dials the socket afresh; sessions are
/// transient and exclusively owned by one in-flight computation. The socket
/// is closed when the session drops, so no exit path can leak a connection.
#[derive(Debug)]
pub struct IpcChannel {
    config: IpcConfig,
}

impl IpcChannel {
    pub fn new(config: IpcConfig) -> Result<Self, CoreError> {
        if config.max_retries == 0 {
            return Err(CoreError::InvalidConfig(
                "max_retries must be at least 1".to_owned(),
            ));
        }
        Ok(Self { config })
    }
}

#[async_trait]
impl NodeChannel for IpcChannel {
    async fn open(&self) -> Result<Box<dyn NodeSession>, CoreError> {
        let endpoint = self.config.socket_path.display().to_string();

        let mut attempt = 0;
        loop {
            attempt += 1;
            match UnixStream::connect(&self.config.socket_path).await {
                Ok(stream) => {
                    debug!(%endpoint, attempt, "connected to node endpoint");
                    let (read_half, write_half) = stream.into_split();
                    return Ok(Box::new(IpcSession {
                        reader: BufReader::new(read_half),
                        writer: write_half,
                        next_id: initial_request_id(),
                        endpoint,
                    }));
                }
                Err(err) => {
                    if attempt >= self.config.max_retries {
                        return Err(RpcError::Connect {
                            endpoint,
                            attempts: attempt,
                            source: err,
                        }
                        .into());
                    }
                    warn!(
                        %endpoint,
                        attempt,
                        max_retries = self.config.max_retries,
                        error = %err,
                        "node endpoint connect failed; retrying"
                    );
                    sleep(self.config.retry_delay).await;
                }
            }
        }
    }
}

/// One live connection to the node.
///
/// Requests are issued strictly one at a time: a request is not written until
/// the previous response has been fully consumed, and each response must echo
/// the id of the request that produced it.
struct IpcSession {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    next_id: u64,
    endpoint: String,
}

impl IpcSession {
    async fn call(
        &mut self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, RpcError> {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        debug!(
            endpoint = %self.endpoint,
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );

        let mut line = serde_json::to_vec(&IpcRequest { id, method, params })
            .expect("request envelope serialization uses only plain JSON types");
        line.push(b'\n');
        self.writer.write_all(&line).await?;

        let mut body = String::new();
        let read = self.reader.read_line(&mut body).await?;
        if read == 0 {
            return Err(RpcError::ConnectionClosed);
        }
        trace!(
            endpoint = %self.endpoint,
            rpc.id = id,
            rpc.method = method,
            body = %body.trim_end(),
            "rpc response line"
        );

        let decoded: IpcResponse = serde_json::from_str(&body).map_err(|e| {
            RpcError::InvalidResponse(format!(
                "decode response envelope: {e}; line={}",
                body.trim_end()
            ))
        })?;

        match_response(decoded, id)
    }
}

#[async_trait]
impl NodeSession for IpcSession {
    async fn get_coins_by_address(&mut self, address: &str) -> Result<Vec<Coin>, CoreError> {
        let raw = self
            .call("getcoinsbyaddress", vec![serde_json::json!(address)])
            .await?;
        let coins: Vec<Coin> = serde_json::from_value(raw).map_err(|e| {
            RpcError::InvalidResponse(format!("invalid getcoinsbyaddress result: {e}"))
        })?;
        Ok(coins)
    }

    async fn get_block_count(&mut self) -> Result<BlockHeight, CoreError> {
        let raw = self.call("getblockcount", Vec::new()).await?;
        let height: BlockHeight = serde_json::from_value(raw)
            .map_err(|e| RpcError::InvalidResponse(format!("invalid getblockcount result: {e}")))?;
        Ok(height)
    }
}

/// Seed request ids from the clock so ids from different sessions are
/// unlikely to collide in node-side logs.
fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
