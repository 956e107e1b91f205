#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("RPC communication failure: {0}")]
    Rpc(#[from] RpcError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("balance overflow while summing coin values for {tier}")]
    BalanceOverflow { tier: &'static str },
}

/// Failures on the node-control channel, kept separate from domain errors so
/// callers can tell a dead socket from a node-side rejection.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The endpoint never acknowledged a connection within the retry budget.
    #[error("could not connect to `{endpoint}` after {attempts} attempts: {source}")]
    Connect {
        endpoint: String,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    /// The node answered a request with a standard `{code, message}` error.
    #[error("node error {code}: {message}")]
    Server { code: i64, message: String },

    /// The node answered with an error envelope of a non-standard shape,
    /// preserved verbatim as JSON text.
    #[error("node returned a non-standard error: {0}")]
    ServerOther(String),

    /// A response envelope matched neither the success nor the error shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A response arrived tagged for a different request.
    #[error("response id {got} does not match request id {expected}")]
    IdMismatch { expected: u64, got: u64 },

    /// The node hung up while a request was outstanding.
    #[error("connection closed by node mid-call")]
    ConnectionClosed,

    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),
}
