use std::path::PathBuf;

use clap::Parser;

/// Tally — tiered confirmation-depth balances for an address, straight from a
/// local node's control socket.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Address to compute balances for (passed to the node as-is).
    pub address: String,

    /// Path of the node-control Unix socket.
    #[arg(long, default_value = "/tmp/node-control.sock", env = "TALLY_SOCKET")]
    pub socket: PathBuf,

    /// Connect attempts before giving up.
    #[arg(long, default_value = "3")]
    pub max_retries: u32,

    /// Delay between connect attempts, in milliseconds.
    #[arg(long, default_value = "1500")]
    pub retry_delay_ms: u64,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}
