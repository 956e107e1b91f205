mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::WrapErr;

use tally_core::rpc::{IpcChannel, IpcConfig};
use tally_core::BalanceFetcher;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = IpcConfig::new(&args.socket).with_retry(
        args.max_retries,
        Duration::from_millis(args.retry_delay_ms),
    );
    let channel = IpcChannel::new(config).context("configure node channel")?;
    let fetcher = BalanceFetcher::new(Arc::new(channel));

    tracing::info!(
        socket = %args.socket.display(),
        address = %args.address,
        "fetching tiered balance"
    );

    let snapshot = fetcher
        .fetch_balance(&args.address)
        .await
        .wrap_err_with(|| format!("fetch balance for `{}`", args.address))?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    }
    .context("encode balance snapshot")?;
    println!("{rendered}");

    Ok(())
}
