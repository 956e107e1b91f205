//! Native JSON-RPC client for the node-control Unix socket.
//!
//! Implements [`NodeChannel`](super::NodeChannel) over newline-delimited JSON
//! envelopes with request-correlation ids, bounded connect retries, and
//! per-session connection ownership.

mod client;
mod protocol;

pub use client::{IpcChannel, IpcConfig};
