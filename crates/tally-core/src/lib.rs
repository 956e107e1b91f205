pub mod balance;
pub mod error;
pub mod rpc;
pub mod types;

#[cfg(test)]
mod test_util;

pub use balance::{tally_coins, BalanceFetcher};
pub use error::{CoreError, RpcError};
pub use types::{BalanceSnapshot, BlockHeight, Coin, TierBalances};
