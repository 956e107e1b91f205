//! Tiered balance computation against a remote UTXO source.
//!
//! The one operation this crate exists for: given an address, ask the node
//! for its unspent outputs and the current chain height, and reduce them into
//! spendable balances at 0, 3, and 6 confirmations.

use std::sync::Arc;

use bitcoin::Amount;
use tracing::debug;

use crate::error::CoreError;
use crate::rpc::NodeChannel;
use crate::types::{BalanceSnapshot, BlockHeight, Coin, TierBalances};

/// Computes tiered balances over a [`NodeChannel`].
///
/// Stateless apart from the channel handle; concurrent `fetch_balance` calls
/// are independent and each owns its own node session.
pub struct BalanceFetcher {
    channel: Arc<dyn NodeChannel>,
}

impl BalanceFetcher {
    pub fn new(channel: Arc<dyn NodeChannel>) -> Self {
        Self { channel }
    }

    /// Fetch the tiered balance for `address`.
    ///
    /// Opens one node session, issues `getcoinsbyaddress` and then
    /// `getblockcount` strictly in that order on it, and reduces the results.
    /// If the coins query fails, the height query is never issued. The
    /// session's socket is released when the session drops, so success and
    /// every failure path alike close the connection. Errors from either
    /// request propagate unmodified; there are no retries and no partial
    /// results.
    pub async fn fetch_balance(&self, address: &str) -> Result<BalanceSnapshot, CoreError> {
        let mut session = self.channel.open().await?;
        let coins = session.get_coins_by_address(address).await?;
        let tip = session.get_block_count().await?;

        let balances = tally_coins(&coins, tip)?;
        debug!(
            address,
            coins = coins.len(),
            tip = %tip,
            confirmed_sats = balances.confirmations_0.to_sat(),
            "computed tiered balance"
        );

        Ok(BalanceSnapshot {
            balances,
            last_block_check: tip,
        })
    }
}

/// Reduce a coin set into the three confirmation tiers.
///
/// A coin counts as confirmed once the node reported a block height for it;
/// mempool coins count in no tier, tier 0 included. Depth is computed in
/// signed arithmetic: a coin whose height lies above the reported tip (the
/// node answered the two queries around a reorg) is still confirmed, but its
/// negative depth keeps it out of the 3- and 6-confirmation tiers. Each
/// filter strictly tightens the previous one, so the tiers are monotonically
/// non-increasing.
pub fn tally_coins(coins: &[Coin], tip: BlockHeight) -> Result<TierBalances, CoreError> {
    let mut balances = TierBalances::zero();

    for coin in coins {
        let Some(height) = coin.height else {
            continue;
        };
        let depth = i64::from(tip.0) - i64::from(height.0);

        balances.confirmations_0 =
            tier_add(balances.confirmations_0, coin.value, "confirmations0")?;
        if depth >= 3 {
            balances.confirmations_3 =
                tier_add(balances.confirmations_3, coin.value, "confirmations3")?;
        }
        if depth >= 6 {
            balances.confirmations_6 =
                tier_add(balances.confirmations_6, coin.value, "confirmations6")?;
        }
    }

    Ok(balances)
}

fn tier_add(total: Amount, value: Amount, tier: &'static str) -> Result<Amount, CoreError> {
    total
        .checked_add(value)
        .ok_or(CoreError::BalanceOverflow { tier })
}
