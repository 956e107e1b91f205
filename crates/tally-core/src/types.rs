//! Domain types for Tally's balance model.
//!
//! Contains the node-reported unspent output (`Coin`), the tiered balance
//! structures (`TierBalances`, `BalanceSnapshot`), and the shared
//! `BlockHeight` newtype.

use bitcoin::Amount;
use serde::{Deserialize, Serialize};

// ==============================================================================
// Block Height
// ==============================================================================

/// A block height, wrapped for type safety.
///
/// `#[serde(transparent)]` preserves the JSON representation as a bare
/// integer, so this newtype is wire-compatible with plain `u32`.
/// `Deref<Target = u32>` minimises call-site churn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHeight(pub u32);

impl From<u32> for BlockHeight {
    fn from(h: u32) -> Self {
        Self(h)
    }
}

impl From<BlockHeight> for u32 {
    fn from(h: BlockHeight) -> Self {
        h.0
    }
}

impl std::ops::Deref for BlockHeight {
    type Target = u32;
    fn deref(&self) -> &u32 {
        &self.0
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ==============================================================================
// Coin
// ==============================================================================

/// One unspent output as reported by the node for an address.
///
/// A point-in-time snapshot: it is only meaningful relative to the chain tip
/// returned on the same connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    /// Output value in satoshis.
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub value: Amount,
    /// Block height the output was confirmed at; `None` when the output is
    /// still unconfirmed (the node reports `-1` on the wire).
    #[serde(with = "coin_height")]
    pub height: Option<BlockHeight>,
}

/// Wire adapter for coin heights: the node encodes "unconfirmed" as `-1`
/// (any negative value is treated the same way).
mod coin_height {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::BlockHeight;

    pub fn serialize<S: Serializer>(
        height: &Option<BlockHeight>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match height {
            Some(h) => serializer.serialize_i64(i64::from(h.0)),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BlockHeight>, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        if raw < 0 {
            return Ok(None);
        }
        u32::try_from(raw)
            .map(|h| Some(BlockHeight(h)))
            .map_err(|_| serde::de::Error::custom(format!("coin height {raw} out of range")))
    }
}

// ==============================================================================
// Tiered Balances
// ==============================================================================

/// Spendable balance grouped by confirmation depth.
///
/// Tier 0 means "confirmed with depth >= 0": coins the node has not yet seen
/// in a block are excluded from every tier, tier 0 included. Field names are
/// serialized in the wire form consumed by downstream services
/// (`confirmations0` / `confirmations3` / `confirmations6`, satoshis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBalances {
    #[serde(rename = "confirmations0", with = "bitcoin::amount::serde::as_sat")]
    pub confirmations_0: Amount,
    #[serde(rename = "confirmations3", with = "bitcoin::amount::serde::as_sat")]
    pub confirmations_3: Amount,
    #[serde(rename = "confirmations6", with = "bitcoin::amount::serde::as_sat")]
    pub confirmations_6: Amount,
}

impl TierBalances {
    pub fn zero() -> Self {
        Self {
            confirmations_0: Amount::ZERO,
            confirmations_3: Amount::ZERO,
            confirmations_6: Amount::ZERO,
        }
    }
}

/// The output of one balance computation.
///
/// Produced fresh on every call, with no identity beyond it; carries the
/// chain tip the tiers were computed against so callers can tell which
/// block the snapshot is current as of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub balances: TierBalances,
    #[serde(rename = "lastBlockCheck")]
    pub last_block_check: BlockHeight,
}
