//! Shared test helpers for `tally-core` unit tests.

use bitcoin::Amount;

use crate::types::{BlockHeight, Coin};

/// A coin worth `sats`, confirmed at `height`.
pub fn confirmed_coin(sats: u64, height: u32) -> Coin {
    Coin {
        value: Amount::from_sat(sats),
        height: Some(BlockHeight(height)),
    }
}

/// A coin worth `sats` that is not in a block yet.
pub fn unconfirmed_coin(sats: u64) -> Coin {
    Coin {
        value: Amount::from_sat(sats),
        height: None,
    }
}
