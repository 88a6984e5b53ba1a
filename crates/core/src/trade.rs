//! Trade events decoded from the market contract.

use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use std::fmt;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Both sides in scan order.
    pub const ALL: [TradeSide; 2] = [TradeSide::Buy, TradeSide::Sell];

    /// Upper-case label used in alert headers.
    pub fn label(self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }

    /// Directional emoji.
    pub fn emoji(self) -> &'static str {
        match self {
            TradeSide::Buy => "🚀",
            TradeSide::Sell => "🔻",
        }
    }

    /// Contract event name for this side.
    pub fn event_name(self) -> &'static str {
        match self {
            TradeSide::Buy => "Bought",
            TradeSide::Sell => "Sold",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single `Bought` or `Sold` event.
///
/// For a buy, `amount_in` is the stable asset paid and `amount_out` the
/// tokens received. For a sell it is the other way round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeEvent {
    pub side: TradeSide,
    pub user: Address,
    pub token: Address,
    pub amount_in: U256,
    pub amount_out: U256,
    /// Execution price reported by the contract (18 decimals).
    pub price: U256,
    pub tx_hash: B256,
    pub block_number: u64,
    pub log_index: u64,
    /// Trade time from the event's `tdate` field.
    pub timestamp: Option<DateTime<Utc>>,
}

impl TradeEvent {
    /// Stable-asset side of the trade (6 decimals).
    pub fn stable_amount(&self) -> U256 {
        match self.side {
            TradeSide::Buy => self.amount_in,
            TradeSide::Sell => self.amount_out,
        }
    }

    /// Token side of the trade (18 decimals).
    pub fn token_amount(&self) -> U256 {
        match self.side {
            TradeSide::Buy => self.amount_out,
            TradeSide::Sell => self.amount_in,
        }
    }

    /// Ordering key within a block range.
    #[inline]
    pub fn position(&self) -> (u64, u64) {
        (self.block_number, self.log_index)
    }
}

/// Convert a unix-seconds `uint256` into a timestamp. Out-of-range values map to `None`.
pub fn timestamp_from_secs(secs: U256) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(u64::try_from(secs).ok()?).ok()?;
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}
