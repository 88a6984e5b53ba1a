//! Point-in-time token statistics read from the market contract.

use crate::units::{pow10, STABLE_DECIMALS, TOKEN_DECIMALS};
use alloy_primitives::U256;

/// Token statistics merged from the full-data and burn-data calls.
///
/// Fetched fresh for every alert and never cached, so it can reflect a
/// later block than the trade it accompanies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSnapshot {
    pub name: String,
    pub symbol: String,
    /// On-chain price in stable units with 18 decimals. Zero before the
    /// contract has published one.
    pub price: U256,
    pub minted: U256,
    pub burned: U256,
    /// Stable asset held by the pool (6 decimals).
    pub usdt_liquidity: U256,
    /// Tokens held by the pool (18 decimals).
    pub token_liquidity: U256,
    pub holders: U256,
    pub buy_fee_pct: U256,
    pub sell_fee_pct: U256,
    pub active: bool,
}

impl TokenSnapshot {
    /// Minted minus burned, floored at zero.
    pub fn circulating_supply(&self) -> U256 {
        self.minted.saturating_sub(self.burned)
    }

    /// Price shown in alerts (18 decimals).
    ///
    /// Uses the on-chain price when it is nonzero. Otherwise derives
    /// `usdt_liquidity / circulating_supply` when circulating supply is
    /// positive, and falls back to the (zero) on-chain price when it is not.
    pub fn display_price(&self) -> U256 {
        if !self.price.is_zero() {
            return self.price;
        }
        let circulating = self.circulating_supply();
        if circulating.is_zero() {
            return self.price;
        }
        // liquidity (6dp) scaled to 18dp, divided by supply (18dp), kept at 18dp
        let scale = pow10(TOKEN_DECIMALS - STABLE_DECIMALS + TOKEN_DECIMALS);
        self.usdt_liquidity.saturating_mul(scale) / circulating
    }

    /// `display_price × circulating_supply` in stable units with 18 decimals.
    pub fn market_cap(&self) -> U256 {
        self.display_price().saturating_mul(self.circulating_supply()) / pow10(TOKEN_DECIMALS)
    }

    /// Symbol for display, or a generic placeholder when the contract returns none.
    pub fn display_symbol(&self) -> &str {
        if self.symbol.trim().is_empty() {
            "TOKEN"
        } else {
            self.symbol.trim()
        }
    }
}
