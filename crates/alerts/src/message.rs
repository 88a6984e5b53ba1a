//! Alert message formatting.
//!
//! Messages are Telegram HTML. Everything taken from the chain that could
//! contain markup (symbol, brand) is escaped.

use serde::Serialize;
use teloxide::utils::html::escape;
use trade_alert_core::{
    format18, format6, format_units, short, TokenSnapshot, TradeEvent, TradeSide, B256,
    STABLE_PLACES, TOKEN_DECIMALS,
};
use url::Url;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━";

/// Static parts of every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageConfig {
    /// Name shown in alert headers.
    pub brand: String,
    /// Block explorer base URL, without the `/tx/` suffix.
    pub explorer_url: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            brand: "TOKEN".to_string(),
            explorer_url: "https://polygonscan.com".to_string(),
        }
    }
}

impl MessageConfig {
    /// Explorer link for a transaction.
    pub fn tx_url(&self, tx_hash: &B256) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }

    fn header(&self, side: TradeSide) -> String {
        format!(
            "{emoji} <b>{brand} {label} ALERT</b> {emoji}",
            emoji = side.emoji(),
            brand = escape(&self.brand),
            label = side.label()
        )
    }
}

/// Inline URL button attached below a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkButton {
    pub text: String,
    pub url: Url,
}

/// A message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub text: String,
    pub button: Option<LinkButton>,
}

impl AlertMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            button: None,
        }
    }

    pub fn with_button(mut self, button: Option<LinkButton>) -> Self {
        self.button = button;
        self
    }
}

fn user_line(event: &TradeEvent) -> String {
    format!("👤 <b>User:</b> <code>{}</code>", short(&event.user))
}

fn tx_line(config: &MessageConfig, event: &TradeEvent) -> String {
    format!(
        "🔗 <a href=\"{}\">View Transaction</a>",
        config.tx_url(&event.tx_hash)
    )
}

/// Full alert for a trade with a fresh token snapshot.
pub fn format_trade_alert(
    config: &MessageConfig,
    event: &TradeEvent,
    snapshot: &TokenSnapshot,
) -> String {
    let symbol = escape(snapshot.display_symbol());
    let stable = format6(Some(event.stable_amount()));
    let token = format18(Some(event.token_amount()));

    let mut msg = format!("{}\n{}\n\n", config.header(event.side), DIVIDER);

    msg.push_str(&format!(
        "📈 <b>Current Price:</b> {} USDT\n",
        format18(Some(snapshot.display_price()))
    ));
    msg.push_str(&format!(
        "🏦 <b>Market Cap:</b> {} USDT\n\n",
        format_units(Some(snapshot.market_cap()), TOKEN_DECIMALS, STABLE_PLACES)
    ));

    match event.side {
        TradeSide::Buy => {
            msg.push_str(&format!("💰 <b>Spent:</b> {} USDT\n", stable));
            msg.push_str(&format!("🪙 <b>Received:</b> {} {}\n", token, symbol));
        }
        TradeSide::Sell => {
            msg.push_str(&format!("🪙 <b>Sold:</b> {} {}\n", token, symbol));
            msg.push_str(&format!("💰 <b>Received:</b> {} USDT\n", stable));
        }
    }
    msg.push_str(&format!(
        "🏷 <b>Trade Price:</b> {} USDT\n",
        format18(Some(event.price))
    ));

    msg.push_str(DIVIDER);
    msg.push('\n');
    msg.push_str(&format!(
        "💎 <b>Total Minted:</b> {} {}\n",
        format18(Some(snapshot.minted)),
        symbol
    ));
    msg.push_str(&format!(
        "🔥 <b>Total Burned:</b> {} {}\n",
        format18(Some(snapshot.burned)),
        symbol
    ));
    msg.push_str(&format!(
        "💧 <b>Liquidity Pool:</b> {} USDT\n",
        format6(Some(snapshot.usdt_liquidity))
    ));
    msg.push_str(&format!("👥 <b>Holders:</b> {}\n", snapshot.holders));
    msg.push_str(&format!(
        "🧾 <b>Fees:</b> buy {}% / sell {}%\n\n",
        snapshot.buy_fee_pct, snapshot.sell_fee_pct
    ));

    msg.push_str(&user_line(event));
    msg.push('\n');
    if let Some(ts) = event.timestamp {
        msg.push_str(&format!("⏰ {}\n", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    msg.push_str(&tx_line(config, event));

    msg
}

/// Reduced alert used when the snapshot could not be read.
pub fn format_fallback(config: &MessageConfig, event: &TradeEvent) -> String {
    format!(
        "🚨 <b>{} {} DETECTED!</b>\n\n{}\n{}",
        escape(&config.brand),
        event.side.label(),
        user_line(event),
        tx_line(config, event)
    )
}

/// Startup announcement.
pub fn format_online(config: &MessageConfig) -> String {
    format!(
        "🤖 <b>{} Monitoring System Online!</b>\nTracking live buy and sell alerts...",
        escape(&config.brand)
    )
}
