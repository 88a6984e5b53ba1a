//! Telegram alerts for market trades.
//!
//! This crate provides:
//! - Rich-text formatting of buy/sell alerts
//! - Telegram delivery with an inline link button
//! - A notifier that fetches snapshots and falls back to a reduced message

pub mod message;
pub mod notifier;
pub mod telegram;

pub use message::{AlertMessage, LinkButton, MessageConfig};
pub use notifier::{DispatchOutcome, Notifier, NotifierConfig, NotifierError};
pub use telegram::{AlertSink, RecordingSink, TelegramBot, TelegramError};
