//! Application configuration.

use serde::Serialize;
use thiserror::Error;
use trade_alert_alerts::{LinkButton, MessageConfig, NotifierConfig};
use trade_alert_core::Address;
use url::Url;

/// Default poll period.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 12;
/// Default number of blocks re-scanned below the head at startup.
pub const DEFAULT_BACK_SCAN_BLOCKS: u64 = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Telegram bot token.
    #[serde(skip_serializing)]
    pub bot_token: String,
    /// Channel id or `@username` that receives alerts.
    pub channel_id: String,
    /// Market contract emitting `Bought`/`Sold`.
    pub contract_address: Address,
    /// Fixed token for snapshots. Unset means the event's token.
    pub token_address: Option<Address>,
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    pub message: MessageConfig,
    pub button: Option<LinkButton>,
    pub poll_interval_secs: u64,
    pub back_scan_blocks: u64,
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let bot_token = require("BOT_TOKEN")?;
        let channel_id = require("CHANNEL_ID")?;
        let contract_address = parse_address("CONTRACT_ADDRESS", &require("CONTRACT_ADDRESS")?)?;
        let rpc_url = require("RPC_URL")?;

        let token_address = get("TOKEN_ADDRESS")
            .map(|v| parse_address("TOKEN_ADDRESS", &v))
            .transpose()?;

        let defaults = MessageConfig::default();
        let message = MessageConfig {
            brand: get("BRAND_NAME").unwrap_or(defaults.brand),
            explorer_url: get("EXPLORER_URL").unwrap_or(defaults.explorer_url),
        };

        let button = match get("BUTTON_URL") {
            Some(raw) => Some(LinkButton {
                text: get("BUTTON_TEXT").unwrap_or_else(|| "🌐 Visit Website".to_string()),
                url: Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                    key: "BUTTON_URL",
                    reason: e.to_string(),
                })?,
            }),
            None => None,
        };

        let poll_interval_secs = parse_u64("POLL_INTERVAL_SECS", get("POLL_INTERVAL_SECS"))?
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_SECS",
                reason: "must be at least 1".to_string(),
            });
        }
        let back_scan_blocks = parse_u64("BACK_SCAN_BLOCKS", get("BACK_SCAN_BLOCKS"))?
            .unwrap_or(DEFAULT_BACK_SCAN_BLOCKS);

        Ok(Self {
            bot_token,
            channel_id,
            contract_address,
            token_address,
            rpc_url,
            message,
            button,
            poll_interval_secs,
            back_scan_blocks,
        })
    }

    /// Notifier settings derived from this config.
    pub fn notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            message: self.message.clone(),
            button: self.button.clone(),
            token: self.token_address,
        }
    }
}

fn parse_address(key: &'static str, value: &str) -> Result<Address, ConfigError> {
    value.parse().map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("{e}"),
    })
}

fn parse_u64(key: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.parse::<u64>().map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            })
        })
        .transpose()
}
