//! Telegram delivery.

use crate::message::AlertMessage;
use async_trait::async_trait;
use std::sync::Mutex;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, Recipient};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram API error: {0}")]
    Api(#[from] teloxide::RequestError),
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Destination for alert messages.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &AlertMessage) -> Result<(), TelegramError>;
}

/// Parse a channel identifier: numeric chat ids or `@channel` usernames.
pub fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

/// Telegram bot bound to a single channel.
pub struct TelegramBot {
    bot: Bot,
    chat: Recipient,
}

impl TelegramBot {
    /// Create a new bot with the given token posting to `chat_id`.
    pub fn new(token: &str, chat_id: &str) -> Self {
        Self {
            bot: Bot::new(token),
            chat: parse_recipient(chat_id),
        }
    }
}

#[async_trait]
impl AlertSink for TelegramBot {
    async fn send(&self, message: &AlertMessage) -> Result<(), TelegramError> {
        let mut request = self
            .bot
            .send_message(self.chat.clone(), message.text.clone())
            .parse_mode(ParseMode::Html);

        if let Some(button) = &message.button {
            let keyboard = InlineKeyboardMarkup::new([[InlineKeyboardButton::url(
                button.text.clone(),
                button.url.clone(),
            )]]);
            request = request.reply_markup(keyboard);
        }

        request.await?;
        Ok(())
    }
}

/// Sink that keeps messages in memory, for tests and dry runs.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<AlertMessage>>,
    /// Reject every message.
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects everything.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<AlertMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn send(&self, message: &AlertMessage) -> Result<(), TelegramError> {
        if self.fail {
            return Err(TelegramError::Rejected("recording sink set to fail".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        Ok(())
    }
}
