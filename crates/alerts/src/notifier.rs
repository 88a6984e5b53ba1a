//! Alert notification logic.

use crate::message::{
    format_fallback, format_online, format_trade_alert, AlertMessage, LinkButton, MessageConfig,
};
use crate::telegram::{AlertSink, TelegramError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use trade_alert_chain::{ChainError, TokenDataSource};
use trade_alert_core::{Address, TradeEvent};

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] ChainError),
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),
}

/// Configuration for the notifier.
#[derive(Debug, Clone, Default)]
pub struct NotifierConfig {
    pub message: MessageConfig,
    /// Button attached to full alerts.
    pub button: Option<LinkButton>,
    /// Token whose statistics are shown. `None` uses the token of each event.
    pub token: Option<Address>,
}

/// What happened to a single alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Full alert delivered.
    Sent,
    /// Snapshot failed, reduced alert delivered.
    Fallback,
    /// Delivery failed; nothing was posted.
    Dropped,
}

/// Alert notifier that sends Telegram notifications.
pub struct Notifier {
    data: Arc<dyn TokenDataSource>,
    sink: Arc<dyn AlertSink>,
    config: NotifierConfig,
}

impl Notifier {
    /// Create a new notifier.
    pub fn new(
        data: Arc<dyn TokenDataSource>,
        sink: Arc<dyn AlertSink>,
        config: NotifierConfig,
    ) -> Self {
        Self { data, sink, config }
    }

    /// Build the full alert for `event` from a fresh snapshot.
    pub async fn render(&self, event: &TradeEvent) -> Result<AlertMessage, NotifierError> {
        let token = self.config.token.unwrap_or(event.token);
        let snapshot = self.data.snapshot(token).await?;
        let text = format_trade_alert(&self.config.message, event, &snapshot);
        Ok(AlertMessage::new(text).with_button(self.config.button.clone()))
    }

    /// Post one alert for `event`. Never fails: snapshot errors degrade to
    /// the fallback message and delivery errors are logged and dropped.
    pub async fn dispatch(&self, event: &TradeEvent) -> DispatchOutcome {
        let side = event.side;
        let tx_hash = event.tx_hash;

        let (message, outcome) = match self.render(event).await {
            Ok(message) => (message, DispatchOutcome::Sent),
            Err(e) => {
                error!(%side, %tx_hash, error = %e, "Alert render failed, sending fallback");
                let text = format_fallback(&self.config.message, event);
                (AlertMessage::new(text), DispatchOutcome::Fallback)
            }
        };

        match self.sink.send(&message).await {
            Ok(()) => {
                info!(%side, %tx_hash, block = event.block_number, ?outcome, "Alert sent");
                outcome
            }
            Err(e) => {
                error!(%side, %tx_hash, error = %e, "Failed to send alert");
                DispatchOutcome::Dropped
            }
        }
    }

    /// Announce that monitoring has started.
    pub async fn announce_online(&self) -> Result<(), NotifierError> {
        let message = AlertMessage::new(format_online(&self.config.message));
        self.sink.send(&message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::RecordingSink;
    use trade_alert_chain::MockChain;
    use trade_alert_core::{TokenSnapshot, TradeSide, B256, U256};
    use url::Url;

    fn event() -> TradeEvent {
        TradeEvent {
            side: TradeSide::Buy,
            user: Address::repeat_byte(0x12),
            token: Address::repeat_byte(0x34),
            amount_in: U256::from(1_000_000u64),
            amount_out: U256::ZERO,
            price: U256::ZERO,
            tx_hash: B256::repeat_byte(0x01),
            block_number: 5,
            log_index: 0,
            timestamp: None,
        }
    }

    fn button() -> LinkButton {
        LinkButton {
            text: "Visit".to_string(),
            url: Url::parse("https://example.com").unwrap(),
        }
    }

    fn snapshot() -> TokenSnapshot {
        TokenSnapshot {
            symbol: "STN".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_dispatch_full_alert_with_button() {
        let chain = Arc::new(MockChain::new(10).with_snapshot(snapshot()));
        let sink = Arc::new(RecordingSink::new());
        let config = NotifierConfig {
            button: Some(button()),
            ..Default::default()
        };
        let notifier = Notifier::new(chain.clone(), sink.clone(), config);

        let outcome = notifier.dispatch(&event()).await;
        assert_eq!(outcome, DispatchOutcome::Sent);

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("BUY ALERT"));
        assert_eq!(sent[0].button, Some(button()));
        // no fixed token configured: the event's token is queried
        assert_eq!(chain.snapshot_tokens(), vec![Address::repeat_byte(0x34)]);
    }

    #[tokio::test]
    async fn test_dispatch_uses_fixed_token() {
        let chain = Arc::new(MockChain::new(10).with_snapshot(snapshot()));
        let sink = Arc::new(RecordingSink::new());
        let config = NotifierConfig {
            token: Some(Address::repeat_byte(0x99)),
            ..Default::default()
        };
        let notifier = Notifier::new(chain.clone(), sink, config);

        notifier.dispatch(&event()).await;
        assert_eq!(chain.snapshot_tokens(), vec![Address::repeat_byte(0x99)]);
    }

    #[tokio::test]
    async fn test_dispatch_falls_back_once_on_snapshot_failure() {
        let chain = Arc::new(MockChain::new(10).failing_snapshots());
        let sink = Arc::new(RecordingSink::new());
        let config = NotifierConfig {
            button: Some(button()),
            ..Default::default()
        };
        let notifier = Notifier::new(chain, sink.clone(), config);

        let outcome = notifier.dispatch(&event()).await;
        assert_eq!(outcome, DispatchOutcome::Fallback);

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("BUY DETECTED!"));
        assert!(sent[0].button.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_drops_on_delivery_failure() {
        let chain = Arc::new(MockChain::new(10).with_snapshot(snapshot()));
        let sink = Arc::new(RecordingSink::failing());
        let notifier = Notifier::new(chain, sink.clone(), NotifierConfig::default());

        assert_eq!(notifier.dispatch(&event()).await, DispatchOutcome::Dropped);
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_announce_online() {
        let chain = Arc::new(MockChain::new(10));
        let sink = Arc::new(RecordingSink::new());
        let notifier = Notifier::new(chain, sink.clone(), NotifierConfig::default());

        notifier.announce_online().await.unwrap();
        assert!(sink.sent()[0].text.contains("Monitoring System Online"));
    }

    #[tokio::test]
    async fn test_announce_online_failure_returned_to_caller() {
        let sink = Arc::new(RecordingSink::failing());
        let failing = Notifier::new(
            Arc::new(MockChain::new(10)),
            sink.clone(),
            NotifierConfig::default(),
        );
        assert!(matches!(
            failing.announce_online().await,
            Err(NotifierError::Telegram(_))
        ));
        assert!(sink.sent().is_empty());
    }
}
