//! Block polling loop.
//!
//! Each tick reads the chain head, scans `(watermark, head]` for buys and
//! then sells, dispatches one alert per event and only then advances the
//! watermark. A failed tick leaves the watermark where it was so the next
//! tick retries the same (possibly wider) range.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};
use trade_alert_alerts::Notifier;
use trade_alert_chain::{ChainReader, ChainResult};
use trade_alert_core::TradeSide;

/// Mutable state owned by the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollState {
    /// Last block height fully scanned.
    pub watermark: u64,
}

impl PollState {
    /// Start `back_scan` blocks below `head` so events near the boundary
    /// are not missed.
    pub fn starting_at(head: u64, back_scan: u64) -> Self {
        Self {
            watermark: head.saturating_sub(back_scan),
        }
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Head has not moved past the watermark.
    Idle { head: u64 },
    /// Blocks `from..=to` were scanned.
    Scanned { from: u64, to: u64, alerts: usize },
}

pub struct Poller {
    chain: Arc<dyn ChainReader>,
    notifier: Notifier,
    state: PollState,
}

impl Poller {
    pub fn new(chain: Arc<dyn ChainReader>, notifier: Notifier, state: PollState) -> Self {
        Self {
            chain,
            notifier,
            state,
        }
    }

    /// Run one scan cycle.
    pub async fn tick(&mut self) -> ChainResult<TickOutcome> {
        let head = self.chain.block_number().await?;
        if head <= self.state.watermark {
            return Ok(TickOutcome::Idle { head });
        }

        let from = self.state.watermark + 1;
        info!(from, to = head, "🔎 Scanning blocks");

        let mut alerts = 0;
        for side in TradeSide::ALL {
            let events = self.chain.trade_events(side, from, head).await?;
            for event in &events {
                self.notifier.dispatch(event).await;
            }
            alerts += events.len();
        }

        self.state.watermark = head;
        Ok(TickOutcome::Scanned {
            from,
            to: head,
            alerts,
        })
    }

    /// Tick every `period` until `shutdown` resolves. Tick errors are logged
    /// and never end the loop.
    pub async fn run<F>(mut self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // first tick fires immediately; the first scan waits one period
        interval.tick().await;

        tokio::pin!(shutdown);
        info!(period_secs = period.as_secs(), "Poll loop started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(TickOutcome::Scanned { from, to, alerts }) => {
                            debug!(from, to, alerts, "Tick complete");
                        }
                        Ok(TickOutcome::Idle { head }) => {
                            debug!(head, watermark = self.state.watermark, "No new blocks");
                        }
                        Err(e) => {
                            error!(watermark = self.state.watermark, error = %e, "❌ Poll tick failed");
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!(watermark = self.state.watermark, "Poll loop stopped");
                    break;
                }
            }
        }
    }
}
