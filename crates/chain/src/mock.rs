//! In-memory chain for tests.

use crate::contract::TokenDataSource;
use crate::error::{ChainError, ChainResult};
use crate::reader::ChainReader;
use alloy::primitives::Address;
use async_trait::async_trait;
use std::sync::Mutex;
use trade_alert_core::{TokenSnapshot, TradeEvent, TradeSide};

/// Mock chain that serves scripted events and snapshots.
#[derive(Default)]
pub struct MockChain {
    head: Mutex<u64>,
    events: Mutex<Vec<TradeEvent>>,
    snapshot: Mutex<TokenSnapshot>,
    /// Fail `block_number` calls.
    pub fail_head: bool,
    /// Fail event queries for this side.
    pub fail_side: Option<TradeSide>,
    /// Fail snapshot reads.
    pub fail_snapshot: bool,
    queries: Mutex<Vec<(TradeSide, u64, u64)>>,
    snapshot_tokens: Mutex<Vec<Address>>,
}

impl MockChain {
    /// Create a chain at the given height with no events.
    pub fn new(head: u64) -> Self {
        Self {
            head: Mutex::new(head),
            ..Default::default()
        }
    }

    /// Set the snapshot returned for every token.
    pub fn with_snapshot(self, snapshot: TokenSnapshot) -> Self {
        if let Ok(mut lock) = self.snapshot.lock() {
            *lock = snapshot;
        }
        self
    }

    /// Add events.
    pub fn with_events(self, events: impl IntoIterator<Item = TradeEvent>) -> Self {
        if let Ok(mut lock) = self.events.lock() {
            lock.extend(events);
        }
        self
    }

    /// Fail snapshot reads.
    pub fn failing_snapshots(mut self) -> Self {
        self.fail_snapshot = true;
        self
    }

    /// Move the chain head.
    pub fn set_head(&self, head: u64) {
        if let Ok(mut lock) = self.head.lock() {
            *lock = head;
        }
    }

    /// Event queries received so far, as `(side, from, to)`.
    pub fn queries(&self) -> Vec<(TradeSide, u64, u64)> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    /// Tokens passed to `snapshot` so far.
    pub fn snapshot_tokens(&self) -> Vec<Address> {
        self.snapshot_tokens
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

fn poisoned() -> ChainError {
    ChainError::Unavailable("mock state poisoned".to_string())
}

#[async_trait]
impl ChainReader for MockChain {
    async fn block_number(&self) -> ChainResult<u64> {
        if self.fail_head {
            return Err(ChainError::Unavailable("mock head failure".to_string()));
        }
        self.head.lock().map(|h| *h).map_err(|_| poisoned())
    }

    async fn trade_events(
        &self,
        side: TradeSide,
        from_block: u64,
        to_block: u64,
    ) -> ChainResult<Vec<TradeEvent>> {
        if let Ok(mut q) = self.queries.lock() {
            q.push((side, from_block, to_block));
        }
        if self.fail_side == Some(side) {
            return Err(ChainError::Unavailable(format!(
                "mock {} query failure",
                side.event_name()
            )));
        }

        let events = self.events.lock().map_err(|_| poisoned())?;
        let mut matched: Vec<TradeEvent> = events
            .iter()
            .filter(|e| e.side == side && (from_block..=to_block).contains(&e.block_number))
            .cloned()
            .collect();
        matched.sort_by_key(TradeEvent::position);
        Ok(matched)
    }
}

#[async_trait]
impl TokenDataSource for MockChain {
    async fn snapshot(&self, token: Address) -> ChainResult<TokenSnapshot> {
        if let Ok(mut t) = self.snapshot_tokens.lock() {
            t.push(token);
        }
        if self.fail_snapshot {
            return Err(ChainError::Unavailable("mock snapshot failure".to_string()));
        }
        self.snapshot.lock().map(|s| s.clone()).map_err(|_| poisoned())
    }
}
