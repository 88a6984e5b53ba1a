//! Block height and trade event queries.

use crate::abi::ITradeMarket;
use crate::contract::MarketClient;
use crate::error::{ChainError, ChainResult};
use alloy::providers::Provider;
use alloy::rpc::types::eth::Filter;
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use tracing::debug;
use trade_alert_core::{timestamp_from_secs, TradeEvent, TradeSide};

/// Read-only view of the chain used by the poll loop.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Current block height.
    async fn block_number(&self) -> ChainResult<u64>;

    /// Trade events of one side in `from_block..=to_block`, ascending by
    /// block then log index.
    async fn trade_events(
        &self,
        side: TradeSide,
        from_block: u64,
        to_block: u64,
    ) -> ChainResult<Vec<TradeEvent>>;
}

#[async_trait]
impl ChainReader for MarketClient {
    async fn block_number(&self) -> ChainResult<u64> {
        Ok(self.provider().get_block_number().await?)
    }

    async fn trade_events(
        &self,
        side: TradeSide,
        from_block: u64,
        to_block: u64,
    ) -> ChainResult<Vec<TradeEvent>> {
        if from_block > to_block {
            return Err(ChainError::InvalidRange {
                from: from_block,
                to: to_block,
            });
        }

        let signature = match side {
            TradeSide::Buy => ITradeMarket::Bought::SIGNATURE_HASH,
            TradeSide::Sell => ITradeMarket::Sold::SIGNATURE_HASH,
        };
        let filter = Filter::new()
            .address(self.contract())
            .event_signature(signature)
            .from_block(from_block)
            .to_block(to_block);

        let logs = self.provider().get_logs(&filter).await?;
        debug!(
            event = side.event_name(),
            from_block,
            to_block,
            count = logs.len(),
            "logs fetched"
        );

        let mut events = logs
            .iter()
            .map(|log| decode_trade_log(side, log))
            .collect::<ChainResult<Vec<_>>>()?;
        events.sort_by_key(TradeEvent::position);
        Ok(events)
    }
}

/// Decode a raw `Bought`/`Sold` log into a [`TradeEvent`].
pub fn decode_trade_log(side: TradeSide, log: &Log) -> ChainResult<TradeEvent> {
    let tx_hash = log.transaction_hash.unwrap_or_default();
    let block_number = log.block_number.unwrap_or_default();
    let log_index = log.log_index.unwrap_or_default();

    let event = match side {
        TradeSide::Buy => {
            let ev = log.log_decode::<ITradeMarket::Bought>()?.inner.data;
            TradeEvent {
                side,
                user: ev.user,
                token: ev.token,
                amount_in: ev.usdtIn,
                amount_out: ev.tokenOut,
                price: ev.price,
                tx_hash,
                block_number,
                log_index,
                timestamp: timestamp_from_secs(ev.tdate),
            }
        }
        TradeSide::Sell => {
            let ev = log.log_decode::<ITradeMarket::Sold>()?.inner.data;
            TradeEvent {
                side,
                user: ev.user,
                token: ev.token,
                amount_in: ev.tokenIn,
                amount_out: ev.usdtOut,
                price: ev.price,
                tx_hash,
                block_number,
                log_index,
                timestamp: timestamp_from_secs(ev.tdate),
            }
        }
    };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, B256, U256};
    use alloy::providers::ProviderBuilder;
    use alloy::transports::mock::Asserter;

    fn mocked_client(asserter: &Asserter) -> MarketClient {
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter.clone())
            .erased();
        MarketClient::new(provider, Address::repeat_byte(0xAA))
    }

    fn bought(user: u8) -> ITradeMarket::Bought {
        ITradeMarket::Bought {
            tdate: U256::ZERO,
            user: Address::repeat_byte(user),
            token: Address::repeat_byte(0x34),
            usdtIn: U256::from(1_000_000u64),
            tokenOut: U256::from(1u64),
            price: U256::ZERO,
        }
    }

    fn raw_log<E: SolEvent>(event: &E, block: u64, index: u64) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0xAA),
                data: event.encode_log_data(),
            },
            block_number: Some(block),
            log_index: Some(index),
            transaction_hash: Some(B256::repeat_byte(0x01)),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_bought_log() {
        let ev = ITradeMarket::Bought {
            tdate: U256::from(1_700_000_000u64),
            user: Address::repeat_byte(0x12),
            token: Address::repeat_byte(0x34),
            usdtIn: U256::from(25_000_000u64),
            tokenOut: U256::from(10u64),
            price: U256::from(7u64),
        };
        let decoded = decode_trade_log(TradeSide::Buy, &raw_log(&ev, 101, 2)).unwrap();

        assert_eq!(decoded.side, TradeSide::Buy);
        assert_eq!(decoded.user, Address::repeat_byte(0x12));
        assert_eq!(decoded.token, Address::repeat_byte(0x34));
        assert_eq!(decoded.stable_amount(), U256::from(25_000_000u64));
        assert_eq!(decoded.token_amount(), U256::from(10u64));
        assert_eq!(decoded.position(), (101, 2));
        assert_eq!(decoded.tx_hash, B256::repeat_byte(0x01));
        assert_eq!(decoded.timestamp.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_decode_sold_log_maps_amounts() {
        let ev = ITradeMarket::Sold {
            tdate: U256::ZERO,
            user: Address::repeat_byte(0x12),
            token: Address::repeat_byte(0x34),
            tokenIn: U256::from(99u64),
            usdtOut: U256::from(3_000_000u64),
            price: U256::ZERO,
        };
        let decoded = decode_trade_log(TradeSide::Sell, &raw_log(&ev, 7, 0)).unwrap();

        assert_eq!(decoded.amount_in, U256::from(99u64));
        assert_eq!(decoded.stable_amount(), U256::from(3_000_000u64));
        assert!(decoded.timestamp.is_none());
    }

    #[test]
    fn test_decode_wrong_side_fails() {
        let ev = ITradeMarket::Sold {
            tdate: U256::ZERO,
            user: Address::ZERO,
            token: Address::ZERO,
            tokenIn: U256::ZERO,
            usdtOut: U256::ZERO,
            price: U256::ZERO,
        };
        let result = decode_trade_log(TradeSide::Buy, &raw_log(&ev, 1, 0));
        assert!(matches!(result, Err(ChainError::Decode(_))));
    }

    #[tokio::test]
    async fn test_trade_events_sorted_by_position() {
        let asserter = Asserter::new();
        let client = mocked_client(&asserter);
        asserter.push_success(&vec![
            raw_log(&bought(0x01), 103, 0),
            raw_log(&bought(0x02), 101, 2),
            raw_log(&bought(0x03), 101, 1),
        ]);

        let events = client.trade_events(TradeSide::Buy, 101, 103).await.unwrap();
        let positions: Vec<_> = events.iter().map(TradeEvent::position).collect();
        assert_eq!(positions, vec![(101, 1), (101, 2), (103, 0)]);
        assert_eq!(events[0].user, Address::repeat_byte(0x03));
        assert!(asserter.read_q().is_empty());
    }

    #[tokio::test]
    async fn test_trade_events_rejects_inverted_range() {
        let asserter = Asserter::new();
        let client = mocked_client(&asserter);

        let result = client.trade_events(TradeSide::Sell, 10, 9).await;
        assert!(matches!(
            result,
            Err(ChainError::InvalidRange { from: 10, to: 9 })
        ));
    }

    #[tokio::test]
    async fn test_trade_events_rpc_failure() {
        let asserter = Asserter::new();
        let client = mocked_client(&asserter);
        asserter.push_failure_msg("query returned more than 10000 results");

        let result = client.trade_events(TradeSide::Buy, 1, 2).await;
        assert!(matches!(result, Err(ChainError::Rpc(_))));
    }

    #[tokio::test]
    async fn test_block_number() {
        let asserter = Asserter::new();
        let client = mocked_client(&asserter);
        asserter.push_success(&U256::from(12_345u64));

        assert_eq!(client.block_number().await.unwrap(), 12_345);
    }
}
