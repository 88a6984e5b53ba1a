//! Market contract client and token statistics.

use crate::abi::ITradeMarket;
use crate::error::{ChainError, ChainResult};
use alloy::primitives::{Address, Bytes, TxKind};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::transaction::TransactionInput;
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::debug;
use trade_alert_core::TokenSnapshot;

/// Source of fresh token statistics.
#[async_trait]
pub trait TokenDataSource: Send + Sync {
    /// Read full token data and burn data for `token` and merge them.
    ///
    /// Either call failing fails the whole snapshot.
    async fn snapshot(&self, token: Address) -> ChainResult<TokenSnapshot>;
}

/// Read-only client for the market contract.
#[derive(Clone)]
pub struct MarketClient {
    provider: DynProvider,
    contract: Address,
}

impl MarketClient {
    /// Wrap an existing provider.
    pub fn new(provider: DynProvider, contract: Address) -> Self {
        Self { provider, contract }
    }

    /// Connect to the node at `rpc_url` (http, https, ws or wss).
    pub async fn connect(rpc_url: &str, contract: Address) -> ChainResult<Self> {
        let provider = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(|e| ChainError::Connection(e.to_string()))?
            .erased();
        Ok(Self::new(provider, contract))
    }

    /// Market contract address.
    pub fn contract(&self) -> Address {
        self.contract
    }

    pub(crate) fn provider(&self) -> &DynProvider {
        &self.provider
    }

    async fn view(&self, input: Vec<u8>) -> ChainResult<Bytes> {
        let tx = TransactionRequest {
            to: Some(TxKind::Call(self.contract)),
            input: TransactionInput::new(input.into()),
            ..Default::default()
        };
        Ok(self.provider.call(tx).await?)
    }

    async fn token_full_data(
        &self,
        token: Address,
    ) -> ChainResult<ITradeMarket::getTokenFullDataReturn> {
        let call = ITradeMarket::getTokenFullDataCall { token };
        let data = self.view(call.abi_encode()).await?;
        Ok(ITradeMarket::getTokenFullDataCall::abi_decode_returns(&data)?)
    }

    async fn burn_data(&self, token: Address) -> ChainResult<ITradeMarket::getBurnTokenReturn> {
        let call = ITradeMarket::getBurnTokenCall { token };
        let data = self.view(call.abi_encode()).await?;
        Ok(ITradeMarket::getBurnTokenCall::abi_decode_returns(&data)?)
    }
}

#[async_trait]
impl TokenDataSource for MarketClient {
    async fn snapshot(&self, token: Address) -> ChainResult<TokenSnapshot> {
        let full = self.token_full_data(token).await?;
        let burn = self.burn_data(token).await?;
        debug!(%token, symbol = %full.symbol, "token snapshot fetched");
        Ok(merge_snapshot(full, burn))
    }
}

/// Combine the two view-call results.
pub fn merge_snapshot(
    full: ITradeMarket::getTokenFullDataReturn,
    burn: ITradeMarket::getBurnTokenReturn,
) -> TokenSnapshot {
    TokenSnapshot {
        name: full.name,
        symbol: full.symbol,
        price: full.price,
        minted: full.minted,
        burned: burn.burntokens,
        usdt_liquidity: full.usdtLiquidity,
        token_liquidity: full.tokenLiquidity,
        holders: full.uniqueTraders,
        buy_fee_pct: burn.buyuserPer,
        sell_fee_pct: burn.selluserPer,
        active: full.isTActive,
    }
}
