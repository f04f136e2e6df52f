//! Bitquery GraphQL client for Solana pump.fun data.

pub mod queries;
pub mod types;

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use types::{
    DexTrades, GraphQlResponse, MarketContextRow, SolanaData, SupplyUpdates, TrendingRow,
    WalletTradeRow,
};
pub use types::{MarketContext, NewToken, TrendingToken, WalletTrade};


#[derive(Debug, Clone)]
pub struct BitqueryClient {
    client: reqwest::Client,
    url: Arc<String>,
    api_key: Arc<String>,
}

impl BitqueryClient {
    pub fn new_w_client(client: reqwest::Client, url: String, api_key: String) -> Self {
        Self {
            client,
            url: Arc::new(url),
            api_key: Arc::new(api_key),
        }
    }

    /// POST one document and return its `data`, failing on a non-2xx status
    /// or a non-empty `errors` array.
    async fn query<T: DeserializeOwned>(&self, operation: &str, document: &str, variables: Value) -> Result<T> {
        debug!("[Bitquery] {} with {}", operation, variables);

        let res = self.client.post(self.url.as_str())
            .bearer_auth(self.api_key.as_str())
            .json(&json!({
                "query": document,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus { service: "Bitquery", status });
        }

        let body: GraphQlResponse<Value> = res.json().await?;

        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            return Err(Error::GraphQl(Value::Array(errors).to_string()));
        }

        let data = body.data.ok_or(Error::MissingData)?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn wallet_transactions(&self, address: Option<&str>, since: Option<&str>) -> Result<Vec<WalletTrade>> {
        let address = address
            .filter(|a| !a.is_empty())
            .ok_or(Error::MissingParameter("walletAddress"))?;

        let vars = queries::wallet_transactions_vars(address, since, Utc::now());
        let data: SolanaData<DexTrades<WalletTradeRow>> =
            self.query("WalletTransactions", queries::WALLET_TRANSACTIONS, vars).await?;

        Ok(data.solana.rows.into_iter().map(WalletTrade::from).collect())
    }

    pub async fn trending_tokens(&self) -> Result<Vec<TrendingToken>> {
        let vars = queries::lookback_vars(Utc::now());
        let data: SolanaData<DexTrades<TrendingRow>> =
            self.query("TrendingPumpFunTokens", queries::TRENDING_TOKENS, vars).await?;

        Ok(data.solana.rows.into_iter().map(TrendingToken::from).collect())
    }

    pub async fn new_tokens(&self) -> Result<Vec<NewToken>> {
        let vars = queries::lookback_vars(Utc::now());
        let data: SolanaData<SupplyUpdates> =
            self.query("NewPumpFunTokens", queries::NEW_TOKENS, vars).await?;

        Ok(data.solana.rows.into_iter().map(NewToken::from).collect())
    }

    /// 24h volume and price move for the busiest market trading `symbol`.
    /// `Ok(None)` when nothing traded in the window.
    pub async fn market_context(&self, symbol: &str, quoted_price: Option<f64>) -> Result<Option<MarketContext>> {
        let vars = queries::market_context_vars(symbol, Utc::now());
        let data: SolanaData<DexTrades<MarketContextRow>> =
            self.query("MarketContext", queries::MARKET_CONTEXT, vars).await?;

        Ok(data.solana.rows.into_iter().next().map(|row| MarketContext::from_row(row, quoted_price)))
    }
}
