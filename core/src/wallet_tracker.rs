//! Wallet tracker handler (`/wallet-tracker`).
//!
//! `?action=transactions|trending|new-tokens` picks one Bitquery query; the
//! flattened rows come back as `{<key>: [...], success: true}`. Unlike the
//! commentary handler there is no fallback data, failures surface as a 500.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::api::{ApiRequest, ApiResponse};
use crate::bitquery::BitqueryClient;
use crate::config::Config;
use crate::error::Result;

pub const ALLOWED_METHODS: &str = "POST, GET, OPTIONS";


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Transactions,
    Trending,
    NewTokens,
}

impl Action {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "transactions" => Some(Self::Transactions),
            "trending" => Some(Self::Trending),
            "new-tokens" => Some(Self::NewTokens),
            _ => None,
        }
    }
}


#[derive(Debug, Clone)]
pub struct WalletTrackerHandler {
    bitquery: Option<BitqueryClient>,
}

impl WalletTrackerHandler {
    pub fn new_w_client(client: reqwest::Client, config: Arc<Config>) -> Self {
        let bitquery = config.bitquery_api_key.clone().map(|key| {
            BitqueryClient::new_w_client(client, config.bitquery_url.clone(), key)
        });

        Self { bitquery }
    }

    pub fn new(config: Arc<Config>) -> Self {
        Self::new_w_client(reqwest::Client::new(), config)
    }

    pub async fn handle(&self, req: &ApiRequest) -> ApiResponse {
        self.dispatch(req).await.with_cors(ALLOWED_METHODS)
    }

    async fn dispatch(&self, req: &ApiRequest) -> ApiResponse {
        if req.method == Method::OPTIONS {
            return ApiResponse::empty(StatusCode::OK);
        }

        let Some(bitquery) = &self.bitquery else {
            error!("BITQUERY_API_KEY is not set");
            return ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR, "Bitquery API key not configured");
        };

        let Some(action) = req.query_param("action").and_then(Action::parse) else {
            return ApiResponse::error(StatusCode::BAD_REQUEST, "Invalid action");
        };

        info!("wallet tracker action: {:?}", action);

        match run(bitquery, action, req).await {
            Ok(body) => ApiResponse::json(StatusCode::OK, body),
            Err(e) => {
                error!("Bitquery API Error: {}", e);
                ApiResponse::json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Failed to fetch data",
                        "success": false,
                    }),
                )
            }
        }
    }
}

async fn run(bitquery: &BitqueryClient, action: Action, req: &ApiRequest) -> Result<Value> {
    let body = match action {
        Action::Transactions => {
            let trades = bitquery
                .wallet_transactions(req.query_param("walletAddress"), req.query_param("since"))
                .await?;
            json!({ "trades": trades, "success": true })
        }
        Action::Trending => {
            let trending = bitquery.trending_tokens().await?;
            json!({ "trending": trending, "success": true })
        }
        Action::NewTokens => {
            let new_tokens = bitquery.new_tokens().await?;
            json!({ "newTokens": new_tokens, "success": true })
        }
    };

    Ok(body)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve, HitCounter};
    use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
    use reqwest::header;

    fn get(action: &str) -> ApiRequest {
        ApiRequest::new(Method::GET).with_query("action", action)
    }

    /// Bitquery stand-in answering every query with `response`.
    async fn graphql_server(response: Value) -> (String, HitCounter) {
        let hits = HitCounter::default();
        let router = Router::new()
            .route("/graphql", post(move |State(hits): State<HitCounter>, headers: HeaderMap, Json(body): Json<Value>| {
                let response = response.clone();
                async move {
                    hits.record(json!({
                        "auth": headers.get("authorization").and_then(|v| v.to_str().ok()),
                        "query": body["query"],
                        "variables": body["variables"],
                    }));
                    Json(response)
                }
            }))
            .with_state(hits.clone());

        (format!("{}/graphql", serve(router).await), hits)
    }

    fn handler_for(url: String) -> WalletTrackerHandler {
        WalletTrackerHandler::new(Arc::new(Config::new(None, Some("bq-key".to_string())).with_bitquery_url(url)))
    }

    fn trending_row(symbol: &str, price: &str, volume: &str, trades: &str, buyers: &str) -> Value {
        json!({
            "Trade": {
                "Currency": { "Name": symbol.to_lowercase(), "Symbol": symbol, "MintAddress": format!("{symbol}Mint") },
                "PriceInUSD": price
            },
            "volume": volume,
            "trades": trades,
            "buyers": buyers
        })
    }

    #[test]
    fn actions_parse_from_query_values() {
        assert_eq!(Action::parse("transactions"), Some(Action::Transactions));
        assert_eq!(Action::parse("trending"), Some(Action::Trending));
        assert_eq!(Action::parse("new-tokens"), Some(Action::NewTokens));
        assert_eq!(Action::parse("new_tokens"), None);
    }

    #[tokio::test]
    async fn options_is_empty_ok_with_cors() {
        let handler = WalletTrackerHandler::new(Arc::new(Config::new(None, None)));
        let res = handler.handle(&ApiRequest::new(Method::OPTIONS)).await;

        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body.is_empty());
        assert_eq!(res.headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
    }

    #[tokio::test]
    async fn missing_key_is_500() {
        let handler = WalletTrackerHandler::new(Arc::new(Config::new(Some("or".to_string()), None)));
        let res = handler.handle(&get("trending")).await;

        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body_json().unwrap(), json!({ "error": "Bitquery API key not configured" }));
    }

    #[tokio::test]
    async fn bogus_action_is_400() {
        let (url, hits) = graphql_server(json!({})).await;
        let handler = handler_for(url);

        let res = handler.handle(&get("bogus")).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body_json().unwrap(), json!({ "error": "Invalid action" }));

        let res = handler.handle(&ApiRequest::new(Method::GET)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(hits.calls().is_empty());
    }

    #[tokio::test]
    async fn trending_maps_every_row_to_numbers() {
        let rows = vec![
            trending_row("PEPE", "0.0000123", "150000.5", "320", "87"),
            trending_row("WIF", "2.5", "99000", "120", "40"),
            trending_row("BONK", "0.00002", "5000.25", "33", "12"),
        ];
        let (url, hits) = graphql_server(json!({ "data": { "Solana": { "DEXTradeByTokens": rows } } })).await;

        let res = handler_for(url).handle(&get("trending")).await;
        assert_eq!(res.status, StatusCode::OK);

        let body = res.body_json().unwrap();
        assert_eq!(body["success"], true);

        let trending = body["trending"].as_array().unwrap();
        assert_eq!(trending.len(), 3);
        for token in trending {
            assert!(token["price"].is_number());
            assert!(token["volume24h"].is_number());
            assert!(token["trades24h"].is_u64());
            assert!(token["buyers24h"].is_u64());
        }
        assert_eq!(trending[1]["symbol"], "WIF");
        assert_eq!(trending[1]["volume24h"], 99000.0);
        assert_eq!(trending[0]["trades24h"], 320);
        assert_eq!(trending[2]["mintAddress"], "BONKMint");

        let calls = hits.calls();
        assert_eq!(calls[0]["auth"], "Bearer bq-key");
        assert!(calls[0]["query"].as_str().unwrap().contains("TrendingPumpFunTokens"));
        assert!(calls[0]["variables"]["since"].is_string());
    }

    #[tokio::test]
    async fn transactions_forward_wallet_and_since() {
        let response = json!({ "data": { "Solana": { "DEXTradeByTokens": [{
            "Block": { "Time": "2024-05-01T10:00:00Z", "Slot": 264000000 },
            "Trade": {
                "Currency": { "Name": "Dogwifhat", "Symbol": "WIF", "MintAddress": "WifMint" },
                "Side": { "Type": "sell", "Amount": "1000", "AmountInUSD": "2500" },
                "PriceInUSD": "2.5",
                "Market": { "MarketAddress": "Mkt" }
            },
            "Transaction": { "Signature": "sig1", "Fee": "0.000005", "FeeInUSD": "0.001" }
        }] } } });
        let (url, hits) = graphql_server(response).await;

        let req = get("transactions")
            .with_query("walletAddress", "Wallet111")
            .with_query("since", "2024-05-01T00:00:00.000Z");
        let res = handler_for(url).handle(&req).await;

        assert_eq!(res.status, StatusCode::OK);
        let body = res.body_json().unwrap();
        assert_eq!(body["trades"][0]["action"], "sell");
        assert_eq!(body["trades"][0]["total"], 2500.0);
        assert_eq!(body["trades"][0]["signature"], "sig1");

        let variables = &hits.calls()[0]["variables"];
        assert_eq!(variables["address"], "Wallet111");
        assert_eq!(variables["since"], "2024-05-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn transactions_without_wallet_is_500() {
        let (url, hits) = graphql_server(json!({ "data": { "Solana": { "DEXTradeByTokens": [] } } })).await;

        let res = handler_for(url).handle(&get("transactions")).await;

        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body_json().unwrap(), json!({ "error": "Failed to fetch data", "success": false }));
        assert!(hits.calls().is_empty());
    }

    #[tokio::test]
    async fn new_tokens_are_flattened() {
        let response = json!({ "data": { "Solana": { "TokenSupplyUpdates": [{
            "TokenSupplyUpdate": {
                "Currency": {
                    "Name": "Fresh", "Symbol": "FRSH", "MintAddress": "FreshMint",
                    "TokenCreator": { "Address": "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P" }
                },
                "Amount": "1000000000"
            },
            "Block": { "Time": "2024-05-01T11:00:00Z" }
        }] } } });
        let (url, _) = graphql_server(response).await;

        let res = handler_for(url).handle(&get("new-tokens")).await;

        assert_eq!(res.status, StatusCode::OK);
        let body = res.body_json().unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["newTokens"][0]["symbol"], "FRSH");
        assert_eq!(body["newTokens"][0]["launchTime"], "2024-05-01T11:00:00Z");
        assert_eq!(body["newTokens"][0]["totalSupply"], 1_000_000_000.0);
    }

    #[tokio::test]
    async fn graphql_errors_become_500() {
        let (url, _) = graphql_server(json!({
            "data": null,
            "errors": [{ "message": "Unauthorized" }]
        }))
        .await;

        let res = handler_for(url).handle(&get("trending")).await;

        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body_json().unwrap()["success"], false);
    }

    #[tokio::test]
    async fn empty_errors_array_is_not_a_failure() {
        let (url, _) = graphql_server(json!({
            "data": { "Solana": { "DEXTradeByTokens": [trending_row("PEPE", "0.1", "10", "2", "1")] } },
            "errors": []
        }))
        .await;

        let res = handler_for(url).handle(&get("trending")).await;

        assert_eq!(res.status, StatusCode::OK);
        let body = res.body_json().unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["trending"][0]["symbol"], "PEPE");
    }

    #[tokio::test]
    async fn null_metadata_keeps_every_row() {
        let mut anon = trending_row("ANON", "0.5", "40", "4", "3");
        anon["Trade"]["Currency"]["Symbol"] = Value::Null;
        anon["Trade"]["Currency"]["Name"] = Value::Null;
        let rows = vec![anon, trending_row("PEPE", "0.1", "10", "2", "1")];
        let (url, _) = graphql_server(json!({ "data": { "Solana": { "DEXTradeByTokens": rows } } })).await;

        let res = handler_for(url).handle(&get("trending")).await;

        assert_eq!(res.status, StatusCode::OK);
        let trending = res.body_json().unwrap()["trending"].clone();
        assert_eq!(trending.as_array().unwrap().len(), 2);
        assert_eq!(trending[0]["symbol"], Value::Null);
        assert_eq!(trending[0]["name"], Value::Null);
        assert_eq!(trending[0]["mintAddress"], "ANONMint");
        assert_eq!(trending[1]["symbol"], "PEPE");
    }

    #[tokio::test]
    async fn null_side_type_keeps_the_trade() {
        let response = json!({ "data": { "Solana": { "DEXTradeByTokens": [{
            "Block": { "Time": "2024-05-01T10:00:00Z" },
            "Trade": {
                "Currency": { "Name": null, "Symbol": "WIF", "MintAddress": "WifMint" },
                "Side": { "Type": null, "Amount": "1", "AmountInUSD": "2.5" },
                "PriceInUSD": "2.5"
            },
            "Transaction": { "Signature": "sig1" }
        }] } } });
        let (url, _) = graphql_server(response).await;

        let res = handler_for(url).handle(&get("transactions").with_query("walletAddress", "Wallet111")).await;

        assert_eq!(res.status, StatusCode::OK);
        let body = res.body_json().unwrap();
        let trade = &body["trades"][0];
        assert_eq!(trade["action"], Value::Null);
        assert_eq!(trade["symbol"], "WIF");
        assert_eq!(trade["total"], 2.5);
    }

    #[tokio::test]
    async fn unreachable_upstream_becomes_500() {
        let res = handler_for("http://127.0.0.1:9/graphql".to_string()).handle(&get("new-tokens")).await;

        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body_json().unwrap()["error"], "Failed to fetch data");
    }
}
