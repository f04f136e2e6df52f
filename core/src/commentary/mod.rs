//! AYA commentary handler (`/ai-comment`).
//!
//! Builds a prompt from the posted `{type, data}`, optionally enriched with
//! Bitquery market data, and returns OpenRouter's completion. Once the method
//! and credential checks pass the caller always gets a 200: any failure after
//! that is swapped for a canned line from [`fallback`].

pub mod fallback;
pub mod prompt;

use std::sync::Arc;

use reqwest::{header, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::{ApiRequest, ApiResponse};
use crate::bitquery::types::lenient_f64;
use crate::bitquery::{BitqueryClient, MarketContext};
use crate::config::Config;
use crate::error::Result;
use crate::openrouter::OpenRouterClient;
use prompt::{CommentaryKind, Enrichment};

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const FALLBACK_NOTICE: &str = "Using fallback response";


/// `{type, data}` read loosely: any JSON body is accepted and a missing or
/// non-string `type` simply names no kind.
#[derive(Debug)]
pub struct CommentaryRequest {
    pub kind: Option<String>,
    pub data: Value,
}

impl CommentaryRequest {
    pub fn from_body(body: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(body)?;

        Ok(Self {
            kind: value.get("type").and_then(Value::as_str).map(str::to_string),
            data: value.get("data").cloned().unwrap_or(Value::Null),
        })
    }

    pub fn kind(&self) -> Option<CommentaryKind> {
        self.kind.as_deref().and_then(CommentaryKind::parse)
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryResponse {
    pub message: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_data: Option<MarketContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}


#[derive(Debug, Clone)]
pub struct CommentaryHandler {
    config: Arc<Config>,
    openrouter: Option<OpenRouterClient>,
    bitquery: Option<BitqueryClient>,
}

impl CommentaryHandler {
    pub fn new_w_client(client: reqwest::Client, config: Arc<Config>) -> Self {
        let openrouter = config.openrouter_api_key.clone().map(|key| {
            OpenRouterClient::new_w_client(client.clone(), config.openrouter_url.clone(), key)
        });
        let bitquery = config.bitquery_api_key.clone().map(|key| {
            BitqueryClient::new_w_client(client.clone(), config.bitquery_url.clone(), key)
        });

        Self { config, openrouter, bitquery }
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
        if req.method != Method::POST {
            return ApiResponse::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }

        let Some(openrouter) = &self.openrouter else {
            error!("OPENROUTER_API_KEY is not set");
            return ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR, "OpenRouter API key not configured");
        };

        let request = match CommentaryRequest::from_body(&req.body) {
            Ok(request) => request,
            Err(e) => {
                error!("AI API Error: unreadable body: {}", e);
                return fallback_response(None);
            }
        };

        let kind = request.kind();
        match kind {
            Some(kind) => info!("commentary requested: {}", kind.as_str()),
            None => info!("commentary requested with unknown type {:?}", request.kind),
        }

        let referer = req
            .header_str(header::REFERER)
            .unwrap_or(self.config.default_referer.as_str());

        match self.generate(openrouter, kind, &request.data, referer).await {
            Ok(res) => ApiResponse::json(StatusCode::OK, serde_json::json!(res)),
            Err(e) => {
                error!("AI API Error: {}", e);
                fallback_response(kind)
            }
        }
    }

    async fn generate(
        &self,
        openrouter: &OpenRouterClient,
        kind: Option<CommentaryKind>,
        data: &Value,
        referer: &str,
    ) -> Result<CommentaryResponse> {
        let enrichment = self.enrich(kind, data).await;
        let prompt = prompt::build_prompt(kind, data, &enrichment)?;
        let message = openrouter.complete(&prompt, referer).await?;

        Ok(CommentaryResponse {
            message,
            success: true,
            market_data: enrichment.market,
            error: None,
        })
    }

    /// Bitquery lookups for the prompt. Never fails: a missing key, missing
    /// symbol or upstream error just leaves the enrichment empty.
    async fn enrich(&self, kind: Option<CommentaryKind>, data: &Value) -> Enrichment {
        let Some(bitquery) = &self.bitquery else {
            return Enrichment::default();
        };

        match kind {
            Some(CommentaryKind::TradeReaction | CommentaryKind::MarketAnalysis) => {
                let Some(symbol) = data.get("symbol").and_then(Value::as_str) else {
                    return Enrichment::default();
                };
                let quoted_price = data.get("price").and_then(lenient_f64);

                match bitquery.market_context(symbol, quoted_price).await {
                    Ok(market) => Enrichment { market, trending: None },
                    Err(e) => {
                        warn!("Bitquery API Error: market context for {} skipped: {}", symbol, e);
                        Enrichment::default()
                    }
                }
            }
            Some(CommentaryKind::Random) => match bitquery.trending_tokens().await {
                Ok(trending) => Enrichment { market: None, trending: Some(trending) },
                Err(e) => {
                    warn!("Bitquery API Error: trending tokens skipped: {}", e);
                    Enrichment::default()
                }
            },
            _ => Enrichment::default(),
        }
    }
}

fn fallback_response(kind: Option<CommentaryKind>) -> ApiResponse {
    let res = CommentaryResponse {
        message: fallback::pick(kind).to_string(),
        success: false,
        market_data: None,
        error: Some(FALLBACK_NOTICE.to_string()),
    };

    ApiResponse::json(StatusCode::OK, serde_json::json!(res))
}
