//! Local server for the AYA terminal handlers.
//!
//! Mounts both handlers on one router so the front end can be developed
//! against `localhost` instead of the deployed functions.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use aya_core::{ApiRequest, ApiResponse, CommentaryHandler, Config, WalletTrackerHandler};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};


#[derive(Clone)]
pub struct AppState {
    pub commentary: CommentaryHandler,
    pub wallet_tracker: WalletTrackerHandler,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        // one connection pool shared by both handlers
        let client = aya_core::HttpClient::new();

        Self {
            commentary: CommentaryHandler::new_w_client(client.clone(), config.clone()),
            wallet_tracker: WalletTrackerHandler::new_w_client(client, config),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,aya_core=debug,aya_server=debug")),
        )
        .init();

    let config = Config::from_env();
    if config.openrouter_api_key.is_none() {
        warn!("OPENROUTER_API_KEY not set - /ai-comment will answer 500");
    }
    if config.bitquery_api_key.is_none() {
        warn!("BITQUERY_API_KEY not set - /wallet-tracker will answer 500 and commentary runs without market data");
    }

    let app = app(AppState::new(config));

    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Both handlers are mounted with `any` so they do their own method dispatch.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(liveness))
        .route("/ai-comment", any(ai_comment))
        .route("/wallet-tracker", any(wallet_tracker))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> &'static str {
    "OK"
}

async fn ai_comment(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Reply {
    let req = to_api_request(method, headers, query, body);
    state.commentary.handle(&req).await.into()
}

async fn wallet_tracker(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Reply {
    let req = to_api_request(method, headers, query, body);
    state.wallet_tracker.handle(&req).await.into()
}

fn to_api_request(method: Method, headers: HeaderMap, query: HashMap<String, String>, body: Bytes) -> ApiRequest {
    ApiRequest {
        method,
        headers,
        query,
        body: body.to_vec(),
    }
}


pub struct Reply(pub ApiResponse);

impl From<ApiResponse> for Reply {
    fn from(res: ApiResponse) -> Self {
        Reply(res)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let ApiResponse { status, headers, body } = self.0;
        (status, headers, body).into_response()
    }
}
