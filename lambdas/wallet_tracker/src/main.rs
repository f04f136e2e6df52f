use std::sync::Arc;

use aya_core::{lambda, Config, WalletTrackerHandler};
use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};

async fn function_handler(handler: &WalletTrackerHandler, event: Request) -> Result<Response<Body>, Error> {
    // query params: action, walletAddress, since
    let req = lambda::to_api_request(event);
    let res = handler.handle(&req).await;

    lambda::to_response(res)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    dotenvy::dotenv().ok();

    let handler = WalletTrackerHandler::new(Arc::new(Config::from_env()));
    let handler = &handler;

    run(service_fn(move |event: Request| async move {
        function_handler(handler, event).await
    }))
    .await
}
