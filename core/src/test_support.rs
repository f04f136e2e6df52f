//! Throwaway HTTP servers standing in for OpenRouter and Bitquery.

use std::sync::{Arc, Mutex};

use axum::Router;
use serde_json::Value;


/// Bind `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Records what a mock endpoint received.
#[derive(Debug, Clone, Default)]
pub struct HitCounter(Arc<Mutex<Vec<Value>>>);

impl HitCounter {
    pub fn record(&self, call: Value) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}
