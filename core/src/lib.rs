//! Shared core of the AYA terminal backends: the commentary handler, the
//! wallet tracker, and the OpenRouter/Bitquery clients behind them.

pub mod api;
pub mod bitquery;
pub mod commentary;
pub mod config;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod openrouter;
pub mod wallet_tracker;

#[cfg(test)]
mod test_support;

pub use api::{ApiRequest, ApiResponse};
pub use commentary::CommentaryHandler;
pub use config::Config;
pub use error::{Error, Result};
pub use wallet_tracker::WalletTrackerHandler;

pub use reqwest::Client as HttpClient;
