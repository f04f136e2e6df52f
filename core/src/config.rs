//! Process-wide settings, loaded once at startup and handed to each handler.

use std::env;

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const BITQUERY_URL: &str = "https://streaming.bitquery.io/graphql";
pub const DEFAULT_REFERER: &str = "https://your-domain.vercel.app";

#[derive(Debug, Clone)]
pub struct Config {
    /// Required by the commentary handler
    pub openrouter_api_key: Option<String>,
    /// Required by the wallet tracker, optional enrichment for commentary
    pub bitquery_api_key: Option<String>,
    pub openrouter_url: String,
    pub bitquery_url: String,
    /// Sent as `HTTP-Referer` when the caller did not send one
    pub default_referer: String,
}

impl Config {
    pub fn new(openrouter_api_key: Option<String>, bitquery_api_key: Option<String>) -> Self {
        Self {
            openrouter_api_key: openrouter_api_key.filter(|k| !k.trim().is_empty()),
            bitquery_api_key: bitquery_api_key.filter(|k| !k.trim().is_empty()),
            openrouter_url: OPENROUTER_URL.to_string(),
            bitquery_url: BITQUERY_URL.to_string(),
            default_referer: DEFAULT_REFERER.to_string(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Reads:
    /// - OPENROUTER_API_KEY
    /// - BITQUERY_API_KEY
    /// - OPENROUTER_URL, BITQUERY_URL, APP_REFERER (optional overrides)
    ///
    /// Blank keys count as unset.
    pub fn from_env() -> Self {
        let mut config = Self::new(
            env::var("OPENROUTER_API_KEY").ok(),
            env::var("BITQUERY_API_KEY").ok(),
        );

        if let Ok(url) = env::var("OPENROUTER_URL") {
            config.openrouter_url = url;
        }
        if let Ok(url) = env::var("BITQUERY_URL") {
            config.bitquery_url = url;
        }
        if let Ok(referer) = env::var("APP_REFERER") {
            config.default_referer = referer;
        }

        config
    }

    pub fn with_openrouter_url(mut self, url: impl Into<String>) -> Self {
        self.openrouter_url = url.into();
        self
    }

    pub fn with_bitquery_url(mut self, url: impl Into<String>) -> Self {
        self.bitquery_url = url.into();
        self
    }
}
