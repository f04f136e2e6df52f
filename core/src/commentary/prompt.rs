//! Prompt text for each commentary kind.
//!
//! Length targets and style examples live in the instruction text itself;
//! nothing here enforces them on the model's output.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::bitquery::{MarketContext, TrendingToken};
use crate::error::Result;

const PERSONA: &str = "You are AYA, an AI trader.";
/// Trending tokens quoted in a random comment
const TRENDING_SAMPLE: usize = 3;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentaryKind {
    Random,
    TradeReaction,
    MarketAnalysis,
    MissedOpportunity,
    NewTokenAnalysis,
}

impl CommentaryKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "random" => Some(Self::Random),
            "trade_reaction" => Some(Self::TradeReaction),
            "market_analysis" => Some(Self::MarketAnalysis),
            "missed_opportunity" => Some(Self::MissedOpportunity),
            "new_token_analysis" => Some(Self::NewTokenAnalysis),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::TradeReaction => "trade_reaction",
            Self::MarketAnalysis => "market_analysis",
            Self::MissedOpportunity => "missed_opportunity",
            Self::NewTokenAnalysis => "new_token_analysis",
        }
    }
}


#[derive(Deserialize, Debug)]
pub struct TradePayload {
    pub action: Value,
    pub symbol: Value,
    pub amount: Value,
    pub price: Value,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPayload {
    pub portfolio: Value,
    pub recent_trades: Value,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MissedPayload {
    pub symbol: Value,
    pub price_change: Value,
    pub reason: Value,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewTokenPayload {
    pub symbol: Value,
    pub market_cap: Value,
    pub holders: Value,
}

/// Data fetched from Bitquery before the prompt is built. Either half may be absent.
#[derive(Debug, Default, Clone)]
pub struct Enrichment {
    pub market: Option<MarketContext>,
    pub trending: Option<Vec<TrendingToken>>,
}


/// Strings go in bare, everything else as compact JSON
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn market_sentence(context: Option<&MarketContext>) -> Result<String> {
    match context {
        Some(context) => Ok(format!(" Market data: {}", serde_json::to_string(context)?)),
        None => Ok(String::new()),
    }
}

/// Build the prompt for `kind` from the request's `data`.
///
/// A missing or unknown kind yields an empty prompt. Missing payload fields are an error.
pub fn build_prompt(kind: Option<CommentaryKind>, data: &Value, enrichment: &Enrichment) -> Result<String> {
    let Some(kind) = kind else {
        return Ok(String::new());
    };

    match kind {
        CommentaryKind::Random => random(enrichment.trending.as_deref()),
        CommentaryKind::TradeReaction => {
            trade_reaction(&TradePayload::deserialize(data)?, enrichment.market.as_ref())
        }
        CommentaryKind::MarketAnalysis => {
            market_analysis(&PortfolioPayload::deserialize(data)?, enrichment.market.as_ref())
        }
        CommentaryKind::MissedOpportunity => Ok(missed_opportunity(&MissedPayload::deserialize(data)?)),
        CommentaryKind::NewTokenAnalysis => Ok(new_token_analysis(&NewTokenPayload::deserialize(data)?)),
    }
}

pub fn random(trending: Option<&[TrendingToken]>) -> Result<String> {
    match trending.filter(|t| !t.is_empty()) {
        Some(tokens) => {
            let sample: Vec<Value> = tokens
                .iter()
                .take(TRENDING_SAMPLE)
                .map(|t| json!({ "symbol": t.symbol, "price": t.price, "volume24h": t.volume_24h }))
                .collect();

            Ok(format!(
                "{PERSONA} Generate a random market comment. Current trending tokens: {} \
                 Speak in first person as if you're actively trading. Keep under 80 characters. \
                 Be witty and confident. Examples: \"Just spotted $PEPE pumping 200% - too late to enter 📈\", \
                 \"My algorithms are screaming BUY on $WIF 🚀\"",
                serde_json::to_string(&sample)?
            ))
        }
        None => Ok(format!(
            "{PERSONA} Generate a short, witty comment about crypto markets. \
             Speak in first person as if you're actively trading. Keep under 60 characters. \
             Examples: \"Scanning for the next 100x gem 🔍\", \"My neural networks are buzzing 🧠\""
        )),
    }
}

pub fn trade_reaction(payload: &TradePayload, context: Option<&MarketContext>) -> Result<String> {
    let verb = if payload.action.as_str() == Some("buy") { "bought" } else { "sold" };

    Ok(format!(
        "{PERSONA} I just {verb} {} {} at {}.{} React as if YOU made this trade decision. \
         Explain your reasoning briefly and confidently in first person. Keep under 100 characters. \
         Examples: \"Perfect timing on my $PEPE buy - detected whale accumulation 🐋\", \
         \"Took profits on $SOL before the resistance test 💰\"",
        text(&payload.amount),
        text(&payload.symbol),
        text(&payload.price),
        market_sentence(context)?,
    ))
}

pub fn market_analysis(payload: &PortfolioPayload, context: Option<&MarketContext>) -> Result<String> {
    Ok(format!(
        "{PERSONA} Based on portfolio: {} and recent trades: {},{} give a brief market insight \
         as if you're actively managing this portfolio. Speak in first person. Keep under 120 characters.",
        serde_json::to_string(&payload.portfolio)?,
        serde_json::to_string(&payload.recent_trades)?,
        market_sentence(context)?,
    ))
}

pub fn missed_opportunity(payload: &MissedPayload) -> String {
    format!(
        "{PERSONA} {} just pumped {}% but I didn't buy because {}. \
         React with slight regret but explain your reasoning. First person. Under 100 characters. \
         Example: \"Missed $BONK's 400% run - was too cautious about the low liquidity 😅\"",
        text(&payload.symbol),
        text(&payload.price_change),
        text(&payload.reason),
    )
}

pub fn new_token_analysis(payload: &NewTokenPayload) -> String {
    format!(
        "{PERSONA} New token {} launched with {} market cap and {} holders. \
         Analyze if I should buy or pass. First person decision. Under 100 characters. \
         Example: \"Passing on $NEWCOIN - team is anon and liquidity looks thin 🚫\"",
        text(&payload.symbol),
        text(&payload.market_cap),
        text(&payload.holders),
    )
}


#[cfg(test)]
mod tests {
    use super::*;

    fn token(symbol: &str) -> TrendingToken {
        TrendingToken {
            symbol: Some(symbol.to_string()),
            name: Some(symbol.to_lowercase()),
            price: Some(0.5),
            volume_24h: Some(1000.0),
            trades_24h: Some(10),
            buyers_24h: Some(4),
            mint_address: Some(format!("{symbol}Mint")),
        }
    }

    #[test]
    fn kinds_round_trip_through_their_wire_names() {
        for kind in [
            CommentaryKind::Random,
            CommentaryKind::TradeReaction,
            CommentaryKind::MarketAnalysis,
            CommentaryKind::MissedOpportunity,
            CommentaryKind::NewTokenAnalysis,
        ] {
            assert_eq!(CommentaryKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(CommentaryKind::parse("moon_prediction"), None);
    }

    #[test]
    fn unknown_kind_builds_empty_prompt() {
        let prompt = build_prompt(None, &json!({ "symbol": "SOL" }), &Enrichment::default()).unwrap();
        assert!(prompt.is_empty());
    }

    #[test]
    fn random_without_trending_uses_short_target() {
        let prompt = random(None).unwrap();
        assert!(prompt.contains("Keep under 60 characters"));
        assert!(!prompt.contains("trending"));

        let empty: Vec<TrendingToken> = Vec::new();
        let prompt = random(Some(empty.as_slice())).unwrap();
        assert!(prompt.contains("Keep under 60 characters"));
    }

    #[test]
    fn random_with_trending_quotes_top_three() {
        let tokens = vec![token("PEPE"), token("WIF"), token("BONK"), token("MYRO")];
        let prompt = random(Some(tokens.as_slice())).unwrap();

        assert!(prompt.contains("Keep under 80 characters"));
        assert!(prompt.contains(r#""symbol":"BONK""#));
        assert!(!prompt.contains("MYRO"));
    }

    #[test]
    fn trade_reaction_reads_action_and_context() {
        let data = json!({ "action": "buy", "symbol": "SOL", "amount": 12.5, "price": "142.10" });
        let context = MarketContext { price: Some(142.1), volume_24h: Some(9000.0), price_change_24h: Some(-3.5) };
        let enrichment = Enrichment { market: Some(context), trending: None };

        let prompt = build_prompt(Some(CommentaryKind::TradeReaction), &data, &enrichment).unwrap();
        assert!(prompt.contains("I just bought 12.5 SOL at 142.10."));
        assert!(prompt.contains(r#"Market data: {"price":142.1,"volume24h":9000.0,"priceChange24h":-3.5}"#));
        assert!(prompt.contains("Keep under 100 characters"));

        let data = json!({ "action": "sell", "symbol": "SOL", "amount": 1, "price": 150 });
        let prompt = build_prompt(Some(CommentaryKind::TradeReaction), &data, &Enrichment::default()).unwrap();
        assert!(prompt.contains("I just sold 1 SOL at 150. React"));
    }

    #[test]
    fn market_analysis_embeds_portfolio_json() {
        let data = json!({
            "portfolio": { "SOL": 10 },
            "recentTrades": [{ "symbol": "WIF", "action": "buy" }]
        });

        let prompt = build_prompt(Some(CommentaryKind::MarketAnalysis), &data, &Enrichment::default()).unwrap();
        assert!(prompt.contains(r#"portfolio: {"SOL":10}"#));
        assert!(prompt.contains(r#"recent trades: [{"action":"buy","symbol":"WIF"}]"#));
        assert!(prompt.contains("Keep under 120 characters"));
    }

    #[test]
    fn missed_and_new_token_prompts_interpolate_fields() {
        let data = json!({ "symbol": "BONK", "priceChange": 400, "reason": "liquidity was thin" });
        let prompt = build_prompt(Some(CommentaryKind::MissedOpportunity), &data, &Enrichment::default()).unwrap();
        assert!(prompt.contains("BONK just pumped 400% but I didn't buy because liquidity was thin."));

        let data = json!({ "symbol": "NEWCOIN", "marketCap": "$40K", "holders": 120 });
        let prompt = build_prompt(Some(CommentaryKind::NewTokenAnalysis), &data, &Enrichment::default()).unwrap();
        assert!(prompt.contains("New token NEWCOIN launched with $40K market cap and 120 holders."));
    }

    #[test]
    fn missing_payload_field_is_an_error() {
        let data = json!({ "action": "buy", "symbol": "SOL" });
        assert!(build_prompt(Some(CommentaryKind::TradeReaction), &data, &Enrichment::default()).is_err());

        assert!(build_prompt(Some(CommentaryKind::NewTokenAnalysis), &Value::Null, &Enrichment::default()).is_err());
    }
}
