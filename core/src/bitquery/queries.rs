//! GraphQL documents sent to Bitquery. Documents are static; only the
//! variables change per request.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{json, Value};

// Literal form of the creator address so it can be spliced into documents with `concat!`.
macro_rules! pump_fun_token_creator {
    () => {
        "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P"
    };
}

/// pump.fun program address; every launch on the platform is created by it
pub const PUMP_FUN_TOKEN_CREATOR: &str = pump_fun_token_creator!();

pub const LOOKBACK_HOURS: i64 = 24;

pub const WALLET_TRANSACTIONS: &str = r#"
query WalletTransactions($address: String!, $since: DateTime!) {
  Solana {
    DEXTradeByTokens(
      where: {
        Transaction: {Signer: {is: $address}}
        Trade: {Dex: {ProtocolName: {is: "pump"}}}
        Block: {Time: {since: $since}}
      }
      orderBy: {descending: Block_Time}
      limit: {count: 50}
    ) {
      Block {
        Time
        Slot
      }
      Trade {
        Currency {
          Name
          Symbol
          MintAddress
        }
        Side {
          Type
          Amount
          AmountInUSD
        }
        PriceInUSD
        Market {
          MarketAddress
        }
      }
      Transaction {
        Signature
        Fee
        FeeInUSD
      }
    }
  }
}
"#;

pub const TRENDING_TOKENS: &str = r#"
query TrendingPumpFunTokens($since: DateTime!) {
  Solana {
    DEXTradeByTokens(
      where: {
        Trade: {Dex: {ProtocolName: {is: "pump"}}}
        Block: {Time: {since: $since}}
      }
      orderBy: {descendingByField: "volume"}
      limit: {count: 20}
    ) {
      Trade {
        Currency {
          Name
          Symbol
          MintAddress
        }
        PriceInUSD(maximum: Block_Time)
      }
      volume: sum(of: Trade_Side_AmountInUSD)
      trades: count
      buyers: uniq(of: Transaction_Signer, if: {Trade: {Side: {Type: {is: buy}}}})
    }
  }
}
"#;

// The creator address is inlined rather than passed as a variable.
pub const NEW_TOKENS: &str = concat!(r#"
query NewPumpFunTokens($since: DateTime!) {
  Solana {
    TokenSupplyUpdates(
      where: {
        TokenSupplyUpdate: {
          Currency: {TokenCreator: {Address: {includes: {is: ""#, pump_fun_token_creator!(), r#""}}}}
          Amount: {gt: "0"}
        }
        Block: {Time: {since: $since}}
      }
      orderBy: {descending: Block_Time}
      limit: {count: 50}
    ) {
      TokenSupplyUpdate {
        Currency {
          Name
          Symbol
          MintAddress
          TokenCreator {
            Address
          }
        }
        Amount
      }
      Block {
        Time
      }
    }
  }
}
"#);

pub const MARKET_CONTEXT: &str = r#"
query MarketContext($symbol: String!, $since: DateTime!) {
  Solana {
    DEXTradeByTokens(
      where: {
        Trade: {Currency: {Symbol: {is: $symbol}}, Dex: {ProtocolName: {is: "pump"}}}
        Block: {Time: {since: $since}}
      }
      orderBy: {descendingByField: "volume"}
      limit: {count: 1}
    ) {
      Trade {
        latest: PriceInUSD(maximum: Block_Time)
        earliest: PriceInUSD(minimum: Block_Time)
      }
      volume: sum(of: Trade_Side_AmountInUSD)
    }
  }
}
"#;


/// ISO-8601 timestamp `LOOKBACK_HOURS` before `now`, millisecond precision
pub fn default_since(now: DateTime<Utc>) -> String {
    (now - Duration::hours(LOOKBACK_HOURS)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn wallet_transactions_vars(address: &str, since: Option<&str>, now: DateTime<Utc>) -> Value {
    let since = match since {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default_since(now),
    };

    json!({
        "address": address,
        "since": since,
    })
}

pub fn lookback_vars(now: DateTime<Utc>) -> Value {
    json!({ "since": default_since(now) })
}

pub fn market_context_vars(symbol: &str, now: DateTime<Utc>) -> Value {
    json!({
        "symbol": symbol,
        "since": default_since(now),
    })
}
