use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;


/// Parse an upstream number that may arrive as a string or a JSON number.
/// Anything unparseable becomes `None`, which serialises as `null`.
pub fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Integer counterpart of [`lenient_f64`]; fractional input is truncated.
pub fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.trunc() as u64))
        }
        _ => None,
    }
}

fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(&Value::deserialize(deserializer)?))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u64(&Value::deserialize(deserializer)?))
}

/// An explicit `null` object reads the same as a missing one.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}


// Flattened shapes returned to the front end

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletTrade {
    pub timestamp: Option<String>,
    pub action: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub price: Option<f64>,
    pub total: Option<f64>,
    pub signature: Option<String>,
    pub mint_address: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendingToken {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "volume24h")]
    pub volume_24h: Option<f64>,
    #[serde(rename = "trades24h")]
    pub trades_24h: Option<u64>,
    #[serde(rename = "buyers24h")]
    pub buyers_24h: Option<u64>,
    pub mint_address: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewToken {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub mint_address: Option<String>,
    pub launch_time: Option<String>,
    pub total_supply: Option<f64>,
    pub creator: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MarketContext {
    pub price: Option<f64>,
    #[serde(rename = "volume24h")]
    pub volume_24h: Option<f64>,
    #[serde(rename = "priceChange24h")]
    pub price_change_24h: Option<f64>,
}


// Raw GraphQL payloads. pump.fun metadata is often null, so every string
// is optional and a null nested object reads as an empty one.

#[derive(Deserialize, Debug)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SolanaData<T> {
    #[serde(rename = "Solana")]
    pub solana: T,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DexTrades<T> {
    #[serde(rename = "DEXTradeByTokens")]
    pub rows: Vec<T>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SupplyUpdates {
    #[serde(rename = "TokenSupplyUpdates")]
    pub rows: Vec<SupplyUpdateRow>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct Currency {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub mint_address: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct BlockTime {
    pub time: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WalletTradeRow {
    #[serde(default, deserialize_with = "or_default")]
    pub block: BlockTime,
    pub trade: WalletTradeDetails,
    #[serde(default, deserialize_with = "or_default")]
    pub transaction: Transaction,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WalletTradeDetails {
    #[serde(default, deserialize_with = "or_default")]
    pub currency: Currency,
    #[serde(default, deserialize_with = "or_default")]
    pub side: Side,
    #[serde(rename = "PriceInUSD", default, deserialize_with = "lenient")]
    pub price_in_usd: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Side {
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<f64>,
    #[serde(rename = "AmountInUSD", default, deserialize_with = "lenient")]
    pub amount_in_usd: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct Transaction {
    pub signature: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct TrendingRow {
    #[serde(rename = "Trade")]
    pub trade: PricedCurrency,
    #[serde(default, deserialize_with = "lenient")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub trades: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub buyers: Option<u64>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct PricedCurrency {
    #[serde(rename = "Currency", default, deserialize_with = "or_default")]
    pub currency: Currency,
    #[serde(rename = "PriceInUSD", default, deserialize_with = "lenient")]
    pub price_in_usd: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct MarketContextRow {
    #[serde(rename = "Trade")]
    pub trade: PriceRange,
    #[serde(default, deserialize_with = "lenient")]
    pub volume: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct PriceRange {
    #[serde(default, deserialize_with = "lenient")]
    pub latest: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub earliest: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SupplyUpdateRow {
    #[serde(rename = "TokenSupplyUpdate")]
    pub update: SupplyUpdate,
    #[serde(rename = "Block", default, deserialize_with = "or_default")]
    pub block: BlockTime,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SupplyUpdate {
    #[serde(rename = "Currency", default, deserialize_with = "or_default")]
    pub currency: CreatedCurrency,
    #[serde(rename = "Amount", default, deserialize_with = "lenient")]
    pub amount: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct CreatedCurrency {
    #[serde(flatten)]
    pub currency: Currency,
    #[serde(rename = "TokenCreator", default)]
    pub token_creator: Option<TokenCreator>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct TokenCreator {
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
}


impl From<WalletTradeRow> for WalletTrade {
    fn from(row: WalletTradeRow) -> Self {
        Self {
            timestamp: row.block.time,
            action: row.trade.side.kind,
            symbol: row.trade.currency.symbol,
            name: row.trade.currency.name,
            amount: row.trade.side.amount,
            price: row.trade.price_in_usd,
            total: row.trade.side.amount_in_usd,
            signature: row.transaction.signature,
            mint_address: row.trade.currency.mint_address,
        }
    }
}

impl From<TrendingRow> for TrendingToken {
    fn from(row: TrendingRow) -> Self {
        Self {
            symbol: row.trade.currency.symbol,
            name: row.trade.currency.name,
            price: row.trade.price_in_usd,
            volume_24h: row.volume,
            trades_24h: row.trades,
            buyers_24h: row.buyers,
            mint_address: row.trade.currency.mint_address,
        }
    }
}

impl From<SupplyUpdateRow> for NewToken {
    fn from(row: SupplyUpdateRow) -> Self {
        let SupplyUpdate { currency, amount } = row.update;
        Self {
            symbol: currency.currency.symbol,
            name: currency.currency.name,
            mint_address: currency.currency.mint_address,
            launch_time: row.block.time,
            total_supply: amount,
            creator: currency.token_creator.and_then(|c| c.address),
        }
    }
}

impl MarketContext {
    /// `price` is the caller's quoted price when it has one, else the latest trade.
    pub(crate) fn from_row(row: MarketContextRow, quoted_price: Option<f64>) -> Self {
        let price_change_24h = match (row.trade.latest, row.trade.earliest) {
            (Some(latest), Some(earliest)) if earliest != 0.0 => Some((latest - earliest) / earliest * 100.0),
            _ => None,
        };

        Self {
            price: quoted_price.or(row.trade.latest),
            volume_24h: row.volume,
            price_change_24h,
        }
    }
}
