use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::labels::holder_label;

/// One token holder as captured in a snapshot.
///
/// `balance` is the human-scaled decimal string as reported by the provider,
/// `balance_raw` the smallest-unit integer string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    pub address: String,
    pub balance: String,
    pub balance_raw: String,
    #[serde(default)]
    pub label: String,
}

impl Holder {
    pub fn new(address: String, balance: String, balance_raw: String) -> Self {
        let label = holder_label(&address).to_string();
        Self {
            address,
            balance,
            balance_raw,
            label,
        }
    }
}

/// One page of holders plus the cursor for the next one.
#[derive(Debug, Clone)]
pub struct HolderPage {
    pub holders: Vec<Holder>,
    /// `None` when the provider signals there are no further pages
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenMetadata {
    pub contract: String,
    pub blockchain: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

/// A token position held by a wallet (`ankr_getAccountBalance`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAsset {
    #[serde(default)]
    pub blockchain: String,
    #[serde(default)]
    pub token_name: String,
    #[serde(default)]
    pub token_symbol: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default = "zero")]
    pub balance: String,
    #[serde(default = "zero")]
    pub balance_usd: String,
    #[serde(default = "zero")]
    pub token_price: String,
}

/// A single ERC-20 style transfer (`ankr_getTokenTransfers`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    #[serde(default, alias = "from")]
    pub from_address: String,
    #[serde(default, alias = "to")]
    pub to_address: String,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default = "zero")]
    pub value: String,
    #[serde(default)]
    pub token_symbol: String,
    #[serde(default)]
    pub transaction_hash: String,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

fn zero() -> String {
    "0".to_string()
}

/// Read a string field that may arrive as `null`, a number or a string.
/// Anything that is not a string or number yields `fallback`.
fn loose_string(value: Option<Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => fallback.to_string(),
    }
}

fn string_or_zero<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_string(Option::<Value>::deserialize(deserializer)?, "0"))
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_string(Option::<Value>::deserialize(deserializer)?, ""))
}

// ============================================
// Raw RPC payloads
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawHolder {
    #[serde(default, deserialize_with = "string_or_empty")]
    holder_address: String,
    #[serde(default = "zero", deserialize_with = "string_or_zero")]
    balance: String,
    #[serde(default = "zero", deserialize_with = "string_or_zero")]
    balance_raw_integer: String,
}

impl From<RawHolder> for Holder {
    fn from(raw: RawHolder) -> Self {
        Holder::new(raw.holder_address, raw.balance, raw.balance_raw_integer)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HoldersResult {
    #[serde(default)]
    pub holders: Option<Vec<RawHolder>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl From<HoldersResult> for HolderPage {
    fn from(raw: HoldersResult) -> Self {
        Self {
            holders: raw
                .holders
                .unwrap_or_default()
                .into_iter()
                .map(Holder::from)
                .collect(),
            next_page_token: raw.next_page_token,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HoldersCountResult {
    #[serde(default)]
    pub holder_count: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PriceResult {
    #[serde(default)]
    pub usd_price: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Currency {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrenciesResult {
    #[serde(default)]
    pub currencies: Option<Vec<Currency>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountBalanceResult {
    #[serde(default)]
    pub assets: Option<Vec<AccountAsset>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransfersResult {
    #[serde(default)]
    pub transfers: Option<Vec<TokenTransfer>>,
}

/// Read a JSON number that the provider may send either as a number or as a
/// numeric string.
pub(crate) fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
