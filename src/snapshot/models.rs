use serde::{Deserialize, Serialize};

use crate::ankr::Holder;

/// Point-in-time capture of a token's full holder set.
///
/// This is also the on-disk record; field names are part of the file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Local collection completion time, ISO-8601
    pub timestamp: String,
    pub contract: String,
    pub blockchain: String,
    pub token_name: String,
    pub token_symbol: String,
    /// Number of holders actually stored, not the provider's declared count
    pub holder_count: usize,
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub holders: Vec<Holder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    pub address: String,
    pub old_balance: String,
    pub new_balance: String,
}

/// Membership and balance differences between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub new_holders: Vec<Holder>,
    pub removed_holders: Vec<Holder>,
    pub balance_changes: Vec<BalanceChange>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.new_holders.is_empty()
            && self.removed_holders.is_empty()
            && self.balance_changes.is_empty()
    }
}
