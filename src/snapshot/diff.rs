use rustc_hash::{FxHashMap, FxHashSet};

use super::models::{BalanceChange, DiffResult, Snapshot};
use crate::ankr::Holder;

/// Address-keyed view of a holder list.
///
/// `order` keeps first-occurrence order; `by_address` keeps the last record
/// seen for an address.
struct HolderIndex<'a> {
    order: Vec<&'a str>,
    by_address: FxHashMap<&'a str, &'a Holder>,
}

impl<'a> HolderIndex<'a> {
    fn new(holders: &'a [Holder]) -> Self {
        let mut order = Vec::with_capacity(holders.len());
        let mut by_address = FxHashMap::default();
        by_address.reserve(holders.len());

        for holder in holders {
            if by_address.insert(holder.address.as_str(), holder).is_none() {
                order.push(holder.address.as_str());
            }
        }

        Self { order, by_address }
    }

    fn contains(&self, address: &str) -> bool {
        self.by_address.contains_key(address)
    }

    fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Holder)> + '_ {
        self.order
            .iter()
            .map(move |address| (*address, self.by_address[address]))
    }
}

/// Compare two snapshots of the same token.
///
/// - `new_holders`: addresses only in `new`, with their `new` record
/// - `removed_holders`: addresses only in `old`, with their `old` record
/// - `balance_changes`: addresses in both whose `balance` strings differ
///
/// Balances are compared as strings, so `"1.50"` and `"1.5"` count as a change.
/// Output follows first-occurrence order of `new` (for additions and changes)
/// and of `old` (for removals).
pub fn diff(old: &Snapshot, new: &Snapshot) -> DiffResult {
    let old_index = HolderIndex::new(&old.holders);
    let new_index = HolderIndex::new(&new.holders);

    let mut result = DiffResult::default();

    for (address, holder) in new_index.iter() {
        match old_index.by_address.get(address) {
            None => result.new_holders.push(holder.clone()),
            Some(previous) if previous.balance != holder.balance => {
                result.balance_changes.push(BalanceChange {
                    address: address.to_string(),
                    old_balance: previous.balance.clone(),
                    new_balance: holder.balance.clone(),
                });
            },
            Some(_) => {},
        }
    }

    result.removed_holders = old_index
        .iter()
        .filter(|(address, _)| !new_index.contains(address))
        .map(|(_, holder)| holder.clone())
        .collect();

    result
}

/// Addresses present in both snapshots.
pub fn retained_addresses<'a>(old: &'a Snapshot, new: &Snapshot) -> FxHashSet<&'a str> {
    let new_index = HolderIndex::new(&new.holders);

    old.holders
        .iter()
        .map(|h| h.address.as_str())
        .filter(|address| new_index.contains(address))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(address: &str, balance: &str) -> Holder {
        Holder::new(address.to_string(), balance.to_string(), "0".to_string())
    }

    fn snapshot(holders: Vec<Holder>) -> Snapshot {
        Snapshot {
            timestamp: "2024-05-01T12:00:00.000000".to_string(),
            contract: "0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82".to_string(),
            blockchain: "bsc".to_string(),
            token_name: "PancakeSwap Token".to_string(),
            token_symbol: "Cake".to_string(),
            holder_count: holders.len(),
            price_usd: Some(2.5),
            holders,
        }
    }

    #[test]
    fn test_snapshot_against_itself_is_empty() {
        let s = snapshot(vec![holder("0x1", "10"), holder("0x2", "20")]);
        let result = diff(&s, &s);

        assert!(result.new_holders.is_empty());
        assert!(result.removed_holders.is_empty());
        assert!(result.balance_changes.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_new_holder_only_in_new_holders() {
        let old = snapshot(vec![holder("0x1", "10")]);
        let new = snapshot(vec![holder("0x1", "10"), holder("0xABC", "5")]);

        let result = diff(&old, &new);

        assert_eq!(result.new_holders, vec![holder("0xABC", "5")]);
        assert!(result.removed_holders.is_empty());
        assert!(result.balance_changes.is_empty());
    }

    #[test]
    fn test_removed_holder_reported_with_old_record() {
        let old = snapshot(vec![holder("0x1", "10"), holder("0x2", "7")]);
        let new = snapshot(vec![holder("0x1", "10")]);

        let result = diff(&old, &new);

        assert_eq!(result.removed_holders, vec![holder("0x2", "7")]);
        assert!(result.new_holders.is_empty());
    }

    #[test]
    fn test_balance_change_reported_once() {
        let old = snapshot(vec![holder("0xDEF", "100.0"), holder("0x1", "1")]);
        let new = snapshot(vec![holder("0x1", "1"), holder("0xDEF", "150.0")]);

        let result = diff(&old, &new);

        assert_eq!(
            result.balance_changes,
            vec![BalanceChange {
                address: "0xDEF".to_string(),
                old_balance: "100.0".to_string(),
                new_balance: "150.0".to_string(),
            }]
        );
        assert!(result.new_holders.iter().all(|h| h.address != "0xDEF"));
        assert!(result.removed_holders.iter().all(|h| h.address != "0xDEF"));
    }

    #[test]
    fn test_balance_compared_as_string_not_number() {
        // Same value, different formatting: reported as a change
        let old = snapshot(vec![holder("0x1", "1.50")]);
        let new = snapshot(vec![holder("0x1", "1.5")]);

        let result = diff(&old, &new);

        assert_eq!(result.balance_changes.len(), 1);
        assert_eq!(result.balance_changes[0].old_balance, "1.50");
        assert_eq!(result.balance_changes[0].new_balance, "1.5");
    }

    #[test]
    fn test_raw_balance_change_alone_is_ignored() {
        let old = snapshot(vec![Holder::new("0x1".into(), "1.0".into(), "1000".into())]);
        let new = snapshot(vec![Holder::new("0x1".into(), "1.0".into(), "1001".into())]);

        assert!(diff(&old, &new).is_empty());
    }

    #[test]
    fn test_duplicate_address_last_record_wins() {
        let old = snapshot(vec![holder("0x1", "10")]);
        let new = snapshot(vec![holder("0x1", "10"), holder("0x2", "1"), holder("0x1", "12")]);

        let result = diff(&old, &new);

        assert_eq!(result.balance_changes.len(), 1);
        assert_eq!(result.balance_changes[0].new_balance, "12");
        assert_eq!(result.new_holders, vec![holder("0x2", "1")]);
    }

    #[test]
    fn test_order_follows_snapshots() {
        let old = snapshot(vec![holder("0xR2", "1"), holder("0xK", "1"), holder("0xR1", "1")]);
        let new = snapshot(vec![holder("0xN2", "1"), holder("0xK", "1"), holder("0xN1", "1")]);

        let result = diff(&old, &new);

        let added: Vec<&str> = result.new_holders.iter().map(|h| h.address.as_str()).collect();
        let removed: Vec<&str> = result
            .removed_holders
            .iter()
            .map(|h| h.address.as_str())
            .collect();
        assert_eq!(added, vec!["0xN2", "0xN1"]);
        assert_eq!(removed, vec!["0xR2", "0xR1"]);
    }

    #[test]
    fn test_missing_holders_key_is_empty() {
        let old: Snapshot = serde_json::from_value(serde_json::json!({
            "timestamp": "2024-05-01T12:00:00",
            "contract": "0x0",
            "blockchain": "bsc",
            "token_name": "Unknown",
            "token_symbol": "???",
            "holder_count": 0,
            "price_usd": null
        }))
        .unwrap();
        let new = snapshot(vec![holder("0x1", "10")]);

        let result = diff(&old, &new);

        assert_eq!(result.new_holders.len(), 1);
        assert!(result.removed_holders.is_empty());
    }

    #[test]
    fn test_retained_addresses() {
        let old = snapshot(vec![holder("0x1", "1"), holder("0x2", "1")]);
        let new = snapshot(vec![holder("0x2", "3"), holder("0x3", "1")]);

        let retained = retained_addresses(&old, &new);

        assert_eq!(retained.len(), 1);
        assert!(retained.contains("0x2"));
    }
}
