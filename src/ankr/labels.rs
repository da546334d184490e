//! Known wallet labels (exchanges, burn addresses).

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const BURN_ADDRESS: &str = "0x000000000000000000000000000000000000dEaD";
pub const NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

const KNOWN_LABELS: [(&str, &str); 10] = [
    (BURN_ADDRESS, "Burn Address"),
    (NULL_ADDRESS, "Null Address"),
    // Binance
    ("0xF977814e90dA44bFA03b6295A0616a897441aceC", "Binance Hot Wallet"),
    ("0x8894E0a0c962CB723c1976a4421c95949bE2D4E3", "Binance"),
    ("0xe2fc31F816A9b94326492132018C3aEcC4a93aE1", "Binance"),
    ("0x3c783c21a0383057D128bae431894a5C19F9Cf06", "Binance"),
    // OKX
    ("0x5a52E96BAcdaBb82fd05763E25335261B270Efcb", "OKX"),
    ("0x6cC5F688a315f3dC28A7781717a9A798a59fDA7b", "OKX"),
    // Other exchanges
    ("0x28C6c06298d514Db089934071355E5743bf21d60", "Binance 14"),
    ("0x21a31Ee1afC51d94C2eFcCAa2092aD1028285549", "Bybit"),
];

static EXACT: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| KNOWN_LABELS.iter().copied().collect());

static LOWERCASE: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    KNOWN_LABELS
        .iter()
        .map(|(address, label)| (address.to_lowercase(), *label))
        .collect()
});

/// Label for a known address, or an empty string.
///
/// Tries the address as given first, then its lowercase form, so checksummed
/// and lowercased spellings of the same address resolve alike.
pub fn holder_label(address: &str) -> &'static str {
    if let Some(label) = EXACT.get(address) {
        return *label;
    }

    LOWERCASE
        .get(&address.to_lowercase())
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_burn_address() {
        assert_eq!(holder_label(BURN_ADDRESS), "Burn Address");
    }

    #[test]
    fn test_null_address() {
        assert_eq!(holder_label(NULL_ADDRESS), "Null Address");
    }

    #[test]
    fn test_case_differences_still_resolve() {
        assert_eq!(
            holder_label("0x000000000000000000000000000000000000dead"),
            "Burn Address"
        );
        assert_eq!(
            holder_label("0XF977814E90DA44BFA03B6295A0616A897441ACEC"),
            "Binance Hot Wallet"
        );
    }

    #[test]
    fn test_unknown_address() {
        assert_eq!(holder_label("0x1234567890abcdef1234567890abcdef12345678"), "");
        assert_eq!(holder_label(""), "");
    }
}
