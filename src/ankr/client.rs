use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::models::{
    lenient_f64, lenient_u64, AccountAsset, AccountBalanceResult, CurrenciesResult, Currency,
    HoldersCountResult, PriceResult, TokenMetadata, TokenTransfer, TransfersResult,
};
use crate::config::AnkrSettings;
use crate::rpc::{GatewayError, HttpGateway, RpcGateway};

pub(crate) const GET_TOKEN_HOLDERS: &str = "ankr_getTokenHolders";
const GET_TOKEN_HOLDERS_COUNT: &str = "ankr_getTokenHoldersCount";
const GET_TOKEN_PRICE: &str = "ankr_getTokenPrice";
const GET_CURRENCIES: &str = "ankr_getCurrencies";
const GET_ACCOUNT_BALANCE: &str = "ankr_getAccountBalance";
const GET_TOKEN_TRANSFERS: &str = "ankr_getTokenTransfers";

/// Decimals assumed when the provider does not report them
const DEFAULT_DECIMALS: u8 = 18;

/// Client for the Ankr Advanced (Token) API.
///
/// Every method is a thin typed wrapper over one JSON-RPC call, except
/// [`AnkrClient::all_holders`] which walks the holder pagination.
pub struct AnkrClient<G = HttpGateway> {
    pub(crate) gateway: G,
    pub(crate) page_size: u32,
    /// Currencies list per chain; `ankr_getCurrencies` returns every token on the
    /// chain so it is fetched once and reused for metadata lookups
    currencies: Cache<String, Arc<Vec<Currency>>>,
}

impl AnkrClient<HttpGateway> {
    pub fn from_settings(settings: &AnkrSettings) -> Result<Self, GatewayError> {
        let gateway = HttpGateway::new(
            &settings.endpoint(),
            Duration::from_secs(settings.request_timeout_secs),
        )?;

        Ok(Self::new(
            gateway,
            settings.page_size,
            Duration::from_secs(settings.metadata_cache_ttl_secs),
        ))
    }
}

impl<G: RpcGateway> AnkrClient<G> {
    pub fn new(gateway: G, page_size: u32, metadata_ttl: Duration) -> Self {
        let currencies = Cache::builder()
            .max_capacity(16)
            .time_to_live(metadata_ttl)
            .build();

        Self {
            gateway,
            page_size,
            currencies,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Issue one RPC call and parse its result into `T`.
    ///
    /// A `null` result is read as an empty object so absent fields fall back
    /// to their defaults.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, GatewayError> {
        let result = self.gateway.call(method, params).await?;
        let result = if result.is_null() { json!({}) } else { result };

        Ok(serde_json::from_value(result)?)
    }

    /// Holder count as declared by the provider. Informational only; it can lag
    /// behind the holders actually returned by pagination.
    pub async fn holders_count(&self, contract: &str, blockchain: &str) -> Result<u64, GatewayError> {
        let result: HoldersCountResult = self
            .call(
                GET_TOKEN_HOLDERS_COUNT,
                json!({ "blockchain": blockchain, "contractAddress": contract }),
            )
            .await?;

        Ok(result
            .holder_count
            .as_ref()
            .and_then(lenient_u64)
            .unwrap_or(0))
    }

    /// Token price in USD. A missing `usdPrice` reads as 0.0.
    pub async fn token_price(&self, contract: &str, blockchain: &str) -> Result<f64, GatewayError> {
        let result: PriceResult = self
            .call(
                GET_TOKEN_PRICE,
                json!({ "blockchain": blockchain, "contractAddress": contract }),
            )
            .await?;

        Ok(result.usd_price.as_ref().and_then(lenient_f64).unwrap_or(0.0))
    }

    /// Token name, symbol and decimals from the chain's currencies list.
    ///
    /// Returns `None` when the contract is not listed.
    pub async fn token_metadata(
        &self,
        contract: &str,
        blockchain: &str,
    ) -> Result<Option<TokenMetadata>, GatewayError> {
        let currencies = self.currencies(blockchain).await?;
        let wanted = contract.to_lowercase();

        let metadata = currencies
            .iter()
            .find(|currency| currency.address.to_lowercase() == wanted)
            .map(|currency| TokenMetadata {
                contract: contract.to_string(),
                blockchain: blockchain.to_string(),
                name: currency.name.clone().unwrap_or_else(|| "Unknown".to_string()),
                symbol: currency.symbol.clone().unwrap_or_else(|| "???".to_string()),
                decimals: currency
                    .decimals
                    .as_ref()
                    .and_then(lenient_u64)
                    .and_then(|d| u8::try_from(d).ok())
                    .unwrap_or(DEFAULT_DECIMALS),
            });

        if metadata.is_none() {
            debug!("Token {} not in {} currencies", contract, blockchain);
        }

        Ok(metadata)
    }

    async fn currencies(&self, blockchain: &str) -> Result<Arc<Vec<Currency>>, GatewayError> {
        if let Some(cached) = self.currencies.get(blockchain).await {
            return Ok(cached);
        }

        let result: CurrenciesResult = self
            .call(GET_CURRENCIES, json!({ "blockchain": blockchain }))
            .await?;
        let currencies = Arc::new(result.currencies.unwrap_or_default());

        info!("Loaded {} currencies for {}", currencies.len(), blockchain);
        self.currencies
            .insert(blockchain.to_string(), currencies.clone())
            .await;

        Ok(currencies)
    }

    /// Token balances held by a wallet.
    pub async fn account_balance(
        &self,
        wallet: &str,
        blockchain: &str,
        only_whitelisted: bool,
    ) -> Result<Vec<AccountAsset>, GatewayError> {
        let result: AccountBalanceResult = self
            .call(
                GET_ACCOUNT_BALANCE,
                json!({
                    "blockchain": blockchain,
                    "walletAddress": wallet,
                    "onlyWhitelisted": only_whitelisted,
                }),
            )
            .await?;

        Ok(result.assets.unwrap_or_default())
    }

    /// Most recent transfers touching `address`, newest first, optionally
    /// restricted to one token contract.
    pub async fn token_transfers(
        &self,
        address: &str,
        blockchain: &str,
        contract: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<TokenTransfer>, GatewayError> {
        let mut params = json!({
            "address": [address],
            "blockchain": blockchain,
            "descOrder": true,
            "pageSize": page_size,
        });
        if let Some(contract) = contract {
            params["contractAddress"] = json!(contract);
        }

        let result: TransfersResult = self.call(GET_TOKEN_TRANSFERS, params).await?;

        Ok(result.transfers.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::testing::ScriptedGateway;

    const CONTRACT: &str = "0x000Ae314E2A2172a039B26378814C252734f556A";
    const WALLET: &str = "0xE8c3e6559513eEbAc3e05fd75c19a17F4A51A892";

    fn client(gateway: ScriptedGateway) -> AnkrClient<ScriptedGateway> {
        AnkrClient::new(gateway, 10_000, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_holders_count() {
        let client = client(ScriptedGateway::new().respond(json!({ "holderCount": 12500 })));

        assert_eq!(client.holders_count(CONTRACT, "bsc").await.unwrap(), 12500);

        let calls = client.gateway.calls();
        assert_eq!(calls[0].0, "ankr_getTokenHoldersCount");
        assert_eq!(calls[0].1["contractAddress"], CONTRACT);
        assert_eq!(calls[0].1["blockchain"], "bsc");
    }

    #[tokio::test]
    async fn test_holders_count_missing_is_zero() {
        let client = client(ScriptedGateway::new().respond(json!({})));
        assert_eq!(client.holders_count(CONTRACT, "bsc").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_token_price() {
        let client = client(
            ScriptedGateway::new()
                .respond(json!({ "usdPrice": "0.0025" }))
                .respond(json!({ "usdPrice": 1.25 })),
        );

        assert_eq!(client.token_price(CONTRACT, "bsc").await.unwrap(), 0.0025);
        assert_eq!(client.token_price(CONTRACT, "bsc").await.unwrap(), 1.25);
    }

    #[tokio::test]
    async fn test_token_price_error_propagates() {
        let client = client(ScriptedGateway::new().fail(GatewayError::Application {
            code: -32000,
            message: "token not found".to_string(),
        }));

        let err = client.token_price(CONTRACT, "bsc").await.unwrap_err();
        assert!(err.is_application());
    }

    #[tokio::test]
    async fn test_token_metadata_found_case_insensitive() {
        let client = client(ScriptedGateway::new().respond(json!({
            "currencies": [
                { "address": "0xother", "name": "Other", "symbol": "OTH", "decimals": 6 },
                { "address": CONTRACT.to_lowercase(), "name": "Test Token", "symbol": "TEST", "decimals": 9 }
            ]
        })));

        let metadata = client.token_metadata(CONTRACT, "bsc").await.unwrap().unwrap();
        assert_eq!(metadata.name, "Test Token");
        assert_eq!(metadata.symbol, "TEST");
        assert_eq!(metadata.decimals, 9);
        assert_eq!(metadata.contract, CONTRACT);
        assert_eq!(metadata.display_name(), "Test Token (TEST)");
    }

    #[tokio::test]
    async fn test_token_metadata_defaults() {
        let client = client(ScriptedGateway::new().respond(json!({
            "currencies": [{ "address": CONTRACT }]
        })));

        let metadata = client.token_metadata(CONTRACT, "bsc").await.unwrap().unwrap();
        assert_eq!(metadata.name, "Unknown");
        assert_eq!(metadata.symbol, "???");
        assert_eq!(metadata.decimals, 18);
    }

    #[tokio::test]
    async fn test_token_metadata_not_found() {
        let client = client(ScriptedGateway::new().respond(json!({ "currencies": [] })));
        assert!(client.token_metadata(CONTRACT, "bsc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_currencies_are_cached_per_chain() {
        let client = client(
            ScriptedGateway::new()
                .respond(json!({ "currencies": [{ "address": CONTRACT, "name": "A", "symbol": "A" }] })),
        );

        assert!(client.token_metadata(CONTRACT, "bsc").await.unwrap().is_some());
        // Second lookup is served from the cache; the script has nothing left
        assert!(client.token_metadata(CONTRACT, "bsc").await.unwrap().is_some());
        assert_eq!(client.gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_account_balance() {
        let client = client(ScriptedGateway::new().respond(json!({
            "assets": [
                { "tokenSymbol": "BNB", "balance": "1.5" },
                { "tokenSymbol": "USDT", "balance": "100.0" }
            ]
        })));

        let assets = client.account_balance(WALLET, "bsc", true).await.unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].token_symbol, "BNB");
        assert_eq!(assets[1].balance, "100.0");
        assert_eq!(assets[1].balance_usd, "0");

        let calls = client.gateway.calls();
        assert_eq!(calls[0].1["walletAddress"], WALLET);
        assert_eq!(calls[0].1["onlyWhitelisted"], true);
    }

    #[tokio::test]
    async fn test_token_transfers_with_contract_filter() {
        let client = client(ScriptedGateway::new().respond(json!({
            "transfers": [
                { "fromAddress": "0xSender", "toAddress": WALLET, "value": "100" },
                { "fromAddress": WALLET, "toAddress": "0xReceiver", "value": "50" }
            ]
        })));

        let transfers = client
            .token_transfers(WALLET, "bsc", Some(CONTRACT), 10)
            .await
            .unwrap();
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].from_address, "0xSender");

        let params = &client.gateway.calls()[0].1;
        assert_eq!(params["address"], json!([WALLET]));
        assert_eq!(params["descOrder"], true);
        assert_eq!(params["pageSize"], 10);
        assert_eq!(params["contractAddress"], CONTRACT);
    }

    #[tokio::test]
    async fn test_token_transfers_without_contract_filter() {
        let client = client(ScriptedGateway::new().respond(json!({})));

        let transfers = client.token_transfers(WALLET, "eth", None, 5).await.unwrap();
        assert!(transfers.is_empty());
        assert!(client.gateway.calls()[0].1.get("contractAddress").is_none());
    }
}
