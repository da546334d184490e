use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Chains accepted by the Ankr multichain endpoint that this tool knows how to query.
pub const SUPPORTED_CHAINS: [&str; 6] = ["bsc", "eth", "polygon", "arbitrum", "base", "avalanche"];

/// Chain used when a command does not name one.
pub const DEFAULT_CHAIN: &str = "bsc";

const ANKR_MULTICHAIN_URL: &str = "https://rpc.ankr.com/multichain";

/// Ankr Advanced API connection settings.
///
/// `rpc_url` wins when set explicitly. Otherwise the public multichain
/// endpoint is used, with the API key appended as a path segment when present.
#[derive(Debug, Deserialize, Clone)]
pub struct AnkrSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Ankr can be slow for large holder queries
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Holders requested per page (provider maximum is 10k)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_metadata_cache_ttl_secs")]
    pub metadata_cache_ttl_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10_000
}

fn default_metadata_cache_ttl_secs() -> u64 {
    300
}

impl Default for AnkrSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            rpc_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
            metadata_cache_ttl_secs: default_metadata_cache_ttl_secs(),
        }
    }
}

impl AnkrSettings {
    /// Resolve the endpoint every JSON-RPC request is posted to.
    pub fn endpoint(&self) -> String {
        match &self.rpc_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ if !self.api_key.is_empty() => format!("{}/{}", ANKR_MULTICHAIN_URL, self.api_key),
            _ => ANKR_MULTICHAIN_URL.to_string(),
        }
    }
}

/// Where holder snapshots are written and read from.
#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotSettings {
    #[serde(default = "default_snapshot_dir")]
    pub dir: String,
}

fn default_snapshot_dir() -> String {
    "snapshots".to_string()
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            dir: default_snapshot_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Root application configuration.
///
/// Loaded from an optional `config.yaml` (or `.toml`/`.json`) in the working
/// directory, then overridden by `MONITOR_*` environment variables, with `__`
/// separating nested keys (`MONITOR_ANKR__API_KEY`).
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub ankr: AnkrSettings,
    #[serde(default)]
    pub snapshots: SnapshotSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("MONITOR")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}

/// Reject chains outside [`SUPPORTED_CHAINS`].
pub fn validate_chain(chain: &str) -> Result<(), ConfigError> {
    if SUPPORTED_CHAINS.contains(&chain) {
        return Ok(());
    }

    Err(ConfigError::Message(format!(
        "Unsupported chain '{}'. Supported: {}",
        chain,
        SUPPORTED_CHAINS.join(", ")
    )))
}
