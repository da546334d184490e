#[allow(clippy::module_inception)]
mod config;

pub use config::{
    validate_chain, AnkrSettings, LoggingSettings, Settings, SnapshotSettings, DEFAULT_CHAIN,
    SUPPORTED_CHAINS,
};
