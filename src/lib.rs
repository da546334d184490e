pub mod ankr;
pub mod config;
pub mod rpc;
pub mod snapshot;
pub mod utils;

pub use ankr::{AnkrClient, Holder, TokenMetadata};
pub use config::Settings;
pub use rpc::{GatewayError, HttpGateway, RpcGateway};
pub use snapshot::{build_snapshot, diff, JsonFileStore, Snapshot, SnapshotStore};
