use chrono::Local;
use log::{info, warn};
use thiserror::Error;

use super::models::Snapshot;
use super::store::{SnapshotStore, StoreError};
use crate::ankr::{AnkrClient, Progress};
use crate::rpc::{GatewayError, RpcGateway};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of an optional lookup whose failure must not fail the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment<T> {
    Present(T),
    Degraded { reason: String },
}

impl<T> Enrichment<T> {
    /// Keep the value, or log and record why it is missing.
    pub fn from_result(result: Result<T, GatewayError>, what: &str) -> Self {
        match result {
            Ok(value) => Self::Present(value),
            Err(e) => {
                warn!("Could not fetch {}: {}", what, e);
                Self::Degraded {
                    reason: e.to_string(),
                }
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Degraded { .. } => None,
        }
    }
}

/// Collect a full holder snapshot for one token and persist it.
///
/// Runs, in order: declared holder count, metadata, the full holder walk,
/// then price. Only the price lookup may fail without failing the snapshot;
/// any other error aborts before anything is persisted. Returns the record
/// handed to `store` together with the location it was written to.
pub async fn build_snapshot<G, S>(
    client: &AnkrClient<G>,
    store: &S,
    contract: &str,
    blockchain: &str,
    on_progress: Option<Progress<'_>>,
) -> Result<(Snapshot, S::Location), SnapshotError>
where
    G: RpcGateway,
    S: SnapshotStore,
{
    let declared = client.holders_count(contract, blockchain).await?;
    info!("Token {} on {} declares {} holders", contract, blockchain, declared);

    let metadata = client.token_metadata(contract, blockchain).await?;
    let (token_name, token_symbol) = match metadata {
        Some(m) => (m.name, m.symbol),
        None => ("Unknown".to_string(), "???".to_string()),
    };

    let holders = client
        .all_holders(contract, blockchain, on_progress)
        .await?;

    let price = Enrichment::from_result(
        client.token_price(contract, blockchain).await,
        "token price",
    );

    if holders.len() as u64 != declared {
        info!(
            "Collected {} holders, provider declared {}",
            holders.len(),
            declared
        );
    }

    let snapshot = Snapshot {
        timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        contract: contract.to_string(),
        blockchain: blockchain.to_string(),
        token_name,
        token_symbol,
        holder_count: holders.len(),
        price_usd: price.into_option(),
        holders,
    };

    let location = store.persist(&snapshot)?;

    Ok((snapshot, location))
}
