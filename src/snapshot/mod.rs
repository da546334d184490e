//! Holder snapshots: collection, persistence and comparison.

mod builder;
mod diff;
mod models;
mod store;

pub use builder::{build_snapshot, Enrichment, SnapshotError};
pub use diff::{diff, retained_addresses};
pub use models::{BalanceChange, DiffResult, Snapshot};
pub use store::{JsonFileStore, SnapshotStore, StoreError};
