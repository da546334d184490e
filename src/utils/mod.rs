//! Utility functions for the on-chain monitor.
//!
//! - [`format`] - Balance and address formatting for console output

mod format;

// ============================================
// Re-exports
// ============================================

pub use format::{format_balance, short_address};
