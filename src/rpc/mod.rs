//! JSON-RPC gateway the provider client talks through.

mod error;
mod gateway;

pub use error::GatewayError;
pub use gateway::{HttpGateway, RpcGateway};

#[cfg(test)]
pub(crate) use gateway::testing;
