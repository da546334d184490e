use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Failure of a single JSON-RPC round trip.
///
/// `Transport` covers everything that kept the request from completing
/// (connectivity, HTTP status, timeout). `Application` means the gateway
/// answered with a JSON-RPC error envelope. `Decode` means the result arrived
/// but did not have the shape the caller expected.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Ankr API error {code}: {message}")]
    Application { code: i64, message: String },

    #[error("Unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid RPC endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl GatewayError {
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }
}

impl From<RpcError<TransportErrorKind>> for GatewayError {
    fn from(err: RpcError<TransportErrorKind>) -> Self {
        match err {
            RpcError::ErrorResp(payload) => Self::Application {
                code: payload.code,
                message: payload.message.to_string(),
            },
            RpcError::DeserError { err, .. } => Self::Decode(err),
            other => Self::Transport(other.to_string()),
        }
    }
}
