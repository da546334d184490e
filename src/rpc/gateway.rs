use std::future::Future;
use std::time::Duration;

use alloy::rpc::client::{ClientBuilder, RpcClient};
use log::{debug, error};
use serde_json::Value;
use url::Url;

use super::GatewayError;

/// A single request/response JSON-RPC capability.
///
/// Implementations surface transport failures and error envelopes as
/// [`GatewayError`] and never retry.
pub trait RpcGateway: Send + Sync {
    fn call(
        &self,
        method: &'static str,
        params: Value,
    ) -> impl Future<Output = Result<Value, GatewayError>> + Send;
}

/// JSON-RPC 2.0 over HTTP POST.
///
/// Request ids and the envelope are handled by alloy's [`RpcClient`]; each
/// call is bounded by `timeout`.
#[derive(Clone)]
pub struct HttpGateway {
    client: RpcClient,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let url = Url::parse(rpc_url)?;
        let client = ClientBuilder::default().http(url);

        Ok(Self { client, timeout })
    }
}

impl RpcGateway for HttpGateway {
    async fn call(&self, method: &'static str, params: Value) -> Result<Value, GatewayError> {
        debug!("RPC call {} {}", method, params);

        let request = self.client.request::<_, Value>(method, params);
        let result = match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(GatewayError::from),
            Err(_) => Err(GatewayError::Transport(format!(
                "{} timed out after {:?}",
                method, self.timeout
            ))),
        };

        if let Err(GatewayError::Application { code, message }) = &result {
            error!("Ankr API error on {}: {} {}", method, code, message);
        }

        result
    }
}
