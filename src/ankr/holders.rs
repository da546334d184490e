//! Holder pagination: single-page fetch and the full-set walk over it.

use log::{debug, info};
use serde_json::json;

use super::client::{AnkrClient, GET_TOKEN_HOLDERS};
use super::models::{Holder, HolderPage, HoldersResult};
use crate::rpc::{GatewayError, RpcGateway};

/// Observer notified with the running holder total after every page.
pub type Progress<'a> = &'a mut (dyn FnMut(usize) + Send);

impl<G: RpcGateway> AnkrClient<G> {
    /// Fetch one page of holders.
    ///
    /// `page_token` is the cursor returned by the previous page, `None` for the
    /// first one. Page sizes above the provider maximum are clamped by the
    /// provider. Errors are returned as-is, without retry.
    pub async fn holders_page(
        &self,
        contract: &str,
        blockchain: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<HolderPage, GatewayError> {
        let mut params = json!({
            "blockchain": blockchain,
            "contractAddress": contract,
            "pageSize": page_size,
        });
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            params["pageToken"] = json!(token);
        }

        let result: HoldersResult = self.call(GET_TOKEN_HOLDERS, params).await?;

        Ok(HolderPage::from(result))
    }

    /// Walk every holder page until the provider runs out.
    ///
    /// Pages are requested strictly one after another, each with the cursor of
    /// the previous response, and appended in provider order. The walk stops
    /// on a missing or empty cursor, and also on an empty page so a provider
    /// that keeps handing out cursors with no holders cannot loop forever.
    ///
    /// Addresses are not deduplicated across pages. Any page failure aborts
    /// the walk and the holders gathered so far are dropped.
    pub async fn all_holders(
        &self,
        contract: &str,
        blockchain: &str,
        mut on_progress: Option<Progress<'_>>,
    ) -> Result<Vec<Holder>, GatewayError> {
        let mut all_holders: Vec<Holder> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .holders_page(contract, blockchain, self.page_size, page_token.as_deref())
                .await?;
            pages += 1;

            let page_len = page.holders.len();
            all_holders.extend(page.holders);

            if let Some(report) = on_progress.as_mut() {
                report(all_holders.len());
            }

            debug!(
                "Holder page {} for {} on {}: {} holders ({} total)",
                pages,
                contract,
                blockchain,
                page_len,
                all_holders.len()
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() && page_len > 0 => page_token = Some(token),
                _ => break,
            }
        }

        info!(
            "Collected {} holders for {} on {} in {} pages",
            all_holders.len(),
            contract,
            blockchain,
            pages
        );

        Ok(all_holders)
    }
}
