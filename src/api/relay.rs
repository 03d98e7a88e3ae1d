//! HTTP relay client.
use super::RelayApi;
use crate::{
    config::RelayConfig,
    error::ApiError,
    types::{RelayRequest, RelayResult},
};
use tracing::{debug, error};
use url::Url;

/// [`RelayApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: reqwest::Client,
    url: Url,
}

impl HttpRelayClient {
    /// Create a new client for the relay in `config`.
    pub fn new(config: &RelayConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(config.timeout).build()?,
            url: config.endpoint.join("relay")?,
        })
    }
}

#[async_trait::async_trait]
impl RelayApi for HttpRelayClient {
    async fn dispatch(&self, request: RelayRequest) -> Result<Vec<RelayResult>, ApiError> {
        debug!(
            chain_id = request.chain_id,
            authorizations = request.authorizations.len(),
            "Dispatching to relay"
        );

        let results = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .inspect_err(|err| error!(%err, "Failed to reach relay"))?
            .json::<Vec<RelayResult>>()
            .await?;

        Ok(results)
    }
}
