//! HTTP balance and price API client.
use super::MigrationApi;
use crate::{
    config::ApiConfig,
    error::ApiError,
    types::{
        ApiResponse, Authenticated, BalanceData, BalanceQuery, ChainQuery, GasPriceData, NativePriceData,
        TokenSnapshot,
    },
};
use alloy::primitives::{ChainId, U256};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{error, trace};
use url::Url;

/// [`MigrationApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMigrationApi {
    client: reqwest::Client,
    api_key: String,
    balances_url: Url,
    gas_price_url: Url,
    native_price_url: Url,
}

impl HttpMigrationApi {
    /// Create a new client for the API in `config`.
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(config.timeout).build()?,
            api_key: api_key.into(),
            balances_url: config.endpoint.join("balances")?,
            gas_price_url: config.endpoint.join("gas-price")?,
            native_price_url: config.endpoint.join("native-price")?,
        })
    }

    /// Posts `body` to `url` and unwraps the response envelope.
    async fn post<B, T>(&self, url: &Url, body: B, what: &'static str) -> Result<T, ApiError>
    where
        B: Serialize + Send,
        T: DeserializeOwned,
    {
        let response: ApiResponse<T> = self
            .client
            .post(url.clone())
            .json(&Authenticated { api_key: &self.api_key, inner: body })
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .inspect_err(|err| error!(%err, %url, "Failed to reach api"))?
            .json()
            .await?;

        trace!(code = response.code, message = %response.message, "Api response");

        if !response.is_success() {
            return Err(ApiError::Status { code: response.code, message: response.message });
        }

        response.data.ok_or(ApiError::MissingData(what))
    }
}

#[async_trait::async_trait]
impl MigrationApi for HttpMigrationApi {
    async fn balances(&self, query: BalanceQuery) -> Result<Vec<TokenSnapshot>, ApiError> {
        self.post::<_, BalanceData>(&self.balances_url, query, "balances").await
    }

    async fn gas_price(&self, chain_id: ChainId) -> Result<U256, ApiError> {
        self.post::<_, GasPriceData>(&self.gas_price_url, ChainQuery { chain_id }, "gas price")
            .await
            .map(|data| data.gas_price)
    }

    async fn native_price(&self, chain_id: ChainId) -> Result<f64, ApiError> {
        self.post::<_, NativePriceData>(
            &self.native_price_url,
            ChainQuery { chain_id },
            "native price",
        )
        .await
        .map(|data| data.price)
    }
}
