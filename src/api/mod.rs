//! Remote collaborators of a migration: the balance and price API and the relay.
use crate::{
    error::ApiError,
    types::{BalanceQuery, RelayRequest, RelayResult, TokenSnapshot},
};
use alloy::primitives::{ChainId, U256};
use std::fmt::Debug;

mod http;
pub use http::HttpMigrationApi;

mod relay;
pub use relay::HttpRelayClient;

/// Balance, gas price and native price discovery.
#[async_trait::async_trait]
pub trait MigrationApi: Debug + Send + Sync {
    /// Fetches the balance snapshot of an account.
    async fn balances(&self, query: BalanceQuery) -> Result<Vec<TokenSnapshot>, ApiError>;

    /// Fetches the current gas price in wei.
    async fn gas_price(&self, chain_id: ChainId) -> Result<U256, ApiError>;

    /// Fetches the USD price of one whole native token.
    async fn native_price(&self, chain_id: ChainId) -> Result<f64, ApiError>;
}

/// Gasless submission of signed authorizations.
#[async_trait::async_trait]
pub trait RelayApi: Debug + Send + Sync {
    /// Submits the authorizations and returns one result per authorization, in order.
    async fn dispatch(&self, request: RelayRequest) -> Result<Vec<RelayResult>, ApiError>;
}
