//! Chain access.
//!
//! Everything the migration reads from or submits to the chain goes through [`ChainAccess`].
use crate::{
    config::ChainConfig,
    error::ChainError,
    signers::DynSigner,
    transport::TimeoutLayer,
    types::{IERC20, IERC20Permit, IPermit2},
};
use alloy::{
    network::EthereumWallet,
    primitives::{Address, B256, ChainId, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::{client::ClientBuilder, types::TransactionRequest},
};
use std::{fmt::Debug, time::Duration};
use tracing::{debug, instrument};

/// Read and write access to the chain a migration runs on.
#[async_trait::async_trait]
pub trait ChainAccess: Debug + Send + Sync {
    /// Returns the chain id.
    fn chain_id(&self) -> ChainId;

    /// Returns the ERC-20 `name()` of `token`, used in its permit domain.
    async fn token_name(&self, token: Address) -> Result<String, ChainError>;

    /// Returns the ERC-2612 `nonces(owner)` of `token`.
    async fn permit_nonce(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

    /// Returns the Permit2 unordered nonce bitmap of `owner` at `word`.
    async fn nonce_bitmap(&self, owner: Address, word: U256) -> Result<U256, ChainError>;

    /// Estimates the gas units `tx` consumes.
    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, ChainError>;

    /// Signs `tx` with `signer`, submits it and waits for a successful receipt.
    async fn send_transaction(
        &self,
        signer: &DynSigner,
        tx: TransactionRequest,
    ) -> Result<B256, ChainError>;
}

/// [`ChainAccess`] over a JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct ProviderChain {
    provider: DynProvider,
    chain_id: ChainId,
    permit2: Address,
    receipt_timeout: Duration,
}

impl ProviderChain {
    /// Connects to the RPC endpoint in `config`.
    pub fn connect(config: &ChainConfig, permit2: Address) -> Self {
        let client = ClientBuilder::default()
            .layer(TimeoutLayer::new(config.rpc_timeout))
            .http(config.endpoint.clone());
        Self::new(
            ProviderBuilder::new().connect_client(client).erased(),
            config.chain.id(),
            permit2,
            config.receipt_timeout,
        )
    }

    /// Creates a new [`ProviderChain`] from an existing provider.
    pub const fn new(
        provider: DynProvider,
        chain_id: ChainId,
        permit2: Address,
        receipt_timeout: Duration,
    ) -> Self {
        Self { provider, chain_id, permit2, receipt_timeout }
    }
}

#[async_trait::async_trait]
impl ChainAccess for ProviderChain {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    async fn token_name(&self, token: Address) -> Result<String, ChainError> {
        Ok(IERC20::new(token, &self.provider).name().call().await?)
    }

    async fn permit_nonce(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        Ok(IERC20Permit::new(token, &self.provider).nonces(owner).call().await?)
    }

    async fn nonce_bitmap(&self, owner: Address, word: U256) -> Result<U256, ChainError> {
        Ok(IPermit2::new(self.permit2, &self.provider).nonceBitmap(owner, word).call().await?)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, ChainError> {
        Ok(self.provider.estimate_gas(tx.clone()).await?)
    }

    #[instrument(skip_all, fields(from = %signer.address()))]
    async fn send_transaction(
        &self,
        signer: &DynSigner,
        tx: TransactionRequest,
    ) -> Result<B256, ChainError> {
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer.0.clone()))
            .connect_provider(self.provider.clone());

        let pending = provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, "Sent transaction");

        let receipt = pending.with_timeout(Some(self.receipt_timeout)).get_receipt().await?;
        if !receipt.status() {
            return Err(ChainError::Reverted(tx_hash));
        }

        Ok(tx_hash)
    }
}
