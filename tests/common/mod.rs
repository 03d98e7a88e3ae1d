//! Mock collaborators and environment setup for migration tests.
#![allow(dead_code)]

use alloy::{
    primitives::{Address, B256, ChainId, U256, address},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use migrator::{
    api::{MigrationApi, RelayApi},
    chain::ChainAccess,
    config::MigrationConfig,
    error::{ApiError, ChainError},
    migration::{MigrationRequest, Migrator},
    signers::DynSigner,
    types::{
        AssetKind, AuthorizationKind, BalanceQuery, Permit2Allowance, RelayRequest, RelayResult,
        RelayedAuthorization, TokenAmount, TokenSnapshot,
    },
};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};
use url::Url;

pub const NATIVE: Address = address!("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");
pub const RECEIVER: Address = address!("0x2000000000000000000000000000000000000002");
pub const RELAY_SPENDER: Address = address!("0x3000000000000000000000000000000000000003");
pub const TREASURY: Address = address!("0x4000000000000000000000000000000000000004");

/// Balance and price API answering from fixed data.
#[derive(Debug)]
pub struct MockApi {
    pub snapshots: Vec<TokenSnapshot>,
    pub gas_price: U256,
    pub native_price: f64,
    pub unavailable: bool,
    pub queries: Mutex<Vec<BalanceQuery>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            snapshots: vec![],
            gas_price: U256::from(1),
            native_price: 2_000.0,
            unavailable: false,
            queries: Mutex::default(),
        }
    }
}

#[async_trait::async_trait]
impl MigrationApi for MockApi {
    async fn balances(&self, query: BalanceQuery) -> Result<Vec<TokenSnapshot>, ApiError> {
        if self.unavailable {
            return Err(ApiError::Status { code: 500, message: "unavailable".into() });
        }
        self.queries.lock().unwrap().push(query);
        Ok(self.snapshots.clone())
    }

    async fn gas_price(&self, _: ChainId) -> Result<U256, ApiError> {
        Ok(self.gas_price)
    }

    async fn native_price(&self, _: ChainId) -> Result<f64, ApiError> {
        Ok(self.native_price)
    }
}

/// Relay accepting every authorization with a numbered task id.
#[derive(Debug, Default)]
pub struct MockRelay {
    pub requests: Mutex<Vec<RelayRequest>>,
    /// Answer permits only, leaving Permit2 transfers without a result.
    pub permits_only: AtomicBool,
}

impl MockRelay {
    /// Returns the authorizations of every dispatch.
    pub fn authorizations(&self) -> Vec<RelayedAuthorization> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .flat_map(|request| request.authorizations.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl RelayApi for MockRelay {
    async fn dispatch(&self, request: RelayRequest) -> Result<Vec<RelayResult>, ApiError> {
        let results = request
            .authorizations
            .iter()
            .enumerate()
            .filter(|(_, authorization)| {
                !self.permits_only.load(Ordering::Relaxed)
                    || authorization.kind() == AuthorizationKind::Permit
            })
            .map(|(i, authorization)| RelayResult {
                kind: authorization.kind(),
                token_info: match authorization {
                    RelayedAuthorization::Permit(permit) => {
                        vec![TokenAmount::new(permit.token, permit.value)]
                    }
                    RelayedAuthorization::Permit2Single(single) => vec![single.permitted],
                    RelayedAuthorization::Permit2Batch(batch) => batch.permitted.clone(),
                },
                task_id: Some(format!("task-{i}")),
                status: "pending".into(),
            })
            .collect();
        self.requests.lock().unwrap().push(request);
        Ok(results)
    }
}

/// Chain recording submitted transactions.
#[derive(Debug)]
pub struct MockChain {
    pub chain_id: ChainId,
    /// Tokens whose permit reads fail.
    pub broken_permits: HashSet<Address>,
    /// Bitmap returned for every Permit2 nonce word.
    pub nonce_bitmap: U256,
    /// Gas estimate for simulated transactions. `None` fails estimation.
    pub estimate: Option<u64>,
    /// Transaction targets that revert.
    pub reverting: HashSet<Address>,
    pub sent: Mutex<Vec<TransactionRequest>>,
    pub permit_nonces: HashMap<Address, U256>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            chain_id: 1,
            broken_permits: HashSet::new(),
            nonce_bitmap: U256::ZERO,
            estimate: Some(80_000),
            reverting: HashSet::new(),
            sent: Mutex::default(),
            permit_nonces: HashMap::new(),
        }
    }
}

impl MockChain {
    /// Returns the submitted transactions.
    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChainAccess for MockChain {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    async fn token_name(&self, token: Address) -> Result<String, ChainError> {
        if self.broken_permits.contains(&token) {
            return Err(ChainError::Reverted(B256::ZERO));
        }
        Ok(format!("Token {token}"))
    }

    async fn permit_nonce(&self, token: Address, _: Address) -> Result<U256, ChainError> {
        Ok(self.permit_nonces.get(&token).copied().unwrap_or_default())
    }

    async fn nonce_bitmap(&self, _: Address, _: U256) -> Result<U256, ChainError> {
        Ok(self.nonce_bitmap)
    }

    async fn estimate_gas(&self, _: &TransactionRequest) -> Result<u64, ChainError> {
        self.estimate.ok_or(ChainError::Reverted(B256::ZERO))
    }

    async fn send_transaction(
        &self,
        _: &DynSigner,
        tx: TransactionRequest,
    ) -> Result<B256, ChainError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(tx.clone());
        let hash = B256::with_last_byte(sent.len() as u8);
        match tx.to.and_then(|to| to.to().copied()) {
            Some(to) if self.reverting.contains(&to) => Err(ChainError::Reverted(hash)),
            _ => Ok(hash),
        }
    }
}

/// A migrator wired to mocks, with a random sender.
pub struct Environment {
    pub migrator: Migrator,
    pub api: Arc<MockApi>,
    pub relay: Arc<MockRelay>,
    pub chain: Arc<MockChain>,
    pub sender: DynSigner,
}

impl Environment {
    /// Sets up an environment with the relay and treasury configured.
    pub fn setup(snapshots: Vec<TokenSnapshot>, chain: MockChain) -> Self {
        Self::setup_with(MockApi { snapshots, ..Default::default() }, chain)
    }

    /// Sets up an environment around `api` and `chain`.
    pub fn setup_with(api: MockApi, chain: MockChain) -> Self {
        let config = MigrationConfig::default()
            .with_relay(Some(Url::parse("http://relay.test").unwrap()), Some(RELAY_SPENDER))
            .with_treasury(Some(TREASURY))
            .with_api_key(Some("test-key".to_string()));

        let api = Arc::new(api);
        let relay = Arc::new(MockRelay::default());
        let chain = Arc::new(chain);
        let migrator =
            Migrator::new(config, api.clone(), chain.clone()).with_relay(relay.clone());

        Self { migrator, api, relay, chain, sender: DynSigner::from(PrivateKeySigner::random()) }
    }

    /// A request migrating everything to [`RECEIVER`].
    pub fn request(&self) -> MigrationRequest {
        MigrationRequest::new(self.sender.clone(), RECEIVER)
    }
}

/// Native balance snapshot.
pub fn native(balance: u64) -> TokenSnapshot {
    TokenSnapshot {
        address: NATIVE,
        decimals: 18,
        balance: U256::from(balance),
        kind: AssetKind::Native,
        permit2_allowance: Permit2Allowance::default(),
        permit_exists: false,
        nft_ids: vec![],
        price: None,
    }
}

/// ERC-20 snapshot.
pub fn erc20(
    address: Address,
    kind: AssetKind,
    balance: u64,
    allowance: Permit2Allowance,
    permit_exists: bool,
) -> TokenSnapshot {
    TokenSnapshot {
        address,
        decimals: 6,
        balance: U256::from(balance),
        kind,
        permit2_allowance: allowance,
        permit_exists,
        nft_ids: vec![],
        price: None,
    }
}

/// ERC-721 snapshot owning `ids`.
pub fn nft(address: Address, ids: &[u64]) -> TokenSnapshot {
    TokenSnapshot {
        address,
        decimals: 0,
        balance: U256::from(ids.len()),
        kind: AssetKind::Nft,
        permit2_allowance: Permit2Allowance::default(),
        permit_exists: false,
        nft_ids: ids.iter().copied().map(U256::from).collect(),
        price: None,
    }
}
