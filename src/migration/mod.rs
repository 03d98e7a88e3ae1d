//! Migration orchestration.
//!
//! A migration moves the assets of a sender to a receiver in two phases. The first reconciles
//! the requested transfers against a balance snapshot, plans them and produces every signature
//! concurrently. The second submits, strictly in order: signed authorizations go to the relay in
//! one dispatch, and the sender's own transactions run through the [`Sequencer`] against the
//! native fee budget.

mod dispatch;
pub use dispatch::{authorizations, relay_fee_usd, relay_outcomes, select_fee_tokens, usd_value};

mod outcomes;
pub use outcomes::OutcomeLog;

mod planner;
pub use planner::{Permit2Strategy, TransferPlan, fee_budget, plan};

mod reconcile;
pub use reconcile::{AcceptedTransfer, Reconciliation, reconcile};

mod sequencer;
pub use sequencer::Sequencer;

mod signing;
pub use signing::PermitSigner;

use crate::{
    api::{HttpMigrationApi, HttpRelayClient, MigrationApi, RelayApi},
    chain::{ChainAccess, ProviderChain},
    config::MigrationConfig,
    constants::SUPPORTED_CHAINS,
    error::{MigrationError, ValidationError},
    metrics::MigrationMetrics,
    signers::DynSigner,
    types::{
        BalanceQuery, MigrationOutcome, PlannedTransaction, RelayRequest, SignedPermit2,
        TokenAmount, TransferRequest,
    },
};
use alloy::primitives::{Address, ChainId};
use alloy_chains::Chain;
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, info, instrument};

/// How the assets of a migration are submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The sender submits every transaction and pays for it.
    Direct,
    /// Permit and Permit2 transfers are submitted by the relay.
    Gasless,
    /// Like [`Route::Gasless`], with part of the tokens paying the relay fee to the treasury.
    Forward,
}

impl Route {
    /// Whether signed authorizations go through the relay.
    pub const fn is_relayed(&self) -> bool {
        matches!(self, Self::Gasless | Self::Forward)
    }
}

/// A migration request.
#[derive(Debug, Clone)]
pub struct MigrationRequest {
    /// Signer of the source account.
    pub sender: Option<DynSigner>,
    /// Destination address.
    pub receiver: Address,
    /// Requested transfers. `None` migrates every held asset.
    pub transfers: Option<Vec<TransferRequest>>,
}

impl MigrationRequest {
    /// Creates a request migrating every asset of `sender` to `receiver`.
    pub fn new(sender: DynSigner, receiver: Address) -> Self {
        Self { sender: Some(sender), receiver, transfers: None }
    }

    /// Restricts the migration to `transfers`.
    pub fn with_transfers(mut self, transfers: Vec<TransferRequest>) -> Self {
        self.transfers = Some(transfers);
        self
    }
}

/// Executes migrations.
#[derive(Debug)]
pub struct Migrator {
    config: MigrationConfig,
    api: Arc<dyn MigrationApi>,
    relay: Option<Arc<dyn RelayApi>>,
    chain: Arc<dyn ChainAccess>,
    metrics: MigrationMetrics,
}

impl Migrator {
    /// Create a new [`Migrator`] without a relay.
    pub fn new(
        config: MigrationConfig,
        api: Arc<dyn MigrationApi>,
        chain: Arc<dyn ChainAccess>,
    ) -> Self {
        Self { config, api, relay: None, chain, metrics: MigrationMetrics::default() }
    }

    /// Sets the relay used by the gasless and forward routes.
    pub fn with_relay(mut self, relay: Arc<dyn RelayApi>) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Connects to the API, chain and relay endpoints in `config`.
    pub fn connect(config: MigrationConfig) -> Result<Self, MigrationError> {
        let api = HttpMigrationApi::new(&config.api, config.secrets.api_key.clone())?;
        let chain = ProviderChain::connect(&config.chain, config.permit2);
        let relay = config.relay.as_ref().map(HttpRelayClient::new).transpose()?;

        let mut migrator = Self::new(config, Arc::new(api), Arc::new(chain));
        if let Some(relay) = relay {
            migrator = migrator.with_relay(Arc::new(relay));
        }
        Ok(migrator)
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Migrates with the sender submitting and paying for every transaction.
    pub async fn execute_migration(
        &self,
        request: MigrationRequest,
    ) -> Result<Vec<MigrationOutcome>, MigrationError> {
        self.migrate(Route::Direct, request).await
    }

    /// Migrates with Permit2 transfers submitted by the relay.
    pub async fn execute_migration_gasless(
        &self,
        request: MigrationRequest,
    ) -> Result<Vec<MigrationOutcome>, MigrationError> {
        self.migrate(Route::Gasless, request).await
    }

    /// Migrates through the relay, paying its fee with part of the transferred tokens.
    pub async fn execute_forward_transaction(
        &self,
        request: MigrationRequest,
    ) -> Result<Vec<MigrationOutcome>, MigrationError> {
        self.migrate(Route::Forward, request).await
    }

    /// Migrates over `route`.
    ///
    /// Per-asset failures are reported as outcomes. Only validation errors and failed API or
    /// relay calls abort the migration, leaving already sent transactions in place.
    #[instrument(
        skip_all,
        fields(?route, sender = ?request.sender.as_ref().map(DynSigner::address), receiver = %request.receiver)
    )]
    pub async fn migrate(
        &self,
        route: Route,
        request: MigrationRequest,
    ) -> Result<Vec<MigrationOutcome>, MigrationError> {
        let signer = request.sender.as_ref().ok_or(ValidationError::MissingSigner)?;
        let sender = signer.address();
        let receiver = request.receiver;
        let chain_id = self.chain.chain_id();

        if !is_supported_chain(chain_id) {
            return Err(ValidationError::UnsupportedChain(chain_id).into());
        }

        let relay = match route {
            Route::Direct => None,
            Route::Gasless | Route::Forward => {
                let spender = self.config.relay()?.spender;
                let relay = self
                    .relay
                    .as_ref()
                    .ok_or(ValidationError::UnsupportedRoute("relay client is not set"))?;
                Some((relay, spender))
            }
        };

        let treasury = match route {
            Route::Forward => {
                if request.transfers.as_ref().is_none_or(Vec::is_empty) {
                    return Err(ValidationError::UnsupportedRoute(
                        "forward migration requires explicit transfers",
                    )
                    .into());
                }
                Some(self.config.treasury()?)
            }
            Route::Direct | Route::Gasless => None,
        };

        let snapshots = self
            .api
            .balances(BalanceQuery {
                chain_id,
                address: sender,
                only_balances: route != Route::Forward,
                token_addresses: None,
            })
            .await?;
        let gas_price = self.api.gas_price(chain_id).await?;

        info!(assets = snapshots.len(), %gas_price, "Fetched balances");

        let mut log = OutcomeLog::default();

        let reconciliation = reconcile(
            request.transfers.as_deref(),
            &snapshots,
            self.config.native_transfer_percent,
        );
        log.rejected(reconciliation.outcomes);

        let plan = plan(&reconciliation.accepted, sender, receiver, route.is_relayed());
        debug!(
            direct = plan.direct.len(),
            permits = plan.permit_candidates.len(),
            permit2 = plan.permit2.len(),
            "Planned migration"
        );

        // phase 1: signatures
        let signing = PermitSigner::new(
            self.chain.as_ref(),
            signer,
            &self.config.signing,
            self.config.permit2,
            &self.metrics,
        );

        let mut permits = Vec::new();
        let mut permit2_tokens = plan.permit2;
        for (token, result) in signing.sign_permits(&plan.permit_candidates).await {
            match result {
                Ok(permit) => {
                    permits.push(permit);
                    permit2_tokens.push(token);
                }
                Err(_) => log.authorized([MigrationOutcome::new(
                    token.token,
                    MigrationOutcome::PERMIT_FAILED,
                )
                .with_amount(token.amount)]),
            }
        }
        let strategy = Permit2Strategy::select(permit2_tokens);

        let fee_tokens = match treasury {
            Some(_) => {
                let native_price = self.api.native_price(chain_id).await?;
                let fee_usd = relay_fee_usd(self.config.gas.forward_relay, gas_price, native_price);
                select_fee_tokens(strategy.tokens(), &snapshots, fee_usd)?
            }
            None => HashSet::new(),
        };
        let recipient = |token: &TokenAmount| match treasury {
            Some(treasury) if fee_tokens.contains(&token.token) => treasury,
            _ => receiver,
        };

        let spender = relay.map_or(sender, |(_, spender)| spender);
        let mut direct = plan.direct;
        let mut relayed_permit2 = None;
        match signing.sign_permit2(&strategy, spender, recipient).await {
            Ok(Some(permit2)) if route.is_relayed() => relayed_permit2 = Some(permit2),
            Ok(Some(SignedPermit2::Single(single))) => {
                direct.push(PlannedTransaction::Permit2Single(single))
            }
            Ok(Some(SignedPermit2::Batch(batch))) => {
                direct.push(PlannedTransaction::Permit2Batch(batch))
            }
            Ok(None) => {}
            Err(_) => {
                // the permits only exist to feed this transfer
                permits.clear();
                log.authorized(strategy.tokens().iter().map(|token| {
                    MigrationOutcome::new(token.token, MigrationOutcome::TOKEN_FAILED)
                        .with_amount(token.amount)
                }));
            }
        }

        // phase 2: submission
        if let Some((relay, _)) = relay {
            let authorizations = authorizations(permits, relayed_permit2);
            if !authorizations.is_empty() {
                self.metrics.relay_dispatches.increment(1);
                let results = relay
                    .dispatch(RelayRequest {
                        chain_id,
                        authorizations: authorizations.clone(),
                        api_key: self.config.secrets.api_key.clone(),
                    })
                    .await?;
                log.authorized(relay_outcomes(&authorizations, results));
            }
        }

        let sequencer = Sequencer::new(
            self.chain.as_ref(),
            signer,
            self.config.gas,
            gas_price,
            self.config.permit2,
            &self.metrics,
        );
        let (executed, remaining) =
            sequencer.sequence(direct, fee_budget(&snapshots, plan.native_amount)).await;
        log.executed(executed);

        let outcomes = log.into_outcomes();
        info!(outcomes = outcomes.len(), %remaining, "Migration finished");

        Ok(outcomes)
    }
}

/// Whether migrations are supported on `chain_id`.
pub fn is_supported_chain(chain_id: ChainId) -> bool {
    Chain::from_id(chain_id).named().is_some_and(|chain| SUPPORTED_CHAINS.contains(&chain))
}
