//! Gas budget sequencer.
//!
//! Submits the sender's own transactions one at a time, cheapest first, while the native fee
//! budget lasts. The budget is threaded through [`Sequencer::sequence`] and is only ever touched
//! by that loop.
use crate::{
    chain::ChainAccess,
    config::GasConfig,
    metrics::MigrationMetrics,
    signers::DynSigner,
    types::{GasEstimate, MigrationOutcome, PlannedTransaction},
};
use alloy::primitives::{Address, U256};
use tracing::{debug, info, warn};

/// A transaction with its estimated fee.
#[derive(Debug, Clone)]
struct PricedTransaction {
    tx: PlannedTransaction,
    cost: U256,
}

/// Sequences the sender's own transactions against a fee budget.
#[derive(Debug)]
pub struct Sequencer<'a> {
    chain: &'a dyn ChainAccess,
    signer: &'a DynSigner,
    gas: GasConfig,
    gas_price: U256,
    permit2: Address,
    metrics: &'a MigrationMetrics,
}

impl<'a> Sequencer<'a> {
    /// Create a new [`Sequencer`] pricing gas at `gas_price` wei.
    pub const fn new(
        chain: &'a dyn ChainAccess,
        signer: &'a DynSigner,
        gas: GasConfig,
        gas_price: U256,
        permit2: Address,
        metrics: &'a MigrationMetrics,
    ) -> Self {
        Self { chain, signer, gas, gas_price, permit2, metrics }
    }

    /// Executes `transactions` with `budget` wei available for fees.
    ///
    /// A Permit2 batch goes first and is all or nothing. The rest run in ascending fee order,
    /// ties keeping their planned order. A transaction whose fee exceeds the remaining budget is
    /// skipped without debit; every attempted transaction is debited whether or not it
    /// succeeded. Returns the outcomes in execution order and the remaining budget.
    pub async fn sequence(
        &self,
        transactions: Vec<PlannedTransaction>,
        mut budget: U256,
    ) -> (Vec<MigrationOutcome>, U256) {
        let mut outcomes = Vec::new();

        let (batches, transactions): (Vec<_>, Vec<_>) = transactions
            .into_iter()
            .partition(|tx| matches!(tx, PlannedTransaction::Permit2Batch(_)));

        for batch in batches {
            let Some(priced) = self.price(batch, &mut outcomes).await else { continue };
            if priced.cost > budget {
                warn!(cost = %priced.cost, %budget, "Insufficient budget for Permit2 batch");
                self.metrics.transfers_skipped.increment(1);
                outcomes.extend(priced.tx.outcomes(MigrationOutcome::TOKEN_FAILED));
                continue;
            }
            outcomes.extend(self.execute(&priced.tx).await);
            budget -= priced.cost;
        }

        let mut priced = Vec::with_capacity(transactions.len());
        for tx in transactions {
            if let Some(tx) = self.price(tx, &mut outcomes).await {
                priced.push(tx);
            }
        }
        priced.sort_by_key(|tx| tx.cost);

        for PricedTransaction { tx, cost } in priced {
            if cost > budget {
                debug!(%cost, %budget, transfers = ?tx.transfers(), "Skipping transaction");
                self.metrics.transfers_skipped.increment(1);
                outcomes.extend(tx.outcomes(MigrationOutcome::INSUFFICIENT_BALANCE));
                continue;
            }
            outcomes.extend(self.execute(&tx).await);
            budget -= cost;
        }

        info!(remaining = %budget, "Sequenced transactions");

        (outcomes, budget)
    }

    /// Estimates the fee of `tx`. On failure records the outcome and returns `None`.
    async fn price(
        &self,
        tx: PlannedTransaction,
        outcomes: &mut Vec<MigrationOutcome>,
    ) -> Option<PricedTransaction> {
        let units = match tx.gas_estimate(
            self.gas.native_transfer,
            self.gas.erc20_transfer,
            self.gas.nft_transfer,
        ) {
            GasEstimate::Fixed(units) => units,
            GasEstimate::Simulated => {
                match self.chain.estimate_gas(&tx.build(self.permit2)).await {
                    Ok(units) => units,
                    Err(err) => {
                        warn!(%err, transfers = ?tx.transfers(), "Failed to estimate gas");
                        self.metrics.estimation_failures.increment(1);
                        outcomes.extend(tx.outcomes(MigrationOutcome::ESTIMATION_FAILED));
                        return None;
                    }
                }
            }
        };

        let cost = U256::from(units).saturating_mul(self.gas_price);
        Some(PricedTransaction { tx, cost })
    }

    /// Sends `tx` and returns its outcomes.
    async fn execute(&self, tx: &PlannedTransaction) -> Vec<MigrationOutcome> {
        let (sent, failed) = tx.messages();
        match self.chain.send_transaction(self.signer, tx.build(self.permit2)).await {
            Ok(tx_hash) => {
                self.metrics.transfers_sent.increment(1);
                debug!(%tx_hash, transfers = ?tx.transfers(), "Transaction sent");
                tx.outcomes(sent).into_iter().map(|outcome| outcome.with_tx_hash(tx_hash)).collect()
            }
            Err(err) => {
                self.metrics.transfers_failed.increment(1);
                warn!(%err, transfers = ?tx.transfers(), "Transaction failed");
                tx.outcomes(failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ChainError,
        types::{AssetKind, Erc20Transfer, NativeTransfer, NftTransfer, Permit2Batch, TokenAmount},
    };
    use alloy::{
        primitives::{B256, Bytes, ChainId},
        rpc::types::TransactionRequest,
        signers::local::PrivateKeySigner,
    };
    use std::sync::Mutex;

    /// Chain recording sent transactions, failing sends to `failing` and estimations when
    /// `estimate` is `None`.
    #[derive(Debug, Default)]
    struct Recorder {
        sent: Mutex<Vec<Address>>,
        failing: Option<Address>,
        estimate: Option<u64>,
    }

    #[async_trait::async_trait]
    impl ChainAccess for Recorder {
        fn chain_id(&self) -> ChainId {
            1
        }

        async fn token_name(&self, _: Address) -> Result<String, ChainError> {
            unimplemented!()
        }

        async fn permit_nonce(&self, _: Address, _: Address) -> Result<U256, ChainError> {
            unimplemented!()
        }

        async fn nonce_bitmap(&self, _: Address, _: U256) -> Result<U256, ChainError> {
            unimplemented!()
        }

        async fn estimate_gas(&self, _: &TransactionRequest) -> Result<u64, ChainError> {
            self.estimate.ok_or(ChainError::Reverted(B256::ZERO))
        }

        async fn send_transaction(
            &self,
            _: &DynSigner,
            tx: TransactionRequest,
        ) -> Result<B256, ChainError> {
            let to = tx.to.and_then(|to| to.to().copied()).unwrap_or_default();
            self.sent.lock().unwrap().push(to);
            if self.failing == Some(to) {
                return Err(ChainError::Reverted(B256::with_last_byte(1)));
            }
            Ok(B256::with_last_byte(2))
        }
    }

    fn native(to: Address) -> PlannedTransaction {
        PlannedTransaction::Native(NativeTransfer {
            from: Address::ZERO,
            to,
            token: Address::ZERO,
            amount: U256::from(1),
        })
    }

    fn erc20(token: Address) -> PlannedTransaction {
        PlannedTransaction::Erc20Direct(Erc20Transfer {
            from: Address::ZERO,
            to: Address::with_last_byte(0xff),
            token,
            amount: U256::from(1),
            kind: AssetKind::Cryptocurrency,
        })
    }

    fn nft(token: Address) -> PlannedTransaction {
        PlannedTransaction::Nft(NftTransfer {
            from: Address::ZERO,
            to: Address::with_last_byte(0xff),
            token,
            token_id: U256::from(5),
        })
    }

    fn batch(tokens: &[Address]) -> PlannedTransaction {
        PlannedTransaction::Permit2Batch(Permit2Batch {
            owner: Address::ZERO,
            spender: Address::ZERO,
            permitted: tokens.iter().map(|&t| TokenAmount::new(t, U256::from(3))).collect(),
            nonce: U256::ZERO,
            deadline: U256::ZERO,
            transfer_details: vec![],
            signature: Bytes::new(),
        })
    }

    fn gas() -> GasConfig {
        GasConfig { native_transfer: 1, erc20_transfer: 3, nft_transfer: 2, forward_relay: 0 }
    }

    #[tokio::test]
    async fn cheapest_first_and_budget_debits() {
        let chain = Recorder { failing: Some(Address::with_last_byte(0xa)), ..Default::default() };
        let signer = DynSigner::from(PrivateKeySigner::random());
        let metrics = MigrationMetrics::default();
        let sequencer =
            Sequencer::new(&chain, &signer, gas(), U256::from(10), Address::ZERO, &metrics);

        let token_a = Address::with_last_byte(0xa);
        let nft_b = Address::with_last_byte(0xb);
        let receiver = Address::with_last_byte(0xc);

        // costs: erc20 30, nft 20, native 10
        let (outcomes, remaining) = sequencer
            .sequence(vec![erc20(token_a), nft(nft_b), native(receiver)], U256::from(45))
            .await;

        // native (10) and nft (20) fit, then the erc20 (30) exceeds the remaining 15
        assert_eq!(remaining, U256::from(15));
        assert_eq!(*chain.sent.lock().unwrap(), vec![receiver, nft_b]);
        let messages = outcomes.iter().map(|o| o.message.as_str()).collect::<Vec<_>>();
        assert_eq!(
            messages,
            [
                MigrationOutcome::NATIVE_SENT,
                MigrationOutcome::NFT_SENT,
                MigrationOutcome::INSUFFICIENT_BALANCE
            ]
        );
        assert_eq!(outcomes[1].amount, Some(U256::from(1)));
        assert_eq!(outcomes[1].token_id, Some(U256::from(5)));
        assert!(outcomes[0].tx_hash.is_some());
    }

    #[tokio::test]
    async fn failed_transfers_are_debited() {
        let token_a = Address::with_last_byte(0xa);
        let chain = Recorder { failing: Some(token_a), ..Default::default() };
        let signer = DynSigner::from(PrivateKeySigner::random());
        let metrics = MigrationMetrics::default();
        let sequencer =
            Sequencer::new(&chain, &signer, gas(), U256::from(1), Address::ZERO, &metrics);

        let (outcomes, remaining) = sequencer.sequence(vec![erc20(token_a)], U256::from(3)).await;

        assert_eq!(remaining, U256::ZERO);
        assert_eq!(outcomes[0].message, MigrationOutcome::TOKEN_FAILED);
        assert!(outcomes[0].tx_hash.is_none());
    }

    #[tokio::test]
    async fn batch_runs_first_or_fails_whole() {
        let tokens = [Address::with_last_byte(1), Address::with_last_byte(2)];
        let signer = DynSigner::from(PrivateKeySigner::random());
        let metrics = MigrationMetrics::default();
        let permit2 = Address::with_last_byte(0x22);

        let chain = Recorder { estimate: Some(4), ..Default::default() };
        let sequencer = Sequencer::new(&chain, &signer, gas(), U256::from(1), permit2, &metrics);
        let (outcomes, remaining) = sequencer
            .sequence(vec![native(Address::with_last_byte(9)), batch(&tokens)], U256::from(4))
            .await;
        assert_eq!(*chain.sent.lock().unwrap(), vec![permit2]);
        assert_eq!(remaining, U256::ZERO);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].message, MigrationOutcome::TOKEN_SENT);
        assert_eq!(outcomes[1].token, tokens[1]);
        assert_eq!(outcomes[2].message, MigrationOutcome::INSUFFICIENT_BALANCE);

        let chain = Recorder { estimate: Some(6), ..Default::default() };
        let sequencer = Sequencer::new(&chain, &signer, gas(), U256::from(1), permit2, &metrics);
        let (outcomes, remaining) = sequencer.sequence(vec![batch(&tokens)], U256::from(5)).await;
        assert!(chain.sent.lock().unwrap().is_empty());
        assert_eq!(remaining, U256::from(5));
        assert!(outcomes.iter().all(|o| o.message == MigrationOutcome::TOKEN_FAILED));
        assert_eq!(outcomes.len(), 2);
    }

    #[tokio::test]
    async fn estimation_failure_is_reported() {
        let tokens = [Address::with_last_byte(1), Address::with_last_byte(2)];
        let chain = Recorder::default();
        let signer = DynSigner::from(PrivateKeySigner::random());
        let metrics = MigrationMetrics::default();
        let sequencer =
            Sequencer::new(&chain, &signer, gas(), U256::from(1), Address::ZERO, &metrics);

        let (outcomes, remaining) = sequencer.sequence(vec![batch(&tokens)], U256::from(100)).await;

        assert_eq!(remaining, U256::from(100));
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.message == MigrationOutcome::ESTIMATION_FAILED));
    }
}
