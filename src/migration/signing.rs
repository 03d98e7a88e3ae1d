//! ERC-2612 permit and Permit2 signature production.
use super::planner::Permit2Strategy;
use crate::{
    chain::ChainAccess,
    config::SigningConfig,
    eip712::{permit_domain, permit2_domain, sign_typed},
    error::SigningError,
    metrics::MigrationMetrics,
    nonce::{find_unused_nonce, random_nonce},
    signers::DynSigner,
    types::{
        Permit, Permit2Batch, Permit2Single, SignedPermit, SignedPermit2, TokenAmount,
        TransferDetail,
    },
};
use alloy::primitives::{Address, Bytes, U256};
use chrono::Utc;
use futures_util::future::join_all;
use std::time::Duration;
use tracing::{debug, warn};

/// Produces the signatures of a migration on behalf of its sender.
#[derive(Debug)]
pub struct PermitSigner<'a> {
    chain: &'a dyn ChainAccess,
    signer: &'a DynSigner,
    config: &'a SigningConfig,
    permit2: Address,
    metrics: &'a MigrationMetrics,
}

impl<'a> PermitSigner<'a> {
    /// Create a new [`PermitSigner`].
    pub const fn new(
        chain: &'a dyn ChainAccess,
        signer: &'a DynSigner,
        config: &'a SigningConfig,
        permit2: Address,
        metrics: &'a MigrationMetrics,
    ) -> Self {
        Self { chain, signer, config, permit2, metrics }
    }

    /// Signs an unlimited ERC-2612 permit for Permit2 on every token, concurrently.
    ///
    /// Results are returned in the order of `tokens`. A failure only affects its own token.
    pub async fn sign_permits(
        &self,
        tokens: &[TokenAmount],
    ) -> Vec<(TokenAmount, Result<SignedPermit, SigningError>)> {
        let results = join_all(tokens.iter().map(|token| self.sign_permit(token.token))).await;

        tokens
            .iter()
            .copied()
            .zip(results)
            .inspect(|(token, result)| match result {
                Ok(_) => self.metrics.signatures.increment(1),
                Err(err) => {
                    self.metrics.signature_failures.increment(1);
                    warn!(token = %token.token, %err, "Failed to sign permit");
                }
            })
            .collect()
    }

    /// Signs an unlimited ERC-2612 permit granting Permit2 an allowance on `token`.
    pub async fn sign_permit(&self, token: Address) -> Result<SignedPermit, SigningError> {
        let owner = self.signer.address();
        let (name, nonce) = futures_util::try_join!(
            self.chain.token_name(token),
            self.chain.permit_nonce(token, owner)
        )?;

        let permit = Permit {
            owner,
            spender: self.permit2,
            value: U256::MAX,
            nonce,
            deadline: deadline(self.config.permit_deadline),
        };
        let domain = permit_domain(name, self.chain.chain_id(), token);
        let signature = sign_typed(self.signer, &permit, &domain).await?;

        debug!(%token, %nonce, "Signed permit");

        Ok(SignedPermit {
            token,
            owner,
            spender: permit.spender,
            value: permit.value,
            nonce,
            deadline: permit.deadline,
            signature,
        })
    }

    /// Signs the Permit2 transfer chosen by `strategy`, letting `spender` execute it.
    ///
    /// `recipient` decides where each token goes. Returns `None` if there is nothing to sign.
    pub async fn sign_permit2(
        &self,
        strategy: &Permit2Strategy,
        spender: Address,
        recipient: impl Fn(&TokenAmount) -> Address,
    ) -> Result<Option<SignedPermit2>, SigningError> {
        let result = self.try_sign_permit2(strategy, spender, recipient).await;
        match &result {
            Ok(None) => {}
            Ok(Some(_)) => self.metrics.signatures.increment(1),
            Err(err) => {
                self.metrics.signature_failures.increment(1);
                warn!(tokens = ?strategy.tokens(), %err, "Failed to sign Permit2 transfer");
            }
        }
        result
    }

    async fn try_sign_permit2(
        &self,
        strategy: &Permit2Strategy,
        spender: Address,
        recipient: impl Fn(&TokenAmount) -> Address,
    ) -> Result<Option<SignedPermit2>, SigningError> {
        if matches!(strategy, Permit2Strategy::None) {
            return Ok(None);
        }

        let owner = self.signer.address();
        let nonce =
            find_unused_nonce(self.chain, owner, random_nonce(), self.config.max_nonce_attempts)
                .await?;
        let deadline = deadline(self.config.permit2_deadline);
        let domain = permit2_domain(self.chain.chain_id(), self.permit2);
        let detail = |token: &TokenAmount| TransferDetail {
            to: recipient(token),
            requested_amount: token.amount,
        };

        let signed = match strategy {
            Permit2Strategy::Single(token) => {
                let mut single = Permit2Single {
                    owner,
                    spender,
                    permitted: *token,
                    nonce,
                    deadline,
                    transfer_details: detail(token),
                    signature: Bytes::new(),
                };
                single.signature = sign_typed(self.signer, &single.message(), &domain).await?;
                SignedPermit2::Single(single)
            }
            Permit2Strategy::Batch(tokens) => {
                let mut batch = Permit2Batch {
                    owner,
                    spender,
                    permitted: tokens.clone(),
                    nonce,
                    deadline,
                    transfer_details: tokens.iter().map(detail).collect(),
                    signature: Bytes::new(),
                };
                batch.signature = sign_typed(self.signer, &batch.message(), &domain).await?;
                SignedPermit2::Batch(batch)
            }
            Permit2Strategy::None => return Ok(None),
        };

        debug!(%nonce, %spender, tokens = strategy.tokens().len(), "Signed Permit2 transfer");

        Ok(Some(signed))
    }
}

/// Returns the unix timestamp `lifetime` from now.
fn deadline(lifetime: Duration) -> U256 {
    U256::from(Utc::now().timestamp().max(0) as u64 + lifetime.as_secs())
}
