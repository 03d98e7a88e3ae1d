//! Reconciliation of requested transfers against the balance snapshot.
use crate::types::{MigrationOutcome, TokenSnapshot, TransferRequest};
use alloy::primitives::{Address, U256};
use std::collections::HashSet;
use tracing::debug;

/// A request that matched a held asset and passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedTransfer {
    /// Snapshot of the matched asset.
    pub snapshot: TokenSnapshot,
    /// Amount to transfer. For NFTs, the number of accepted ids.
    pub amount: U256,
    /// Accepted token ids, NFTs only.
    pub token_ids: Vec<U256>,
}

impl AcceptedTransfer {
    /// Token address.
    pub fn token(&self) -> Address {
        self.snapshot.address
    }
}

/// Result of [`reconcile`].
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Requests to plan, in request order.
    pub accepted: Vec<AcceptedTransfer>,
    /// Terminal outcomes of rejected requests, in request order.
    pub outcomes: Vec<MigrationOutcome>,
}

/// Matches `requests` against `snapshots`.
///
/// Without a request list every non-empty snapshot is requested in full. Addresses are compared
/// by value, so hex casing never matters. A native request without an amount transfers
/// `native_percent` percent of the balance.
pub fn reconcile(
    requests: Option<&[TransferRequest]>,
    snapshots: &[TokenSnapshot],
    native_percent: u8,
) -> Reconciliation {
    let implicit;
    let requests = match requests {
        Some(requests) => requests,
        None => {
            implicit = snapshots
                .iter()
                .filter(|snapshot| !snapshot.is_empty())
                .map(|snapshot| TransferRequest::full(snapshot.address))
                .collect::<Vec<_>>();
            &implicit
        }
    };

    let mut reconciliation = Reconciliation::default();
    let mut seen = HashSet::new();

    for request in requests {
        if !seen.insert(request.token) {
            debug!(token = %request.token, "Duplicate token request");
            reconciliation.outcomes.extend(rejected(request, MigrationOutcome::DUPLICATE_TOKEN));
            continue;
        }

        let Some(snapshot) = snapshots.iter().find(|s| s.address == request.token) else {
            debug!(token = %request.token, "Requested token is not held");
            reconciliation.outcomes.extend(rejected(request, MigrationOutcome::UNKNOWN_TOKEN));
            continue;
        };

        if snapshot.kind.is_nft() {
            let requested = request.token_ids.as_deref().unwrap_or(&snapshot.nft_ids);
            if requested.is_empty() {
                debug!(token = %request.token, "No token ids to transfer");
                reconciliation
                    .outcomes
                    .push(MigrationOutcome::new(snapshot.address, MigrationOutcome::UNKNOWN_TOKEN));
                continue;
            }

            let mut token_ids = Vec::with_capacity(requested.len());
            for &token_id in requested {
                let message = if !snapshot.nft_ids.contains(&token_id) {
                    MigrationOutcome::UNKNOWN_TOKEN
                } else if token_ids.contains(&token_id) {
                    MigrationOutcome::DUPLICATE_TOKEN
                } else {
                    token_ids.push(token_id);
                    continue;
                };
                reconciliation.outcomes.push(
                    MigrationOutcome::new(snapshot.address, message).with_token_id(token_id),
                );
            }

            if !token_ids.is_empty() {
                reconciliation.accepted.push(AcceptedTransfer {
                    snapshot: snapshot.clone(),
                    amount: U256::from(token_ids.len()),
                    token_ids,
                });
            }
            continue;
        }

        let amount = match request.amount {
            Some(amount) if amount > snapshot.balance => {
                debug!(token = %request.token, %amount, balance = %snapshot.balance, "Requested amount exceeds balance");
                reconciliation.outcomes.push(
                    MigrationOutcome::new(snapshot.address, MigrationOutcome::AMOUNT_EXCEEDS_BALANCE)
                        .with_amount(amount),
                );
                continue;
            }
            Some(amount) => amount,
            None if snapshot.kind.is_native() => {
                snapshot.balance / U256::from(100) * U256::from(native_percent)
            }
            None => snapshot.balance,
        };

        reconciliation.accepted.push(AcceptedTransfer {
            snapshot: snapshot.clone(),
            amount,
            token_ids: Vec::new(),
        });
    }

    reconciliation
}

/// Outcomes for a rejected request, one per token id if ids were given.
fn rejected(request: &TransferRequest, message: &str) -> Vec<MigrationOutcome> {
    match request.token_ids.as_deref() {
        Some(ids) if !ids.is_empty() => ids
            .iter()
            .map(|&id| MigrationOutcome::new(request.token, message).with_token_id(id))
            .collect(),
        _ => vec![MigrationOutcome::new(request.token, message).with_amount(request.amount)],
    }
}
