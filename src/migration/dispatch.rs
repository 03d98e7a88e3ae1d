//! Relay dispatch and forward fee selection.
use crate::{
    error::ValidationError,
    types::{
        AuthorizationKind, MigrationOutcome, RelayResult, RelayedAuthorization, SignedPermit,
        SignedPermit2, TokenAmount, TokenSnapshot,
    },
};
use alloy::primitives::{
    Address, U256,
    utils::{Unit, format_units},
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Orders the signed authorizations for the relay: permits first, then the Permit2 transfer
/// that relies on them.
pub fn authorizations(
    permits: Vec<SignedPermit>,
    permit2: Option<SignedPermit2>,
) -> Vec<RelayedAuthorization> {
    permits
        .into_iter()
        .map(RelayedAuthorization::Permit)
        .chain(permit2.map(Into::into))
        .collect()
}

/// Maps relay results to outcomes, in relay order.
///
/// Every token of a Permit2 result gets its own outcome with the shared task id and status.
/// Permit results carry no transfer and are only logged. Tokens of a `dispatched` Permit2
/// transfer that no result mentions are reported as failed after the relay's answers.
pub fn relay_outcomes(
    dispatched: &[RelayedAuthorization],
    results: Vec<RelayResult>,
) -> Vec<MigrationOutcome> {
    let mut outcomes = Vec::new();
    let mut answered = HashSet::new();
    for result in results {
        if result.kind == AuthorizationKind::Permit {
            debug!(task_id = ?result.task_id, status = %result.status, tokens = ?result.token_info, "Relay accepted permit");
            continue;
        }

        let message = match &result.task_id {
            Some(_) => MigrationOutcome::RELAY_SENT,
            None => {
                warn!(status = %result.status, tokens = ?result.token_info, "Relay rejected transfer");
                MigrationOutcome::RELAY_FAILED
            }
        };

        answered.extend(result.token_info.iter().map(|token| token.token));
        outcomes.extend(result.token_info.iter().map(|token| MigrationOutcome {
            task_id: result.task_id.clone(),
            status: Some(result.status.clone()),
            ..MigrationOutcome::new(token.token, message).with_amount(token.amount)
        }));
    }

    let unanswered = dispatched
        .iter()
        .flat_map(|authorization| match authorization {
            RelayedAuthorization::Permit(_) => Vec::new(),
            RelayedAuthorization::Permit2Single(single) => vec![single.permitted],
            RelayedAuthorization::Permit2Batch(batch) => batch.permitted.clone(),
        })
        .filter(|token| !answered.contains(&token.token))
        .collect::<Vec<_>>();
    if !unanswered.is_empty() {
        warn!(tokens = ?unanswered, "Relay returned no result for transfer");
    }
    outcomes.extend(unanswered.into_iter().map(|token| {
        MigrationOutcome::new(token.token, MigrationOutcome::RELAY_FAILED).with_amount(token.amount)
    }));

    outcomes
}

/// Returns the USD cost of `gas` units at `gas_price` wei, given the native USD price.
pub fn relay_fee_usd(gas: u64, gas_price: U256, native_price: f64) -> f64 {
    to_f64(U256::from(gas).saturating_mul(gas_price), Unit::ETHER.get()) * native_price
}

/// Returns the USD value of `amount` of `snapshot`, or zero if the token has no price.
pub fn usd_value(snapshot: &TokenSnapshot, amount: U256) -> f64 {
    snapshot.usd_price().map_or(0.0, |price| to_f64(amount, snapshot.decimals) * price)
}

fn to_f64(amount: U256, decimals: u8) -> f64 {
    format_units(amount, decimals).ok().and_then(|units| units.parse().ok()).unwrap_or_default()
}

/// Picks the tokens that pay the relay fee on the forward route.
///
/// Tokens are taken in ascending USD value until their sum covers `fee_usd`. Returns the
/// addresses routed to the treasury.
pub fn select_fee_tokens(
    tokens: &[TokenAmount],
    snapshots: &[TokenSnapshot],
    fee_usd: f64,
) -> Result<HashSet<Address>, ValidationError> {
    let mut valued = tokens
        .iter()
        .filter_map(|token| {
            let snapshot = snapshots.iter().find(|s| s.address == token.token)?;
            Some((token.token, usd_value(snapshot, token.amount)))
        })
        .filter(|(_, value)| *value > 0.0)
        .collect::<Vec<_>>();
    valued.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut selected = HashSet::new();
    let mut covered = 0.0;
    for (token, value) in &valued {
        if covered >= fee_usd {
            break;
        }
        covered += value;
        selected.insert(*token);
    }

    if covered < fee_usd {
        return Err(ValidationError::InsufficientFeeCoverage {
            fee_usd,
            available_usd: covered,
        });
    }

    info!(fee_usd, covered_usd = covered, tokens = ?selected, "Selected relay fee tokens");

    Ok(selected)
}
