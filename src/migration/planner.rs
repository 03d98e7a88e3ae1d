//! Turns accepted transfers into planned transactions and signature work.
use super::reconcile::AcceptedTransfer;
use crate::types::{
    Erc20Transfer, NativeTransfer, NftTransfer, PlannedTransaction, TokenAmount, TokenSnapshot,
};
use alloy::primitives::{Address, U256};

/// Work derived from the accepted transfers of a migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferPlan {
    /// Transactions the sender submits itself, in request order.
    pub direct: Vec<PlannedTransaction>,
    /// Tokens that need an ERC-2612 permit before they can move through Permit2.
    pub permit_candidates: Vec<TokenAmount>,
    /// Tokens Permit2 may already move.
    pub permit2: Vec<TokenAmount>,
    /// Native amount transferred to the receiver.
    pub native_amount: U256,
}

/// Plans `accepted` from `sender` to `receiver`.
///
/// Permit-capable tokens without a Permit2 allowance only take the permit track when
/// `allow_permits` is set, otherwise they are transferred directly.
pub fn plan(
    accepted: &[AcceptedTransfer],
    sender: Address,
    receiver: Address,
    allow_permits: bool,
) -> TransferPlan {
    let mut plan = TransferPlan::default();

    for transfer in accepted {
        let snapshot = &transfer.snapshot;
        let token = snapshot.address;

        if snapshot.kind.is_native() {
            plan.native_amount += transfer.amount;
            plan.direct.push(PlannedTransaction::Native(NativeTransfer {
                from: sender,
                to: receiver,
                token,
                amount: transfer.amount,
            }));
        } else if snapshot.kind.is_nft() {
            plan.direct.extend(transfer.token_ids.iter().map(|&token_id| {
                PlannedTransaction::Nft(NftTransfer { from: sender, to: receiver, token, token_id })
            }));
        } else if snapshot.is_permit2_eligible() {
            plan.permit2.push(TokenAmount::new(token, transfer.amount));
        } else if allow_permits && snapshot.needs_permit() {
            plan.permit_candidates.push(TokenAmount::new(token, transfer.amount));
        } else {
            plan.direct.push(PlannedTransaction::Erc20Direct(Erc20Transfer {
                from: sender,
                to: receiver,
                token,
                amount: transfer.amount,
                kind: snapshot.kind,
            }));
        }
    }

    plan
}

/// Returns the native balance available for fees once `native_amount` has been transferred.
pub fn fee_budget(snapshots: &[TokenSnapshot], native_amount: U256) -> U256 {
    snapshots
        .iter()
        .filter(|snapshot| snapshot.kind.is_native())
        .fold(U256::ZERO, |acc, snapshot| acc.saturating_add(snapshot.balance))
        .saturating_sub(native_amount)
}

/// How the Permit2-eligible tokens are transferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permit2Strategy {
    /// Nothing to transfer.
    None,
    /// A single signature transfer.
    Single(TokenAmount),
    /// One batch signature transfer covering every token.
    Batch(Vec<TokenAmount>),
}

impl Permit2Strategy {
    /// Selects the strategy by the number of eligible `tokens`.
    pub fn select(mut tokens: Vec<TokenAmount>) -> Self {
        match tokens.len() {
            0 => Self::None,
            1 => Self::Single(tokens.remove(0)),
            _ => Self::Batch(tokens),
        }
    }

    /// Returns the covered tokens.
    pub fn tokens(&self) -> &[TokenAmount] {
        match self {
            Self::None => &[],
            Self::Single(token) => std::slice::from_ref(token),
            Self::Batch(tokens) => tokens,
        }
    }
}
