use super::{IBatchSignatureTransfer, ISignatureTransfer, TokenAmount};
use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
};
use serde::{Deserialize, Serialize};

sol! {
    /// ERC-2612 permit message.
    #[derive(Debug)]
    struct Permit {
        address owner;
        address spender;
        uint256 value;
        uint256 nonce;
        uint256 deadline;
    }

    /// Permit2 token permission.
    #[derive(Debug)]
    struct TokenPermissions {
        address token;
        uint256 amount;
    }

    /// Permit2 single signature transfer message.
    #[derive(Debug)]
    struct PermitTransferFrom {
        TokenPermissions permitted;
        address spender;
        uint256 nonce;
        uint256 deadline;
    }

    /// Permit2 batch signature transfer message.
    #[derive(Debug)]
    struct PermitBatchTransferFrom {
        TokenPermissions[] permitted;
        address spender;
        uint256 nonce;
        uint256 deadline;
    }
}

impl From<TokenAmount> for TokenPermissions {
    fn from(value: TokenAmount) -> Self {
        Self { token: value.token, amount: value.amount }
    }
}

/// A signed ERC-2612 permit granting Permit2 an allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPermit {
    /// Token the permit is for.
    pub token: Address,
    /// Token owner.
    pub owner: Address,
    /// Spender receiving the allowance.
    pub spender: Address,
    /// Allowance value.
    pub value: U256,
    /// Permit nonce of the owner on the token.
    pub nonce: U256,
    /// Expiry timestamp.
    pub deadline: U256,
    /// 65-byte signature.
    pub signature: Bytes,
}

/// Where a Permit2 transfer sends its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDetail {
    /// Recipient.
    pub to: Address,
    /// Amount to transfer.
    pub requested_amount: U256,
}

/// A Permit2 single-token signature transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit2Single {
    /// Token owner and signer.
    pub owner: Address,
    /// Address allowed to execute the transfer.
    pub spender: Address,
    /// Permitted token and amount.
    pub permitted: TokenAmount,
    /// Unordered Permit2 nonce.
    pub nonce: U256,
    /// Expiry timestamp.
    pub deadline: U256,
    /// Recipient of the transfer.
    pub transfer_details: TransferDetail,
    /// 65-byte signature over [`PermitTransferFrom`].
    pub signature: Bytes,
}

impl Permit2Single {
    /// Returns the EIP-712 message signed by the owner.
    pub fn message(&self) -> PermitTransferFrom {
        PermitTransferFrom {
            permitted: self.permitted.into(),
            spender: self.spender,
            nonce: self.nonce,
            deadline: self.deadline,
        }
    }

    /// Returns the Permit2 call executing this transfer.
    pub fn call(&self) -> ISignatureTransfer::permitTransferFromCall {
        ISignatureTransfer::permitTransferFromCall {
            permit: ISignatureTransfer::PermitTransferFrom {
                permitted: ISignatureTransfer::TokenPermissions {
                    token: self.permitted.token,
                    amount: self.permitted.amount,
                },
                nonce: self.nonce,
                deadline: self.deadline,
            },
            transferDetails: ISignatureTransfer::SignatureTransferDetails {
                to: self.transfer_details.to,
                requestedAmount: self.transfer_details.requested_amount,
            },
            owner: self.owner,
            signature: self.signature.clone(),
        }
    }
}

/// A Permit2 batch signature transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit2Batch {
    /// Token owner and signer.
    pub owner: Address,
    /// Address allowed to execute the transfer.
    pub spender: Address,
    /// Permitted tokens and amounts.
    pub permitted: Vec<TokenAmount>,
    /// Unordered Permit2 nonce.
    pub nonce: U256,
    /// Expiry timestamp.
    pub deadline: U256,
    /// Recipients, index-aligned with `permitted`.
    pub transfer_details: Vec<TransferDetail>,
    /// 65-byte signature over [`PermitBatchTransferFrom`].
    pub signature: Bytes,
}

impl Permit2Batch {
    /// Returns the EIP-712 message signed by the owner.
    pub fn message(&self) -> PermitBatchTransferFrom {
        PermitBatchTransferFrom {
            permitted: self.permitted.iter().copied().map(Into::into).collect(),
            spender: self.spender,
            nonce: self.nonce,
            deadline: self.deadline,
        }
    }

    /// Returns the Permit2 call executing this transfer.
    pub fn call(&self) -> IBatchSignatureTransfer::permitTransferFromCall {
        IBatchSignatureTransfer::permitTransferFromCall {
            permit: IBatchSignatureTransfer::PermitBatchTransferFrom {
                permitted: self
                    .permitted
                    .iter()
                    .map(|p| IBatchSignatureTransfer::TokenPermissions {
                        token: p.token,
                        amount: p.amount,
                    })
                    .collect(),
                nonce: self.nonce,
                deadline: self.deadline,
            },
            transferDetails: self
                .transfer_details
                .iter()
                .map(|d| IBatchSignatureTransfer::SignatureTransferDetails {
                    to: d.to,
                    requestedAmount: d.requested_amount,
                })
                .collect(),
            owner: self.owner,
            signature: self.signature.clone(),
        }
    }
}

/// A signed Permit2 transfer, single or batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedPermit2 {
    /// Exactly one token.
    Single(Permit2Single),
    /// Two or more tokens.
    Batch(Permit2Batch),
}
