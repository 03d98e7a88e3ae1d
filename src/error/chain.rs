use alloy::{
    primitives::B256,
    providers::PendingTransactionError,
    transports::{RpcError, TransportErrorKind},
};

/// Errors returned while reading from or submitting to the chain.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// RPC error.
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// A contract call failed.
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),
    /// An error occurred during ABI encoding/decoding.
    #[error(transparent)]
    Abi(#[from] alloy::sol_types::Error),
    /// The transaction was included but reverted.
    #[error("transaction {0} reverted")]
    Reverted(B256),
    /// The transaction was sent but its inclusion could not be observed.
    #[error(transparent)]
    Pending(#[from] PendingTransactionError),
    /// Signing the transaction failed.
    #[error(transparent)]
    Sign(#[from] alloy::signers::Error),
}
