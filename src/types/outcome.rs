use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// The terminal result of one unit of migration work.
///
/// There is one outcome per distinct `(token, token id)` pair: an NFT request for `N` ids yields
/// `N` outcomes. Callers inspect [`MigrationOutcome::message`] to learn whether the unit
/// succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationOutcome {
    /// Token address, serialized lower-case.
    #[serde(with = "crate::serde::address")]
    pub token: Address,
    /// Amount, echoed as requested for rejected requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<U256>,
    /// NFT token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<U256>,
    /// Relay task id, gasless transfers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Relay task status, gasless transfers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Transaction hash, direct transfers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,
    /// Human-readable result.
    pub message: String,
}

impl MigrationOutcome {
    /// The requested token is not held by the source account.
    pub const UNKNOWN_TOKEN: &'static str = "Supplied token does not exist";
    /// The token was already requested earlier in the same call.
    pub const DUPLICATE_TOKEN: &'static str = "Duplicate token address";
    /// The requested amount exceeds the held balance.
    pub const AMOUNT_EXCEEDS_BALANCE: &'static str = "Supplied amount is greater than balance";
    /// Signing the ERC-2612 permit failed.
    pub const PERMIT_FAILED: &'static str = "Permit token failed";
    /// The fee budget cannot pay for the transaction.
    pub const INSUFFICIENT_BALANCE: &'static str = "Insufficient balance for transaction";
    /// The gas cost of the transaction could not be estimated.
    pub const ESTIMATION_FAILED: &'static str = "Unable to estimate gas";
    /// Native transfer submitted.
    pub const NATIVE_SENT: &'static str = "Native transfer tx sent";
    /// Native transfer failed.
    pub const NATIVE_FAILED: &'static str = "Native transfer failed";
    /// Token transfer submitted.
    pub const TOKEN_SENT: &'static str = "Token transfer tx sent";
    /// Token transfer failed.
    pub const TOKEN_FAILED: &'static str = "Token transfer failed";
    /// NFT transfer submitted.
    pub const NFT_SENT: &'static str = "Nft transfer tx sent";
    /// NFT transfer failed.
    pub const NFT_FAILED: &'static str = "Nft transfer failed";
    /// Relay accepted the transfer.
    pub const RELAY_SENT: &'static str = "Transaction sent";
    /// Relay rejected the transfer.
    pub const RELAY_FAILED: &'static str = "Transaction failed";

    /// Creates an outcome for `token` with `message`.
    pub fn new(token: Address, message: impl Into<String>) -> Self {
        Self {
            token,
            amount: None,
            token_id: None,
            task_id: None,
            status: None,
            tx_hash: None,
            message: message.into(),
        }
    }

    /// Sets the amount.
    pub fn with_amount(mut self, amount: impl Into<Option<U256>>) -> Self {
        self.amount = amount.into();
        self
    }

    /// Sets the NFT token id.
    pub fn with_token_id(mut self, token_id: impl Into<Option<U256>>) -> Self {
        self.token_id = token_id.into();
        self
    }

    /// Sets the transaction hash.
    pub fn with_tx_hash(mut self, tx_hash: B256) -> Self {
        self.tx_hash = Some(tx_hash);
        self
    }
}
