use super::{Permit2Batch, Permit2Single, SignedPermit, SignedPermit2, TokenAmount};
use alloy::primitives::ChainId;
use serde::{Deserialize, Serialize};

/// Kind of a relayed authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationKind {
    /// ERC-2612 permit.
    Permit,
    /// Permit2 single signature transfer.
    Permit2Single,
    /// Permit2 batch signature transfer.
    Permit2Batch,
}

/// A signed authorization submitted through the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayedAuthorization {
    /// ERC-2612 permit granting Permit2 an allowance.
    Permit(SignedPermit),
    /// Permit2 single signature transfer.
    Permit2Single(Permit2Single),
    /// Permit2 batch signature transfer.
    Permit2Batch(Permit2Batch),
}

impl RelayedAuthorization {
    /// Returns the kind of this authorization.
    pub const fn kind(&self) -> AuthorizationKind {
        match self {
            Self::Permit(_) => AuthorizationKind::Permit,
            Self::Permit2Single(_) => AuthorizationKind::Permit2Single,
            Self::Permit2Batch(_) => AuthorizationKind::Permit2Batch,
        }
    }
}

impl From<SignedPermit2> for RelayedAuthorization {
    fn from(value: SignedPermit2) -> Self {
        match value {
            SignedPermit2::Single(single) => Self::Permit2Single(single),
            SignedPermit2::Batch(batch) => Self::Permit2Batch(batch),
        }
    }
}

/// Request body of a relay dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    /// Chain to submit on.
    pub chain_id: ChainId,
    /// Authorizations, submitted in order.
    pub authorizations: Vec<RelayedAuthorization>,
    /// API key of the caller.
    pub api_key: String,
}

/// Relay answer for one authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResult {
    /// Kind of the authorization.
    #[serde(rename = "type")]
    pub kind: AuthorizationKind,
    /// Tokens covered by the authorization.
    #[serde(default)]
    pub token_info: Vec<TokenAmount>,
    /// Relay task id, if the relay accepted the authorization.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Relay task status.
    #[serde(default)]
    pub status: String,
}
