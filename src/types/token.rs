use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Classification of an asset held by the source account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// The chain's native currency, also reported as dust.
    #[serde(alias = "dust")]
    Native,
    /// An ERC-20 stablecoin.
    Stablecoin,
    /// Any other ERC-20 token.
    Cryptocurrency,
    /// An ERC-721 collection.
    Nft,
}

impl AssetKind {
    /// Returns true if this is [`AssetKind::Native`].
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Returns true if this is an ERC-20 token.
    pub const fn is_erc20(&self) -> bool {
        matches!(self, Self::Stablecoin | Self::Cryptocurrency)
    }

    /// Returns true if this is [`AssetKind::Nft`].
    pub const fn is_nft(&self) -> bool {
        matches!(self, Self::Nft)
    }
}

/// Allowance the owner granted to the Permit2 contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permit2Allowance {
    /// A finite allowance, possibly zero.
    Limited(U256),
    /// The maximum allowance.
    Unlimited,
}

impl Default for Permit2Allowance {
    fn default() -> Self {
        Self::Limited(U256::ZERO)
    }
}

impl Permit2Allowance {
    /// Returns true if Permit2 may move tokens on behalf of the owner.
    pub fn is_eligible(&self) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Limited(amount) => !amount.is_zero(),
        }
    }

    /// Returns true if no allowance was granted.
    pub fn is_zero(&self) -> bool {
        !self.is_eligible()
    }
}

/// An asset held by the source account, as reported by the balance API.
///
/// Taken once per migration and never refreshed while it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSnapshot {
    /// Token address.
    pub address: Address,
    /// Token decimals.
    #[serde(default)]
    pub decimals: u8,
    /// Raw balance. For NFTs, the number of owned tokens.
    pub balance: U256,
    /// Asset classification.
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Allowance granted to Permit2.
    #[serde(default, with = "crate::serde::allowance")]
    pub permit2_allowance: Permit2Allowance,
    /// Whether the token implements ERC-2612 `permit`.
    #[serde(default)]
    pub permit_exists: bool,
    /// Owned token ids, NFTs only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nft_ids: Vec<U256>,
    /// USD price of one whole token, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl TokenSnapshot {
    /// Returns whether the snapshot holds anything to migrate.
    pub fn is_empty(&self) -> bool {
        if self.kind.is_nft() { self.nft_ids.is_empty() } else { self.balance.is_zero() }
    }

    /// Returns whether the token can be moved by a Permit2 signature transfer.
    pub fn is_permit2_eligible(&self) -> bool {
        self.kind.is_erc20() && self.permit2_allowance.is_eligible()
    }

    /// Returns whether an ERC-2612 permit is needed and possible before using Permit2.
    pub fn needs_permit(&self) -> bool {
        self.kind.is_erc20() && self.permit_exists && self.permit2_allowance.is_zero()
    }

    /// Returns the USD price of one whole token, assuming par value for stablecoins.
    pub fn usd_price(&self) -> Option<f64> {
        self.price.or(matches!(self.kind, AssetKind::Stablecoin).then_some(1.0))
    }
}

/// A transfer the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Token address. Matched against snapshots case-insensitively.
    pub token: Address,
    /// Amount to transfer. `None` transfers the full available balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<U256>,
    /// Token ids to transfer, NFTs only. `None` transfers every owned id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_ids: Option<Vec<U256>>,
}

impl TransferRequest {
    /// Creates a request for the full balance of `token`.
    pub const fn full(token: Address) -> Self {
        Self { token, amount: None, token_ids: None }
    }

    /// Sets the amount to transfer.
    pub fn with_amount(mut self, amount: U256) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the NFT ids to transfer.
    pub fn with_token_ids(mut self, token_ids: Vec<U256>) -> Self {
        self.token_ids = Some(token_ids);
        self
    }
}

/// A token and an amount of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    /// Token address.
    pub token: Address,
    /// Raw amount.
    pub amount: U256,
}

impl TokenAmount {
    /// Create a new instance of [`Self`].
    pub const fn new(token: Address, amount: U256) -> Self {
        Self { token, amount }
    }
}
