use alloy::primitives::ChainId;

/// Errors that reject a migration before anything is signed or sent.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The chain is not supported.
    #[error("unsupported chain {0}")]
    UnsupportedChain(ChainId),
    /// No signer was supplied for the source account.
    #[error("a sender signer is required")]
    MissingSigner,
    /// The requested migration route cannot be served.
    #[error("unsupported migration route: {0}")]
    UnsupportedRoute(&'static str),
    /// The forwarded tokens are not worth enough to pay the relay fee.
    #[error("relay fee of {fee_usd} USD exceeds forwarded value of {available_usd} USD")]
    InsufficientFeeCoverage {
        /// The relay fee in USD.
        fee_usd: f64,
        /// The USD value of all forwarded tokens.
        available_usd: f64,
    },
}
