use super::ChainError;

/// Errors returned while producing ERC-2612 or Permit2 signatures.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// Reading the token name or nonce failed.
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// The signer refused or failed to sign the payload.
    #[error(transparent)]
    Signer(#[from] eyre::Error),
    /// No unused Permit2 nonce was found within the search bound.
    #[error("no unused permit2 nonce found after {attempts} attempts")]
    NonceExhausted {
        /// Number of candidates probed.
        attempts: usize,
    },
}
