//! Migration signers.

mod r#dyn;
use alloy::primitives::{B256, Bytes};
pub use r#dyn::DynSigner;

/// Trait for a [EIP-712] payload signer.
///
/// [EIP-712]: https://eips.ethereum.org/EIPS/eip-712
#[async_trait::async_trait]
pub trait Eip712PayLoadSigner: std::fmt::Debug + Send + Sync {
    /// Signs the [EIP-712] payload hash.
    ///
    /// Returns the 65-byte signature as [`Bytes`].
    ///
    /// [EIP-712]: https://eips.ethereum.org/EIPS/eip-712
    async fn sign_payload_hash(&self, payload_hash: B256) -> eyre::Result<Bytes>;
}
