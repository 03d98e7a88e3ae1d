//! Permit2 unordered nonce acquisition.
//!
//! Permit2 tracks used nonces in 256-bit words: nonce `n` is bit `n & 0xff` of word `n >> 8` in
//! the owner's nonce bitmap.

use crate::{chain::ChainAccess, error::SigningError};
use alloy::primitives::{Address, U256};
use tracing::trace;

/// Returns a random starting point for [`find_unused_nonce`].
pub fn random_nonce() -> U256 {
    U256::from(rand::random::<u64>())
}

/// Probes candidates starting at `start` until one is unused in the Permit2 nonce bitmap of
/// `owner`, giving up after `max_attempts` candidates.
///
/// Each bitmap word is fetched once.
pub async fn find_unused_nonce(
    chain: &dyn ChainAccess,
    owner: Address,
    start: U256,
    max_attempts: usize,
) -> Result<U256, SigningError> {
    let mut word: Option<(U256, U256)> = None;
    let mut candidate = start;

    for _ in 0..max_attempts {
        let position = candidate >> 8;
        let bitmap = match word {
            Some((cached, bitmap)) if cached == position => bitmap,
            _ => {
                let bitmap = chain.nonce_bitmap(owner, position).await?;
                word = Some((position, bitmap));
                bitmap
            }
        };

        let bit = candidate.as_limbs()[0] as usize & 0xff;
        if !bitmap.bit(bit) {
            return Ok(candidate);
        }

        trace!(%candidate, "Permit2 nonce already used");
        candidate = candidate.wrapping_add(U256::ONE);
    }

    Err(SigningError::NonceExhausted { attempts: max_attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ChainError, signers::DynSigner};
    use alloy::{
        primitives::{B256, ChainId},
        rpc::types::TransactionRequest,
    };
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    /// Chain that only answers nonce bitmap reads.
    #[derive(Debug, Default)]
    struct Bitmaps {
        words: HashMap<U256, U256>,
        reads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ChainAccess for Bitmaps {
        fn chain_id(&self) -> ChainId {
            1
        }

        async fn token_name(&self, _: Address) -> Result<String, ChainError> {
            unimplemented!()
        }

        async fn permit_nonce(&self, _: Address, _: Address) -> Result<U256, ChainError> {
            unimplemented!()
        }

        async fn nonce_bitmap(&self, _: Address, word: U256) -> Result<U256, ChainError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.words.get(&word).copied().unwrap_or_default())
        }

        async fn estimate_gas(&self, _: &TransactionRequest) -> Result<u64, ChainError> {
            unimplemented!()
        }

        async fn send_transaction(
            &self,
            _: &DynSigner,
            _: TransactionRequest,
        ) -> Result<B256, ChainError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn unused_start_is_returned() {
        let chain = Bitmaps::default();
        let nonce = find_unused_nonce(&chain, Address::ZERO, U256::from(42), 256).await.unwrap();
        assert_eq!(nonce, U256::from(42));
    }

    #[tokio::test]
    async fn skips_used_bits_across_words() {
        // bits 250..=255 of word 0 and bits 0..=1 of word 1 are used
        let mut words = HashMap::new();
        words.insert(U256::ZERO, U256::MAX << 250);
        words.insert(U256::ONE, U256::from(0b11));
        let chain = Bitmaps { words, ..Default::default() };

        let nonce = find_unused_nonce(&chain, Address::ZERO, U256::from(250), 256).await.unwrap();
        assert_eq!(nonce, U256::from(258));
        assert_eq!(chain.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn bounded_search_fails() {
        let mut words = HashMap::new();
        words.insert(U256::ZERO, U256::MAX);
        let chain = Bitmaps { words, ..Default::default() };

        let err = find_unused_nonce(&chain, Address::ZERO, U256::ZERO, 16).await.unwrap_err();
        assert!(matches!(err, SigningError::NonceExhausted { attempts: 16 }));
        assert_eq!(chain.reads.load(Ordering::SeqCst), 1);
    }
}
