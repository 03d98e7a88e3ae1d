//! EIP-712 related helpers.

use crate::signers::Eip712PayLoadSigner;
use alloy::{
    primitives::{Address, Bytes, ChainId, U256},
    sol_types::{Eip712Domain, SolStruct, eip712_domain},
};

/// Returns the ERC-2612 permit domain of `token`.
///
/// Assumes the token uses version `"1"`, which holds for the OpenZeppelin implementation.
pub fn permit_domain(name: String, chain_id: ChainId, token: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(name.into()),
        Some("1".into()),
        Some(U256::from(chain_id)),
        Some(token),
        None,
    )
}

/// Returns the Permit2 domain.
pub fn permit2_domain(chain_id: ChainId, permit2: Address) -> Eip712Domain {
    eip712_domain! {
        name: "Permit2",
        chain_id: chain_id,
        verifying_contract: permit2,
    }
}

/// Signs the EIP-712 digest of `payload` under `domain`.
pub async fn sign_typed<T: SolStruct + Sync>(
    signer: &dyn Eip712PayLoadSigner,
    payload: &T,
    domain: &Eip712Domain,
) -> eyre::Result<Bytes> {
    signer.sign_payload_hash(payload.eip712_signing_hash(domain)).await
}
