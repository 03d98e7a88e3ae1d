//! Migrator constants.

use alloy::primitives::{Address, address};
use alloy_chains::NamedChain;
use std::time::Duration;

/// The canonical Permit2 deployment, identical on every supported chain.
///
/// See <https://github.com/Uniswap/permit2>
pub const PERMIT2_ADDRESS: Address = address!("0x000000000022D473030F116dDEE9F6B43aC78BA3");

/// Gas units charged for a plain native value transfer.
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Gas units assumed for a direct ERC-20 `transfer`.
pub const ERC20_TRANSFER_GAS: u64 = 65_000;

/// Gas units assumed for a single ERC-721 `safeTransferFrom`.
pub const NFT_TRANSFER_GAS: u64 = 100_000;

/// Gas units the relay charges for submitting a Permit2 batch on the forward route.
pub const FORWARD_RELAY_GAS: u64 = 250_000;

/// Lifetime of an ERC-2612 permit signature.
pub const PERMIT_DEADLINE: Duration = Duration::from_secs(60 * 60);

/// Lifetime of a Permit2 signature transfer.
pub const PERMIT2_DEADLINE: Duration = Duration::from_secs(24 * 60 * 60);

/// Maximum number of Permit2 nonce candidates probed before giving up.
///
/// Covers one full bitmap word.
pub const MAX_NONCE_ATTEMPTS: usize = 256;

/// Share of the native balance transferred when no explicit amount is requested. The rest is
/// kept to pay for the migration's own transactions.
pub const NATIVE_TRANSFER_PERCENT: u8 = 80;

/// Default timeout for the balance and price API.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for the relay API.
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for a single chain RPC request.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time to wait for a submitted transaction to be included.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Chains with a Permit2 deployment that the balance API indexes.
pub const SUPPORTED_CHAINS: &[NamedChain] = &[
    NamedChain::Mainnet,
    NamedChain::Sepolia,
    NamedChain::Optimism,
    NamedChain::Arbitrum,
    NamedChain::Base,
    NamedChain::BaseSepolia,
    NamedChain::Polygon,
    NamedChain::BinanceSmartChain,
    NamedChain::Avalanche,
];
