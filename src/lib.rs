//! # Migrator
//!
//! Library for migrating the assets of an account to another address, choosing per asset
//! between direct transfers, ERC-2612 permits and Permit2 signature transfers, submitted
//! either by the account itself or through a gasless relay.

pub mod api;
pub mod chain;
pub mod cli;
pub mod config;
pub mod constants;
pub mod eip712;
pub mod error;
pub mod metrics;
pub mod migration;
pub mod nonce;
pub mod serde;
pub mod signers;
pub mod transport;
pub mod types;
