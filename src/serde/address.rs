//! Serializes an [`Address`] as lower-case hex.
//!
//! Any casing is accepted when deserializing.

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer, Serializer};

/// Serializes `address` as `0x`-prefixed lower-case hex.
pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{address:#x}"))
}

/// Deserializes an [`Address`] in any casing.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    Address::deserialize(deserializer)
}
