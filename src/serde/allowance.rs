//! Helpers for serializing and deserializing a [`Permit2Allowance`].
//!
//! The balance API reports an unlimited Permit2 allowance as `-1`, either as a JSON number or as
//! a string. Every other value is a non-negative integer, in decimal or `0x`-prefixed hex.

use crate::types::Permit2Allowance;
use alloy::primitives::U256;
use serde::{Deserialize, Deserializer, Serializer, de::Error};
use std::str::FromStr;

/// Wire representation of the unlimited sentinel.
const UNLIMITED: &str = "-1";

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAllowance {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

/// Serializes [`Permit2Allowance`] as a decimal string, or `"-1"` if unlimited.
pub fn serialize<S>(allowance: &Permit2Allowance, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match allowance {
        Permit2Allowance::Unlimited => serializer.serialize_str(UNLIMITED),
        Permit2Allowance::Limited(amount) => serializer.serialize_str(&amount.to_string()),
    }
}

/// Deserializes a [`Permit2Allowance`] from a number or a string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Permit2Allowance, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAllowance::deserialize(deserializer)? {
        RawAllowance::Unsigned(n) => Ok(Permit2Allowance::Limited(U256::from(n))),
        RawAllowance::Signed(-1) => Ok(Permit2Allowance::Unlimited),
        RawAllowance::Signed(n) => Err(D::Error::custom(format!("invalid permit2 allowance: {n}"))),
        RawAllowance::Text(s) if s.trim() == UNLIMITED => Ok(Permit2Allowance::Unlimited),
        RawAllowance::Text(s) => {
            U256::from_str(s.trim()).map(Permit2Allowance::Limited).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        allowance: Permit2Allowance,
    }

    fn parse(json: &str) -> Permit2Allowance {
        serde_json::from_str::<Wrapper>(json).unwrap().allowance
    }

    #[test]
    fn unlimited_sentinel() {
        assert_eq!(parse(r#"{"allowance":-1}"#), Permit2Allowance::Unlimited);
        assert_eq!(parse(r#"{"allowance":"-1"}"#), Permit2Allowance::Unlimited);
    }

    #[test]
    fn limited_values() {
        assert_eq!(parse(r#"{"allowance":0}"#), Permit2Allowance::Limited(U256::ZERO));
        assert_eq!(parse(r#"{"allowance":1000}"#), Permit2Allowance::Limited(U256::from(1000)));
        assert_eq!(parse(r#"{"allowance":"1000"}"#), Permit2Allowance::Limited(U256::from(1000)));
        assert_eq!(parse(r#"{"allowance":"0x3e8"}"#), Permit2Allowance::Limited(U256::from(1000)));
    }

    #[test]
    fn snapshot_with_numeric_allowance() {
        let snapshot = serde_json::from_str::<crate::types::TokenSnapshot>(
            r#"{
                "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
                "decimals": 6,
                "balance": "0x1dcd6500",
                "type": "stablecoin",
                "permit2Allowance": -1
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.permit2_allowance, Permit2Allowance::Unlimited);
        assert!(snapshot.is_permit2_eligible());
    }

    #[test]
    fn rejects_other_negatives() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"allowance":-2}"#).is_err());
    }

    #[test]
    fn serializes_sentinel() {
        let json = serde_json::to_string(&Wrapper { allowance: Permit2Allowance::Unlimited }).unwrap();
        assert_eq!(json, r#"{"allowance":"-1"}"#);
    }
}
