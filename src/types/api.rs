use super::TokenSnapshot;
use alloy::primitives::{Address, ChainId, U256};
use serde::{Deserialize, Serialize};

/// Envelope of every balance and price API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Status code, [`ApiResponse::SUCCESS`] on success.
    pub code: i64,
    /// Status message.
    #[serde(default)]
    pub message: String,
    /// Payload, absent on most failures.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Code reported by successful responses.
    pub const SUCCESS: i64 = 200;

    /// Returns whether the API reported success.
    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS
    }
}

/// Request body of a balance snapshot fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    /// Chain to read balances on.
    pub chain_id: ChainId,
    /// Account to read balances of.
    pub address: Address,
    /// Skip price and metadata enrichment.
    pub only_balances: bool,
    /// Restrict the snapshot to these tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_addresses: Option<Vec<Address>>,
}

/// Authenticated request body sent to the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authenticated<'a, T> {
    /// API key of the caller.
    pub api_key: &'a str,
    /// Request payload.
    #[serde(flatten)]
    pub inner: T,
}

/// Request body of a price fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainQuery {
    /// Chain to read the price on.
    pub chain_id: ChainId,
}

/// Balance snapshot payload.
pub type BalanceData = Vec<TokenSnapshot>;

/// Gas price payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPriceData {
    /// Gas price in wei.
    pub gas_price: U256,
}

/// Native currency price payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NativePriceData {
    /// USD price of one whole native token.
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_without_payload() {
        let response =
            serde_json::from_str::<ApiResponse<GasPriceData>>(r#"{"code":500,"message":"down"}"#)
                .unwrap();
        assert!(!response.is_success());
        assert!(response.data.is_none());

        let response = serde_json::from_str::<ApiResponse<GasPriceData>>(
            r#"{"code":200,"data":{"gasPrice":"0x3b9aca00"}}"#,
        )
        .unwrap();
        assert!(response.is_success());
        assert_eq!(response.data.unwrap().gas_price, U256::from(1_000_000_000u64));
    }
}
