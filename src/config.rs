//! Migrator configuration.
use crate::{
    constants::{
        DEFAULT_API_TIMEOUT, DEFAULT_RECEIPT_TIMEOUT, DEFAULT_RELAY_TIMEOUT, DEFAULT_RPC_TIMEOUT,
        ERC20_TRANSFER_GAS, FORWARD_RELAY_GAS, MAX_NONCE_ATTEMPTS, NATIVE_TRANSFER_GAS,
        NATIVE_TRANSFER_PERCENT, NFT_TRANSFER_GAS, PERMIT_DEADLINE, PERMIT2_ADDRESS,
        PERMIT2_DEADLINE,
    },
    error::ValidationError,
};
use alloy::primitives::Address;
use alloy_chains::Chain;
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

/// Migrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Chain configuration.
    pub chain: ChainConfig,
    /// Balance and price API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Relay configuration. Required for gasless and forward migrations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay: Option<RelayConfig>,
    /// Permit2 contract address.
    #[serde(default = "default_permit2")]
    pub permit2: Address,
    /// Fee collection address for forward migrations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasury: Option<Address>,
    /// Gas unit costs.
    #[serde(default)]
    pub gas: GasConfig,
    /// Signature settings.
    #[serde(default)]
    pub signing: SigningConfig,
    /// Share of the native balance transferred when no amount is requested, in percent.
    #[serde(default = "default_native_transfer_percent")]
    pub native_transfer_percent: u8,
    /// Secrets.
    #[serde(skip_serializing, default)]
    pub secrets: SecretsConfig,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            api: ApiConfig::default(),
            relay: None,
            permit2: PERMIT2_ADDRESS,
            treasury: None,
            gas: GasConfig::default(),
            signing: SigningConfig::default(),
            native_transfer_percent: NATIVE_TRANSFER_PERCENT,
            secrets: SecretsConfig::default(),
        }
    }
}

impl MigrationConfig {
    /// Sets the chain to migrate on.
    pub fn with_chain(mut self, chain: Option<Chain>) -> Self {
        if let Some(chain) = chain {
            self.chain.chain = chain;
        }
        self
    }

    /// Sets the chain RPC endpoint.
    pub fn with_endpoint(mut self, endpoint: Option<Url>) -> Self {
        if let Some(endpoint) = endpoint {
            self.chain.endpoint = endpoint;
        }
        self
    }

    /// Sets the balance and price API endpoint.
    pub fn with_api_endpoint(mut self, endpoint: Option<Url>) -> Self {
        if let Some(endpoint) = endpoint {
            self.api.endpoint = endpoint;
        }
        self
    }

    /// Sets the relay endpoint and spender. Both are required to enable the relay.
    pub fn with_relay(mut self, endpoint: Option<Url>, spender: Option<Address>) -> Self {
        match (endpoint, spender, self.relay.as_mut()) {
            (Some(endpoint), Some(spender), None) => {
                self.relay = Some(RelayConfig { endpoint, spender, timeout: DEFAULT_RELAY_TIMEOUT })
            }
            (endpoint, spender, Some(relay)) => {
                relay.endpoint = endpoint.unwrap_or(relay.endpoint.clone());
                relay.spender = spender.unwrap_or(relay.spender);
            }
            _ => {}
        }
        self
    }

    /// Sets the treasury address.
    pub fn with_treasury(mut self, treasury: Option<Address>) -> Self {
        self.treasury = treasury.or(self.treasury);
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(api_key) = api_key {
            self.secrets.api_key = api_key;
        }
        self
    }

    /// Returns the relay configuration, or an error if the relay is not configured.
    pub fn relay(&self) -> Result<&RelayConfig, ValidationError> {
        self.relay.as_ref().ok_or(ValidationError::UnsupportedRoute("relay is not configured"))
    }

    /// Returns the treasury address, or an error if none is configured.
    pub fn treasury(&self) -> Result<Address, ValidationError> {
        self.treasury.ok_or(ValidationError::UnsupportedRoute("treasury is not configured"))
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn default_permit2() -> Address {
    PERMIT2_ADDRESS
}

fn default_native_transfer_percent() -> u8 {
    NATIVE_TRANSFER_PERCENT
}

/// Chain configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain to migrate on.
    pub chain: Chain,
    /// The RPC endpoint of the chain.
    pub endpoint: Url,
    /// Timeout of a single RPC request.
    #[serde(with = "crate::serde::duration", default = "default_rpc_timeout")]
    pub rpc_timeout: Duration,
    /// How long to wait for a sent transaction to be included.
    #[serde(with = "crate::serde::duration", default = "default_receipt_timeout")]
    pub receipt_timeout: Duration,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain: Chain::mainnet(),
            endpoint: Url::parse("http://localhost:8545").expect("valid url"),
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
        }
    }
}

fn default_rpc_timeout() -> Duration {
    DEFAULT_RPC_TIMEOUT
}

fn default_receipt_timeout() -> Duration {
    DEFAULT_RECEIPT_TIMEOUT
}

/// Balance and price API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API.
    pub endpoint: Url,
    /// Request timeout.
    #[serde(with = "crate::serde::duration")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse("http://localhost:8080").expect("valid url"),
            timeout: DEFAULT_API_TIMEOUT,
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Base URL of the relay.
    pub endpoint: Url,
    /// Address the relay executes Permit2 transfers from.
    pub spender: Address,
    /// Request timeout.
    #[serde(with = "crate::serde::duration", default = "default_relay_timeout")]
    pub timeout: Duration,
}

fn default_relay_timeout() -> Duration {
    DEFAULT_RELAY_TIMEOUT
}

/// Gas unit costs used by the fee budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    /// Native value transfer.
    pub native_transfer: u64,
    /// Direct ERC-20 transfer.
    pub erc20_transfer: u64,
    /// ERC-721 transfer.
    pub nft_transfer: u64,
    /// Gas the relay charges for a forwarded Permit2 batch.
    pub forward_relay: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            native_transfer: NATIVE_TRANSFER_GAS,
            erc20_transfer: ERC20_TRANSFER_GAS,
            nft_transfer: NFT_TRANSFER_GAS,
            forward_relay: FORWARD_RELAY_GAS,
        }
    }
}

/// Signature settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Lifetime of ERC-2612 permits.
    #[serde(with = "crate::serde::duration")]
    pub permit_deadline: Duration,
    /// Lifetime of Permit2 transfers.
    #[serde(with = "crate::serde::duration")]
    pub permit2_deadline: Duration,
    /// Maximum number of Permit2 nonce candidates probed.
    pub max_nonce_attempts: usize,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            permit_deadline: PERMIT_DEADLINE,
            permit2_deadline: PERMIT2_DEADLINE,
            max_nonce_attempts: MAX_NONCE_ATTEMPTS,
        }
    }
}

/// Secrets (kept out of serialized output).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsConfig {
    /// API key for the balance, price and relay APIs.
    #[serde(default)]
    pub api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn yaml_roundtrip() {
        let config = MigrationConfig::default()
            .with_relay(
                Some(Url::parse("https://relay.example.com").unwrap()),
                Some(address!("0x1111111111111111111111111111111111111111")),
            )
            .with_treasury(Some(address!("0x2222222222222222222222222222222222222222")))
            .with_api_key(Some("secret".to_string()));

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("secret"));

        let from_yaml = serde_yaml::from_str::<MigrationConfig>(&yaml).unwrap();
        assert_eq!(from_yaml.chain, config.chain);
        assert_eq!(from_yaml.relay, config.relay);
        assert_eq!(from_yaml.treasury, config.treasury);
        assert_eq!(from_yaml.gas, config.gas);
        assert_eq!(from_yaml.signing, config.signing);
        assert!(from_yaml.secrets.api_key.is_empty());
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let s = r#"
chain:
  chain: 8453
  endpoint: "https://mainnet.base.org"
api:
  endpoint: "https://api.example.com"
  timeout: 10
secrets:
  api_key: "key"
"#;
        let config = serde_yaml::from_str::<MigrationConfig>(s).unwrap();
        assert_eq!(config.chain.chain.id(), 8453);
        assert_eq!(config.chain.rpc_timeout, DEFAULT_RPC_TIMEOUT);
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.permit2, PERMIT2_ADDRESS);
        assert_eq!(config.native_transfer_percent, NATIVE_TRANSFER_PERCENT);
        assert_eq!(config.signing.max_nonce_attempts, MAX_NONCE_ATTEMPTS);
        assert_eq!(config.secrets.api_key, "key");
        assert!(config.relay().is_err());
    }
}
