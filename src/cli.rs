//! # Migrator CLI
use crate::{
    config::MigrationConfig,
    migration::{MigrationRequest, Migrator, Route},
    signers::DynSigner,
    types::TransferRequest,
};
use alloy::primitives::{Address, U256};
use alloy_chains::Chain;
use clap::{Parser, ValueEnum};
use eyre::{Context, OptionExt};
use std::{path::PathBuf, str::FromStr};
use tracing::info;
use url::Url;

/// Migrates the assets of an account to another address.
#[derive(Debug, Parser)]
#[command(author, about = "Migrator", long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, a default one will be used and stored under this path.
    #[arg(long, value_name = "CONFIG", env = "MIGRATOR_CONFIG", default_value = "migrator.yaml")]
    pub config: PathBuf,
    /// The private key of the account to migrate from.
    #[arg(
        long = "sender-key",
        value_name = "SECRET_KEY",
        env = "MIGRATOR_SENDER_KEY",
        required_unless_present = "sender_kms_key",
        conflicts_with = "sender_kms_key"
    )]
    pub sender_key: Option<String>,
    /// The AWS KMS key id of the account to migrate from.
    #[arg(long = "sender-kms-key", value_name = "KEY_ID")]
    pub sender_kms_key: Option<String>,
    /// The address to migrate to.
    #[arg(long, value_name = "ADDRESS")]
    pub receiver: Address,
    /// How transfers are submitted.
    #[arg(long, value_enum, default_value_t = Mode::Direct)]
    pub mode: Mode,
    /// A transfer to perform. Migrates every held asset if omitted.
    #[arg(long = "transfer", value_name = "TOKEN[:AMOUNT[:ID,ID..]]", value_parser = parse_transfer)]
    pub transfers: Vec<TransferRequest>,
    /// The chain to migrate on.
    #[arg(long, value_name = "CHAIN")]
    pub chain: Option<Chain>,
    /// The RPC endpoint of the chain.
    #[arg(long, value_name = "RPC_ENDPOINT")]
    pub endpoint: Option<Url>,
    /// The balance and price API endpoint.
    #[arg(long = "api-endpoint", value_name = "URL")]
    pub api_endpoint: Option<Url>,
    /// The relay endpoint.
    #[arg(long = "relay-endpoint", value_name = "URL")]
    pub relay_endpoint: Option<Url>,
    /// The address the relay executes Permit2 transfers from.
    #[arg(long = "relay-spender", value_name = "ADDRESS")]
    pub relay_spender: Option<Address>,
    /// The fee collection address of the forward mode.
    #[arg(long, value_name = "ADDRESS")]
    pub treasury: Option<Address>,
    /// The API key for the balance, price and relay APIs.
    #[arg(long = "api-key", value_name = "KEY", env = "MIGRATOR_API_KEY")]
    pub api_key: Option<String>,
}

/// How transfers are submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// The sender submits and pays for every transaction.
    Direct,
    /// Permit2 transfers are submitted by the relay.
    Gasless,
    /// Like gasless, paying the relay fee with part of the transferred tokens.
    Forward,
}

impl From<Mode> for Route {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Direct => Self::Direct,
            Mode::Gasless => Self::Gasless,
            Mode::Forward => Self::Forward,
        }
    }
}

impl Args {
    /// Run the migration and print its outcomes as JSON.
    pub async fn run(self) -> eyre::Result<()> {
        let config = if !self.config.exists() {
            let config = MigrationConfig::default();
            config.save_to_file(&self.config).wrap_err_with(|| {
                format!("failed to write default config: {}", self.config.display())
            })?;
            config
        } else {
            MigrationConfig::load_from_file(&self.config)?
        };
        let config = self.merge_migration_config(config);

        let signer = match (&self.sender_key, &self.sender_kms_key) {
            (Some(key), _) => DynSigner::from_signing_key(key)?,
            (None, Some(key_id)) => DynSigner::from_kms(key_id, Some(config.chain.chain.id())).await?,
            (None, None) => eyre::bail!("a sender key is required"),
        };
        info!(sender = %signer.address(), receiver = %self.receiver, mode = ?self.mode, "Migrating");

        let mut request = MigrationRequest::new(signer, self.receiver);
        if !self.transfers.is_empty() {
            request = request.with_transfers(self.transfers);
        }

        let outcomes = Migrator::connect(config)?.migrate(self.mode.into(), request).await?;
        println!("{}", serde_json::to_string_pretty(&outcomes)?);

        Ok(())
    }

    /// Merges [`Args`] values into an existing [`MigrationConfig`] instance.
    pub fn merge_migration_config(&self, config: MigrationConfig) -> MigrationConfig {
        config
            .with_chain(self.chain)
            .with_endpoint(self.endpoint.clone())
            .with_api_endpoint(self.api_endpoint.clone())
            .with_relay(self.relay_endpoint.clone(), self.relay_spender)
            .with_treasury(self.treasury)
            .with_api_key(self.api_key.clone())
    }
}

/// Parses a transfer in the format `TOKEN[:AMOUNT[:ID,ID..]]`. An empty amount transfers the
/// full balance.
fn parse_transfer(arg: &str) -> eyre::Result<TransferRequest> {
    let mut parts = arg.splitn(3, ':');
    let token = parts.next().ok_or_eyre("expected a token address")?.parse::<Address>()?;
    let mut transfer = TransferRequest::full(token);

    if let Some(amount) = parts.next().filter(|amount| !amount.is_empty()) {
        transfer = transfer.with_amount(U256::from_str(amount)?);
    }

    if let Some(ids) = parts.next() {
        let ids = ids.split(',').map(U256::from_str).collect::<Result<Vec<_>, _>>()?;
        transfer = transfer.with_token_ids(ids);
    }

    Ok(transfer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const TOKEN: Address = address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    #[test]
    fn transfer_formats() {
        let token = TOKEN.to_string();

        assert_eq!(parse_transfer(&token).unwrap(), TransferRequest::full(TOKEN));
        assert_eq!(
            parse_transfer(&format!("{token}:1000")).unwrap(),
            TransferRequest::full(TOKEN).with_amount(U256::from(1000))
        );
        assert_eq!(
            parse_transfer(&format!("{token}:0x3e8")).unwrap(),
            TransferRequest::full(TOKEN).with_amount(U256::from(1000))
        );
        assert_eq!(
            parse_transfer(&format!("{token}::1,2")).unwrap(),
            TransferRequest::full(TOKEN).with_token_ids(vec![U256::from(1), U256::from(2)])
        );
        assert!(parse_transfer("0x1234").is_err());
        assert!(parse_transfer(&format!("{token}:abc")).is_err());
    }

    #[test]
    fn args_merge_into_config() {
        let args = Args::parse_from([
            "migrator",
            "--sender-key",
            "0x0000000000000000000000000000000000000000000000000000000000000001",
            "--receiver",
            "0x2000000000000000000000000000000000000002",
            "--mode",
            "gasless",
            "--chain",
            "base",
            "--relay-endpoint",
            "https://relay.example.com",
            "--relay-spender",
            "0x3000000000000000000000000000000000000003",
            "--transfer",
            &TOKEN.to_string(),
        ]);
        assert_eq!(args.mode, Mode::Gasless);
        assert_eq!(args.transfers, vec![TransferRequest::full(TOKEN)]);

        let config = args.merge_migration_config(MigrationConfig::default());
        assert_eq!(config.chain.chain.id(), 8453);
        assert_eq!(
            config.relay().unwrap().spender,
            address!("0x3000000000000000000000000000000000000003")
        );
    }
}
