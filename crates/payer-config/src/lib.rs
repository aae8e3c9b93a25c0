//! Configuration for the payer workspace.
//!
//! Loads the payment configuration from a TOML file, resolving `${VAR}` and
//! `${VAR:-default}` environment placeholders before parsing, and validates
//! all values so the workflow never starts with a malformed address, value
//! or endpoint.

mod loader;

use alloy_primitives::{Address, U256};
use payer_types::{parse_native_units, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration for a payment run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Target network parameters.
	pub network: NetworkConfig,
	/// Signing identity configuration.
	pub account: AccountConfig,
	/// The payment to perform.
	pub payment: PaymentConfig,
}

/// Target network parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
	/// HTTP JSON-RPC endpoint of the node.
	pub rpc_url: String,
	/// Chain ID transactions are bound to.
	pub chain_id: u64,
	/// Interval in seconds between receipt polls during the wait.
	#[serde(default = "default_poll_interval_secs")]
	pub poll_interval_secs: u64,
}

/// Signing identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
	/// Hex-encoded private key, typically supplied via `${PAYER_PRIVATE_KEY}`.
	pub private_key: SecretString,
}

/// The payment to perform.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
	/// Address of the deployed contract.
	pub contract_address: String,
	/// Name of the payable entry point to invoke.
	pub entry_point: String,
	/// Attached value in native currency units, e.g. "0.01".
	pub value: String,
	/// Confirmation depth before the payment counts as final.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
	/// Deadline in seconds for the confirmation wait.
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
	2
}

fn default_confirmations() -> u64 {
	1
}

fn default_timeout_secs() -> u64 {
	120
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		Self::from_toml_str(&content)
	}

	/// Parses and validates configuration from raw TOML content.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		let resolved = loader::resolve_env_vars(content)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}

	/// Validates all configuration values.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.network.rpc_url.is_empty() {
			return Err(ConfigError::Validation("network.rpc_url is empty".into()));
		}
		if self.network.chain_id == 0 {
			return Err(ConfigError::Validation("network.chain_id must not be 0".into()));
		}
		if self.account.private_key.is_empty() {
			return Err(ConfigError::Validation("account.private_key is empty".into()));
		}
		if self.payment.contract_address.parse::<Address>().is_err() {
			return Err(ConfigError::Validation(format!(
				"payment.contract_address is not a valid address: {}",
				self.payment.contract_address
			)));
		}
		if self.payment.entry_point.is_empty() {
			return Err(ConfigError::Validation("payment.entry_point is empty".into()));
		}
		if let Err(e) = parse_native_units(&self.payment.value) {
			return Err(ConfigError::Validation(format!(
				"payment.value is not a valid amount: {}",
				e
			)));
		}
		if self.payment.confirmations == 0 {
			return Err(ConfigError::Validation(
				"payment.confirmations must be at least 1".into(),
			));
		}
		if self.payment.timeout_secs == 0 {
			return Err(ConfigError::Validation(
				"payment.timeout_secs must not be 0".into(),
			));
		}
		Ok(())
	}
}

impl PaymentConfig {
	/// Returns the configured value converted to wei.
	pub fn value_wei(&self) -> Result<U256, ConfigError> {
		parse_native_units(&self.value)
			.map_err(|e| ConfigError::Validation(format!("payment.value: {}", e)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn base_config() -> String {
		r#"
[network]
rpc_url = "http://localhost:8545"
chain_id = 31337

[account]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"

[payment]
contract_address = "0xCEA09f1DCA24ba4bC916aa4bab5E12Dfa2950188"
entry_point = "payContract"
value = "0.01"
"#
		.to_string()
	}

	#[test]
	fn test_parse_with_defaults() {
		let config = Config::from_toml_str(&base_config()).unwrap();
		assert_eq!(config.network.poll_interval_secs, 2);
		assert_eq!(config.payment.confirmations, 1);
		assert_eq!(config.payment.timeout_secs, 120);
		assert_eq!(
			config.payment.value_wei().unwrap(),
			U256::from(10u64).pow(U256::from(16))
		);
	}

	#[test]
	fn test_env_var_in_private_key() {
		std::env::set_var(
			"PAYER_TEST_KEY",
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
		);
		let content = base_config().replace(
			"\"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80\"",
			"\"${PAYER_TEST_KEY}\"",
		);

		let config = Config::from_toml_str(&content).unwrap();
		assert!(!config.account.private_key.is_empty());

		std::env::remove_var("PAYER_TEST_KEY");
	}

	#[test]
	fn test_invalid_contract_address_is_rejected() {
		let content = base_config().replace(
			"0xCEA09f1DCA24ba4bC916aa4bab5E12Dfa2950188",
			"not-an-address",
		);
		let result = Config::from_toml_str(&content);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_invalid_value_is_rejected() {
		let content = base_config().replace("\"0.01\"", "\"one ether\"");
		let result = Config::from_toml_str(&content);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_zero_chain_id_is_rejected() {
		let content = base_config().replace("chain_id = 31337", "chain_id = 0");
		let result = Config::from_toml_str(&content);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[tokio::test]
	async fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(base_config().as_bytes()).unwrap();

		let config = Config::from_file(file.path().to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.payment.entry_point, "payContract");
	}

	#[tokio::test]
	async fn test_missing_file() {
		let result = Config::from_file("/nonexistent/payer.toml").await;
		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
