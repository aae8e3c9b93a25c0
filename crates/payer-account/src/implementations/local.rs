//! Local private-key account implementation.
//!
//! Holds a secp256k1 private key in memory and signs transactions with it.
//! The key arrives as a `SecretString` from configuration and never leaves
//! this module in plain form.

use crate::{AccountError, AccountInterface};
use alloy_consensus::TxEnvelope;
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::Address;
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use payer_types::SecretString;

/// Account backed by a locally held private key.
pub struct LocalAccount {
	/// Address derived from the key.
	address: Address,
	/// Wallet used to produce signed envelopes.
	wallet: EthereumWallet,
}

impl LocalAccount {
	/// Creates a local account from a hex-encoded private key.
	///
	/// The signer is bound to the given chain ID so signatures carry the
	/// correct replay protection.
	pub fn new(private_key: &SecretString, chain_id: u64) -> Result<Self, AccountError> {
		let signer: PrivateKeySigner = private_key.with_exposed(|key| {
			key.parse()
				.map_err(|_| AccountError::InvalidKey("invalid private key format".to_string()))
		})?;

		let signer = signer.with_chain_id(Some(chain_id));
		let address = signer.address();
		let wallet = EthereumWallet::from(signer);

		Ok(Self { address, wallet })
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	fn address(&self) -> Address {
		self.address
	}

	async fn sign_transaction(&self, tx: TransactionRequest) -> Result<TxEnvelope, AccountError> {
		tx.build(&self.wallet)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))
	}
}

/// Factory function to create a local account from configuration values.
pub fn create_account(
	private_key: &SecretString,
	chain_id: u64,
) -> Result<Box<dyn AccountInterface>, AccountError> {
	Ok(Box::new(LocalAccount::new(private_key, chain_id)?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::U256;

	// Well-known development key shipped with local test nodes.
	const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[test]
	fn test_invalid_key_is_rejected() {
		let result = LocalAccount::new(&SecretString::from("not-a-key"), 1);
		assert!(matches!(result, Err(AccountError::InvalidKey(_))));
	}

	#[test]
	fn test_address_derivation() {
		let account = LocalAccount::new(&SecretString::from(DEV_KEY), 31337).unwrap();
		assert_eq!(
			account.address(),
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
				.parse::<Address>()
				.unwrap()
		);
	}

	#[tokio::test]
	async fn test_sign_complete_request() {
		let account = LocalAccount::new(&SecretString::from(DEV_KEY), 31337).unwrap();

		let to: Address = "0xCEA09f1DCA24ba4bC916aa4bab5E12Dfa2950188"
			.parse()
			.unwrap();
		let tx = TransactionRequest::default()
			.with_from(account.address())
			.with_to(to)
			.with_value(U256::from(1u64))
			.with_nonce(0)
			.with_chain_id(31337)
			.with_gas_limit(21_000)
			.with_gas_price(1_000_000_000);

		let envelope = account.sign_transaction(tx).await.unwrap();
		assert_ne!(*envelope.tx_hash(), alloy_primitives::B256::ZERO);
	}

	#[tokio::test]
	async fn test_sign_incomplete_request_fails() {
		let account = LocalAccount::new(&SecretString::from(DEV_KEY), 31337).unwrap();

		// No nonce, gas or fee parameters.
		let result = account
			.sign_transaction(TransactionRequest::default())
			.await;
		assert!(matches!(result, Err(AccountError::SigningFailed(_))));
	}
}
