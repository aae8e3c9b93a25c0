//! Account management for the payer workspace.
//!
//! This crate supplies the signing identity used to authorize payment
//! transactions. It defines the interface an account implementation must
//! provide and a service wrapper that the workflow core talks to.

use alloy_consensus::TxEnvelope;
use alloy_primitives::Address;
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
}

/// Trait defining the interface for account implementations.
///
/// An implementation owns exactly one signing identity. The workflow core
/// borrows it for the duration of a payment: one address lookup and at most
/// one signing request per submission.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Returns the address associated with this account.
	fn address(&self) -> Address;

	/// Authorizes a fully specified transaction request.
	///
	/// The request must carry nonce, gas and chain parameters already; this
	/// method only produces the signed envelope. Missing fields or signer
	/// failures surface as `SigningFailed`.
	async fn sign_transaction(&self, tx: TransactionRequest) -> Result<TxEnvelope, AccountError>;
}

/// Service that manages account operations.
///
/// Wraps an account implementation behind a stable API for the rest of the
/// workspace.
pub struct AccountService {
	/// The underlying account implementation.
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService with the specified implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Returns the address of the managed account.
	pub fn address(&self) -> Address {
		self.implementation.address()
	}

	/// Signs a transaction using the managed account.
	pub async fn sign(&self, tx: TransactionRequest) -> Result<TxEnvelope, AccountError> {
		self.implementation.sign_transaction(tx).await
	}
}
