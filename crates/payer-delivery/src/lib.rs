//! Network edge of the payment workflow.
//!
//! This crate defines the interface the workflow core uses to talk to a
//! blockchain node: broadcasting signed transactions and reading the chain
//! state needed for fee estimation, preflight checks and confirmation
//! tracking. The confirmation wait loop itself lives in payer-core; this
//! layer only answers point queries.

use alloy_consensus::TxEnvelope;
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use payer_types::{PendingTransaction, TransactionReceipt};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur during delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// The node refused the transaction outright (malformed payload, fee too
	/// low, nonce conflict).
	#[error("Broadcast rejected: {0}")]
	BroadcastRejected(String),
	/// The network link failed before a response arrived.
	#[error("Connection lost: {0}")]
	ConnectionLost(String),
	/// The node answered, but the response was unusable.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
}

/// Trait defining the interface to a blockchain node.
///
/// One implementation serves exactly one network. All methods are point
/// operations; none of them blocks waiting for chain events.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Broadcasts a signed transaction envelope.
	///
	/// Returns the pending-transaction handle as soon as the node accepts
	/// the broadcast; inclusion is not awaited here. Exactly one network
	/// write per call.
	async fn broadcast(&self, tx: TxEnvelope) -> Result<PendingTransaction, DeliveryError>;

	/// Fetches the receipt for a transaction, if it has been mined.
	///
	/// `Ok(None)` means the transaction is not yet included; callers poll.
	async fn get_receipt(&self, hash: &B256) -> Result<Option<TransactionReceipt>, DeliveryError>;

	/// Returns the native balance of an address in wei.
	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError>;

	/// Returns the node's recommended gas price in wei.
	async fn get_gas_price(&self) -> Result<u128, DeliveryError>;

	/// Estimates the gas required to execute a transaction request.
	async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, DeliveryError>;

	/// Returns the next valid nonce for an address.
	async fn get_nonce(&self, address: Address) -> Result<u64, DeliveryError>;

	/// Returns the latest block number.
	async fn get_block_number(&self) -> Result<u64, DeliveryError>;
}
