//! Alloy-based EVM delivery implementation.
//!
//! Talks to an EVM node over HTTP JSON-RPC using the Alloy provider stack.
//! JSON-RPC error responses and transport failures are kept apart so the
//! workflow can distinguish a node that refused a transaction from a link
//! that went down.

use crate::{DeliveryError, DeliveryInterface};
use alloy_consensus::TxEnvelope;
use alloy_primitives::{Address, B256, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_transport::{RpcError, TransportErrorKind};
use alloy_transport_http::Http;
use async_trait::async_trait;
use payer_types::{PendingTransaction, TransactionReceipt};
use std::sync::Arc;

/// HTTP delivery over an Alloy provider.
pub struct AlloyDelivery {
	/// Alloy provider for the configured network.
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
}

impl AlloyDelivery {
	/// Creates a delivery instance for the given RPC endpoint.
	pub fn new(rpc_url: &str) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::InvalidResponse(format!("Invalid RPC URL: {}", e)))?;

		let provider = ProviderBuilder::new().on_http(url);

		Ok(Self {
			provider: Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
		})
	}
}

/// Maps a broadcast failure: an error response from the node means the
/// transaction was refused, anything else is a transport problem.
fn broadcast_error(e: RpcError<TransportErrorKind>) -> DeliveryError {
	match e.as_error_resp() {
		Some(payload) => DeliveryError::BroadcastRejected(payload.message.to_string()),
		None => DeliveryError::ConnectionLost(e.to_string()),
	}
}

/// Maps a read-path failure: error responses are unusable answers, the rest
/// are transport problems.
fn query_error(e: RpcError<TransportErrorKind>) -> DeliveryError {
	match e.as_error_resp() {
		Some(payload) => DeliveryError::InvalidResponse(payload.message.to_string()),
		None => DeliveryError::ConnectionLost(e.to_string()),
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn broadcast(&self, tx: TxEnvelope) -> Result<PendingTransaction, DeliveryError> {
		let pending = self
			.provider
			.send_tx_envelope(tx)
			.await
			.map_err(broadcast_error)?;

		let hash = *pending.tx_hash();
		tracing::info!(tx_hash = %hash, "Broadcast transaction");

		Ok(PendingTransaction::new(hash))
	}

	async fn get_receipt(&self, hash: &B256) -> Result<Option<TransactionReceipt>, DeliveryError> {
		let receipt = self
			.provider
			.get_transaction_receipt(*hash)
			.await
			.map_err(query_error)?;

		Ok(receipt.map(|receipt| {
			let fee_paid =
				U256::from(receipt.gas_used) * U256::from(receipt.effective_gas_price);
			TransactionReceipt {
				hash: receipt.transaction_hash,
				block_number: receipt.block_number.unwrap_or(0),
				success: receipt.status(),
				fee_paid,
			}
		}))
	}

	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		self.provider
			.get_balance(address)
			.await
			.map_err(query_error)
	}

	async fn get_gas_price(&self) -> Result<u128, DeliveryError> {
		self.provider.get_gas_price().await.map_err(query_error)
	}

	async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, DeliveryError> {
		self.provider.estimate_gas(tx).await.map_err(query_error)
	}

	async fn get_nonce(&self, address: Address) -> Result<u64, DeliveryError> {
		self.provider
			.get_transaction_count(address)
			.await
			.map_err(query_error)
	}

	async fn get_block_number(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_block_number()
			.await
			.map_err(query_error)
	}
}

/// Factory function to create an HTTP delivery provider.
pub fn create_http_delivery(rpc_url: &str) -> Result<Arc<dyn DeliveryInterface>, DeliveryError> {
	Ok(Arc::new(AlloyDelivery::new(rpc_url)?))
}
