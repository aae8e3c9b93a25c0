//! Core payment workflow for the payer workspace.
//!
//! This crate orchestrates a single payment: preflight checks, transaction
//! construction, signing, broadcast, and the confirmation wait. It owns the
//! full failure taxonomy and publishes lifecycle events toward the result
//! reporter. One call request produces one pending transaction produces one
//! receipt; there is no retry and no internal parallelism.
//!
//! Caller hazard: concurrent submissions from the same signing identity are
//! not serialized here. Nonce assignment comes from the network at submit
//! time, so racing submits can collide on a nonce.

pub mod state;

pub use state::{InvalidTransition, PaymentLifecycle};

use alloy_network::TransactionBuilder;
use alloy_primitives::U256;
use alloy_rpc_types::TransactionRequest;
use payer_account::AccountError;
use payer_contract::{ContractError, ContractHandle};
use payer_delivery::{DeliveryError, DeliveryInterface};
use payer_types::{PaymentEvent, PaymentStatus, PendingTransaction, TransactionReceipt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

/// Errors that can terminate a payment attempt.
///
/// Every kind is terminal for the current attempt; nothing is retried
/// automatically. Each carries enough detail for the caller to decide
/// whether to retry manually.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
	/// Address or entry-point validation failed before any network I/O.
	#[error(transparent)]
	Contract(#[from] ContractError),
	/// The signing identity could not authorize the transaction.
	#[error(transparent)]
	Account(#[from] AccountError),
	/// The network layer failed during broadcast or a chain query.
	#[error(transparent)]
	Delivery(#[from] DeliveryError),
	/// The signer balance cannot cover the value plus the estimated fee.
	#[error("Insufficient funds: balance {balance} wei is below value {value} wei plus estimated fee {fee} wei")]
	InsufficientFunds {
		balance: U256,
		value: U256,
		fee: U256,
	},
	/// The transaction was included but the contract reverted. Receipts
	/// carry no revert string, so the kind alone is surfaced.
	#[error("Execution reverted")]
	ExecutionReverted,
	/// No inclusion within the configured deadline.
	#[error("Timed out after {0:?} waiting for confirmation")]
	Timeout(Duration),
	/// The confirmation wait was cancelled; the transaction may still be
	/// included later, the caller is responsible for re-querying.
	#[error("Confirmation wait cancelled")]
	Cancelled,
	/// The workflow violated its own pipeline order.
	#[error(transparent)]
	Lifecycle(#[from] InvalidTransition),
}

impl PaymentError {
	/// Stable machine-readable name of the failure kind.
	pub fn kind(&self) -> &'static str {
		match self {
			PaymentError::Contract(ContractError::InvalidAddress(_)) => "invalid_address",
			PaymentError::Contract(ContractError::UnknownEntryPoint(_)) => "unknown_entry_point",
			PaymentError::Contract(ContractError::NotPayable(_)) => "not_payable",
			PaymentError::Account(AccountError::InvalidKey(_)) => "invalid_key",
			PaymentError::Account(AccountError::SigningFailed(_)) => "signing_failed",
			PaymentError::Delivery(DeliveryError::BroadcastRejected(_)) => "broadcast_rejected",
			PaymentError::Delivery(DeliveryError::ConnectionLost(_)) => "connection_lost",
			PaymentError::Delivery(DeliveryError::InvalidResponse(_)) => "invalid_response",
			PaymentError::InsufficientFunds { .. } => "insufficient_funds",
			PaymentError::ExecutionReverted => "execution_reverted",
			PaymentError::Timeout(_) => "timeout",
			PaymentError::Cancelled => "cancelled",
			PaymentError::Lifecycle(_) => "lifecycle",
		}
	}
}

/// Tunable parameters of the payment workflow.
#[derive(Debug, Clone)]
pub struct PaymentSettings {
	/// Chain ID transactions are bound to.
	pub chain_id: u64,
	/// Confirmation depth required before a payment counts as final.
	/// Inclusion itself is the first confirmation.
	pub confirmations: u64,
	/// Deadline for the confirmation wait.
	pub timeout: Duration,
	/// Interval between receipt polls.
	pub poll_interval: Duration,
}

/// Service that executes a single payment end to end.
///
/// Submission and confirmation are deliberately separate phases: cancelling
/// the wait never cancels the broadcast.
pub struct PaymentService {
	/// Contract binding including the signing identity.
	handle: ContractHandle,
	/// Network provider used for broadcast and chain queries.
	delivery: Arc<dyn DeliveryInterface>,
	/// Workflow parameters.
	settings: PaymentSettings,
	/// Channel toward the result reporter.
	events: mpsc::UnboundedSender<PaymentEvent>,
}

impl PaymentService {
	/// Creates a new PaymentService.
	pub fn new(
		handle: ContractHandle,
		delivery: Arc<dyn DeliveryInterface>,
		settings: PaymentSettings,
		events: mpsc::UnboundedSender<PaymentEvent>,
	) -> Self {
		Self {
			handle,
			delivery,
			settings,
			events,
		}
	}

	/// Runs the full workflow: submit, then await confirmation.
	///
	/// Emits `Submitted` after broadcast and exactly one of `Confirmed` or
	/// `Failed` at the end.
	pub async fn execute(
		&self,
		entry_point: &str,
		value: U256,
		cancel: &mut watch::Receiver<bool>,
	) -> Result<TransactionReceipt, PaymentError> {
		let mut lifecycle = PaymentLifecycle::new();
		let result = self.run(&mut lifecycle, entry_point, value, cancel).await;

		match &result {
			Ok(receipt) => {
				let _ = self.events.send(PaymentEvent::Confirmed {
					receipt: receipt.clone(),
				});
			}
			Err(e) => {
				let _ = self.events.send(PaymentEvent::Failed {
					kind: e.kind().to_string(),
					details: e.to_string(),
				});
			}
		}

		result
	}

	async fn run(
		&self,
		lifecycle: &mut PaymentLifecycle,
		entry_point: &str,
		value: U256,
		cancel: &mut watch::Receiver<bool>,
	) -> Result<TransactionReceipt, PaymentError> {
		let pending = self.submit_with(lifecycle, entry_point, value).await?;
		self.await_with(lifecycle, pending, cancel).await
	}

	/// Builds, signs and broadcasts a payment transaction.
	///
	/// Not idempotent: every call is an independent payment with a fresh
	/// nonce. Exactly one broadcast happens per successful call, and none at
	/// all if validation or the preflight balance check fails.
	pub async fn submit(
		&self,
		entry_point: &str,
		value: U256,
	) -> Result<PendingTransaction, PaymentError> {
		let mut lifecycle = PaymentLifecycle::new();
		self.submit_with(&mut lifecycle, entry_point, value).await
	}

	/// Waits for a previously submitted transaction to reach the configured
	/// confirmation depth.
	///
	/// This is the sole suspension point of the workflow. The pending handle
	/// is consumed; a submission cannot be awaited twice.
	pub async fn await_confirmation(
		&self,
		pending: PendingTransaction,
		cancel: &mut watch::Receiver<bool>,
	) -> Result<TransactionReceipt, PaymentError> {
		let mut lifecycle = PaymentLifecycle::resume(PaymentStatus::Broadcast);
		self.await_with(&mut lifecycle, pending, cancel).await
	}

	async fn submit_with(
		&self,
		lifecycle: &mut PaymentLifecycle,
		entry_point: &str,
		value: U256,
	) -> Result<PendingTransaction, PaymentError> {
		let request = self.handle.call(entry_point, value)?;
		let account = self.handle.account();
		let from = account.address();

		let nonce = self.delivery.get_nonce(from).await?;
		let gas_price = self.delivery.get_gas_price().await?;

		// Preflight, stage one: nodes execute the call during gas estimation
		// and refuse a value beyond the sender balance with an opaque error,
		// so an over-balance value must be rejected before estimation.
		let balance = self.delivery.get_balance(from).await?;
		if request.value > balance {
			fail(lifecycle, PaymentStatus::Rejected);
			return Err(PaymentError::InsufficientFunds {
				balance,
				value: request.value,
				fee: U256::ZERO,
			});
		}

		let mut tx = TransactionRequest::default()
			.with_from(from)
			.with_to(request.to)
			.with_value(request.value)
			.with_input(request.data.clone())
			.with_nonce(nonce)
			.with_chain_id(self.settings.chain_id)
			.with_gas_price(gas_price);

		let gas_limit = self.delivery.estimate_gas(&tx).await?;
		tx = tx.with_gas_limit(gas_limit);

		// Preflight, stage two: the value plus the estimated fee must also
		// fit. Estimation drift can still surface later as a broadcast
		// rejection.
		let fee = U256::from(gas_limit) * U256::from(gas_price);
		if balance < request.value.saturating_add(fee) {
			fail(lifecycle, PaymentStatus::Rejected);
			return Err(PaymentError::InsufficientFunds {
				balance,
				value: request.value,
				fee,
			});
		}

		tracing::info!(
			entry_point = %request.entry_point,
			to = %request.to,
			value = %request.value,
			nonce,
			gas_limit,
			"Submitting payment"
		);

		let envelope = match account.sign(tx).await {
			Ok(envelope) => envelope,
			Err(e) => {
				fail(lifecycle, PaymentStatus::Rejected);
				return Err(e.into());
			}
		};
		lifecycle.advance(PaymentStatus::Signed)?;

		let pending = match self.delivery.broadcast(envelope).await {
			Ok(pending) => pending,
			Err(e) => {
				let terminal = match &e {
					DeliveryError::ConnectionLost(_) => PaymentStatus::ConnectionFailed,
					_ => PaymentStatus::Rejected,
				};
				fail(lifecycle, terminal);
				return Err(e.into());
			}
		};
		lifecycle.advance(PaymentStatus::Broadcast)?;

		let _ = self.events.send(PaymentEvent::Submitted { hash: pending.hash });

		Ok(pending)
	}

	async fn await_with(
		&self,
		lifecycle: &mut PaymentLifecycle,
		pending: PendingTransaction,
		cancel: &mut watch::Receiver<bool>,
	) -> Result<TransactionReceipt, PaymentError> {
		lifecycle.advance(PaymentStatus::Pending)?;

		let hash = pending.hash;
		let deadline = Instant::now() + self.settings.timeout;

		tracing::info!(
			tx_hash = %hash,
			confirmations = self.settings.confirmations,
			timeout_secs = self.settings.timeout.as_secs(),
			"Waiting for confirmation"
		);

		loop {
			if Instant::now() >= deadline {
				fail(lifecycle, PaymentStatus::TimedOut);
				return Err(PaymentError::Timeout(self.settings.timeout));
			}

			match self.delivery.get_receipt(&hash).await {
				Ok(Some(receipt)) => {
					if lifecycle.status() == PaymentStatus::Pending {
						lifecycle.advance(PaymentStatus::Included)?;
					}

					if !receipt.success {
						fail(lifecycle, PaymentStatus::Reverted);
						return Err(PaymentError::ExecutionReverted);
					}

					let current = match self.delivery.get_block_number().await {
						Ok(current) => current,
						Err(e) => {
							fail(lifecycle, PaymentStatus::ConnectionFailed);
							return Err(e.into());
						}
					};

					// Inclusion counts as the first confirmation.
					let confirmations = current
						.saturating_sub(receipt.block_number)
						.saturating_add(1);
					if confirmations >= self.settings.confirmations {
						lifecycle.advance(PaymentStatus::Confirmed)?;
						return Ok(receipt);
					}

					tracing::debug!(
						tx_hash = %hash,
						confirmations,
						required = self.settings.confirmations,
						"Waiting for more confirmations"
					);
				}
				Ok(None) => {
					// Not yet mined, keep polling.
				}
				Err(e @ DeliveryError::ConnectionLost(_)) => {
					fail(lifecycle, PaymentStatus::ConnectionFailed);
					return Err(e.into());
				}
				Err(e) => return Err(e.into()),
			}

			tokio::select! {
				_ = tokio::time::sleep(self.settings.poll_interval) => {}
				changed = cancel.changed() => {
					match changed {
						Ok(()) if *cancel.borrow() => {
							fail(lifecycle, PaymentStatus::TimedOut);
							return Err(PaymentError::Cancelled);
						}
						Ok(()) => {}
						// Cancel side dropped; fall back to plain polling.
						Err(_) => tokio::time::sleep(self.settings.poll_interval).await,
					}
				}
			}
		}
	}
}

/// Records a terminal failure state, tolerating an already-terminal lifecycle.
fn fail(lifecycle: &mut PaymentLifecycle, to: PaymentStatus) {
	if let Err(e) = lifecycle.advance(to) {
		tracing::debug!(%e, "Lifecycle already terminal");
	}
}
