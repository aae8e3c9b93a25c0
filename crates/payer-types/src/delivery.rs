//! Transaction hash and receipt types.
//!
//! This module defines the artifacts produced by the submission and
//! confirmation phases of a payment: the pending transaction handle returned
//! at broadcast time and the finalized receipt observed after inclusion.

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

/// Handle for a broadcast transaction whose inclusion is not yet known.
///
/// Returned by the submitter immediately after the network accepts the
/// broadcast. Deliberately not `Clone`: the confirmation waiter consumes the
/// handle exactly once, so a single submission cannot be awaited twice.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PendingTransaction {
	/// Hash identifying the transaction on the network.
	pub hash: B256,
}

impl PendingTransaction {
	/// Creates a pending-transaction handle for the given hash.
	pub fn new(hash: B256) -> Self {
		Self { hash }
	}
}

/// Finalized outcome of an included transaction.
///
/// Created only after the confirmation waiter observes inclusion at the
/// requested depth; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// Hash of the transaction.
	pub hash: B256,
	/// Block number where the transaction was included.
	pub block_number: u64,
	/// Whether execution succeeded (false means the contract reverted).
	pub success: bool,
	/// Actual fee paid in wei (gas used times effective gas price).
	pub fee_paid: U256,
}
