//! Events emitted toward the result reporter.
//!
//! The core publishes these over a channel handed in at service construction;
//! the process-level reporter consumes them for display. The core itself
//! never writes to stdout.

use crate::TransactionReceipt;
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Observable outcomes of a payment attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaymentEvent {
	/// The transaction was broadcast and is awaiting inclusion.
	Submitted { hash: B256 },
	/// The transaction was included and reached the requested depth.
	Confirmed { receipt: TransactionReceipt },
	/// The attempt ended in a terminal failure.
	Failed { kind: String, details: String },
}
