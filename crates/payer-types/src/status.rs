//! Payment lifecycle states.
//!
//! A payment moves strictly forward through these states; there is no retry
//! and no transition back to an earlier state. The transition table itself
//! lives in payer-core; this module only defines the vocabulary.

use serde::{Deserialize, Serialize};

/// State of a single payment attempt.
///
/// Success path: `Built -> Signed -> Broadcast -> Pending -> Included ->
/// Confirmed`. The remaining states are alternate terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
	/// Transaction payload constructed locally.
	Built,
	/// Payload authorized by the signing identity.
	Signed,
	/// Accepted for broadcast by the network.
	Broadcast,
	/// Awaiting inclusion in a block.
	Pending,
	/// Included in a block, awaiting confirmation depth.
	Included,
	/// Included and past the requested confirmation depth.
	Confirmed,
	/// Broadcast refused by the network.
	Rejected,
	/// Included but execution reverted.
	Reverted,
	/// No inclusion within the deadline, or the wait was cancelled.
	TimedOut,
	/// Network link failed mid-wait.
	ConnectionFailed,
}

impl PaymentStatus {
	/// Returns true if no further transition is possible from this state.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			PaymentStatus::Confirmed
				| PaymentStatus::Rejected
				| PaymentStatus::Reverted
				| PaymentStatus::TimedOut
				| PaymentStatus::ConnectionFailed
		)
	}
}
