//! Payment lifecycle state machine.
//!
//! Tracks a single payment attempt through its strictly forward pipeline:
//! `Built -> Signed -> Broadcast -> Pending -> Included -> Confirmed`, with
//! alternate terminals for rejection, revert, timeout and connection loss.
//! No transition returns to an earlier state and terminal states admit no
//! successors. The lifecycle is in-process bookkeeping for reporting; it is
//! never persisted.

use once_cell::sync::Lazy;
use payer_types::PaymentStatus;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Error raised when a transition violates the pipeline order.
#[derive(Debug, Error)]
#[error("Invalid lifecycle transition from {from:?} to {to:?}")]
pub struct InvalidTransition {
	/// State the payment was in.
	pub from: PaymentStatus,
	/// State the transition attempted to reach.
	pub to: PaymentStatus,
}

/// Tracks the state of one payment attempt.
pub struct PaymentLifecycle {
	status: PaymentStatus,
}

impl PaymentLifecycle {
	/// Starts a lifecycle at `Built`.
	pub fn new() -> Self {
		Self {
			status: PaymentStatus::Built,
		}
	}

	/// Starts a lifecycle at an arbitrary state.
	///
	/// Used when submission and confirmation are driven as separate calls;
	/// the waiter resumes from `Broadcast`.
	pub fn resume(status: PaymentStatus) -> Self {
		Self { status }
	}

	/// Returns the current state.
	pub fn status(&self) -> PaymentStatus {
		self.status
	}

	/// Moves to a new state, validating the transition.
	pub fn advance(&mut self, to: PaymentStatus) -> Result<PaymentStatus, InvalidTransition> {
		if !Self::is_valid_transition(&self.status, &to) {
			return Err(InvalidTransition {
				from: self.status,
				to,
			});
		}
		tracing::debug!(from = ?self.status, to = ?to, "Payment state transition");
		self.status = to;
		Ok(to)
	}

	/// Checks if a state transition is valid
	fn is_valid_transition(from: &PaymentStatus, to: &PaymentStatus) -> bool {
		// Static transition table - each state maps to allowed next states
		static TRANSITIONS: Lazy<HashMap<PaymentStatus, HashSet<PaymentStatus>>> =
			Lazy::new(|| {
				let mut m = HashMap::new();
				m.insert(
					PaymentStatus::Built,
					HashSet::from([PaymentStatus::Signed, PaymentStatus::Rejected]),
				);
				m.insert(
					PaymentStatus::Signed,
					HashSet::from([
						PaymentStatus::Broadcast,
						PaymentStatus::Rejected,
						PaymentStatus::ConnectionFailed,
					]),
				);
				m.insert(
					PaymentStatus::Broadcast,
					HashSet::from([
						PaymentStatus::Pending,
						PaymentStatus::Rejected,
						PaymentStatus::ConnectionFailed,
					]),
				);
				m.insert(
					PaymentStatus::Pending,
					HashSet::from([
						PaymentStatus::Included,
						PaymentStatus::TimedOut,
						PaymentStatus::ConnectionFailed,
					]),
				);
				m.insert(
					PaymentStatus::Included,
					HashSet::from([
						PaymentStatus::Confirmed,
						PaymentStatus::Reverted,
						PaymentStatus::TimedOut,
						PaymentStatus::ConnectionFailed,
					]),
				);
				m.insert(PaymentStatus::Confirmed, HashSet::new()); // terminal
				m.insert(PaymentStatus::Rejected, HashSet::new()); // terminal
				m.insert(PaymentStatus::Reverted, HashSet::new()); // terminal
				m.insert(PaymentStatus::TimedOut, HashSet::new()); // terminal
				m.insert(PaymentStatus::ConnectionFailed, HashSet::new()); // terminal
				m
			});

		TRANSITIONS
			.get(from)
			.map(|next| next.contains(to))
			.unwrap_or(false)
	}
}

impl Default for PaymentLifecycle {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_success_path() {
		let mut lifecycle = PaymentLifecycle::new();
		for status in [
			PaymentStatus::Signed,
			PaymentStatus::Broadcast,
			PaymentStatus::Pending,
			PaymentStatus::Included,
			PaymentStatus::Confirmed,
		] {
			lifecycle.advance(status).unwrap();
		}
		assert!(lifecycle.status().is_terminal());
	}

	#[test]
	fn test_no_backward_transitions() {
		let mut lifecycle = PaymentLifecycle::resume(PaymentStatus::Pending);
		let err = lifecycle.advance(PaymentStatus::Built).unwrap_err();
		assert_eq!(err.from, PaymentStatus::Pending);
		assert_eq!(err.to, PaymentStatus::Built);
	}

	#[test]
	fn test_terminal_states_admit_no_successors() {
		for terminal in [
			PaymentStatus::Confirmed,
			PaymentStatus::Rejected,
			PaymentStatus::Reverted,
			PaymentStatus::TimedOut,
			PaymentStatus::ConnectionFailed,
		] {
			let mut lifecycle = PaymentLifecycle::resume(terminal);
			assert!(lifecycle.advance(PaymentStatus::Pending).is_err());
			assert!(lifecycle.advance(PaymentStatus::Confirmed).is_err());
		}
	}

	#[test]
	fn test_revert_only_after_inclusion() {
		let mut lifecycle = PaymentLifecycle::resume(PaymentStatus::Pending);
		assert!(lifecycle.advance(PaymentStatus::Reverted).is_err());

		lifecycle.advance(PaymentStatus::Included).unwrap();
		lifecycle.advance(PaymentStatus::Reverted).unwrap();
	}
}
