//! Contract call request types.
//!
//! A `CallRequest` captures an intended invocation of a contract entry point
//! before any network interaction: the target address, the ABI-encoded call
//! data and the attached native value.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// An intended contract invocation, fully encoded but not yet signed.
///
/// Produced by `ContractHandle::call` after entry-point validation. The
/// argument list is empty for the payment workflow, so `data` holds only the
/// 4-byte function selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
	/// Address of the target contract.
	pub to: Address,
	/// Name of the entry point being invoked, kept for reporting.
	pub entry_point: String,
	/// ABI-encoded call data.
	pub data: Bytes,
	/// Attached value in wei.
	pub value: U256,
}
