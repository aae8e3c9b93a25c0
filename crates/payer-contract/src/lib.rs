//! Contract binding for the payer workspace.
//!
//! A `ContractHandle` ties together a deployed contract's address, the
//! description of its callable entry points and the signing identity that
//! will authorize calls. Resolution is purely local: the address is
//! validated syntactically and no network I/O happens until submission.

use alloy_primitives::{keccak256, Address, Bytes, U256};
use payer_account::AccountService;
use payer_types::CallRequest;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when binding or calling a contract.
#[derive(Debug, Error)]
pub enum ContractError {
	/// The contract address is not a valid network address.
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
	/// The named entry point is not part of the contract interface.
	#[error("Unknown entry point: {0}")]
	UnknownEntryPoint(String),
	/// The entry point cannot receive attached value.
	#[error("Entry point is not payable: {0}")]
	NotPayable(String),
}

/// A single callable entry point of a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
	/// 4-byte function selector derived from the canonical signature.
	pub selector: [u8; 4],
	/// Whether the entry point accepts attached value.
	pub payable: bool,
}

/// Static description of a contract's callable entry points.
///
/// Supplied by the artifact/ABI collaborator; entry points are keyed by name
/// and validated at call time, not at handle resolution.
#[derive(Debug, Clone, Default)]
pub struct ContractInterface {
	entry_points: HashMap<String, EntryPoint>,
}

impl ContractInterface {
	/// Creates an empty interface description.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an entry point by its canonical signature, e.g. "payContract()".
	///
	/// The entry point name is the part of the signature before the argument
	/// list; the selector is the first four bytes of the keccak-256 hash of
	/// the full signature.
	pub fn entry_point(mut self, signature: &str, payable: bool) -> Self {
		let name = signature
			.split('(')
			.next()
			.unwrap_or(signature)
			.trim()
			.to_string();
		let hash = keccak256(signature.as_bytes());
		let mut selector = [0u8; 4];
		selector.copy_from_slice(&hash[..4]);
		self.entry_points.insert(name, EntryPoint { selector, payable });
		self
	}

	/// Registers a payable entry point by its canonical signature.
	pub fn payable(self, signature: &str) -> Self {
		self.entry_point(signature, true)
	}

	/// Looks up an entry point by name.
	pub fn get(&self, name: &str) -> Option<&EntryPoint> {
		self.entry_points.get(name)
	}
}

/// Typed binding between a contract address, its interface and a signer.
///
/// Immutable once resolved; construct one handle per target contract.
pub struct ContractHandle {
	address: Address,
	interface: ContractInterface,
	account: Arc<AccountService>,
}

impl ContractHandle {
	/// Binds an address string and interface description to a signing identity.
	///
	/// Fails with `InvalidAddress` if the address is malformed. Entry points
	/// are not validated here; an unknown name surfaces at call time.
	pub fn resolve(
		address: &str,
		interface: ContractInterface,
		account: Arc<AccountService>,
	) -> Result<Self, ContractError> {
		let address: Address = address
			.parse()
			.map_err(|e| ContractError::InvalidAddress(format!("{}: {}", address, e)))?;

		Ok(Self {
			address,
			interface,
			account,
		})
	}

	/// Returns the bound contract address.
	pub fn address(&self) -> Address {
		self.address
	}

	/// Returns the signing identity bound to this handle.
	pub fn account(&self) -> &Arc<AccountService> {
		&self.account
	}

	/// Builds a call request for the named entry point with attached value.
	///
	/// Fails with `UnknownEntryPoint` if the name is not in the interface and
	/// with `NotPayable` if value is attached to a non-payable entry point.
	/// The payment workflow passes no arguments, so the call data is exactly
	/// the selector.
	pub fn call(&self, entry_point: &str, value: U256) -> Result<CallRequest, ContractError> {
		let descriptor = self
			.interface
			.get(entry_point)
			.ok_or_else(|| ContractError::UnknownEntryPoint(entry_point.to_string()))?;

		if !descriptor.payable && value > U256::ZERO {
			return Err(ContractError::NotPayable(entry_point.to_string()));
		}

		Ok(CallRequest {
			to: self.address,
			entry_point: entry_point.to_string(),
			data: Bytes::from(descriptor.selector.to_vec()),
			value,
		})
	}
}
