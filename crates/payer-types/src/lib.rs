//! Common types for the payer workspace.
//!
//! This crate defines the data model shared by the payment workflow: call
//! requests, pending transactions, receipts, the payment lifecycle status,
//! reporter events, and supporting utilities. Keeping them in one place
//! ensures consistency across the account, contract, delivery and core
//! crates.

/// Contract call request types.
pub mod call;
/// Transaction hash and receipt types.
pub mod delivery;
/// Events emitted toward the result reporter.
pub mod events;
/// Secure string type for private key material.
pub mod secret_string;
/// Payment lifecycle states.
pub mod status;
/// Native currency unit conversion utilities.
pub mod utils;

// Re-export all types for convenient access
pub use call::*;
pub use delivery::*;
pub use events::*;
pub use secret_string::SecretString;
pub use status::*;
pub use utils::{format_native_units, parse_native_units, UnitsError};
