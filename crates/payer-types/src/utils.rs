//! Native currency unit conversion utilities.
//!
//! Converts between human-readable native currency amounts ("0.01") and raw
//! wei values, and formats wei amounts back for display.

use alloy_primitives::U256;
use thiserror::Error;

/// Decimal places of the native currency.
const NATIVE_DECIMALS: usize = 18;

/// Errors that can occur when parsing a native currency amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitsError {
	/// The amount string was empty.
	#[error("amount is empty")]
	Empty,
	/// The amount contained a non-decimal character.
	#[error("invalid character in amount: {0:?}")]
	InvalidDigit(char),
	/// The fractional part was more precise than the native currency allows.
	#[error("too many decimal places (max {NATIVE_DECIMALS})")]
	TooManyDecimals,
	/// The amount does not fit in a 256-bit integer.
	#[error("amount out of range")]
	Overflow,
}

/// Parses a decimal native currency amount into wei.
///
/// Accepts plain integers ("3"), fractions ("0.01", ".5") and trailing
/// fractional zeros. Up to 18 decimal places are honored; more is an error
/// rather than silent truncation.
pub fn parse_native_units(amount: &str) -> Result<U256, UnitsError> {
	let amount = amount.trim();
	if amount.is_empty() {
		return Err(UnitsError::Empty);
	}

	let (integer_part, fraction_part) = match amount.split_once('.') {
		Some((i, f)) => (i, f),
		None => (amount, ""),
	};

	if integer_part.is_empty() && fraction_part.is_empty() {
		return Err(UnitsError::Empty);
	}
	if fraction_part.len() > NATIVE_DECIMALS {
		return Err(UnitsError::TooManyDecimals);
	}
	if let Some(c) = integer_part
		.chars()
		.chain(fraction_part.chars())
		.find(|c| !c.is_ascii_digit())
	{
		return Err(UnitsError::InvalidDigit(c));
	}

	// Scale to wei by appending the fraction padded out to 18 digits.
	let mut scaled = String::with_capacity(integer_part.len() + NATIVE_DECIMALS);
	scaled.push_str(integer_part);
	scaled.push_str(fraction_part);
	for _ in fraction_part.len()..NATIVE_DECIMALS {
		scaled.push('0');
	}

	let trimmed = scaled.trim_start_matches('0');
	if trimmed.is_empty() {
		return Ok(U256::ZERO);
	}
	U256::from_str_radix(trimmed, 10).map_err(|_| UnitsError::Overflow)
}

/// Formats a wei amount as a decimal native currency string.
///
/// Trailing fractional zeros are removed for cleaner display; whole amounts
/// keep a single trailing zero ("1.0").
pub fn format_native_units(wei: U256) -> String {
	let raw = wei.to_string();

	let (integer_part, fraction_part) = if raw.len() <= NATIVE_DECIMALS {
		let fraction = format!("{:0>width$}", raw, width = NATIVE_DECIMALS);
		("0".to_string(), fraction)
	} else {
		let split = raw.len() - NATIVE_DECIMALS;
		(raw[..split].to_string(), raw[split..].to_string())
	};

	let fraction = fraction_part.trim_end_matches('0');
	if fraction.is_empty() {
		format!("{}.0", integer_part)
	} else {
		format!("{}.{}", integer_part, fraction)
	}
}
