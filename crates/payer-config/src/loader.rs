//! Environment variable resolution for configuration files.
//!
//! Supports `${VAR}` and `${VAR:-default}` placeholders in raw TOML content,
//! resolved before parsing. A placeholder without a default for an unset
//! variable is an error so secrets are never silently empty.

use crate::ConfigError;
use regex::Regex;

/// Replaces `${VAR}` / `${VAR:-default}` placeholders with environment values.
pub(crate) fn resolve_env_vars(content: &str) -> Result<String, ConfigError> {
	let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
		.map_err(|e| ConfigError::Parse(e.to_string()))?;

	let mut resolved = String::with_capacity(content.len());
	let mut last_end = 0;

	for caps in pattern.captures_iter(content) {
		let whole = match caps.get(0) {
			Some(m) => m,
			None => continue,
		};
		let name = &caps[1];

		resolved.push_str(&content[last_end..whole.start()]);
		match std::env::var(name) {
			Ok(value) => resolved.push_str(&value),
			Err(_) => match caps.get(2) {
				Some(default) => resolved.push_str(default.as_str()),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable {} is not set and has no default",
						name
					)));
				}
			},
		}
		last_end = whole.end();
	}
	resolved.push_str(&content[last_end..]);

	Ok(resolved)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("PAYER_TEST_HOST", "localhost");
		std::env::set_var("PAYER_TEST_PORT", "8545");

		let input = "rpc_url = \"http://${PAYER_TEST_HOST}:${PAYER_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "rpc_url = \"http://localhost:8545\"");

		std::env::remove_var("PAYER_TEST_HOST");
		std::env::remove_var("PAYER_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${PAYER_TEST_MISSING:-0.01}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"0.01\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "key = \"${PAYER_TEST_ABSENT}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("PAYER_TEST_ABSENT"));
	}

	#[test]
	fn test_content_without_placeholders_is_unchanged() {
		let input = "chain_id = 31337";
		assert_eq!(resolve_env_vars(input).unwrap(), input);
	}
}
