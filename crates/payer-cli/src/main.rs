//! Command-line entry point for the payer.
//!
//! Submits one value-bearing transaction to a deployed contract and waits
//! for it to confirm. Configuration comes from a TOML file; the target
//! address, value and entry point can be overridden on the command line.
//! Exit code 0 means the payment confirmed; every failure kind maps to a
//! distinct non-zero code.

use clap::Parser;
use payer_account::implementations::local::create_account;
use payer_account::AccountService;
use payer_config::{Config, ConfigError};
use payer_contract::{ContractHandle, ContractInterface};
use payer_core::{PaymentError, PaymentService, PaymentSettings};
use payer_delivery::implementations::evm::alloy::create_http_delivery;
use payer_types::{format_native_units, parse_native_units, PaymentEvent};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Command-line arguments for the payer.
#[derive(Parser, Debug)]
#[command(author, version, about = "Pay a contract entry point and wait for confirmation", long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "payer.toml")]
	config: PathBuf,

	/// Target contract address (overrides the configuration file)
	#[arg(long)]
	address: Option<String>,

	/// Value in native currency units, e.g. "0.01" (overrides the configuration file)
	#[arg(long)]
	value: Option<String>,

	/// Entry point to invoke (overrides the configuration file)
	#[arg(long)]
	entry_point: Option<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,
}

/// Failures surfaced at the process boundary.
#[derive(Debug, thiserror::Error)]
enum RunError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Payment(#[from] PaymentError),
}

/// Maps terminal outcomes to process exit codes.
///
/// The contract is: 0 = confirmed, non-zero = any failure. Distinct codes
/// per failure kind make the result scriptable.
fn exit_code(err: &RunError) -> ExitCode {
	let code = match err {
		RunError::Config(_) => 1,
		RunError::Payment(e) => match e.kind() {
			"invalid_address" => 2,
			"unknown_entry_point" | "not_payable" => 3,
			"invalid_key" | "signing_failed" => 4,
			"insufficient_funds" => 5,
			"broadcast_rejected" => 6,
			"execution_reverted" => 7,
			"timeout" => 8,
			"connection_lost" | "invalid_response" => 9,
			"cancelled" => 10,
			_ => 1,
		},
	};
	ExitCode::from(code)
}

#[tokio::main]
async fn main() -> ExitCode {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	match run(args).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			// Payment failures were already reported through the event
			// channel; configuration problems are printed here.
			if let RunError::Config(_) = e {
				eprintln!("Error: {}", e);
			}
			tracing::debug!(error = %e, "Exiting with failure");
			exit_code(&e)
		}
	}
}

async fn run(args: Args) -> Result<(), RunError> {
	let mut config = Config::from_file(args.config.to_string_lossy().as_ref()).await?;
	tracing::info!(config = %args.config.display(), "Loaded configuration");

	if let Some(address) = args.address {
		config.payment.contract_address = address;
	}
	if let Some(value) = args.value {
		config.payment.value = value;
	}
	if let Some(entry_point) = args.entry_point {
		config.payment.entry_point = entry_point;
	}

	// Overrides bypass file validation, so the value is re-parsed here.
	let value = parse_native_units(&config.payment.value)
		.map_err(|e| ConfigError::Validation(format!("value: {}", e)))?;

	let account = create_account(&config.account.private_key, config.network.chain_id)
		.map_err(|e| RunError::Payment(e.into()))?;
	let account = Arc::new(AccountService::new(account));

	let interface =
		ContractInterface::new().payable(&format!("{}()", config.payment.entry_point));
	let handle = ContractHandle::resolve(&config.payment.contract_address, interface, account)
		.map_err(|e| RunError::Payment(e.into()))?;

	let delivery = create_http_delivery(&config.network.rpc_url)
		.map_err(|e| RunError::Payment(e.into()))?;

	let settings = PaymentSettings {
		chain_id: config.network.chain_id,
		confirmations: config.payment.confirmations,
		timeout: Duration::from_secs(config.payment.timeout_secs),
		poll_interval: Duration::from_secs(config.network.poll_interval_secs),
	};

	let (events_tx, mut events_rx) = mpsc::unbounded_channel();
	let service = PaymentService::new(handle, delivery, settings, events_tx);

	// Result reporter: the core never writes to stdout itself.
	let reporter = tokio::spawn(async move {
		while let Some(event) = events_rx.recv().await {
			match event {
				PaymentEvent::Submitted { hash } => {
					println!("Transaction sent: {}", hash);
				}
				PaymentEvent::Confirmed { receipt } => {
					println!("Payment successful");
					println!(
						"Included in block {}, fee paid {}",
						receipt.block_number,
						format_native_units(receipt.fee_paid)
					);
				}
				PaymentEvent::Failed { kind, details } => {
					eprintln!("Payment failed ({}): {}", kind, details);
				}
			}
		}
	});

	// Ctrl-C cancels the confirmation wait, not the broadcast: a transaction
	// already sent may still be included later.
	let (cancel_tx, mut cancel_rx) = watch::channel(false);
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			tracing::warn!("Interrupt received, cancelling confirmation wait");
			let _ = cancel_tx.send(true);
		}
	});

	let result = service
		.execute(&config.payment.entry_point, value, &mut cancel_rx)
		.await;

	// Dropping the service closes the event channel so the reporter drains.
	drop(service);
	let _ = reporter.await;

	result.map(|_| ()).map_err(RunError::Payment)
}
