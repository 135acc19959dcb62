//! Main entry point for the bridge relay service.
//!
//! The relay signs sponsored CCTP quotes and validates gasless deposit
//! submissions before handing them to a publisher. Components are pluggable
//! and selected by name in the configuration file.

use clap::Parser;
use relay_config::Config;
use std::path::PathBuf;

mod apis;
mod factory_registry;
mod periphery;
mod server;

/// Command-line arguments for the relay service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the relay service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging
/// 3. Loads and validates configuration
/// 4. Builds the sponsor signer, publisher and periphery resolver
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started relay");

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let state = factory_registry::build_app_state(&config)?;

	let api_config = config.api_or_default();
	if api_config.enabled {
		server::start_server(api_config, state).await?;
	} else {
		tracing::warn!("API server disabled in configuration, nothing to serve");
	}

	tracing::info!("Stopped relay");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_args_default_values() {
		let args = Args::try_parse_from(["relay"]).unwrap();
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_args_custom_values() {
		let args =
			Args::try_parse_from(["relay", "--config", "config/relay.toml", "-l", "debug"]).unwrap();
		assert_eq!(args.config, PathBuf::from("config/relay.toml"));
		assert_eq!(args.log_level, "debug");
	}

	#[tokio::test]
	async fn test_sample_config_builds() {
		let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/relay.toml");
		let config = Config::from_file(path).await.unwrap();
		assert!(factory_registry::build_app_state(&config).is_ok());
	}
}
