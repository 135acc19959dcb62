//! Factory registry for pluggable relay components.
//!
//! Every sponsor signer and publisher implementation registers itself here by
//! name. At startup the configured names are resolved against the registry
//! and the `primary` implementation of each component is built.

use crate::apis::gasless::GaslessSubmitHandler;
use crate::periphery::ConfiguredPeripheryResolver;
use crate::server::AppState;
use relay_config::Config;
use relay_publisher::{PublisherFactory, PublisherService};
use relay_sponsor::{SignerFactory, SponsorService};
use relay_types::ConfigSchema;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Registered factories by implementation name.
pub struct FactoryRegistry {
	pub sponsor: HashMap<String, SignerFactory>,
	pub publisher: HashMap<String, PublisherFactory>,
}

impl FactoryRegistry {
	pub fn new() -> Self {
		Self {
			sponsor: HashMap::new(),
			publisher: HashMap::new(),
		}
	}

	pub fn register_sponsor(&mut self, name: impl Into<String>, factory: SignerFactory) {
		self.sponsor.insert(name.into(), factory);
	}

	pub fn register_publisher(&mut self, name: impl Into<String>, factory: PublisherFactory) {
		self.publisher.insert(name.into(), factory);
	}
}

impl Default for FactoryRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Returns the global registry, populating it on first use.
pub fn get_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in relay_sponsor::get_all_implementations() {
			tracing::debug!("Registering sponsor implementation: {}", name);
			registry.register_sponsor(name, factory);
		}

		for (name, factory) in relay_publisher::get_all_implementations() {
			tracing::debug!("Registering publisher implementation: {}", name);
			registry.register_publisher(name, factory);
		}

		registry
	})
}

/// Resolves every configured implementation name to its factory.
macro_rules! build_factories {
	($registry:expr, $config_impls:expr, $registry_field:ident, $type_name:literal) => {{
		let mut factories = HashMap::new();
		for name in $config_impls.keys() {
			if let Some(factory) = $registry.$registry_field.get(name) {
				factories.insert(name.clone(), *factory);
			} else {
				let mut available: Vec<_> = $registry.$registry_field.keys().cloned().collect();
				available.sort();
				return Err(format!(
					"Unknown {} implementation '{}'. Available: [{}]",
					$type_name,
					name,
					available.join(", ")
				)
				.into());
			}
		}
		factories
	}};
}

/// Checks an implementation's table against the schema the implementation
/// itself reports.
fn validate_implementation(
	kind: &str,
	name: &str,
	schema: Box<dyn ConfigSchema>,
	table: &toml::Value,
) -> Result<(), Box<dyn std::error::Error>> {
	schema
		.validate(table)
		.map_err(|e| format!("Invalid {} configuration for '{}': {}", kind, name, e).into())
}

/// Builds the shared server state from a validated configuration.
pub fn build_app_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
	let registry = get_registry();

	let sponsor_factories: HashMap<String, SignerFactory> =
		build_factories!(registry, config.sponsor.implementations, sponsor, "sponsor");
	let publisher_factories: HashMap<String, PublisherFactory> = build_factories!(
		registry,
		config.publisher.implementations,
		publisher,
		"publisher"
	);

	let sponsor_name = &config.sponsor.primary;
	let (Some(factory), Some(table)) = (
		sponsor_factories.get(sponsor_name),
		config.sponsor.implementations.get(sponsor_name),
	) else {
		return Err(format!("Primary sponsor '{}' is not configured", sponsor_name).into());
	};
	let signer =
		factory(table).map_err(|e| format!("Failed to create sponsor '{}': {}", sponsor_name, e))?;
	validate_implementation("sponsor", sponsor_name, signer.config_schema(), table)?;
	let sponsor = SponsorService::new(signer);
	tracing::info!(
		implementation = %sponsor_name,
		address = %sponsor.address(),
		"Loaded sponsor signer"
	);

	let publisher_name = &config.publisher.primary;
	let (Some(factory), Some(table)) = (
		publisher_factories.get(publisher_name),
		config.publisher.implementations.get(publisher_name),
	) else {
		return Err(format!("Primary publisher '{}' is not configured", publisher_name).into());
	};
	let implementation = factory(table)
		.map_err(|e| format!("Failed to create publisher '{}': {}", publisher_name, e))?;
	validate_implementation(
		"publisher",
		publisher_name,
		implementation.config_schema(),
		table,
	)?;
	let publisher = PublisherService::new(implementation);
	tracing::info!(implementation = %publisher_name, "Loaded publisher");

	let resolver = ConfiguredPeripheryResolver::from_networks(&config.networks);
	tracing::info!(chains = ?resolver.chain_ids(), "Serving gasless submissions");

	let api = config.api_or_default();
	Ok(AppState {
		service_id: config.service.id.clone(),
		sponsor: Arc::new(sponsor),
		gasless: Arc::new(GaslessSubmitHandler::new(
			Arc::new(resolver),
			Arc::new(publisher),
		)),
		auth_token: api.auth_token,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	const CONFIG: &str = r#"
[service]
id = "relay-registry-test"

[networks.8453]
periphery_address = "0x1111111111111111111111111111111111111111"

[sponsor]
primary = "local"
[sponsor.implementations.local]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"

[publisher]
primary = "memory"
[publisher.implementations.memory]
max_messages = 100

[api]
enabled = true
auth_token = "s3cret"
"#;

	fn build_err(config: &Config) -> String {
		match build_app_state(config) {
			Ok(_) => panic!("expected build to fail"),
			Err(e) => e.to_string(),
		}
	}

	#[test]
	fn test_registry_contains_all_implementations() {
		let registry = get_registry();
		assert!(registry.sponsor.contains_key("local"));
		assert!(registry.publisher.contains_key("memory"));
		assert!(registry.publisher.contains_key("http"));
	}

	#[test]
	fn test_build_app_state() {
		let config: Config = CONFIG.parse().unwrap();
		let state = build_app_state(&config).unwrap();

		assert_eq!(state.service_id, "relay-registry-test");
		assert_eq!(
			state.sponsor.address(),
			address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
		);
		assert!(state.auth_token.is_some());
	}

	#[test]
	fn test_unknown_implementation_lists_available() {
		let config: Config = CONFIG
			.replace(
				"[publisher.implementations.memory]\nmax_messages = 100",
				"[publisher.implementations.memory]\n[publisher.implementations.kafka]\nbrokers = \"x\"",
			)
			.parse()
			.unwrap();

		let err = build_err(&config);
		assert!(err.contains("Unknown publisher implementation 'kafka'"), "{}", err);
		assert!(err.contains("Available: [http, memory]"), "{}", err);
	}

	#[test]
	fn test_implementation_schema_checks_tables() {
		let memory_table: toml::Value = toml::from_str("max_messages = 100").unwrap();
		let publisher = relay_publisher::implementations::memory::create_publisher(&memory_table)
			.unwrap();
		assert!(
			validate_implementation("publisher", "memory", publisher.config_schema(), &memory_table)
				.is_ok()
		);

		let zero: toml::Value = toml::from_str("max_messages = 0").unwrap();
		let err = validate_implementation("publisher", "memory", publisher.config_schema(), &zero)
			.unwrap_err()
			.to_string();
		assert!(err.contains("Invalid publisher configuration for 'memory'"), "{}", err);

		let key_table: toml::Value = toml::from_str(
			r#"private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80""#,
		)
		.unwrap();
		let signer = relay_sponsor::implementations::local::create_signer(&key_table).unwrap();
		let empty = toml::Value::Table(toml::Table::new());
		let err = validate_implementation("sponsor", "local", signer.config_schema(), &empty)
			.unwrap_err()
			.to_string();
		assert!(err.contains("private_key"), "{}", err);
	}

	#[test]
	fn test_invalid_implementation_config_fails() {
		let config: Config = CONFIG
			.replace("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80", "0x1234")
			.parse()
			.unwrap();

		let err = build_err(&config);
		assert!(err.contains("Failed to create sponsor 'local'"), "{}", err);
		assert!(!err.contains("0x1234"), "{}", err);
	}
}
