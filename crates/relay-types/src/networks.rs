//! Network configuration types.
//!
//! Each supported chain declares the periphery contract that gasless
//! meta-transactions must target.

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Configuration for a single chain.
///
/// # Fields
///
/// * `name` - Optional human-readable chain name, used in logs
/// * `periphery_address` - Periphery contract gasless transactions must target
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
	#[serde(default)]
	pub name: Option<String>,
	pub periphery_address: Address,
}

/// Chain ID to network configuration.
pub type NetworksConfig = HashMap<u64, NetworkConfig>;

/// Deserializes network tables keyed by chain ID.
///
/// TOML table keys are always strings, so chain IDs are parsed here.
///
/// # Errors
///
/// Returns a deserialization error if a key is not a valid u64.
pub fn deserialize_networks<'de, D>(deserializer: D) -> Result<NetworksConfig, D::Error>
where
	D: Deserializer<'de>,
{
	let string_map: HashMap<String, NetworkConfig> = HashMap::deserialize(deserializer)?;
	let mut result = HashMap::new();

	for (key, value) in string_map {
		let chain_id = key
			.parse::<u64>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid chain_id '{}': {}", key, e)))?;
		result.insert(chain_id, value);
	}

	Ok(result)
}
