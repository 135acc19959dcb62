//! Periphery contract lookup by chain id.

use alloy_primitives::Address;
use relay_types::NetworksConfig;
use std::collections::HashMap;

/// Resolves the periphery contract gasless transactions must target.
pub trait PeripheryResolver: Send + Sync {
	/// Returns `None` for chains the relay does not serve.
	fn periphery_address(&self, chain_id: u64) -> Option<Address>;
}

/// Resolver over the `[networks]` configuration, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPeripheryResolver {
	addresses: HashMap<u64, Address>,
}

impl ConfiguredPeripheryResolver {
	pub fn from_networks(networks: &NetworksConfig) -> Self {
		Self {
			addresses: networks
				.iter()
				.map(|(chain_id, network)| (*chain_id, network.periphery_address))
				.collect(),
		}
	}

	pub fn chain_ids(&self) -> Vec<u64> {
		let mut ids: Vec<u64> = self.addresses.keys().copied().collect();
		ids.sort_unstable();
		ids
	}
}

impl PeripheryResolver for ConfiguredPeripheryResolver {
	fn periphery_address(&self, chain_id: u64) -> Option<Address> {
		self.addresses.get(&chain_id).copied()
	}
}
