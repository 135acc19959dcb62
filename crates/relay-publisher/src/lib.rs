//! Publishing of validated gasless deposits.
//!
//! Once a gasless submission passes validation it is handed to a publisher,
//! which forwards it to whatever executes deposits downstream (a queue, a
//! relayer endpoint) and returns a message identifier. Publishing is not
//! deduplicated here; consumers deduplicate on the deposit id.

use async_trait::async_trait;
use relay_types::{ConfigSchema, GaslessDepositMessage, ImplementationRegistry};
use thiserror::Error;

pub mod implementations {
	pub mod http;
	pub mod memory;
}

/// Errors that can occur while publishing.
#[derive(Debug, Error)]
pub enum PublisherError {
	/// The sink could not be reached.
	#[error("Network error: {0}")]
	Network(String),
	/// The sink answered but refused the message.
	#[error("Message rejected: {0}")]
	Rejected(String),
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

#[async_trait]
pub trait PublisherInterface: Send + Sync {
	/// Schema of the implementation's `[publisher.implementations.<name>]` table.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Publishes a message and returns its identifier.
	async fn publish(&self, message: &GaslessDepositMessage) -> Result<String, PublisherError>;
}

pub type PublisherFactory =
	fn(&toml::Value) -> Result<Box<dyn PublisherInterface>, PublisherError>;

pub trait PublisherRegistry: ImplementationRegistry<Factory = PublisherFactory> {}

/// Returns (name, factory) for every publisher implementation.
pub fn get_all_implementations() -> Vec<(&'static str, PublisherFactory)> {
	use implementations::{http, memory};

	vec![
		(memory::Registry::NAME, memory::Registry::factory()),
		(http::Registry::NAME, http::Registry::factory()),
	]
}

/// Publishes through the primary implementation.
pub struct PublisherService {
	implementation: Box<dyn PublisherInterface>,
}

impl PublisherService {
	pub fn new(implementation: Box<dyn PublisherInterface>) -> Self {
		Self { implementation }
	}

	/// Publishes `message`, once. No retries.
	pub async fn publish(&self, message: &GaslessDepositMessage) -> Result<String, PublisherError> {
		let message_id = self.implementation.publish(message).await?;
		tracing::info!(
			deposit_id = %message.deposit_id,
			message_id = %message_id,
			"Published gasless deposit"
		);
		Ok(message_id)
	}
}
