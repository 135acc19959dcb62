//! In-memory publisher.
//!
//! Keeps published messages in process memory. Intended for development and
//! tests, where no downstream consumer exists.

use crate::{PublisherError, PublisherFactory, PublisherInterface, PublisherRegistry};
use async_trait::async_trait;
use relay_types::{
	ConfigSchema, Field, FieldType, GaslessDepositMessage, ImplementationRegistry, Schema,
	ValidationError,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const DEFAULT_MAX_MESSAGES: usize = 10_000;

/// A message together with the id it was published under.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
	pub message_id: String,
	pub message: GaslessDepositMessage,
}

/// Publisher that records messages in a bounded in-memory log.
///
/// Once `max_messages` is reached the oldest entry is dropped.
#[derive(Clone)]
pub struct MemoryPublisher {
	log: Arc<RwLock<VecDeque<PublishedMessage>>>,
	max_messages: usize,
}

impl MemoryPublisher {
	pub fn new(max_messages: usize) -> Self {
		Self {
			log: Arc::new(RwLock::new(VecDeque::new())),
			max_messages: max_messages.max(1),
		}
	}

	/// Returns the retained messages, oldest first.
	pub async fn messages(&self) -> Vec<PublishedMessage> {
		self.log.read().await.iter().cloned().collect()
	}
}

impl Default for MemoryPublisher {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_MESSAGES)
	}
}

#[async_trait]
impl PublisherInterface for MemoryPublisher {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryPublisherSchema)
	}

	async fn publish(&self, message: &GaslessDepositMessage) -> Result<String, PublisherError> {
		let message_id = Uuid::new_v4().to_string();
		let mut log = self.log.write().await;
		if log.len() >= self.max_messages {
			log.pop_front();
		}
		log.push_back(PublishedMessage {
			message_id: message_id.clone(),
			message: message.clone(),
		});
		Ok(message_id)
	}
}

pub struct MemoryPublisherSchema;

impl ConfigSchema for MemoryPublisherSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![Field::new(
				"max_messages",
				FieldType::Integer {
					min: Some(1),
					max: Some(1_000_000),
				},
			)],
		);
		schema.validate(config)
	}
}

/// Configuration parameters:
/// - `max_messages` (optional): size of the retained log, default 10000
pub fn create_publisher(
	config: &toml::Value,
) -> Result<Box<dyn PublisherInterface>, PublisherError> {
	MemoryPublisherSchema
		.validate(config)
		.map_err(|e| PublisherError::InvalidConfig(e.to_string()))?;

	let max_messages = config
		.get("max_messages")
		.and_then(|v| v.as_integer())
		.map(|v| v as usize)
		.unwrap_or(DEFAULT_MAX_MESSAGES);

	Ok(Box::new(MemoryPublisher::new(max_messages)))
}

pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = PublisherFactory;

	fn factory() -> Self::Factory {
		create_publisher
	}
}

impl PublisherRegistry for Registry {}
