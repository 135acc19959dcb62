//! HTTP publisher.
//!
//! POSTs each message as JSON to a configured endpoint. The sink may answer
//! with `{ "messageId": "..." }`; when it does not, a UUID is assigned here.

use crate::{PublisherError, PublisherFactory, PublisherInterface, PublisherRegistry};
use async_trait::async_trait;
use relay_types::{
	ConfigSchema, Field, FieldType, GaslessDepositMessage, ImplementationRegistry, Schema,
	SecretString, ValidationError,
};
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

pub struct HttpPublisher {
	client: reqwest::Client,
	endpoint: String,
	auth_token: Option<SecretString>,
}

impl HttpPublisher {
	pub fn new(
		endpoint: String,
		auth_token: Option<SecretString>,
		timeout: Duration,
	) -> Result<Self, PublisherError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| PublisherError::InvalidConfig(format!("HTTP client: {}", e)))?;
		Ok(Self {
			client,
			endpoint,
			auth_token,
		})
	}
}

#[async_trait]
impl PublisherInterface for HttpPublisher {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpPublisherSchema)
	}

	async fn publish(&self, message: &GaslessDepositMessage) -> Result<String, PublisherError> {
		let mut request = self.client.post(&self.endpoint).json(message);
		if let Some(token) = &self.auth_token {
			request = request.bearer_auth(token.expose_secret());
		}

		let response = request
			.send()
			.await
			.map_err(|e| PublisherError::Network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(PublisherError::Rejected(format!(
				"sink returned {}: {}",
				status,
				body.chars().take(256).collect::<String>()
			)));
		}

		// Non-JSON or empty bodies are accepted; the id is then assigned locally.
		let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);
		let message_id = body
			.get("messageId")
			.and_then(|v| match v {
				serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
				serde_json::Value::Number(n) => Some(n.to_string()),
				_ => None,
			})
			.unwrap_or_else(|| {
				tracing::debug!(endpoint = %self.endpoint, "Sink returned no messageId, assigning one");
				Uuid::new_v4().to_string()
			});

		Ok(message_id)
	}
}

pub struct HttpPublisherSchema;

impl ConfigSchema for HttpPublisherSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("endpoint", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(url) if url.starts_with("http://") || url.starts_with("https://") => Ok(()),
					_ => Err("endpoint must be an http(s) URL".to_string()),
				}
			})],
			vec![
				Field::new("auth_token", FieldType::String),
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
			],
		);
		schema.validate(config)
	}
}

/// Configuration parameters:
/// - `endpoint`: URL messages are POSTed to
/// - `auth_token` (optional): sent as `Authorization: Bearer <token>`
/// - `timeout_seconds` (optional): request timeout, default 10
pub fn create_publisher(
	config: &toml::Value,
) -> Result<Box<dyn PublisherInterface>, PublisherError> {
	HttpPublisherSchema
		.validate(config)
		.map_err(|e| PublisherError::InvalidConfig(e.to_string()))?;

	let endpoint = config
		.get("endpoint")
		.and_then(|v| v.as_str())
		.ok_or_else(|| PublisherError::InvalidConfig("endpoint is required".into()))?
		.to_string();
	let auth_token = config
		.get("auth_token")
		.and_then(|v| v.as_str())
		.filter(|s| !s.is_empty())
		.map(SecretString::from);
	let timeout_seconds = config
		.get("timeout_seconds")
		.and_then(|v| v.as_integer())
		.map(|v| v as u64)
		.unwrap_or(DEFAULT_TIMEOUT_SECONDS);

	Ok(Box::new(HttpPublisher::new(
		endpoint,
		auth_token,
		Duration::from_secs(timeout_seconds),
	)?))
}

pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = PublisherFactory;

	fn factory() -> Self::Factory {
		create_publisher
	}
}

impl PublisherRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
	use serde_json::{json, Value};
	use std::sync::Arc;
	use tokio::sync::Mutex;

	type Received = Arc<Mutex<Vec<(Option<String>, Value)>>>;

	async fn spawn_sink(status: StatusCode, reply: Value) -> (String, Received) {
		let received: Received = Arc::new(Mutex::new(Vec::new()));
		let app = Router::new()
			.route(
				"/publish",
				post(
					move |State(received): State<Received>, headers: HeaderMap, Json(body): Json<Value>| {
						let reply = reply.clone();
						async move {
							let auth = headers
								.get("authorization")
								.and_then(|v| v.to_str().ok())
								.map(str::to_string);
							received.lock().await.push((auth, body));
							(status, Json(reply))
						}
					},
				),
			)
			.with_state(received.clone());

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});
		(format!("http://{}/publish", addr), received)
	}

	fn message() -> GaslessDepositMessage {
		GaslessDepositMessage {
			deposit_id: "77".into(),
			swap_tx: json!({ "chainId": 8453 }),
			signature: "0xabcd".into(),
			submitted_at: 1_700_000_000,
		}
	}

	fn publisher(endpoint: &str, token: Option<&str>) -> Box<dyn PublisherInterface> {
		let mut table = toml::Table::new();
		table.insert("endpoint".into(), toml::Value::String(endpoint.into()));
		if let Some(token) = token {
			table.insert("auth_token".into(), toml::Value::String(token.into()));
		}
		create_publisher(&toml::Value::Table(table)).unwrap()
	}

	#[tokio::test]
	async fn test_posts_message_with_bearer_token() {
		let (endpoint, received) = spawn_sink(StatusCode::OK, json!({ "messageId": "sink-1" })).await;

		let id = publisher(&endpoint, Some("t0ken"))
			.publish(&message())
			.await
			.unwrap();
		assert_eq!(id, "sink-1");

		let received = received.lock().await;
		assert_eq!(received.len(), 1);
		assert_eq!(received[0].0.as_deref(), Some("Bearer t0ken"));
		assert_eq!(received[0].1["depositId"], json!("77"));
		assert_eq!(received[0].1["submittedAt"], json!(1_700_000_000u64));
	}

	#[tokio::test]
	async fn test_assigns_id_when_sink_returns_none() {
		let (endpoint, _) = spawn_sink(StatusCode::OK, json!({ "ok": true })).await;
		let id = publisher(&endpoint, None).publish(&message()).await.unwrap();
		assert!(Uuid::parse_str(&id).is_ok());
	}

	#[tokio::test]
	async fn test_error_status_is_rejection() {
		let (endpoint, _) =
			spawn_sink(StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "busy" })).await;
		let result = publisher(&endpoint, None).publish(&message()).await;
		assert!(matches!(result, Err(PublisherError::Rejected(msg)) if msg.contains("503")));
	}

	#[tokio::test]
	async fn test_unreachable_sink_is_network_error() {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let result = publisher(&format!("http://{}/publish", addr), None)
			.publish(&message())
			.await;
		assert!(matches!(result, Err(PublisherError::Network(_))));
	}

	#[test]
	fn test_schema_requires_http_endpoint() {
		let config: toml::Value = toml::from_str(r#"endpoint = "ftp://sink""#).unwrap();
		assert!(matches!(
			create_publisher(&config),
			Err(PublisherError::InvalidConfig(_))
		));
	}
}
