//! Liveness endpoint.

use alloy_primitives::Address;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	/// Configured `service.id`.
	pub service: String,
	/// Address that signs sponsored quotes.
	pub sponsor: Address,
}

impl HealthResponse {
	pub fn ok(service: impl Into<String>, sponsor: Address) -> Self {
		Self {
			status: "ok",
			service: service.into(),
			sponsor,
		}
	}
}
