//! Sponsored CCTP signing API.
//!
//! Callers post a [`SponsoredQuote`] and receive the sponsor's signature over
//! its split-hash digest. The endpoint is restricted to holders of the
//! configured bearer token.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use relay_sponsor::{create_cctp_signature, SponsorService};
use relay_types::{APIError, SecretString, SponsoredQuote, SponsoredSignature};
use serde_json::Value;

/// Checks the `Authorization: Bearer` header against the configured token.
///
/// With no token configured every request is refused.
pub fn authorize(expected: Option<&SecretString>, headers: &HeaderMap) -> Result<(), APIError> {
	let Some(expected) = expected else {
		return Err(APIError::forbidden("Sponsored signing is not enabled"));
	};

	let provided = headers
		.get(AUTHORIZATION)
		.and_then(|v| v.to_str().ok())
		.and_then(|v| v.strip_prefix("Bearer "))
		.map(str::trim);

	match provided {
		Some(token) if expected.matches(token) => Ok(()),
		_ => Err(APIError::forbidden("Invalid or missing bearer token")),
	}
}

/// Decodes a quote and signs it with the sponsor key.
pub async fn sign_sponsored_quote(
	body: Value,
	sponsor: &SponsorService,
) -> Result<SponsoredSignature, APIError> {
	let quote: SponsoredQuote = serde_json::from_value(body)
		.map_err(|e| APIError::invalid_input(format!("Malformed sponsored quote: {}", e)))?;

	create_cctp_signature(&quote, sponsor)
		.await
		.map_err(|e| APIError::InternalServerError {
			error_type: "SIGNING_FAILED".to_string(),
			message: e.to_string(),
		})
}
