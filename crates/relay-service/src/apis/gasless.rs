//! Gasless submission validation.
//!
//! A submission is accepted only if, in order:
//!
//! 1. the body has the expected shape
//! 2. `swapTx.to` is the periphery contract of `swapTx.chainId`
//! 3. the witness names a depositor
//! 4. a signer can be recovered from the EIP-712 permit and `signature`
//! 5. the recovered signer is `permit.message.from`
//! 6. `permit.message.from` is the depositor
//!
//! The first failing check rejects the request. Accepted submissions are
//! published once and answered with `{ depositId, messageId }`.

use super::schema::assert_gasless_shape;
use crate::periphery::PeripheryResolver;
use alloy_primitives::{hex, Address, Signature};
use relay_publisher::PublisherService;
use relay_types::{
	truncate_id, APIError, GaslessDepositMessage, GaslessSubmitBody, GaslessSubmitResponse,
};
use serde_json::Value;
use std::sync::Arc;

const INVALID_SIGNATURE: &str = "Invalid signature: unable to recover signer";

/// Validates and publishes gasless submissions.
pub struct GaslessSubmitHandler {
	resolver: Arc<dyn PeripheryResolver>,
	publisher: Arc<PublisherService>,
}

impl GaslessSubmitHandler {
	pub fn new(resolver: Arc<dyn PeripheryResolver>, publisher: Arc<PublisherService>) -> Self {
		Self {
			resolver,
			publisher,
		}
	}

	/// Runs the validation steps over a raw JSON body and publishes it.
	pub async fn handle(&self, raw: Value) -> Result<GaslessSubmitResponse, APIError> {
		let body = decode(&raw).inspect_err(|e| reject("shape", e))?;
		let deposit_id = body.deposit_id().to_string();
		tracing::debug!(
			deposit_id = %deposit_id,
			chain_id = body.swap_tx.chain_id,
			witness = body.swap_tx.data.witness.kind(),
			"Validating gasless submission"
		);

		self.check_target(&body)
			.inspect_err(|e| reject("target", e))?;

		let depositor = body.swap_tx.data.witness.depositor();

		let signer = recover_signer(&body).inspect_err(|e| reject("signature", e))?;

		let permit_from = body.permit_from().ok_or_else(|| {
			APIError::invalid_param(
				"permit.message.from is not a valid address",
				"swapTx.data.permit.message.from",
			)
		})?;
		if signer != permit_from {
			let err = APIError::invalid_param("Signature mismatch", "signature");
			reject("signer", &err);
			return Err(err);
		}

		if permit_from != depositor {
			let err = APIError::invalid_param(
				"permit.message.from must match depositor",
				"swapTx.data.permit.message.from",
			);
			reject("depositor", &err);
			return Err(err);
		}

		let message = GaslessDepositMessage {
			deposit_id: deposit_id.clone(),
			swap_tx: raw.get("swapTx").cloned().unwrap_or(Value::Null),
			signature: normalized_signature(&body.signature),
			submitted_at: chrono::Utc::now().timestamp().max(0) as u64,
		};

		let message_id = self.publisher.publish(&message).await.map_err(|e| {
			tracing::warn!(deposit_id = %deposit_id, error = %e, "Failed to publish gasless deposit");
			APIError::ServiceUnavailable {
				error_type: "PUBLISH_FAILED".to_string(),
				message: format!("Failed to publish deposit: {}", e),
				retry_after: Some(5),
			}
		})?;

		tracing::debug!(
			deposit_id = %deposit_id,
			message_id = %truncate_id(&message_id),
			"Accepted gasless submission"
		);

		Ok(GaslessSubmitResponse {
			deposit_id,
			message_id,
		})
	}

	fn check_target(&self, body: &GaslessSubmitBody) -> Result<(), APIError> {
		let chain_id = body.swap_tx.chain_id;
		let periphery = self
			.resolver
			.periphery_address(chain_id)
			.ok_or_else(|| APIError::invalid_param("Unsupported chain id", "swapTx.chainId"))?;

		// Address equality ignores checksum casing.
		if body.swap_tx.to != periphery {
			return Err(APIError::invalid_param("Invalid target address", "swapTx.to"));
		}
		Ok(())
	}
}

fn decode(raw: &Value) -> Result<GaslessSubmitBody, APIError> {
	assert_gasless_shape(raw)?;
	serde_json::from_value(raw.clone())
		.map_err(|e| APIError::invalid_input(format!("Malformed gasless submission: {}", e)))
}

/// Recovers the address that signed the permit's EIP-712 hash.
fn recover_signer(body: &GaslessSubmitBody) -> Result<Address, APIError> {
	let hash = body.swap_tx.data.permit.eip712_signing_hash().map_err(|e| {
		APIError::invalid_param(
			format!("Invalid permit typed data: {}", e),
			"swapTx.data.permit",
		)
	})?;

	let bytes = hex::decode(body.signature.trim())
		.map_err(|_| APIError::invalid_param(INVALID_SIGNATURE, "signature"))?;
	let signature = Signature::try_from(bytes.as_slice())
		.map_err(|_| APIError::invalid_param(INVALID_SIGNATURE, "signature"))?;

	signature
		.recover_address_from_prehash(&hash)
		.map_err(|_| APIError::invalid_param(INVALID_SIGNATURE, "signature"))
}

fn normalized_signature(signature: &str) -> String {
	let trimmed = signature.trim();
	hex::decode(trimmed)
		.map(hex::encode_prefixed)
		.unwrap_or_else(|_| trimmed.to_string())
}

fn reject(step: &str, err: &APIError) {
	tracing::warn!(step, error = %err, "Rejected gasless submission");
}
