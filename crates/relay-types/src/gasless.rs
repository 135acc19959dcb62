//! Gasless meta-transaction submission types.
//!
//! A gasless submission carries an ERC-3009 `receiveWithAuthorization` permit
//! signed by the user, plus a witness describing the bridge (or bridge + swap)
//! the permitted funds must be used for. The relay validates the submission
//! and hands it to a publisher; it never submits transactions itself.

use alloy_dyn_abi::TypedData;
use alloy_primitives::Address;
use serde::{de::Error, Deserialize, Deserializer, Serialize};

/// Request body of a gasless submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaslessSubmitBody {
	/// The meta-transaction to be relayed.
	pub swap_tx: GaslessSwapTx,
	/// Hex signature over the EIP-712 permit in `swap_tx.data.permit`.
	/// Kept as text so a malformed value is reported by signature recovery
	/// rather than by body decoding.
	pub signature: String,
}

/// Meta-transaction envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaslessSwapTx {
	/// Ecosystem tag of the transaction (e.g. "evm-gasless").
	pub ecosystem: String,
	/// Chain the periphery contract lives on.
	#[serde(deserialize_with = "u64_from_string_or_number")]
	pub chain_id: u64,
	/// Target contract; must be the periphery contract of `chain_id`.
	pub to: Address,
	/// Permit and witness payload.
	pub data: GaslessSwapData,
}

/// Payload of a gasless meta-transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaslessSwapData {
	/// Deposit identifier assigned by the client.
	#[serde(deserialize_with = "string_or_number")]
	pub deposit_id: String,
	/// Intended bridge action.
	pub witness: Witness,
	/// EIP-712 typed data of the ERC-3009 authorization.
	pub permit: TypedData,
}

/// Intent bound to the permitted transfer, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Witness {
	/// Plain bridge deposit.
	BridgeWitness(BridgeWitnessData),
	/// Bridge deposit preceded by a swap on the origin chain.
	BridgeAndSwapWitness(BridgeAndSwapWitnessData),
}

impl Witness {
	/// Discriminant as it appears on the wire.
	pub fn kind(&self) -> &'static str {
		match self {
			Witness::BridgeWitness(_) => "BridgeWitness",
			Witness::BridgeAndSwapWitness(_) => "BridgeAndSwapWitness",
		}
	}

	/// Address on whose behalf the deposit is made.
	pub fn depositor(&self) -> Address {
		match self {
			Witness::BridgeWitness(data) => data.base_deposit_data.depositor,
			Witness::BridgeAndSwapWitness(data) => data.deposit_data.depositor,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeWitnessData {
	pub base_deposit_data: DepositData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeAndSwapWitnessData {
	pub deposit_data: DepositData,
}

/// The part of a deposit the relay checks. Remaining fields are forwarded
/// untouched from the raw request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositData {
	pub depositor: Address,
}

impl GaslessSubmitBody {
	/// Returns `permit.message.from`, if present and a valid address.
	pub fn permit_from(&self) -> Option<Address> {
		self.swap_tx
			.data
			.permit
			.message
			.get("from")
			.and_then(|v| v.as_str())
			.and_then(|s| s.parse::<Address>().ok())
	}

	pub fn deposit_id(&self) -> &str {
		&self.swap_tx.data.deposit_id
	}
}

/// Response of a successful gasless submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaslessSubmitResponse {
	pub deposit_id: String,
	pub message_id: String,
}

/// Message handed to the publisher for a validated submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaslessDepositMessage {
	pub deposit_id: String,
	/// Raw `swapTx` object as submitted, forwarded intact.
	pub swap_tx: serde_json::Value,
	/// 0x-prefixed hex signature.
	pub signature: String,
	/// Unix timestamp (seconds) at which the submission was accepted.
	pub submitted_at: u64,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	match serde_json::Value::deserialize(deserializer)? {
		serde_json::Value::String(s) => Ok(s),
		serde_json::Value::Number(n) => Ok(n.to_string()),
		other => Err(D::Error::custom(format!(
			"expected string or number, got {}",
			other
		))),
	}
}

fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	match serde_json::Value::deserialize(deserializer)? {
		serde_json::Value::Number(n) => n
			.as_u64()
			.ok_or_else(|| D::Error::custom(format!("invalid chain id {}", n))),
		serde_json::Value::String(s) => s
			.trim()
			.parse::<u64>()
			.map_err(|_| D::Error::custom(format!("invalid chain id '{}'", s))),
		other => Err(D::Error::custom(format!(
			"expected string or number, got {}",
			other
		))),
	}
}
