//! Shape check for gasless submission bodies.
//!
//! Walks the fields the validator depends on before the body is decoded, so a
//! malformed request is rejected with the dotted path of the offending field.

use alloy_dyn_abi::TypedData;
use alloy_primitives::Address;
use relay_types::APIError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
	Object,
	String,
	/// Numeric identifiers may arrive as JSON numbers or strings.
	Scalar,
	/// Unsigned integer, as a JSON number or a decimal string.
	Uint,
	/// 20-byte hex address, `0x` optional.
	Address,
}

impl Kind {
	fn matches(self, value: &Value) -> bool {
		match self {
			Kind::Object => value.is_object(),
			Kind::String => value.is_string(),
			Kind::Scalar => value.is_string() || value.is_u64(),
			Kind::Uint => {
				value.is_u64() || value.as_str().is_some_and(|s| s.trim().parse::<u64>().is_ok())
			},
			Kind::Address => value
				.as_str()
				.is_some_and(|s| s.trim().parse::<Address>().is_ok()),
		}
	}

	fn describe(self) -> &'static str {
		match self {
			Kind::Object => "an object",
			Kind::String => "a string",
			Kind::Scalar => "a string or unsigned integer",
			Kind::Uint => "an unsigned integer",
			Kind::Address => "a valid address",
		}
	}
}

/// Paths every gasless body must carry, parents before children.
const REQUIRED_PATHS: &[(&str, Kind)] = &[
	("swapTx", Kind::Object),
	("swapTx.ecosystem", Kind::String),
	("swapTx.chainId", Kind::Uint),
	("swapTx.to", Kind::Address),
	("swapTx.data", Kind::Object),
	("swapTx.data.depositId", Kind::Scalar),
	("swapTx.data.witness", Kind::Object),
	("swapTx.data.witness.type", Kind::String),
	("swapTx.data.witness.data", Kind::Object),
	("swapTx.data.permit", Kind::Object),
	("swapTx.data.permit.domain", Kind::Object),
	("swapTx.data.permit.types", Kind::Object),
	("swapTx.data.permit.primaryType", Kind::String),
	("swapTx.data.permit.message", Kind::Object),
	("swapTx.data.permit.message.from", Kind::Address),
	("signature", Kind::String),
];

/// Depositor path for each supported witness type.
const DEPOSITOR_PATHS: &[(&str, &str)] = &[
	(
		"BridgeWitness",
		"swapTx.data.witness.data.baseDepositData.depositor",
	),
	(
		"BridgeAndSwapWitness",
		"swapTx.data.witness.data.depositData.depositor",
	),
];

fn lookup<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
	path.split('.').try_fold(body, |node, key| node.get(key))
}

fn require(body: &Value, path: &str, kind: Kind) -> Result<(), APIError> {
	match lookup(body, path) {
		None | Some(Value::Null) => Err(APIError::invalid_param(
			format!("Missing required field '{}'", path),
			path,
		)),
		Some(value) if !kind.matches(value) => Err(APIError::invalid_param(
			format!("Field '{}' must be {}", path, kind.describe()),
			path,
		)),
		Some(_) => Ok(()),
	}
}

/// Checks that `body` has the shape of a gasless submission.
///
/// # Errors
///
/// Returns an invalid-parameter error naming the first missing or mistyped
/// field, the witness type if it is not supported, or the permit if it is
/// not well-formed EIP-712 typed data.
pub fn assert_gasless_shape(body: &Value) -> Result<(), APIError> {
	for (path, kind) in REQUIRED_PATHS {
		require(body, path, *kind)?;
	}

	let witness_type = lookup(body, "swapTx.data.witness.type")
		.and_then(Value::as_str)
		.unwrap_or_default();
	let depositor_path = DEPOSITOR_PATHS
		.iter()
		.find(|(kind, _)| *kind == witness_type)
		.map(|(_, path)| *path)
		.ok_or_else(|| {
			APIError::invalid_param(
				format!("Unsupported witness type '{}'", witness_type),
				"swapTx.data.witness.type",
			)
		})?;

	require(body, depositor_path, Kind::Address)?;

	let permit = lookup(body, "swapTx.data.permit").cloned().unwrap_or_default();
	serde_json::from_value::<TypedData>(permit).map_err(|e| {
		APIError::invalid_param(
			format!("Invalid permit typed data: {}", e),
			"swapTx.data.permit",
		)
	})?;
	Ok(())
}
