//! Sponsor signer backed by an in-process private key.

use crate::{SignerError, SignerFactory, SignerInterface, SponsorRegistry};
use alloy_primitives::{Address, Signature, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use relay_types::{
	without_0x_prefix, ConfigSchema, Field, FieldType, ImplementationRegistry, Schema,
	SecretString, ValidationError,
};

/// Signs with a private key read from configuration.
pub struct LocalSigner {
	signer: PrivateKeySigner,
}

impl LocalSigner {
	/// Parses a hex private key, with or without `0x`.
	pub fn new(private_key: &SecretString) -> Result<Self, SignerError> {
		let signer = private_key
			.with_exposed(|key| without_0x_prefix(key.trim()).parse::<PrivateKeySigner>())
			.map_err(|_| SignerError::InvalidKey("not a valid secp256k1 private key".into()))?;
		Ok(Self { signer })
	}
}

pub struct LocalSignerSchema;

impl ConfigSchema for LocalSignerSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("private_key", FieldType::String).with_validator(|value| {
				let key = value.as_str().map(str::trim).unwrap_or_default();
				let digits = without_0x_prefix(key);
				if digits.len() != 64 {
					return Err("Private key must be 64 hex characters (32 bytes)".to_string());
				}
				if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
					return Err("Private key must contain only hex characters".to_string());
				}
				Ok(())
			})],
			vec![],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl SignerInterface for LocalSigner {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LocalSignerSchema)
	}

	fn address(&self) -> Address {
		self.signer.address()
	}

	async fn sign_digest(&self, digest: &B256) -> Result<Signature, SignerError> {
		self.signer
			.sign_hash(digest)
			.await
			.map_err(|e| SignerError::SigningFailed(e.to_string()))
	}
}

/// Builds a [`LocalSigner`] from `[sponsor.implementations.local]`.
///
/// Configuration parameters:
/// - `private_key`: hex-encoded secp256k1 key, with or without `0x`
pub fn create_signer(config: &toml::Value) -> Result<Box<dyn SignerInterface>, SignerError> {
	LocalSignerSchema
		.validate(config)
		.map_err(|e| SignerError::InvalidConfig(e.to_string()))?;

	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.map(SecretString::from)
		.ok_or_else(|| SignerError::InvalidConfig("private_key is required".into()))?;

	Ok(Box::new(LocalSigner::new(&private_key)?))
}

pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "local";
	type Factory = SignerFactory;

	fn factory() -> Self::Factory {
		create_signer
	}
}

impl SponsorRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	fn config(key: &str) -> toml::Value {
		toml::from_str(&format!("private_key = \"{}\"", key)).unwrap()
	}

	#[test]
	fn test_key_with_and_without_prefix() {
		let expected = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
		let prefixed =
			create_signer(&config("0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"))
				.unwrap();
		let bare =
			create_signer(&config("59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"))
				.unwrap();
		assert_eq!(prefixed.address(), expected);
		assert_eq!(bare.address(), expected);
	}

	#[test]
	fn test_schema_rejects_bad_keys() {
		assert!(LocalSignerSchema.validate(&config("0x1234")).is_err());
		assert!(LocalSignerSchema
			.validate(&config(&format!("0x{}", "g".repeat(64))))
			.is_err());
		let empty: toml::Value = toml::from_str("").unwrap();
		assert!(matches!(
			LocalSignerSchema.validate(&empty),
			Err(ValidationError::MissingField(f)) if f == "private_key"
		));
	}

	#[test]
	fn test_zero_key_rejected_without_leaking() {
		let result = create_signer(&config(&"0".repeat(64)));
		match result {
			Err(SignerError::InvalidKey(msg)) => assert!(!msg.contains("0000")),
			Err(other) => panic!("unexpected error: {}", other),
			Ok(_) => panic!("zero key accepted"),
		}
	}
}
