//! Sponsor signing for the bridge relay.
//!
//! The sponsor key authorizes fee sponsorship of CCTP transfers. This crate
//! builds the digest the destination contract verifies and signs it with the
//! configured signer implementation. The key itself never leaves the signer.

use alloy_primitives::{hex, Address, Signature, B256};
use async_trait::async_trait;
use relay_types::{without_0x_prefix, ConfigSchema, ImplementationRegistry};
use thiserror::Error;

pub mod cctp;

pub mod implementations {
	pub mod local;
}

pub use cctp::{build_sponsored_cctp_digest, create_cctp_signature, SponsoredCctpDigest};

/// Errors that can occur during sponsor signing.
#[derive(Debug, Error)]
pub enum SignerError {
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Never carries the key material.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	#[error("Invalid digest: {0}")]
	InvalidDigest(String),
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Interface of sponsor signer implementations.
#[async_trait]
pub trait SignerInterface: Send + Sync {
	/// Schema of the implementation's `[sponsor.implementations.<name>]` table.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Address of the sponsor key.
	fn address(&self) -> Address;

	/// Signs a 32-byte digest as is, without EIP-191 or EIP-712 framing.
	async fn sign_digest(&self, digest: &B256) -> Result<Signature, SignerError>;
}

pub type SignerFactory = fn(&toml::Value) -> Result<Box<dyn SignerInterface>, SignerError>;

pub trait SponsorRegistry: ImplementationRegistry<Factory = SignerFactory> {}

/// Returns (name, factory) for every signer implementation.
pub fn get_all_implementations() -> Vec<(&'static str, SignerFactory)> {
	use implementations::local;

	vec![(local::Registry::NAME, local::Registry::factory())]
}

/// Signs sponsored quotes with the configured implementation.
pub struct SponsorService {
	implementation: Box<dyn SignerInterface>,
}

impl SponsorService {
	pub fn new(implementation: Box<dyn SignerInterface>) -> Self {
		Self { implementation }
	}

	pub fn address(&self) -> Address {
		self.implementation.address()
	}

	pub async fn sign_digest(&self, digest: &B256) -> Result<Signature, SignerError> {
		self.implementation.sign_digest(digest).await
	}

	/// Signs a hex-encoded digest and returns the 65-byte `r || s || v`
	/// signature as 0x-prefixed hex.
	///
	/// # Errors
	///
	/// Returns [`SignerError::InvalidDigest`] unless `digest_hex` decodes to
	/// exactly 32 bytes.
	pub async fn sign_digest_hex(&self, digest_hex: &str) -> Result<String, SignerError> {
		let bytes = hex::decode(without_0x_prefix(digest_hex.trim()))
			.map_err(|e| SignerError::InvalidDigest(e.to_string()))?;
		if bytes.len() != 32 {
			return Err(SignerError::InvalidDigest(format!(
				"expected 32 bytes, got {}",
				bytes.len()
			)));
		}
		let signature = self.sign_digest(&B256::from_slice(&bytes)).await?;
		Ok(signature_to_hex(&signature))
	}
}

/// Encodes a signature as 0x-prefixed `r || s || v` hex, `v` in {27, 28}.
pub fn signature_to_hex(signature: &Signature) -> String {
	hex::encode_prefixed(signature.as_bytes())
}
