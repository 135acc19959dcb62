//! Sponsored CCTP quote types.
//!
//! A sponsored quote describes a CCTP burn/mint transfer whose fees a sponsor
//! agrees to subsidize. Address-like fields are carried as `bytes32`, exactly
//! as the destination contract hashes them.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// A cross-chain transfer quote whose fees are sponsored.
///
/// Built once by the quoting service, hashed and signed, then discarded.
/// Unsigned numeric types make negative values unrepresentable; `bytes32`
/// fields reject any input that is not exactly 32 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredQuote {
	/// CCTP domain of the origin chain.
	pub source_domain: u32,
	/// CCTP domain of the destination chain.
	pub destination_domain: u32,
	/// Recipient of the minted tokens on the destination chain.
	pub mint_recipient: B256,
	/// Amount of burn token to transfer.
	#[serde(with = "u256_serde")]
	pub amount: U256,
	/// Token burned on the origin chain.
	pub burn_token: B256,
	/// Only this caller may receive the message on the destination chain.
	pub destination_caller: B256,
	/// Maximum fee paid to CCTP for the transfer.
	#[serde(with = "u256_serde")]
	pub max_fee: U256,
	/// Minimum finality threshold requested from the attestation service.
	pub min_finality_threshold: u32,
	/// Unique quote identifier, replay protection is enforced on-chain.
	pub nonce: B256,
	/// Unix timestamp after which the quote is no longer valid.
	#[serde(with = "u256_serde")]
	pub deadline: U256,
	/// Maximum share of fees the sponsor covers, in basis points.
	#[serde(with = "u256_serde")]
	pub max_bps_to_sponsor: U256,
	/// Maximum slippage the user accepts on the destination swap, in basis points.
	#[serde(with = "u256_serde")]
	pub max_user_slippage_bps: U256,
	/// Final recipient after any destination-side swap.
	pub final_recipient: B256,
	/// Final token after any destination-side swap.
	pub final_token: B256,
}

/// Sponsor authorization for a [`SponsoredQuote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredSignature {
	/// 65-byte `r || s || v` ECDSA signature, 0x-prefixed hex.
	pub signature: String,
	/// Final digest that was signed.
	pub typed_data_hash: B256,
}

/// Left-pads a 20-byte address into the `bytes32` form used by CCTP.
pub fn address_to_bytes32(address: Address) -> B256 {
	address.into_word()
}

/// Serde module for U256 values that accepts decimal strings, `0x` hex strings
/// and JSON integers, and always serializes as a decimal string.
pub mod u256_serde {
	use alloy_primitives::U256;
	use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Repr {
		Number(u64),
		Text(String),
	}

	pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		value.to_string().serialize(serializer)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
	where
		D: Deserializer<'de>,
	{
		match Repr::deserialize(deserializer)? {
			Repr::Number(n) => Ok(U256::from(n)),
			Repr::Text(s) => {
				let trimmed = s.trim();
				if trimmed.starts_with('-') {
					return Err(D::Error::custom(format!("negative value not allowed: {}", s)));
				}
				match trimmed
					.strip_prefix("0x")
					.or_else(|| trimmed.strip_prefix("0X"))
				{
					Some(hex) => U256::from_str_radix(hex, 16),
					None => U256::from_str_radix(trimmed, 10),
				}
				.map_err(D::Error::custom)
			},
		}
	}
}
