//! Sponsored CCTP quote digest and signature.
//!
//! The destination contract hashes a sponsored quote in two halves (the
//! single-pass encoding does not compile on-chain), then hashes the pair:
//!
//! ```text
//! hash1 = keccak256(abi.encode(sourceDomain, destinationDomain, mintRecipient, amount,
//!                              burnToken, destinationCaller, maxFee, minFinalityThreshold))
//! hash2 = keccak256(abi.encode(nonce, deadline, maxBpsToSponsor, maxUserSlippageBps,
//!                              finalRecipient, finalToken))
//! typedDataHash = keccak256(abi.encode(hash1, hash2))
//! ```
//!
//! `typedDataHash` is signed as a raw digest.

use crate::{signature_to_hex, SignerError, SponsorService};
use alloy_primitives::{keccak256, B256};
use relay_types::{truncate_id, AbiWordEncoder, SponsoredQuote, SponsoredSignature};

/// Intermediate and final hashes of a sponsored quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SponsoredCctpDigest {
	pub hash1: B256,
	pub hash2: B256,
	pub typed_data_hash: B256,
}

/// Computes the split-hash digest of `quote`.
pub fn build_sponsored_cctp_digest(quote: &SponsoredQuote) -> SponsoredCctpDigest {
	let mut first = AbiWordEncoder::with_words(8);
	first
		.push_u32(quote.source_domain)
		.push_u32(quote.destination_domain)
		.push_b256(&quote.mint_recipient)
		.push_u256(quote.amount)
		.push_b256(&quote.burn_token)
		.push_b256(&quote.destination_caller)
		.push_u256(quote.max_fee)
		.push_u32(quote.min_finality_threshold);
	let hash1 = keccak256(first.finish());

	let mut second = AbiWordEncoder::with_words(6);
	second
		.push_b256(&quote.nonce)
		.push_u256(quote.deadline)
		.push_u256(quote.max_bps_to_sponsor)
		.push_u256(quote.max_user_slippage_bps)
		.push_b256(&quote.final_recipient)
		.push_b256(&quote.final_token);
	let hash2 = keccak256(second.finish());

	let mut outer = AbiWordEncoder::with_words(2);
	outer.push_b256(&hash1).push_b256(&hash2);
	let typed_data_hash = keccak256(outer.finish());

	SponsoredCctpDigest {
		hash1,
		hash2,
		typed_data_hash,
	}
}

/// Hashes `quote` and signs the final digest with the sponsor key.
///
/// Signing is deterministic (RFC 6979): the same quote always yields the
/// same signature.
pub async fn create_cctp_signature(
	quote: &SponsoredQuote,
	sponsor: &SponsorService,
) -> Result<SponsoredSignature, SignerError> {
	let digest = build_sponsored_cctp_digest(quote);
	let signature = sponsor.sign_digest(&digest.typed_data_hash).await?;

	tracing::debug!(
		nonce = %truncate_id(&quote.nonce.to_string()),
		typed_data_hash = %digest.typed_data_hash,
		"Signed sponsored CCTP quote"
	);

	Ok(SponsoredSignature {
		signature: signature_to_hex(&signature),
		typed_data_hash: digest.typed_data_hash,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::local::create_signer;
	use alloy_primitives::{b256, hex, Signature, U256};
	use alloy_sol_types::SolValue;

	fn sponsor() -> SponsorService {
		let config: toml::Value = toml::from_str(
			r#"private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80""#,
		)
		.unwrap();
		SponsorService::new(create_signer(&config).unwrap())
	}

	fn quote() -> SponsoredQuote {
		SponsoredQuote {
			source_domain: 0,
			destination_domain: 6,
			mint_recipient: b256!(
				"0x0000000000000000000000009a8f92a830a5cb89a3816e3d267cb7791c16b04d"
			),
			amount: U256::from(1_000_000u64),
			burn_token: b256!("0x000000000000000000000000a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
			destination_caller: B256::ZERO,
			max_fee: U256::from(100u64),
			min_finality_threshold: 1000,
			nonce: b256!("0x1111111111111111111111111111111111111111111111111111111111111111"),
			deadline: U256::from(1_700_000_000u64),
			max_bps_to_sponsor: U256::from(500u64),
			max_user_slippage_bps: U256::from(50u64),
			final_recipient: b256!(
				"0x0000000000000000000000009a8f92a830a5cb89a3816e3d267cb7791c16b04d"
			),
			final_token: b256!("0x000000000000000000000000833589fcd6edb6e08f4c7c32d4f71b54bda02913"),
		}
	}

	#[test]
	fn test_digest_matches_abi_encode() {
		let q = quote();
		let digest = build_sponsored_cctp_digest(&q);

		let expected_hash1 = keccak256(
			(
				q.source_domain,
				q.destination_domain,
				q.mint_recipient,
				q.amount,
				q.burn_token,
				q.destination_caller,
				q.max_fee,
				q.min_finality_threshold,
			)
				.abi_encode_params(),
		);
		let expected_hash2 = keccak256(
			(
				q.nonce,
				q.deadline,
				q.max_bps_to_sponsor,
				q.max_user_slippage_bps,
				q.final_recipient,
				q.final_token,
			)
				.abi_encode_params(),
		);
		let expected_final = keccak256((expected_hash1, expected_hash2).abi_encode_params());

		assert_eq!(digest.hash1, expected_hash1);
		assert_eq!(digest.hash2, expected_hash2);
		assert_eq!(digest.typed_data_hash, expected_final);
	}

	#[test]
	fn test_every_field_changes_digest() {
		let base = build_sponsored_cctp_digest(&quote()).typed_data_hash;
		let one = U256::from(1u8);
		let bump = |b: B256| {
			let mut bytes = b.0;
			bytes[31] ^= 0x01;
			B256::from(bytes)
		};

		let mutations: Vec<Box<dyn Fn(&mut SponsoredQuote)>> = vec![
			Box::new(|q: &mut SponsoredQuote| q.source_domain += 1),
			Box::new(|q: &mut SponsoredQuote| q.destination_domain += 1),
			Box::new(move |q: &mut SponsoredQuote| q.mint_recipient = bump(q.mint_recipient)),
			Box::new(move |q: &mut SponsoredQuote| q.amount += one),
			Box::new(move |q: &mut SponsoredQuote| q.burn_token = bump(q.burn_token)),
			Box::new(move |q: &mut SponsoredQuote| q.destination_caller = bump(q.destination_caller)),
			Box::new(move |q: &mut SponsoredQuote| q.max_fee += one),
			Box::new(|q: &mut SponsoredQuote| q.min_finality_threshold += 1),
			Box::new(move |q: &mut SponsoredQuote| q.nonce = bump(q.nonce)),
			Box::new(move |q: &mut SponsoredQuote| q.deadline += one),
			Box::new(move |q: &mut SponsoredQuote| q.max_bps_to_sponsor += one),
			Box::new(move |q: &mut SponsoredQuote| q.max_user_slippage_bps += one),
			Box::new(move |q: &mut SponsoredQuote| q.final_recipient = bump(q.final_recipient)),
			Box::new(move |q: &mut SponsoredQuote| q.final_token = bump(q.final_token)),
		];

		for (i, mutate) in mutations.iter().enumerate() {
			let mut q = quote();
			mutate(&mut q);
			assert_ne!(
				build_sponsored_cctp_digest(&q).typed_data_hash,
				base,
				"mutation {} did not change the digest",
				i
			);
		}
	}

	#[tokio::test]
	async fn test_signature_is_deterministic_and_recoverable() {
		let sponsor = sponsor();
		let first = create_cctp_signature(&quote(), &sponsor).await.unwrap();
		let second = create_cctp_signature(&quote(), &sponsor).await.unwrap();
		assert_eq!(first, second);

		let raw = hex::decode(&first.signature).unwrap();
		assert_eq!(raw.len(), 65);
		let signature = Signature::try_from(raw.as_slice()).unwrap();
		assert_eq!(
			signature
				.recover_address_from_prehash(&first.typed_data_hash)
				.unwrap(),
			sponsor.address()
		);
	}
}
