//! Minimal ABI encoder for static tuples.
//!
//! Every pushed value occupies one left-padded 32-byte word, so the output of
//! [`AbiWordEncoder::finish`] equals Solidity's `abi.encode` over the same
//! static values in push order.

use alloy_primitives::{Address, B256, U256};

#[derive(Debug, Default, Clone)]
pub struct AbiWordEncoder {
	buf: Vec<u8>,
}

impl AbiWordEncoder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Encoder with room for `words` 32-byte words.
	pub fn with_words(words: usize) -> Self {
		Self {
			buf: Vec::with_capacity(words * 32),
		}
	}

	pub fn push_b256(&mut self, v: &B256) -> &mut Self {
		self.buf.extend_from_slice(v.as_slice());
		self
	}

	pub fn push_address(&mut self, addr: &Address) -> &mut Self {
		self.push_b256(&addr.into_word())
	}

	pub fn push_u256(&mut self, v: U256) -> &mut Self {
		self.buf.extend_from_slice(&v.to_be_bytes::<32>());
		self
	}

	pub fn push_u32(&mut self, v: u32) -> &mut Self {
		let mut word = [0u8; 32];
		word[28..].copy_from_slice(&v.to_be_bytes());
		self.buf.extend_from_slice(&word);
		self
	}

	/// Number of words pushed so far.
	pub fn len(&self) -> usize {
		self.buf.len() / 32
	}

	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, b256};
	use alloy_sol_types::SolValue;

	#[test]
	fn test_matches_abi_encode_params() {
		let recipient = b256!("0x0000000000000000000000009a8f92a830a5cb89a3816e3d267cb7791c16b04d");
		let token = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
		let amount = U256::from(1_000_000u64);

		let mut enc = AbiWordEncoder::with_words(4);
		enc.push_u32(6)
			.push_b256(&recipient)
			.push_u256(amount)
			.push_address(&token);
		assert_eq!(enc.len(), 4);

		let expected = (6u32, recipient, amount, token).abi_encode_params();
		assert_eq!(enc.finish(), expected);
	}

	#[test]
	fn test_u32_is_right_aligned() {
		let mut enc = AbiWordEncoder::new();
		enc.push_u32(u32::MAX);
		let out = enc.finish();
		assert_eq!(out.len(), 32);
		assert!(out[..28].iter().all(|b| *b == 0));
		assert_eq!(&out[28..], &[0xff; 4]);
	}
}
