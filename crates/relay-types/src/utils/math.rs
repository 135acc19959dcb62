//! Ceiling division over non-negative 256-bit integers.
//!
//! CCTP fees are quoted in basis points and must never be rounded in the
//! user's favour, so fee amounts are computed with [`div_ceil`] rather than
//! truncating division.

use alloy_primitives::{I256, U256};
use thiserror::Error;

/// Denominator of a basis-point ratio.
pub const BPS_DENOMINATOR: u64 = 10_000;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
	#[error("Division by zero")]
	DivisionByZero,
	#[error("divCeil only supports positive BigNumbers")]
	NegativeOperand,
	#[error("Arithmetic overflow")]
	Overflow,
}

/// Returns `ceil(dividend / divisor)`.
///
/// A zero divisor is reported before operand signs are inspected.
///
/// # Errors
///
/// * [`MathError::DivisionByZero`] if `divisor` is zero
/// * [`MathError::NegativeOperand`] if either operand is negative
pub fn div_ceil(dividend: I256, divisor: I256) -> Result<I256, MathError> {
	if divisor.is_zero() {
		return Err(MathError::DivisionByZero);
	}
	if dividend.is_negative() || divisor.is_negative() {
		return Err(MathError::NegativeOperand);
	}
	if dividend.is_zero() {
		return Ok(I256::ZERO);
	}
	// (a - 1) / b + 1 == (a + b - 1) / b for a > 0, without the overflowing add.
	Ok((dividend - I256::ONE) / divisor + I256::ONE)
}

/// Unsigned form of [`div_ceil`].
pub fn div_ceil_u256(dividend: U256, divisor: U256) -> Result<U256, MathError> {
	if divisor.is_zero() {
		return Err(MathError::DivisionByZero);
	}
	if dividend.is_zero() {
		return Ok(U256::ZERO);
	}
	Ok((dividend - U256::from(1u8)) / divisor + U256::from(1u8))
}

/// Fee of `bps` basis points on `amount`, rounded up.
pub fn bps_fee_ceil(amount: U256, bps: U256) -> Result<U256, MathError> {
	let scaled = amount.checked_mul(bps).ok_or(MathError::Overflow)?;
	div_ceil_u256(scaled, U256::from(BPS_DENOMINATOR))
}
