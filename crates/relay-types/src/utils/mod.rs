//! Utility functions shared by the relay crates.
//!
//! - `abi`: static ABI word encoding for digest construction
//! - `math`: ceiling division for fee rounding
//! - `formatting`: hex prefix handling and id truncation for logs

pub mod abi;
pub mod formatting;
pub mod math;

pub use abi::AbiWordEncoder;
pub use formatting::{truncate_id, with_0x_prefix, without_0x_prefix};
pub use math::{bps_fee_ceil, div_ceil, div_ceil_u256, MathError, BPS_DENOMINATOR};
