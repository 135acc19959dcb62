//! Common types module for the bridge relay.
//!
//! This module defines the request, response and error types shared by the
//! sponsor signer, the publisher and the HTTP service, so every crate agrees
//! on the wire shapes of sponsored quotes and gasless submissions.

/// API error taxonomy and error response bodies.
pub mod api;
/// Sponsored CCTP quote types.
pub mod cctp;
/// Gasless meta-transaction submission types.
pub mod gasless;
/// Per-chain network configuration types.
pub mod networks;
/// Base trait for self-registering implementations.
pub mod registry;
/// Zeroizing wrapper for key material.
pub mod secret_string;
/// Encoding, arithmetic and formatting helpers.
pub mod utils;
/// Configuration validation types for implementation-specific TOML tables.
pub mod validation;

pub use api::*;
pub use cctp::*;
pub use gasless::*;
pub use networks::{NetworkConfig, NetworksConfig};
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use utils::{
	bps_fee_ceil, div_ceil, div_ceil_u256, truncate_id, with_0x_prefix, without_0x_prefix,
	AbiWordEncoder, MathError,
};
pub use validation::*;
