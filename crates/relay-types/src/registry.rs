//! Registry trait for self-registering implementations.

/// Base trait for implementation registries.
///
/// Pluggable components (sponsor signers, publishers) expose a `Registry`
/// struct implementing this trait, pairing the name used in configuration
/// with the factory that builds the implementation.
pub trait ImplementationRegistry {
	/// Name used in configuration files, e.g. `"local"` for
	/// `[sponsor.implementations.local]` or `"http"` for
	/// `[publisher.implementations.http]`.
	const NAME: &'static str;

	/// Factory function type of the component family.
	type Factory;

	/// Returns the factory for this implementation.
	fn factory() -> Self::Factory;
}
