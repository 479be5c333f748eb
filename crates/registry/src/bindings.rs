use std::fmt;

use crate::Registry;

/// Generated registration entry point.
pub type EntryPoint = fn(&Registry);

/// Index of the entry points generated for one crate.
///
/// The generator always emits a `TETHER_BINDINGS` static of this type; a marker kind with
/// no accepted declarations is `None` rather than an empty function.
#[derive(Clone, Copy, Default)]
pub struct Bindings {
	/// Registers every provider under its key.
	pub providers: Option<EntryPoint>,
	/// Installs the gateway as the registry's interceptor.
	pub interceptor: Option<EntryPoint>,
}

impl Bindings {
	pub const EMPTY: Self = Self {
		providers: None,
		interceptor: None,
	};

	pub const fn is_empty(&self) -> bool {
		self.providers.is_none() && self.interceptor.is_none()
	}
}

impl fmt::Debug for Bindings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Bindings")
			.field("providers", &self.providers.is_some())
			.field("interceptor", &self.interceptor.is_some())
			.finish()
	}
}
