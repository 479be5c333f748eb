//! A crate wired to tether the usual way: marked delegates in [`delegates`], a build
//! script running `tether_gen::BuildCtx`, and the generated index included below.

use tether_registry::Registry;

pub mod delegates;

include!(concat!(env!("OUT_DIR"), "/tether_bindings.rs"));

/// A registry populated from this crate's generated bindings.
pub fn registry() -> Registry {
	Registry::with_bindings(&TETHER_BINDINGS)
}
