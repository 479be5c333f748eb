//! Runtime half of tether: the delegate contract, the name-keyed registry populated by
//! generated bindings, and the dispatcher routing named calls through it.
//!
//! # Mental Model
//!
//! 1. **Build:** `tether-gen` scans annotated declarations and emits `register_providers` /
//!    `register_interceptor` entry points plus a [`Bindings`] index naming the ones that exist.
//! 2. **Install:** [`Registry::with_bindings`] calls whichever entry points were generated.
//!    Missing entry points are not an error; the registry simply starts without them.
//! 3. **Dispatch:** [`Registry::dispatch`] (or the [`Call`] builder) resolves a method name,
//!    falls back to the interceptor, and completes through the caller's callback.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Delegate`] | The fixed four-parameter calling convention. |
//! | [`FnDelegate`] | Adapter turning a plain function into a [`Delegate`]. |
//! | [`Handler`] | One-shot completion slot a delegate reports its result through. |
//! | [`Registry`] | Method name to delegate table plus the optional interceptor. |
//! | [`Bindings`] | Generated index of entry points, consumed once at startup. |
//!
//! # Concurrency
//!
//! - **Reads:** wait-free (atomic load of the current snapshot).
//! - **Writes:** `define`/`remove` publish a new snapshot through a read-copy-update loop.
//! - A dispatch pins the snapshot it resolved against, so delegates may mutate the
//!   registry while running without affecting the call in flight.

mod bindings;
mod delegate;
mod dispatch;
mod handler;
mod registry;

pub use bindings::{Bindings, EntryPoint};
pub use delegate::{Context, Delegate, FnDelegate, Value};
pub use dispatch::{Call, Dispatch};
pub use handler::{Callback, Handler};
pub use registry::Registry;
#[cfg(feature = "macros")]
pub use tether_macros::{gateway, marker_alias, provider, tagged};

#[cfg(test)]
pub(crate) mod test_fixtures;
