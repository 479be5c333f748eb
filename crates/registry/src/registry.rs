//! Method-name table with atomic snapshot publication.
//!
//! # Invariants
//!
//! - Keys are unique; a later `define` for the same name replaces the earlier delegate.
//! - At most one interceptor is installed at any time.
//! - Writers never block readers: every mutation publishes a fresh [`Snapshot`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap as HashMap;
use tracing::{debug, trace};

use crate::{Bindings, Delegate};

#[derive(Clone, Default)]
pub(crate) struct Snapshot {
	pub(crate) delegates: HashMap<Box<str>, Arc<dyn Delegate>>,
	pub(crate) interceptor: Option<Arc<dyn Delegate>>,
}

/// Process-lifetime registry of delegates keyed by method name.
///
/// Construct it once at startup with [`Registry::with_bindings`] and share it by
/// reference with every dispatch site.
pub struct Registry {
	snap: ArcSwap<Snapshot>,
	dropped: AtomicU64,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl Registry {
	/// Creates an empty registry with no interceptor.
	pub fn new() -> Self {
		Self {
			snap: ArcSwap::from_pointee(Snapshot::default()),
			dropped: AtomicU64::new(0),
		}
	}

	/// Creates a registry populated from generated bindings.
	pub fn with_bindings(bindings: &Bindings) -> Self {
		let registry = Self::new();
		registry.install(bindings);
		registry
	}

	/// Runs the generated entry points that exist.
	///
	/// Installing the same bindings again leaves the mapping unchanged, since every
	/// registration is a last-write-wins overwrite of the same key.
	pub fn install(&self, bindings: &Bindings) {
		match bindings.providers {
			Some(register) => {
				register(self);
				debug!(delegates = self.len(), "installed provider bindings");
			}
			None => debug!("no provider bindings generated"),
		}
		match bindings.interceptor {
			Some(register) => {
				register(self);
				debug!("installed interceptor binding");
			}
			None => debug!("no interceptor binding generated"),
		}
	}

	/// Binds `name` to `delegate`, returning the delegate it replaced.
	pub fn define(&self, name: impl Into<Box<str>>, delegate: Arc<dyn Delegate>) -> Option<Arc<dyn Delegate>> {
		let name = name.into();
		trace!(name = &*name, "define");
		let prev = self.snap.rcu(|cur| {
			let mut next = Snapshot::clone(cur);
			next.delegates.insert(name.clone(), Arc::clone(&delegate));
			next
		});
		prev.delegates.get(&name).cloned()
	}

	/// Unbinds `name`. Removing an unknown name is a no-op.
	pub fn remove(&self, name: &str) -> Option<Arc<dyn Delegate>> {
		if !self.contains(name) {
			return None;
		}
		trace!(name, "remove");
		let prev = self.snap.rcu(|cur| {
			let mut next = Snapshot::clone(cur);
			next.delegates.remove(name);
			next
		});
		prev.delegates.get(name).cloned()
	}

	#[inline]
	pub fn get(&self, name: &str) -> Option<Arc<dyn Delegate>> {
		self.snap.load().delegates.get(name).cloned()
	}

	#[inline]
	pub fn contains(&self, name: &str) -> bool {
		self.snap.load().delegates.contains_key(name)
	}

	pub fn interceptor(&self) -> Option<Arc<dyn Delegate>> {
		self.snap.load().interceptor.clone()
	}

	/// Installs the fallback delegate, replacing any previous one.
	pub fn set_interceptor(&self, delegate: Arc<dyn Delegate>) -> Option<Arc<dyn Delegate>> {
		trace!("set interceptor");
		let prev = self.snap.rcu(|cur| {
			let mut next = Snapshot::clone(cur);
			next.interceptor = Some(Arc::clone(&delegate));
			next
		});
		prev.interceptor.clone()
	}

	pub fn clear_interceptor(&self) -> Option<Arc<dyn Delegate>> {
		let prev = self.snap.rcu(|cur| {
			let mut next = Snapshot::clone(cur);
			next.interceptor = None;
			next
		});
		prev.interceptor.clone()
	}

	pub fn len(&self) -> usize {
		self.snap.load().delegates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.load().delegates.is_empty()
	}

	/// Bound method names in sorted order.
	pub fn names(&self) -> Vec<String> {
		let snap = self.snap.load();
		let mut names: Vec<String> = snap.delegates.keys().map(|k| k.to_string()).collect();
		names.sort_unstable();
		names
	}

	/// Number of dispatches that found neither a delegate nor an interceptor.
	pub fn dropped_dispatches(&self) -> u64 {
		self.dropped.load(Ordering::Relaxed)
	}

	pub(crate) fn snapshot(&self) -> Arc<Snapshot> {
		self.snap.load_full()
	}

	pub(crate) fn record_drop(&self) {
		self.dropped.fetch_add(1, Ordering::Relaxed);
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("names", &self.names())
			.field("interceptor", &self.interceptor().is_some())
			.field("dropped", &self.dropped_dispatches())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::test_fixtures::Recorder;

	#[test]
	fn define_then_get() {
		let registry = Registry::new();
		let echo = Recorder::new();
		assert!(registry.define("echo", echo.clone()).is_none());

		let found = registry.get("echo").expect("echo should be bound");
		assert!(Arc::ptr_eq(&found, &(echo as Arc<dyn Delegate>)));
		assert!(registry.get("missing").is_none());
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn later_define_wins() {
		let registry = Registry::new();
		let first = Recorder::new();
		let second = Recorder::new();
		registry.define("dup", first.clone());
		let replaced = registry.define("dup", second.clone()).expect("first should be replaced");

		assert!(Arc::ptr_eq(&replaced, &(first as Arc<dyn Delegate>)));
		let found = registry.get("dup").unwrap();
		assert!(Arc::ptr_eq(&found, &(second as Arc<dyn Delegate>)));
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn remove_known_and_unknown() {
		let registry = Registry::new();
		registry.define("known", Recorder::new());

		assert!(registry.remove("known").is_some());
		assert!(registry.get("known").is_none());
		assert!(registry.remove("absent-key").is_none());
		assert!(registry.is_empty());
	}

	#[test]
	fn interceptor_is_singular() {
		let registry = Registry::new();
		let a = Recorder::new();
		let b = Recorder::new();
		assert!(registry.set_interceptor(a.clone()).is_none());
		let prev = registry.set_interceptor(b.clone()).expect("a should be replaced");

		assert!(Arc::ptr_eq(&prev, &(a as Arc<dyn Delegate>)));
		assert!(Arc::ptr_eq(&registry.interceptor().unwrap(), &(b as Arc<dyn Delegate>)));
		assert!(registry.clear_interceptor().is_some());
		assert!(registry.interceptor().is_none());
	}

	fn register_pair(registry: &Registry) {
		registry.define("a", Recorder::new());
		registry.define("b", Recorder::new());
	}

	fn register_fallback(registry: &Registry) {
		registry.set_interceptor(Recorder::new());
	}

	#[test]
	fn install_runs_present_entry_points() {
		let bindings = Bindings {
			providers: Some(register_pair),
			interceptor: Some(register_fallback),
		};
		let registry = Registry::with_bindings(&bindings);
		assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
		assert!(registry.interceptor().is_some());
	}

	#[test]
	fn install_tolerates_missing_entry_points() {
		let registry = Registry::with_bindings(&Bindings::EMPTY);
		assert!(registry.is_empty());
		assert!(registry.interceptor().is_none());

		let registry = Registry::with_bindings(&Bindings {
			providers: None,
			interceptor: Some(register_fallback),
		});
		assert!(registry.is_empty());
		assert!(registry.interceptor().is_some());
	}

	#[test]
	fn install_is_idempotent() {
		let bindings = Bindings {
			providers: Some(register_pair),
			interceptor: None,
		};
		let registry = Registry::with_bindings(&bindings);
		let once = registry.names();
		registry.install(&bindings);
		assert_eq!(registry.names(), once);
		assert_eq!(registry.len(), 2);
	}

	#[test]
	fn readers_keep_their_snapshot() {
		let registry = Registry::new();
		registry.define("a", Recorder::new());
		let pinned = registry.snapshot();
		registry.remove("a");

		assert!(pinned.delegates.contains_key("a"));
		assert!(!registry.contains("a"));
	}
}
