//! Bindings discovered by the build script.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;
use tether_registry::{Context, Delegate, Handler, Value, gateway, marker_alias, provider, tagged};

/// Replies with a fixed battery level under both names. Unit structs are bound by name,
/// so no `Default` is needed.
#[provider("battery.level")]
#[provider("power.level")]
pub struct BatteryLevel;

impl Delegate for BatteryLevel {
	fn invoke(&self, _context: Option<&Context>, _method: &str, _arguments: Option<&Value>, handler: Option<&Handler>) {
		if let Some(handler) = handler {
			handler.success(42);
		}
	}
}

/// Sums an array of integers.
#[provider("math.add")]
pub fn add(_context: Option<&Context>, _method: &str, arguments: Option<&Value>, handler: Option<&Handler>) {
	let sum: i64 = arguments
		.and_then(Value::as_array)
		.map(|values| values.iter().filter_map(Value::as_i64).sum())
		.unwrap_or_default();
	if let Some(handler) = handler {
		handler.success(sum);
	}
}

/// Hands out increasing numbers; one instance lives for the whole registry.
#[provider("counter.next")]
#[derive(Default)]
pub struct Counter {
	next: AtomicU64,
}

impl Delegate for Counter {
	fn invoke(&self, _context: Option<&Context>, _method: &str, _arguments: Option<&Value>, handler: Option<&Handler>) {
		let value = self.next.fetch_add(1, Ordering::Relaxed);
		if let Some(handler) = handler {
			handler.success(value);
		}
	}
}

pub struct Clock;

impl Clock {
	#[provider("clock.epoch")]
	pub fn epoch(_context: Option<&Context>, _method: &str, _arguments: Option<&Value>, handler: Option<&Handler>) {
		if let Some(handler) = handler {
			handler.success(0);
		}
	}
}

/// Settings passed as dispatch context.
#[derive(Debug, Clone)]
pub struct Settings {
	pub name: String,
}

/// Alias for configuration readers.
#[marker_alias]
#[provider("config.read")]
pub struct ConfigRead;

/// Reads the [`Settings`] context, if one was passed.
#[tagged(ConfigRead)]
pub fn read_config(context: Option<&Context>, _method: &str, _arguments: Option<&Value>, handler: Option<&Handler>) {
	let name = context.and_then(|c| c.downcast_ref::<Settings>()).map(|s| s.name.clone());
	if let Some(handler) = handler {
		handler.success(json!({ "name": name }));
	}
}

/// Takes the wrong parameters, so the generator skips it with a warning.
#[provider("broken")]
pub fn broken(method: &str) -> bool {
	method.is_empty()
}

/// Answers every method nothing else is bound to.
#[gateway]
#[derive(Default)]
pub struct Unhandled;

impl Delegate for Unhandled {
	fn invoke(&self, _context: Option<&Context>, method: &str, arguments: Option<&Value>, handler: Option<&Handler>) {
		if let Some(handler) = handler {
			handler.success(json!({ "unhandled": method, "arguments": arguments }));
		}
	}
}
