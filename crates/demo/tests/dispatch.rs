use std::sync::mpsc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tether_demo::delegates::Settings;
use tether_demo::{TETHER_BINDINGS, registry};
use tether_registry::{Dispatch, Registry};

/// Dispatches `method` and returns how it was routed plus every value the callback saw.
fn call(registry: &Registry, method: &str, arguments: Option<Value>) -> (Dispatch, Vec<Option<Value>>) {
	let (tx, rx) = mpsc::channel();
	let mut pending = registry.call(method).callback(move |value| {
		let _ = tx.send(value);
	});
	if let Some(arguments) = arguments {
		pending = pending.arguments(arguments);
	}
	let routed = pending.invoke();
	(routed, rx.try_iter().collect())
}

#[test]
fn generated_index_has_both_entry_points() {
	assert!(TETHER_BINDINGS.providers.is_some());
	assert!(TETHER_BINDINGS.interceptor.is_some());
}

#[test]
fn only_well_formed_declarations_are_bound() {
	let registry = registry();
	assert_eq!(
		registry.names(),
		["battery.level", "clock.epoch", "config.read", "counter.next", "math.add", "power.level"]
	);
	assert!(!registry.contains("broken"));
	assert!(registry.interceptor().is_some());
}

#[rstest]
#[case::type_provider("battery.level", None, json!(42))]
#[case::second_key("power.level", None, json!(42))]
#[case::function_provider("math.add", Some(json!([1, 2, 39])), json!(42))]
#[case::associated_function("clock.epoch", None, json!(0))]
fn known_methods_reply_once(#[case] method: &str, #[case] arguments: Option<Value>, #[case] expected: Value) {
	let (routed, seen) = call(&registry(), method, arguments);
	assert_eq!(routed, Dispatch::Delegated);
	assert_eq!(seen, [Some(expected)]);
}

#[test]
fn type_providers_keep_state_between_calls() {
	let registry = registry();
	let values: Vec<Option<Value>> = (0..3).flat_map(|_| call(&registry, "counter.next", None).1).collect();
	assert_eq!(values, [Some(json!(0)), Some(json!(1)), Some(json!(2))]);
}

#[test]
fn alias_tagged_function_reads_context() {
	let registry = registry();
	let settings = Settings { name: "demo".into() };
	let (tx, rx) = mpsc::channel();
	let routed = registry
		.call("config.read")
		.context(&settings)
		.callback(move |value| {
			let _ = tx.send(value);
		})
		.invoke();

	assert_eq!(routed, Dispatch::Delegated);
	assert_eq!(rx.try_iter().collect::<Vec<_>>(), [Some(json!({ "name": "demo" }))]);
}

#[test]
fn unknown_methods_reach_the_gateway() {
	let (routed, seen) = call(&registry(), "does.not.exist", Some(json!({ "x": 1 })));
	assert_eq!(routed, Dispatch::Intercepted);
	assert_eq!(seen, [Some(json!({ "unhandled": "does.not.exist", "arguments": { "x": 1 } }))]);
}

#[test]
fn without_gateway_unknown_methods_are_dropped() {
	let registry = registry();
	registry.clear_interceptor();
	let (routed, seen) = call(&registry, "does.not.exist", None);
	assert_eq!(routed, Dispatch::Dropped);
	assert!(seen.is_empty());
	assert_eq!(registry.dropped_dispatches(), 1);
}

#[test]
fn removed_methods_fall_back() {
	let registry = registry();
	assert!(registry.remove("battery.level").is_some());
	assert!(registry.get("battery.level").is_none());
	assert!(registry.remove("battery.level").is_none());
	assert_eq!(call(&registry, "battery.level", None).0, Dispatch::Intercepted);
}

#[test]
fn installing_twice_matches_installing_once() {
	let once = registry();
	let twice = registry();
	twice.install(&TETHER_BINDINGS);
	assert_eq!(twice.names(), once.names());
	assert_eq!(twice.interceptor().is_some(), once.interceptor().is_some());
}

#[test]
fn no_callback_still_runs() {
	let registry = registry();
	assert_eq!(registry.dispatch("counter.next", None, None, None), Dispatch::Delegated);
	assert_eq!(call(&registry, "counter.next", None).1, [Some(json!(1))]);
}
