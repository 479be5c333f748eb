use std::sync::OnceLock;

use tracing::trace;

use crate::Value;

/// Completion callback supplied by a caller; receives the handler-reported value, or
/// `None` when the delegate returned without signaling.
pub type Callback = Box<dyn FnOnce(Option<Value>) + Send>;

/// One-shot completion slot handed to a delegate for the duration of one dispatch.
///
/// Only the first [`success`](Self::success) is kept; later signals are ignored.
#[derive(Debug, Default)]
pub struct Handler {
	value: OnceLock<Value>,
}

impl Handler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Reports the dispatch result.
	pub fn success(&self, value: impl Into<Value>) {
		if self.value.set(value.into()).is_err() {
			trace!("handler already signaled; dropping later value");
		}
	}

	pub fn is_signaled(&self) -> bool {
		self.value.get().is_some()
	}

	/// Consumes the handler, yielding the reported value if any.
	pub fn into_value(self) -> Option<Value> {
		self.value.into_inner()
	}
}
