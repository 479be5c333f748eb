use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Context, Delegate, Handler, Value};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Seen {
	pub method: String,
	pub arguments: Option<Value>,
	pub had_context: bool,
	pub had_handler: bool,
}

/// Records every invocation and signals `reply` when one is configured.
#[derive(Default)]
pub(crate) struct Recorder {
	seen: Mutex<Vec<Seen>>,
	reply: Option<Value>,
}

impl Recorder {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn replying(reply: impl Into<Value>) -> Arc<Self> {
		Arc::new(Self {
			seen: Mutex::new(Vec::new()),
			reply: Some(reply.into()),
		})
	}

	pub fn calls(&self) -> Vec<Seen> {
		self.seen.lock().clone()
	}
}

impl Delegate for Recorder {
	fn invoke(&self, context: Option<&Context>, method: &str, arguments: Option<&Value>, handler: Option<&Handler>) {
		self.seen.lock().push(Seen {
			method: method.to_string(),
			arguments: arguments.cloned(),
			had_context: context.is_some(),
			had_handler: handler.is_some(),
		});
		if let (Some(handler), Some(reply)) = (handler, &self.reply) {
			handler.success(reply.clone());
		}
	}
}
