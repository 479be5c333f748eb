//! Name resolution and the invoke / fallback / callback protocol.

use tracing::{debug, trace};

use crate::{Callback, Context, Handler, Registry, Value};

/// How a dispatch was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
	/// A delegate bound to the method name ran.
	Delegated,
	/// No delegate matched; the interceptor ran in its place.
	Intercepted,
	/// Nothing matched and no interceptor is installed. Nothing ran, nothing was signaled.
	Dropped,
}

impl Registry {
	/// Routes one call.
	///
	/// The resolved delegate (or the interceptor) runs synchronously on the calling thread
	/// with `(context, method, arguments, handler)`. Once it returns, `callback` receives
	/// whatever the handler was signaled with, or `None`. The handler only exists when a
	/// callback was supplied. Panics raised by the delegate propagate to the caller.
	///
	/// The interceptor completes exactly like a delegate: if it returns without signaling,
	/// the callback still runs, with `None`.
	pub fn dispatch(&self, method: &str, arguments: Option<&Value>, context: Option<&Context>, callback: Option<Callback>) -> Dispatch {
		let snap = self.snapshot();
		let (delegate, routed) = match snap.delegates.get(method) {
			Some(delegate) => (delegate, Dispatch::Delegated),
			None => match &snap.interceptor {
				Some(interceptor) => (interceptor, Dispatch::Intercepted),
				None => {
					self.record_drop();
					debug!(method, "dropping dispatch: no delegate and no interceptor");
					return Dispatch::Dropped;
				}
			},
		};

		trace!(method, ?routed, has_callback = callback.is_some(), "dispatch");
		let handler = callback.is_some().then(Handler::new);
		delegate.invoke(context, method, arguments, handler.as_ref());

		if let Some(callback) = callback {
			callback(handler.and_then(Handler::into_value));
		}
		routed
	}

	/// Starts a builder-style call to `method`. Context, arguments and callback all
	/// default to absent.
	pub fn call(&self, method: impl Into<String>) -> Call<'_> {
		Call {
			registry: self,
			method: method.into(),
			context: None,
			arguments: None,
			callback: None,
		}
	}
}

/// A pending call assembled with [`Registry::call`].
#[must_use = "a call does nothing until `invoke` is called"]
pub struct Call<'a> {
	registry: &'a Registry,
	method: String,
	context: Option<&'a Context>,
	arguments: Option<Value>,
	callback: Option<Callback>,
}

impl<'a> Call<'a> {
	pub fn context(mut self, context: &'a Context) -> Self {
		self.context = Some(context);
		self
	}

	pub fn arguments(mut self, arguments: impl Into<Value>) -> Self {
		self.arguments = Some(arguments.into());
		self
	}

	pub fn callback<F>(mut self, callback: F) -> Self
	where
		F: FnOnce(Option<Value>) + Send + 'static,
	{
		self.callback = Some(Box::new(callback));
		self
	}

	pub fn invoke(self) -> Dispatch {
		self.registry
			.dispatch(&self.method, self.arguments.as_ref(), self.context, self.callback)
	}
}
