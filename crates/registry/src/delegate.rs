//! The calling convention every binding conforms to.

use std::any::Any;
use std::fmt;

pub use serde_json::Value;

use crate::Handler;

/// Opaque platform context threaded through a dispatch. Never inspected here.
pub type Context = dyn Any + Send + Sync;

/// Implementation behind a method name (or the interceptor).
///
/// A delegate reports its result through [`Handler::success`] before returning.
/// Returning without signaling completes the dispatch with no value. The handler is
/// absent when the caller did not ask for a result.
pub trait Delegate: Send + Sync {
	fn invoke(&self, context: Option<&Context>, method: &str, arguments: Option<&Value>, handler: Option<&Handler>);
}

/// Adapts a function with the delegate signature into a [`Delegate`].
///
/// Generated bindings wrap annotated functions in a forwarding closure:
///
/// ```ignore
/// FnDelegate::new(|context, method, arguments, handler| crate::ping(context, method, arguments, handler))
/// ```
pub struct FnDelegate<F> {
	f: F,
}

impl<F> FnDelegate<F> {
	pub fn new(f: F) -> Self
	where
		F: Fn(Option<&Context>, &str, Option<&Value>, Option<&Handler>) + Send + Sync,
	{
		Self { f }
	}
}

impl<F> Delegate for FnDelegate<F>
where
	F: Fn(Option<&Context>, &str, Option<&Value>, Option<&Handler>) + Send + Sync,
{
	#[inline]
	fn invoke(&self, context: Option<&Context>, method: &str, arguments: Option<&Value>, handler: Option<&Handler>) {
		(self.f)(context, method, arguments, handler)
	}
}

impl<F> fmt::Debug for FnDelegate<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FnDelegate").finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn double(_context: Option<&Context>, _method: &str, arguments: Option<&Value>, handler: Option<&Handler>) {
		let n = arguments.and_then(Value::as_i64).unwrap_or_default();
		if let Some(handler) = handler {
			handler.success(n * 2);
		}
	}

	#[test]
	fn fn_delegate_forwards_all_parameters() {
		let delegate = FnDelegate::new(|context, method, arguments, handler| double(context, method, arguments, handler));
		let handler = Handler::new();
		delegate.invoke(None, "double", Some(&Value::from(21)), Some(&handler));
		assert_eq!(handler.into_value(), Some(Value::from(42)));
	}

	#[test]
	fn fn_delegate_sees_context() {
		let delegate = FnDelegate::new(|context: Option<&Context>, _: &str, _: Option<&Value>, handler: Option<&Handler>| {
			let tag = context.and_then(|c| c.downcast_ref::<&'static str>()).copied();
			if let Some(handler) = handler {
				handler.success(tag.unwrap_or("none"));
			}
		});
		let handler = Handler::new();
		let ctx: &'static str = "platform";
		delegate.invoke(Some(&ctx), "tag", None, Some(&handler));
		assert_eq!(handler.into_value(), Some(Value::from("platform")));
	}
}
