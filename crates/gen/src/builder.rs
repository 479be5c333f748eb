//! Builder composition tree: a leaf step that produces a delegate value, wrapped by a step
//! that registers it.
//!
//! | declaration | leaf        | provider wrap | gateway wrap |
//! |-------------|-------------|---------------|--------------|
//! | type        | `Construct` | `Define`      | `Intercept`  |
//! | function    | `Adapt`     | `Define`      | `Intercept`  |

use proc_macro2::TokenStream;
use quote::quote;

use crate::error::Fatal;
use crate::model::{Construction, DeclKind, Declaration, MarkerKind, TypeShape};

/// Produces the delegate value for a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaf {
	/// The unit struct's path, or `<Type as Default>::default()`.
	Construct,
	/// `FnDelegate::new(..)` forwarding all four parameters to the function.
	Adapt,
}

/// Registers the leaf's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
	/// `registry.define(key, ..)`
	Define,
	/// `registry.set_interceptor(..)`
	Intercept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
	pub leaf: Leaf,
	pub wrap: Wrap,
}

/// One registration statement.
#[derive(Debug, Clone)]
pub struct Fragment {
	pub marker: MarkerKind,
	pub key: Option<String>,
	pub path: String,
	pub tokens: TokenStream,
}

impl Leaf {
	fn emit(self, decl: &Declaration, path: &syn::Path, runtime: &syn::Path) -> TokenStream {
		match self {
			Self::Construct => match &decl.kind {
				DeclKind::Type(TypeShape {
					construction: Some(Construction::Unit),
					..
				}) => quote! { #path },
				_ => quote! { <#path as ::core::default::Default>::default() },
			},
			Self::Adapt => quote! {
				#runtime::FnDelegate::new(|context, method, arguments, handler| #path(context, method, arguments, handler))
			},
		}
	}
}

impl Wrap {
	fn emit(self, key: Option<&str>, inner: TokenStream) -> TokenStream {
		match self {
			Self::Define => {
				let key = key.unwrap_or_default();
				quote! { registry.define(#key, ::std::sync::Arc::new(#inner)) }
			}
			Self::Intercept => quote! { registry.set_interceptor(::std::sync::Arc::new(#inner)) },
		}
	}
}

impl Step {
	pub fn select(decl: &Declaration) -> Self {
		let leaf = match decl.kind {
			DeclKind::Type(_) => Leaf::Construct,
			DeclKind::Function(_) => Leaf::Adapt,
		};
		let wrap = match decl.marker() {
			MarkerKind::Provider => Wrap::Define,
			MarkerKind::Gateway => Wrap::Intercept,
		};
		Self { leaf, wrap }
	}

	pub fn build(self, decl: &Declaration, runtime: &syn::Path) -> Result<Fragment, Fatal> {
		let path: syn::Path = syn::parse_str(&decl.path).map_err(|err| Fatal::InvalidPath {
			name: decl.path.clone(),
			location: decl.location.clone(),
			message: err.to_string(),
		})?;
		let tokens = self.wrap.emit(decl.key(), self.leaf.emit(decl, &path, runtime));
		tracing::trace!(path = %decl.path, step = ?self, "built fragment");
		Ok(Fragment {
			marker: decl.marker(),
			key: decl.key().map(str::to_string),
			path: decl.path.clone(),
			tokens,
		})
	}
}
