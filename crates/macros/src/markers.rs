use proc_macro2::{Span, TokenStream};
use syn::{Fields, ItemStruct, LitStr, Path};

/// Emits `err` ahead of the untouched item so the item still resolves downstream.
fn reject(err: syn::Error, item: TokenStream) -> TokenStream {
	let mut out = err.to_compile_error();
	out.extend(item);
	out
}

pub(crate) fn provider(attr: TokenStream, item: TokenStream) -> TokenStream {
	match syn::parse2::<LitStr>(attr) {
		Ok(key) if key.value().is_empty() => reject(syn::Error::new(key.span(), "provider key must not be empty"), item),
		Ok(_) => item,
		Err(err) => reject(syn::Error::new(err.span(), "expected a string key: #[provider(\"name\")]"), item),
	}
}

pub(crate) fn bare(name: &str, attr: TokenStream, item: TokenStream) -> TokenStream {
	if attr.is_empty() {
		return item;
	}
	reject(syn::Error::new_spanned(attr, format!("#[{name}] takes no arguments")), item)
}

pub(crate) fn marker_alias(attr: TokenStream, item: TokenStream) -> TokenStream {
	if !attr.is_empty() {
		return bare("marker_alias", attr, item);
	}
	match syn::parse2::<ItemStruct>(item.clone()) {
		Ok(strukt) if matches!(strukt.fields, Fields::Unit) => item,
		Ok(strukt) => reject(syn::Error::new_spanned(&strukt.ident, "#[marker_alias] requires a unit struct"), item),
		Err(_) => reject(syn::Error::new(Span::call_site(), "#[marker_alias] requires a unit struct"), item),
	}
}

pub(crate) fn tagged(attr: TokenStream, item: TokenStream) -> TokenStream {
	match syn::parse2::<Path>(attr) {
		Ok(_) => item,
		Err(err) => reject(syn::Error::new(err.span(), "expected a marker alias: #[tagged(Alias)]"), item),
	}
}

#[cfg(test)]
mod tests {
	use quote::quote;

	use super::*;

	fn is_error(out: &TokenStream) -> bool {
		out.to_string().contains("compile_error")
	}

	#[test]
	fn provider_accepts_string_key() {
		let item = quote! { pub struct Ping; };
		let out = provider(quote! { "ping" }, item.clone());
		assert_eq!(out.to_string(), item.to_string());
	}

	#[test]
	fn provider_rejects_missing_or_empty_key() {
		assert!(is_error(&provider(TokenStream::new(), quote! { pub struct Ping; })));
		assert!(is_error(&provider(quote! { "" }, quote! { pub struct Ping; })));
		assert!(is_error(&provider(quote! { ping }, quote! { pub struct Ping; })));
	}

	#[test]
	fn gateway_takes_no_arguments() {
		assert!(!is_error(&bare("gateway", TokenStream::new(), quote! { pub struct Fallback; })));
		assert!(is_error(&bare("gateway", quote! { "x" }, quote! { pub struct Fallback; })));
	}

	#[test]
	fn marker_alias_requires_unit_struct() {
		assert!(!is_error(&marker_alias(TokenStream::new(), quote! { pub struct Alias; })));
		assert!(is_error(&marker_alias(TokenStream::new(), quote! { pub struct Alias { x: u8 } })));
		assert!(is_error(&marker_alias(TokenStream::new(), quote! { pub fn alias() {} })));
	}

	#[test]
	fn tagged_requires_path() {
		assert!(!is_error(&tagged(quote! { crate::Alias }, quote! { pub struct Tagged; })));
		assert!(is_error(&tagged(quote! { "Alias" }, quote! { pub struct Tagged; })));
	}
}
