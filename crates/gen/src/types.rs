//! Canonical type rendering for structural comparison.
//!
//! Two types compare equal when they are the same after paths are reduced to their last
//! segment, lifetimes are erased, and parentheses are dropped. The rendered form has no
//! whitespace except a single space between adjacent words (`&mut T`, `dyn Any`).

use proc_macro2::{Delimiter, TokenStream, TokenTree};
use quote::ToTokens;
use syn::visit_mut::{self, VisitMut};
use syn::{GenericArgument, PathArguments, Type, TypeParamBound};

/// Renders `ty` in canonical form.
pub fn canonical(ty: &Type) -> String {
	let mut ty = ty.clone();
	Erase.visit_type_mut(&mut ty);
	let mut out = String::new();
	render(ty.into_token_stream(), &mut out, &mut false);
	out
}

/// Parses `src` as a type and renders it in canonical form.
pub fn canonicalize(src: &str) -> syn::Result<String> {
	syn::parse_str::<Type>(src).map(|ty| canonical(&ty))
}

struct Erase;

impl VisitMut for Erase {
	fn visit_type_mut(&mut self, ty: &mut Type) {
		while let Type::Paren(paren) = ty {
			let inner = (*paren.elem).clone();
			*ty = inner;
		}
		visit_mut::visit_type_mut(self, ty);
	}

	fn visit_type_reference_mut(&mut self, ty: &mut syn::TypeReference) {
		ty.lifetime = None;
		visit_mut::visit_type_reference_mut(self, ty);
	}

	fn visit_type_trait_object_mut(&mut self, ty: &mut syn::TypeTraitObject) {
		ty.bounds = std::mem::take(&mut ty.bounds)
			.into_iter()
			.filter(|bound| !matches!(bound, TypeParamBound::Lifetime(_)))
			.collect();
		visit_mut::visit_type_trait_object_mut(self, ty);
	}

	fn visit_path_mut(&mut self, path: &mut syn::Path) {
		path.leading_colon = None;
		if let Some(last) = path.segments.pop() {
			path.segments.clear();
			path.segments.push(last.into_value());
		}
		visit_mut::visit_path_mut(self, path);
	}

	fn visit_path_segment_mut(&mut self, segment: &mut syn::PathSegment) {
		if let PathArguments::AngleBracketed(args) = &mut segment.arguments {
			args.colon2_token = None;
			args.args = std::mem::take(&mut args.args)
				.into_iter()
				.filter(|arg| !matches!(arg, GenericArgument::Lifetime(_)))
				.collect();
			if args.args.is_empty() {
				segment.arguments = PathArguments::None;
			}
		}
		visit_mut::visit_path_segment_mut(self, segment);
	}
}

fn render(stream: TokenStream, out: &mut String, after_word: &mut bool) {
	for tree in stream {
		match tree {
			TokenTree::Group(group) => {
				let (open, close) = match group.delimiter() {
					Delimiter::Parenthesis => ("(", ")"),
					Delimiter::Bracket => ("[", "]"),
					Delimiter::Brace => ("{", "}"),
					Delimiter::None => ("", ""),
				};
				out.push_str(open);
				render(group.stream(), out, &mut false);
				out.push_str(close);
				*after_word = false;
			}
			TokenTree::Ident(ident) => {
				if *after_word {
					out.push(' ');
				}
				out.push_str(&ident.to_string());
				*after_word = true;
			}
			TokenTree::Literal(lit) => {
				if *after_word {
					out.push(' ');
				}
				out.push_str(&lit.to_string());
				*after_word = true;
			}
			TokenTree::Punct(punct) => {
				out.push(punct.as_char());
				*after_word = false;
			}
		}
	}
}
