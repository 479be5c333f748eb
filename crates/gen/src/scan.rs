//! Source scanner: parses a crate's `src/` tree with `syn` and builds a [`Manifest`].
//!
//! Attributes are recognized by their last path segment, so `#[provider("x")]` and
//! `#[tether_registry::provider("x")]` are the same marker. Modules gated by
//! `#[cfg(test)]` and everything under `src/bin` are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use syn::punctuated::Punctuated;
use syn::{Attribute, Fields, ImplItem, Item as SynItem, LitStr, ReturnType, Signature, Token, Type};
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::manifest::{Category, Item, Manifest, Marker, TraitImpl};
use crate::model::{FnShape, Location, Visibility};
use crate::types::canonical;

/// Collects all files with the given extension under `root`, sorted by path for determinism.
pub fn collect_files_sorted(root: &Path, ext: &str) -> Vec<PathBuf> {
	let mut paths: Vec<PathBuf> = WalkDir::new(root)
		.into_iter()
		.filter_map(|e| e.ok())
		.filter(|e| e.path().extension().is_some_and(|x| x == ext))
		.map(|e| e.into_path())
		.collect();
	paths.sort();
	paths
}

/// Module path of `file` relative to the source root, or `None` for files that belong to
/// another crate target (`src/bin/**`).
pub fn module_path(root: &Path, file: &Path, crate_root: &str) -> Option<String> {
	let rel = file.strip_prefix(root).ok()?.with_extension("");
	let mut segments: Vec<String> = rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
	if segments.first().is_some_and(|s| s == "bin") {
		return None;
	}
	let crate_file = matches!(segments.as_slice(), [only] if only == "lib" || only == "main");
	if crate_file {
		segments.clear();
	} else if segments.last().is_some_and(|s| s == "mod") {
		segments.pop();
	}
	Some(std::iter::once(crate_root.to_string()).chain(segments).collect::<Vec<_>>().join("::"))
}

pub struct Scanner {
	crate_root: String,
	manifest: Manifest,
	/// Module paths gated by `#[cfg(test)]`; items under them are dropped on finish.
	excluded: Vec<String>,
	/// Per-module trait impls, filtered together with the items.
	impls: Vec<(String, TraitImpl)>,
}

impl Default for Scanner {
	fn default() -> Self {
		Self::new("crate")
	}
}

impl Scanner {
	pub fn new(crate_root: impl Into<String>) -> Self {
		Self {
			crate_root: crate_root.into(),
			manifest: Manifest::default(),
			excluded: Vec::new(),
			impls: Vec::new(),
		}
	}

	/// Rust files of the crate target rooted at `root`, in scan order.
	///
	/// `main.rs` is the crate root only when there is no `lib.rs`; otherwise it belongs to
	/// the binary target.
	pub fn files(root: &Path) -> Vec<PathBuf> {
		let has_lib = root.join("lib.rs").is_file();
		collect_files_sorted(root, "rs")
			.into_iter()
			.filter(|f| !f.strip_prefix(root).is_ok_and(|rel| rel.starts_with("bin")))
			.filter(|f| !(has_lib && f.strip_prefix(root).is_ok_and(|rel| rel == Path::new("main.rs"))))
			.collect()
	}

	/// Scans every file under `root`.
	pub fn scan(mut self, root: &Path) -> Result<Manifest, ScanError> {
		for file in Self::files(root) {
			let Some(module) = module_path(root, &file, &self.crate_root) else {
				continue;
			};
			let src = fs::read_to_string(&file).map_err(|source| ScanError::Io {
				path: file.clone(),
				source,
			})?;
			self.add_source(&file, &module, &src)?;
		}
		Ok(self.finish())
	}

	/// Adds one parsed file whose items live in `module`.
	pub fn add_source(&mut self, file: &Path, module: &str, src: &str) -> Result<(), ScanError> {
		let parsed = syn::parse_file(src).map_err(|source| ScanError::Parse {
			path: file.to_path_buf(),
			source,
		})?;
		tracing::trace!(file = %file.display(), module, items = parsed.items.len(), "scanning");
		self.visit_items(file, module, &parsed.items)
	}

	pub fn finish(mut self) -> Manifest {
		let excluded = self.excluded;
		let inside = |module: &str| {
			excluded
				.iter()
				.any(|ex| module == ex || module.strip_prefix(ex.as_str()).is_some_and(|rest| rest.starts_with("::")))
		};
		self.manifest.items.retain(|item| {
			let module = item.scope.as_deref().unwrap_or(&item.path);
			!inside(module)
		});
		self.manifest.impls = self
			.impls
			.into_iter()
			.filter(|(module, _)| !inside(module.as_str()))
			.map(|(_, i)| i)
			.collect();
		self.manifest
	}

	fn visit_items(&mut self, file: &Path, module: &str, items: &[SynItem]) -> Result<(), ScanError> {
		for item in items {
			match item {
				SynItem::Mod(m) => {
					let path = format!("{module}::{}", m.ident);
					if is_cfg_test(&m.attrs) {
						self.excluded.push(path);
						continue;
					}
					self.record(file, module, &m.attrs, &m.ident, None, || Category::Unsupported("mod"))?;
					if let Some((_, content)) = &m.content {
						self.visit_items(file, &path, content)?;
					}
				}
				SynItem::Struct(s) => {
					let derives_default = derives(&s.attrs, "Default");
					let category = || Category::Type {
						visibility: visibility(&s.vis),
						unit: matches!(s.fields, Fields::Unit),
						derives_default,
					};
					self.record(file, module, &s.attrs, &s.ident, None, category)?;
				}
				SynItem::Enum(e) => {
					let category = || Category::Type {
						visibility: visibility(&e.vis),
						unit: false,
						derives_default: derives(&e.attrs, "Default"),
					};
					self.record(file, module, &e.attrs, &e.ident, None, category)?;
				}
				SynItem::Union(u) => {
					let category = || Category::Type {
						visibility: visibility(&u.vis),
						unit: false,
						derives_default: false,
					};
					self.record(file, module, &u.attrs, &u.ident, None, category)?;
				}
				SynItem::Fn(f) => {
					let category = || Category::Function(fn_shape(&f.vis, &f.sig));
					self.record(file, module, &f.attrs, &f.sig.ident, None, category)?;
				}
				SynItem::Impl(imp) => self.visit_impl(file, module, imp)?,
				SynItem::Const(c) => self.record(file, module, &c.attrs, &c.ident, None, || Category::Unsupported("const"))?,
				SynItem::Static(s) => self.record(file, module, &s.attrs, &s.ident, None, || Category::Unsupported("static"))?,
				SynItem::Trait(t) => self.record(file, module, &t.attrs, &t.ident, None, || Category::Unsupported("trait"))?,
				SynItem::Type(t) => {
					self.record(file, module, &t.attrs, &t.ident, None, || Category::Unsupported("type alias"))?
				}
				_ => {}
			}
		}
		Ok(())
	}

	fn visit_impl(&mut self, file: &Path, module: &str, imp: &syn::ItemImpl) -> Result<(), ScanError> {
		let Some(owner) = type_ident(&imp.self_ty) else {
			return Ok(());
		};
		if let Some((_, trait_path, _)) = &imp.trait_
			&& let Some(last) = trait_path.segments.last()
		{
			self.impls.push((
				module.to_string(),
				TraitImpl {
					trait_name: last.ident.to_string(),
					self_ty: owner.to_string(),
				},
			));
		}

		let scope = format!("{module}::{owner}");
		let public = syn::Visibility::Public(Default::default());
		for item in &imp.items {
			match item {
				ImplItem::Fn(f) => {
					// Trait methods take the trait's visibility.
					let vis = if imp.trait_.is_some() { &public } else { &f.vis };
					let category = || Category::Function(fn_shape(vis, &f.sig));
					self.record(file, &scope, &f.attrs, &f.sig.ident, Some(&scope), category)?;
				}
				ImplItem::Const(c) => {
					self.record(file, &scope, &c.attrs, &c.ident, Some(&scope), || Category::Unsupported("associated const"))?
				}
				_ => {}
			}
		}
		Ok(())
	}

	/// Records `ident` if it carries any tether attribute.
	fn record(
		&mut self,
		file: &Path,
		module: &str,
		attrs: &[Attribute],
		ident: &syn::Ident,
		scope: Option<&str>,
		category: impl FnOnce() -> Category,
	) -> Result<(), ScanError> {
		let location = Location::new(file, ident.span().start().line);
		let mut markers = Vec::new();
		let mut alias = false;
		for attr in attrs {
			let Some(name) = attr.path().segments.last().map(|s| s.ident.to_string()) else {
				continue;
			};
			let malformed = |message: String| ScanError::Attribute {
				attribute: name.clone(),
				location: location.clone(),
				message,
			};
			match name.as_str() {
				"provider" => {
					let key: LitStr = attr.parse_args().map_err(|e| malformed(e.to_string()))?;
					if key.value().is_empty() {
						return Err(malformed("key must not be empty".into()));
					}
					markers.push(Marker::Provider(key.value()));
				}
				"gateway" => {
					attr.meta.require_path_only().map_err(|e| malformed(e.to_string()))?;
					markers.push(Marker::Gateway);
				}
				"tagged" => {
					let path: syn::Path = attr.parse_args().map_err(|e| malformed(e.to_string()))?;
					let alias_name = path.segments.last().map(|s| s.ident.to_string()).unwrap_or_default();
					markers.push(Marker::Tagged(alias_name));
				}
				"marker_alias" => {
					attr.meta.require_path_only().map_err(|e| malformed(e.to_string()))?;
					alias = true;
				}
				_ => {}
			}
		}
		if markers.is_empty() && !alias {
			return Ok(());
		}

		let category = category();
		if alias && !matches!(category, Category::Type { unit: true, .. }) {
			return Err(ScanError::Attribute {
				attribute: "marker_alias".into(),
				location,
				message: format!("`{ident}` is not a unit struct"),
			});
		}

		let item = Item {
			path: format!("{module}::{ident}"),
			ident: ident.to_string(),
			scope: scope.map(str::to_string),
			category,
			markers,
			alias,
			location,
		};
		tracing::trace!(path = %item.path, markers = ?item.markers, alias, "marked item");
		self.manifest.items.push(item);
		Ok(())
	}
}

/// Scans a single in-memory source as the crate root.
pub fn scan_str(src: &str) -> Result<Manifest, ScanError> {
	let mut scanner = Scanner::default();
	scanner.add_source(Path::new("src/lib.rs"), "crate", src)?;
	Ok(scanner.finish())
}

fn visibility(vis: &syn::Visibility) -> Visibility {
	match vis {
		syn::Visibility::Public(_) => Visibility::Public,
		syn::Visibility::Restricted(_) => Visibility::Restricted,
		syn::Visibility::Inherited => Visibility::Private,
	}
}

fn fn_shape(vis: &syn::Visibility, sig: &Signature) -> FnShape {
	let params = sig
		.inputs
		.iter()
		.filter_map(|arg| match arg {
			syn::FnArg::Typed(pat) => Some(canonical(&pat.ty)),
			syn::FnArg::Receiver(_) => None,
		})
		.collect();
	let output = match &sig.output {
		ReturnType::Default => None,
		ReturnType::Type(_, ty) => Some(canonical(ty)).filter(|ty| ty != "()"),
	};
	FnShape {
		visibility: visibility(vis),
		receiver: sig.receiver().is_some(),
		params,
		output,
	}
}

fn type_ident(ty: &Type) -> Option<&syn::Ident> {
	match ty {
		Type::Path(p) if p.qself.is_none() => p.path.segments.last().map(|s| &s.ident),
		_ => None,
	}
}

fn derives(attrs: &[Attribute], name: &str) -> bool {
	attrs.iter().filter(|a| a.path().is_ident("derive")).any(|a| {
		a.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
			.is_ok_and(|paths| paths.iter().any(|p| p.segments.last().is_some_and(|s| s.ident == name)))
	})
}

fn is_cfg_test(attrs: &[Attribute]) -> bool {
	attrs
		.iter()
		.filter(|a| a.path().is_ident("cfg"))
		.any(|a| a.parse_args::<syn::Ident>().is_ok_and(|i| i == "test"))
}

#[cfg(test)]
mod tests;
