//! Emitter: assembles fragments into generated source files and hands them to a writer.
//!
//! A marker kind with no fragments gets no unit at all. The bindings index is always
//! produced; it includes the units that exist and records which entry points are present.
//! Units are included relative to `OUT_DIR`, so all artifacts must be written there.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::builder::Fragment;
use crate::config::Output;
use crate::error::{Fatal, GenError};
use crate::model::MarkerKind;

pub const HEADER: &str = "// @generated by tether-gen. Do not edit.";

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
	pub file_name: String,
	pub contents: String,
}

/// Destination for generated artifacts.
pub trait ArtifactWriter {
	fn write(&mut self, artifact: &Artifact) -> Result<(), GenError>;
}

/// Writes into a directory, leaving files whose contents are unchanged untouched so
/// downstream rebuilds are not triggered needlessly.
#[derive(Debug, Clone)]
pub struct OutDirWriter {
	dir: PathBuf,
}

impl OutDirWriter {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}
}

impl ArtifactWriter for OutDirWriter {
	fn write(&mut self, artifact: &Artifact) -> Result<(), GenError> {
		let path = self.dir.join(&artifact.file_name);
		if fs::read_to_string(&path).is_ok_and(|existing| existing == artifact.contents) {
			tracing::trace!(path = %path.display(), "artifact unchanged");
			return Ok(());
		}
		fs::create_dir_all(&self.dir).map_err(|source| GenError::Write {
			path: self.dir.clone(),
			source,
		})?;
		fs::write(&path, &artifact.contents).map_err(|source| GenError::Write { path: path.clone(), source })?;
		tracing::debug!(path = %path.display(), bytes = artifact.contents.len(), "wrote artifact");
		Ok(())
	}
}

/// Keeps artifacts in memory, keyed by file name.
#[derive(Debug, Default)]
pub struct MemoryWriter {
	pub files: BTreeMap<String, String>,
}

impl ArtifactWriter for MemoryWriter {
	fn write(&mut self, artifact: &Artifact) -> Result<(), GenError> {
		self.files.insert(artifact.file_name.clone(), artifact.contents.clone());
		Ok(())
	}
}

pub struct Emitter<'a> {
	runtime: &'a syn::Path,
	output: &'a Output,
}

impl<'a> Emitter<'a> {
	pub fn new(runtime: &'a syn::Path, output: &'a Output) -> Self {
		Self { runtime, output }
	}

	/// Produces the artifacts for one round.
	///
	/// More than one gateway fragment is fatal and produces nothing.
	pub fn emit(&self, providers: &[Fragment], gateways: &[Fragment]) -> Result<Vec<Artifact>, Fatal> {
		if gateways.len() > 1 {
			return Err(Fatal::MultipleGateways(gateways.iter().map(|f| f.path.clone()).collect()));
		}

		let mut artifacts = Vec::new();
		let providers_unit = (!providers.is_empty()).then(|| self.unit(MarkerKind::Provider, providers));
		let interceptor_unit = gateways.first().map(|g| self.unit(MarkerKind::Gateway, std::slice::from_ref(g)));
		artifacts.extend(providers_unit.clone());
		artifacts.extend(interceptor_unit.clone());
		artifacts.push(self.bindings(providers_unit.as_ref(), interceptor_unit.as_ref()));
		Ok(artifacts)
	}

	fn unit(&self, marker: MarkerKind, fragments: &[Fragment]) -> Artifact {
		let (file_name, entry) = self.entry(marker);
		let runtime = self.runtime;
		let signature = quote! { pub fn #entry(registry: &#runtime::Registry) };

		let mut contents = format!("{HEADER}\n\n{signature} {{\n");
		for fragment in fragments {
			contents.push_str(&format!("\t{};\n", fragment.tokens));
		}
		contents.push_str("}\n");
		Artifact {
			file_name: file_name.to_string(),
			contents,
		}
	}

	fn bindings(&self, providers: Option<&Artifact>, interceptor: Option<&Artifact>) -> Artifact {
		let runtime = self.runtime;
		let mut contents = format!("{HEADER}\n\n");
		let mut slot = |marker: MarkerKind, unit: Option<&Artifact>| -> TokenStream {
			let Some(unit) = unit else {
				return quote! { ::core::option::Option::None };
			};
			let file = format!("/{}", unit.file_name);
			contents.push_str(&format!("{}\n", quote! { include!(concat!(env!("OUT_DIR"), #file)); }));
			let entry = self.entry(marker).1;
			quote! { ::core::option::Option::Some(#entry) }
		};
		let providers = slot(MarkerKind::Provider, providers);
		let interceptor = slot(MarkerKind::Gateway, interceptor);
		let index = quote! {
			pub static TETHER_BINDINGS: #runtime::Bindings = #runtime::Bindings {
				providers: #providers,
				interceptor: #interceptor,
			};
		};
		contents.push_str(&format!("\n{index}\n"));
		Artifact {
			file_name: self.output.bindings.clone(),
			contents,
		}
	}

	fn entry(&self, marker: MarkerKind) -> (&str, syn::Ident) {
		match marker {
			MarkerKind::Provider => (self.output.providers.as_str(), format_ident!("register_providers")),
			MarkerKind::Gateway => (self.output.interceptor.as_str(), format_ident!("register_interceptor")),
		}
	}
}

/// Hands every artifact to `writer`, in order.
pub fn write_all(writer: &mut dyn ArtifactWriter, artifacts: &[Artifact]) -> Result<(), GenError> {
	artifacts.iter().try_for_each(|artifact| writer.write(artifact))
}
