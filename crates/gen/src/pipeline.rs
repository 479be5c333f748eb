//! One generation round: discovery, validation, building and emission over a scanned crate.

use std::path::Path;

use crate::builder::{Fragment, Step};
use crate::config::GenConfig;
use crate::diagnostics::Diagnostics;
use crate::discover::discover;
use crate::emit::{Artifact, ArtifactWriter, Emitter, write_all};
use crate::error::{ConfigError, Fatal, GenError};
use crate::manifest::Manifest;
use crate::model::{Declaration, MarkerKind};
use crate::scan::Scanner;
use crate::validate::ShapeRules;

/// Declarations that passed validation, per marker kind, in discovery order.
#[derive(Debug, Default)]
pub struct Accepted {
	pub providers: Vec<Declaration>,
	pub gateway: Option<Declaration>,
}

pub struct Generator {
	config: GenConfig,
	rules: ShapeRules,
	runtime: syn::Path,
}

impl Generator {
	pub fn new(config: GenConfig) -> Result<Self, ConfigError> {
		let rules = ShapeRules::from_config(&config)?;
		let runtime = config.runtime_path()?;
		Ok(Self { config, rules, runtime })
	}

	pub fn config(&self) -> &GenConfig {
		&self.config
	}

	/// Scans `src`, generates, and writes every artifact. Nothing is written if the round
	/// aborts.
	pub fn run(&self, src: &Path, writer: &mut dyn ArtifactWriter, diags: &mut Diagnostics) -> Result<Vec<Artifact>, GenError> {
		let manifest = Scanner::new(self.config.crate_root.clone()).scan(src)?;
		let artifacts = self.generate(&manifest, diags)?;
		write_all(writer, &artifacts)?;
		Ok(artifacts)
	}

	pub fn generate(&self, manifest: &Manifest, diags: &mut Diagnostics) -> Result<Vec<Artifact>, GenError> {
		let accepted = self.accept(manifest, diags)?;

		let mut fatal = Vec::new();
		let providers = self.fragments(&accepted.providers, &mut fatal);
		let gateways = self.fragments(accepted.gateway.as_slice(), &mut fatal);
		if !fatal.is_empty() {
			return Err(GenError::Aborted(fatal));
		}

		let artifacts = Emitter::new(&self.runtime, &self.config.output)
			.emit(&providers, &gateways)
			.map_err(|err| GenError::Aborted(vec![err]))?;
		tracing::debug!(
			providers = providers.len(),
			gateway = !gateways.is_empty(),
			artifacts = artifacts.len(),
			"generation round complete"
		);
		Ok(artifacts)
	}

	/// Discovers and validates both marker kinds.
	///
	/// Structural misuse anywhere aborts the round. Shape violations only exclude the
	/// offending declaration and are reported as errors in `diags`.
	pub fn accept(&self, manifest: &Manifest, diags: &mut Diagnostics) -> Result<Accepted, GenError> {
		for (item, alias) in manifest.unresolved_tags() {
			diags.warn(
				Some(&item.location),
				format!("`{}` is tagged with `{alias}`, which is not declared with #[marker_alias]", item.path),
			);
		}

		let mut fatal = Vec::new();
		let mut discovered = |marker| match discover(manifest, marker, diags) {
			Ok(decls) => decls,
			Err(err) => {
				fatal.push(err);
				Vec::new()
			}
		};
		let providers = discovered(MarkerKind::Provider);
		let gateways = discovered(MarkerKind::Gateway);
		if gateways.len() > 1 {
			fatal.push(Fatal::MultipleGateways(gateways.iter().map(|d| d.path.clone()).collect()));
		}
		if !fatal.is_empty() {
			return Err(GenError::Aborted(fatal));
		}

		let mut accepted = Accepted {
			providers: self.validated(providers, diags),
			gateway: None,
		};
		accepted.gateway = self.validated(gateways, diags).into_iter().next();
		Ok(accepted)
	}

	fn validated(&self, decls: Vec<Declaration>, diags: &mut Diagnostics) -> Vec<Declaration> {
		decls
			.into_iter()
			.filter(|decl| match self.rules.check(decl) {
				Ok(warnings) => {
					for warning in warnings {
						diags.warn(Some(&decl.location), warning);
					}
					true
				}
				Err(violation) => {
					diags.error(Some(&decl.location), format!("{violation} ({} rule); binding skipped", violation.rule()));
					false
				}
			})
			.collect()
	}

	fn fragments(&self, decls: &[Declaration], fatal: &mut Vec<Fatal>) -> Vec<Fragment> {
		decls
			.iter()
			.filter_map(|decl| Step::select(decl).build(decl, &self.runtime).map_err(|err| fatal.push(err)).ok())
			.collect()
	}
}
