//! Generator configuration, read from an optional `Tether.toml` next to the crate manifest.
//!
//! ```toml
//! runtime = "::tether_registry"
//! contract = "Delegate"
//!
//! [params]
//! handler = "Option<&Handler>"
//!
//! [output]
//! providers = "tether_providers.rs"
//! ```
//!
//! Every field is optional; unknown fields are rejected.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

pub const FILE_NAME: &str = "Tether.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
	/// Path of the runtime crate as seen from the generated code.
	pub runtime: String,
	/// Path prefix that names the scanned crate from inside itself.
	pub crate_root: String,
	/// Name of the trait a provider type must implement.
	pub contract: String,
	pub params: Params,
	pub output: Output,
}

impl Default for GenConfig {
	fn default() -> Self {
		Self {
			runtime: "::tether_registry".into(),
			crate_root: "crate".into(),
			contract: "Delegate".into(),
			params: Params::default(),
			output: Output::default(),
		}
	}
}

/// Reference types of the four delegate parameters, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
	pub context: String,
	pub method: String,
	pub arguments: String,
	pub handler: String,
}

impl Default for Params {
	fn default() -> Self {
		Self {
			context: "Option<&Context>".into(),
			method: "&str".into(),
			arguments: "Option<&Value>".into(),
			handler: "Option<&Handler>".into(),
		}
	}
}

impl Params {
	/// `(name, type)` pairs in call order.
	pub fn ordered(&self) -> [(&'static str, &str); 4] {
		[
			("context", self.context.as_str()),
			("method", self.method.as_str()),
			("arguments", self.arguments.as_str()),
			("handler", self.handler.as_str()),
		]
	}
}

/// File names of the generated artifacts inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Output {
	pub providers: String,
	pub interceptor: String,
	pub bindings: String,
}

impl Default for Output {
	fn default() -> Self {
		Self {
			providers: "tether_providers.rs".into(),
			interceptor: "tether_interceptor.rs".into(),
			bindings: "tether_bindings.rs".into(),
		}
	}
}

impl GenConfig {
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(src)?;
		config.check()?;
		Ok(config)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let src = fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&src)
	}

	/// Loads `path` if it exists, otherwise returns the defaults.
	pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
		if !path.is_file() {
			tracing::debug!(path = %path.display(), "no generator config; using defaults");
			return Ok(Self::default());
		}
		Self::load(path)
	}

	pub fn runtime_path(&self) -> Result<syn::Path, ConfigError> {
		syn::parse_str(&self.runtime).map_err(|_| ConfigError::Syntax {
			field: "runtime",
			expected: "path",
			value: self.runtime.clone(),
		})
	}

	fn check(&self) -> Result<(), ConfigError> {
		self.runtime_path()?;
		syn::parse_str::<syn::Path>(&self.crate_root).map_err(|_| ConfigError::Syntax {
			field: "crate_root",
			expected: "path",
			value: self.crate_root.clone(),
		})?;
		syn::parse_str::<syn::Ident>(&self.contract).map_err(|_| ConfigError::Syntax {
			field: "contract",
			expected: "identifier",
			value: self.contract.clone(),
		})?;
		for (field, ty) in self.params.ordered() {
			syn::parse_str::<syn::Type>(ty).map_err(|_| ConfigError::Syntax {
				field,
				expected: "type",
				value: ty.to_string(),
			})?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_file_is_all_defaults() {
		assert_eq!(GenConfig::from_toml_str("").unwrap(), GenConfig::default());
	}

	#[test]
	fn partial_tables_keep_remaining_defaults() {
		let config = GenConfig::from_toml_str(
			r#"
			runtime = "::rt"

			[output]
			providers = "p.rs"
			"#,
		)
		.unwrap();
		assert_eq!(config.runtime, "::rt");
		assert_eq!(config.output.providers, "p.rs");
		assert_eq!(config.output.bindings, "tether_bindings.rs");
		assert_eq!(config.params, Params::default());
	}

	#[test]
	fn unknown_fields_are_rejected() {
		let err = GenConfig::from_toml_str("runtim = \"::rt\"").unwrap_err();
		assert!(matches!(err, ConfigError::Toml(_)), "{err}");
	}

	#[test]
	fn malformed_values_name_the_field() {
		let err = GenConfig::from_toml_str("runtime = \"not a path\"").unwrap_err();
		assert!(matches!(err, ConfigError::Syntax { field: "runtime", .. }), "{err}");

		let err = GenConfig::from_toml_str("[params]\nhandler = \"Option<&\"").unwrap_err();
		assert!(matches!(err, ConfigError::Syntax { field: "handler", .. }), "{err}");
	}

	#[test]
	fn missing_file_falls_back_to_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let config = GenConfig::load_or_default(&dir.path().join(FILE_NAME)).unwrap();
		assert_eq!(config, GenConfig::default());
	}

	#[test]
	fn load_reads_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(FILE_NAME);
		fs::write(&path, "contract = \"Responder\"\n").unwrap();
		assert_eq!(GenConfig::load_or_default(&path).unwrap().contract, "Responder");
	}
}
