use std::path::PathBuf;

use crate::model::{Location, MarkerKind};

/// Structural misuse of a marker. Aborts the generation round: nothing is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fatal {
	/// More than one declaration carries `#[gateway]`, directly or through an alias.
	#[error("only one #[gateway] may exist, found {}: {}", .0.len(), .0.join(", "))]
	MultipleGateways(Vec<String>),

	/// A marker sits on something that is neither a type nor a function.
	#[error("{location}: #[{marker}] is not supported on {category} `{name}`")]
	UnsupportedCategory {
		marker: MarkerKind,
		category: &'static str,
		name: String,
		location: Location,
	},

	/// A discovered path could not be turned back into a Rust path.
	#[error("{location}: `{name}` is not a valid path: {message}")]
	InvalidPath {
		name: String,
		location: Location,
		message: String,
	},
}

/// Failure reading the crate sources.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse {}: {source}", path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: syn::Error,
	},

	/// A marker attribute with malformed arguments, e.g. `#[provider]` without a key.
	#[error("{location}: malformed #[{attribute}]: {message}")]
	Attribute {
		attribute: String,
		location: Location,
		message: String,
	},
}

/// Failure loading `Tether.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid config: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("config field `{field}` is not a valid {expected}: `{value}`")]
	Syntax {
		field: &'static str,
		expected: &'static str,
		value: String,
	},
}

#[derive(Debug, thiserror::Error)]
pub enum GenError {
	#[error(transparent)]
	Scan(#[from] ScanError),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("generation aborted: {}", render_fatal(.0))]
	Aborted(Vec<Fatal>),

	#[error("failed to write {}: {source}", path.display())]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("environment variable `{0}` is not set; is this running from a build script?")]
	Env(&'static str),
}

fn render_fatal(errors: &[Fatal]) -> String {
	errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
