//! Declaration model produced by discovery and consumed by validation and the builder tree.

use std::fmt;
use std::path::{Path, PathBuf};

/// The two binding kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerKind {
	/// Keyed by method name; any number may exist.
	Provider,
	/// The interceptor; at most one may exist.
	Gateway,
}

impl MarkerKind {
	pub const ALL: [MarkerKind; 2] = [MarkerKind::Provider, MarkerKind::Gateway];

	/// Attribute name the marker is written as.
	pub const fn attribute(self) -> &'static str {
		match self {
			Self::Provider => "provider",
			Self::Gateway => "gateway",
		}
	}
}

impl fmt::Display for MarkerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.attribute())
	}
}

/// How a marker reached a declaration.
///
/// Indirect carriers were reached through a marker alias; `alias` names it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Carrier {
	DirectProvider { key: String },
	DirectGateway,
	IndirectProvider { alias: String, key: String },
	IndirectGateway { alias: String },
}

impl Carrier {
	pub fn direct(marker: MarkerKind, key: Option<&str>) -> Self {
		match marker {
			MarkerKind::Provider => Self::DirectProvider {
				key: key.unwrap_or_default().to_string(),
			},
			MarkerKind::Gateway => Self::DirectGateway,
		}
	}

	pub fn indirect(marker: MarkerKind, alias: &str, key: Option<&str>) -> Self {
		match marker {
			MarkerKind::Provider => Self::IndirectProvider {
				alias: alias.to_string(),
				key: key.unwrap_or_default().to_string(),
			},
			MarkerKind::Gateway => Self::IndirectGateway { alias: alias.to_string() },
		}
	}

	pub fn marker(&self) -> MarkerKind {
		match self {
			Self::DirectProvider { .. } | Self::IndirectProvider { .. } => MarkerKind::Provider,
			Self::DirectGateway | Self::IndirectGateway { .. } => MarkerKind::Gateway,
		}
	}

	/// Method name for provider carriers.
	pub fn key(&self) -> Option<&str> {
		match self {
			Self::DirectProvider { key } | Self::IndirectProvider { key, .. } => Some(key),
			Self::DirectGateway | Self::IndirectGateway { .. } => None,
		}
	}

	pub fn alias(&self) -> Option<&str> {
		match self {
			Self::IndirectProvider { alias, .. } | Self::IndirectGateway { alias } => Some(alias),
			Self::DirectProvider { .. } | Self::DirectGateway => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
	/// `pub`
	Public,
	/// `pub(crate)`, `pub(super)`, `pub(in ..)`
	Restricted,
	/// No visibility qualifier.
	Private,
}

/// Source position of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
	pub file: PathBuf,
	pub line: usize,
}

impl Location {
	pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
		Self { file: file.into(), line }
	}

	pub fn file(&self) -> &Path {
		&self.file
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.file.display(), self.line)
	}
}

/// What validation needs to know about a marked type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
	pub visibility: Visibility,
	/// Traits implemented for the type anywhere in the scanned sources, by name.
	pub implements: Vec<String>,
	/// How generated code builds the value, `None` if it cannot.
	pub construction: Option<Construction>,
}

/// Ways a type can be built without arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construction {
	/// Unit struct, named by its path alone.
	Unit,
	/// `#[derive(Default)]` or `impl Default`.
	Default,
}

/// What validation needs to know about a marked function.
///
/// Types are in canonical form (see [`crate::types::canonical`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnShape {
	pub visibility: Visibility,
	/// Takes `self` in any form, so needs an instance to be called.
	pub receiver: bool,
	pub params: Vec<String>,
	/// `None` for `()` or an omitted return type.
	pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
	Type(TypeShape),
	Function(FnShape),
}

impl DeclKind {
	pub fn describe(&self) -> &'static str {
		match self {
			Self::Type(_) => "type",
			Self::Function(_) => "function",
		}
	}
}

/// One marked declaration, as discovered for a single marker kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
	/// Fully qualified path from the crate root, e.g. `crate::net::Ping`.
	pub path: String,
	/// Owning type for associated functions.
	pub scope: Option<String>,
	pub kind: DeclKind,
	pub carrier: Carrier,
	pub location: Location,
}

impl Declaration {
	pub fn marker(&self) -> MarkerKind {
		self.carrier.marker()
	}

	pub fn key(&self) -> Option<&str> {
		self.carrier.key()
	}
}

impl fmt::Display for Declaration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#[{}", self.marker())?;
		if let Some(key) = self.key() {
			write!(f, "(\"{key}\")")?;
		}
		write!(f, "] {} `{}`", self.kind.describe(), self.path)?;
		if let Some(alias) = self.carrier.alias() {
			write!(f, " via `{alias}`")?;
		}
		write!(f, " ({})", self.location)
	}
}
