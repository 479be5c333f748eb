//! Non-fatal findings collected during a generation round.

use std::fmt;

use crate::model::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
	Warning,
	Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	pub level: Level,
	pub location: Option<Location>,
	pub message: String,
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let level = match self.level {
			Level::Warning => "warning",
			Level::Error => "error",
		};
		match &self.location {
			Some(location) => write!(f, "{level}: {location}: {}", self.message),
			None => write!(f, "{level}: {}", self.message),
		}
	}
}

/// Ordered sink for diagnostics. Entries are also traced at debug level; callers decide
/// how to surface them.
#[derive(Debug, Default)]
pub struct Diagnostics {
	entries: Vec<Diagnostic>,
}

impl Diagnostics {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn warn(&mut self, location: Option<&Location>, message: impl Into<String>) {
		self.push(Level::Warning, location, message.into());
	}

	pub fn error(&mut self, location: Option<&Location>, message: impl Into<String>) {
		self.push(Level::Error, location, message.into());
	}

	fn push(&mut self, level: Level, location: Option<&Location>, message: String) {
		let at = location.map(ToString::to_string).unwrap_or_default();
		tracing::debug!(?level, location = %at, "{message}");
		self.entries.push(Diagnostic {
			level,
			location: location.cloned(),
			message,
		});
	}

	pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn has_errors(&self) -> bool {
		self.entries.iter().any(|d| d.level == Level::Error)
	}

	/// Renders every entry as a `cargo:warning=` line, the only diagnostic channel a build
	/// script has. Errors keep their `error:` prefix so they stand out.
	pub fn cargo_lines(&self) -> Vec<String> {
		self.entries.iter().map(|d| format!("cargo:warning={d}")).collect()
	}
}
