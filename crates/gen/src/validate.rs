//! Shape rules a declaration must satisfy before any code is generated for it.
//!
//! Checks are pure and stop at the first broken rule. Function rules run in a fixed order:
//! visibility, storage class, arity, parameter types, return type.

use std::fmt;

use crate::config::GenConfig;
use crate::error::ConfigError;
use crate::model::{DeclKind, Declaration, FnShape, TypeShape, Visibility};
use crate::types::canonicalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
	Contract,
	Constructible,
	Visibility,
	StorageClass,
	Arity,
	ParameterType,
	ReturnType,
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Contract => "contract",
			Self::Constructible => "constructible",
			Self::Visibility => "visibility",
			Self::StorageClass => "storage class",
			Self::Arity => "arity",
			Self::ParameterType => "parameter type",
			Self::ReturnType => "return type",
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
	#[error("type `{path}` does not implement `{contract}`")]
	MissingContract { path: String, contract: String },

	#[error("type `{path}` cannot be built without arguments; use a unit struct, derive `Default`, or implement it")]
	NotConstructible { path: String },

	#[error("function `{path}` must be `pub`")]
	NotPublic { path: String },

	#[error("function `{path}` takes `self`; it must be callable without an instance")]
	Receiver { path: String },

	#[error("function `{path}` takes {found} parameters, expected {expected}")]
	Arity { path: String, expected: usize, found: usize },

	#[error("function `{path}` parameter {index} (`{name}`) is `{found}`, expected `{expected}`")]
	ParameterType {
		path: String,
		index: usize,
		name: &'static str,
		found: String,
		expected: String,
	},

	#[error("function `{path}` returns `{found}`, expected no return value")]
	ReturnType { path: String, found: String },
}

impl Violation {
	pub fn rule(&self) -> Rule {
		match self {
			Self::MissingContract { .. } => Rule::Contract,
			Self::NotConstructible { .. } => Rule::Constructible,
			Self::NotPublic { .. } => Rule::Visibility,
			Self::Receiver { .. } => Rule::StorageClass,
			Self::Arity { .. } => Rule::Arity,
			Self::ParameterType { .. } => Rule::ParameterType,
			Self::ReturnType { .. } => Rule::ReturnType,
		}
	}
}

/// Reference shapes, canonicalized once per round.
#[derive(Debug, Clone)]
pub struct ShapeRules {
	contract: String,
	params: Vec<(&'static str, String)>,
}

impl ShapeRules {
	pub fn from_config(config: &GenConfig) -> Result<Self, ConfigError> {
		let params = config
			.params
			.ordered()
			.into_iter()
			.map(|(name, ty)| {
				canonicalize(ty).map(|canon| (name, canon)).map_err(|_| ConfigError::Syntax {
					field: name,
					expected: "type",
					value: ty.to_string(),
				})
			})
			.collect::<Result<_, _>>()?;
		Ok(Self {
			contract: config.contract.clone(),
			params,
		})
	}

	/// Checks `decl`, returning non-blocking warnings when it passes.
	pub fn check(&self, decl: &Declaration) -> Result<Vec<String>, Violation> {
		match &decl.kind {
			DeclKind::Type(shape) => self.check_type(&decl.path, shape),
			DeclKind::Function(shape) => self.check_fn(&decl.path, shape).map(|()| Vec::new()),
		}
	}

	fn check_type(&self, path: &str, shape: &TypeShape) -> Result<Vec<String>, Violation> {
		if !shape.implements.iter().any(|t| *t == self.contract) {
			return Err(Violation::MissingContract {
				path: path.to_string(),
				contract: self.contract.clone(),
			});
		}
		if shape.construction.is_none() {
			return Err(Violation::NotConstructible { path: path.to_string() });
		}
		let mut warnings = Vec::new();
		if shape.visibility != Visibility::Public {
			warnings.push(format!("type `{path}` is not `pub`; generated code may not be able to name it"));
		}
		Ok(warnings)
	}

	fn check_fn(&self, path: &str, shape: &FnShape) -> Result<(), Violation> {
		let path = path.to_string();
		if shape.visibility != Visibility::Public {
			return Err(Violation::NotPublic { path });
		}
		if shape.receiver {
			return Err(Violation::Receiver { path });
		}
		if shape.params.len() != self.params.len() {
			return Err(Violation::Arity {
				path,
				expected: self.params.len(),
				found: shape.params.len(),
			});
		}
		for (index, (found, (name, expected))) in shape.params.iter().zip(&self.params).enumerate() {
			if found != expected {
				return Err(Violation::ParameterType {
					path,
					index,
					name: *name,
					found: found.clone(),
					expected: expected.clone(),
				});
			}
		}
		if let Some(found) = &shape.output {
			return Err(Violation::ReturnType {
				path,
				found: found.clone(),
			});
		}
		Ok(())
	}
}
