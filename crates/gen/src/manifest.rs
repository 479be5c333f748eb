//! Scanned view of a crate: every item that carries a tether attribute, plus the trait impls
//! needed to judge type shapes.

use crate::model::{Construction, FnShape, Location, TypeShape, Visibility};

/// A tether attribute as written on an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
	/// `#[provider("key")]`
	Provider(String),
	/// `#[gateway]`
	Gateway,
	/// `#[tagged(Alias)]`, holding the alias name.
	Tagged(String),
}

/// What kind of item a marker sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
	Type {
		visibility: Visibility,
		unit: bool,
		derives_default: bool,
	},
	Function(FnShape),
	/// Anything else, named for diagnostics (`const`, `trait`, `mod`, ...).
	Unsupported(&'static str),
}

impl Category {
	pub fn describe(&self) -> &'static str {
		match self {
			Self::Type { .. } => "type",
			Self::Function(_) => "function",
			Self::Unsupported(name) => name,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
	/// Path from the crate root, e.g. `crate::net::Ping` or `crate::net::Ping::handle`.
	pub path: String,
	pub ident: String,
	/// Owning type path for associated functions.
	pub scope: Option<String>,
	pub category: Category,
	pub markers: Vec<Marker>,
	/// Carries `#[marker_alias]`.
	pub alias: bool,
	pub location: Location,
}

impl Item {
	pub fn provider_keys(&self) -> impl Iterator<Item = &str> {
		self.markers.iter().filter_map(|m| match m {
			Marker::Provider(key) => Some(key.as_str()),
			_ => None,
		})
	}

	pub fn is_gateway(&self) -> bool {
		self.markers.contains(&Marker::Gateway)
	}

	pub fn tags(&self) -> impl Iterator<Item = &str> {
		self.markers.iter().filter_map(|m| match m {
			Marker::Tagged(alias) => Some(alias.as_str()),
			_ => None,
		})
	}

	pub fn is_tagged(&self, alias: &str) -> bool {
		self.tags().any(|tag| tag == alias)
	}
}

/// `impl Trait for Type`, both reduced to their last path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitImpl {
	pub trait_name: String,
	pub self_ty: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
	/// Marked items in scan order.
	pub items: Vec<Item>,
	pub impls: Vec<TraitImpl>,
}

impl Manifest {
	/// Items tagged with the alias `alias`, in manifest order.
	pub fn tagged_with<'a>(&'a self, alias: &'a Item) -> impl Iterator<Item = &'a Item> {
		self.items.iter().filter(move |item| item.is_tagged(&alias.ident))
	}

	/// Traits implemented for the type named `ident`, in manifest order.
	pub fn traits_of<'a>(&'a self, ident: &'a str) -> impl Iterator<Item = &'a str> {
		self.impls.iter().filter(move |i| i.self_ty == ident).map(|i| i.trait_name.as_str())
	}

	/// Shape of a type item, or `None` if `item` is not a type.
	pub fn type_shape(&self, item: &Item) -> Option<TypeShape> {
		let Category::Type {
			visibility,
			unit,
			derives_default,
		} = &item.category
		else {
			return None;
		};
		let implements: Vec<String> = self.traits_of(&item.ident).map(str::to_string).collect();
		let construction = if *unit {
			Some(Construction::Unit)
		} else if *derives_default || implements.iter().any(|t| t == "Default") {
			Some(Construction::Default)
		} else {
			None
		};
		Some(TypeShape {
			visibility: *visibility,
			implements,
			construction,
		})
	}

	/// `(item, alias)` pairs for `#[tagged]` names that match no `#[marker_alias]` alias.
	pub fn unresolved_tags(&self) -> Vec<(&Item, &str)> {
		self.items
			.iter()
			.flat_map(|item| item.tags().map(move |tag| (item, tag)))
			.filter(|(_, tag)| !self.items.iter().any(|a| a.alias && a.ident == *tag))
			.collect()
	}
}
