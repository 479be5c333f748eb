//! Discovery: turns manifest items into declarations for one marker kind.
//!
//! Items carrying the marker directly are discovered as they are. An item that is a marker
//! alias is replaced, in place, by every item tagged with it. Expansion stops there: an
//! alias reached through another alias, including one tagged with itself, is reported and
//! skipped.

use crate::diagnostics::Diagnostics;
use crate::error::Fatal;
use crate::manifest::{Category, Item, Manifest};
use crate::model::{Carrier, DeclKind, Declaration, MarkerKind};

/// Declarations carrying `marker`, in manifest order with alias expansions spliced in.
///
/// Fails on the first marked item that is neither a type nor a function.
pub fn discover(manifest: &Manifest, marker: MarkerKind, diags: &mut Diagnostics) -> Result<Vec<Declaration>, Fatal> {
	let mut out = Vec::new();
	for item in &manifest.items {
		for key in keys(item, marker) {
			if !item.alias {
				out.push(declare(manifest, item, Carrier::direct(marker, key))?);
				continue;
			}

			let mut reached = 0usize;
			for target in manifest.tagged_with(item) {
				if target.alias {
					diags.warn(
						Some(&target.location),
						format!(
							"marker alias `{}` reached through alias `{}` is not expanded further",
							target.path, item.path
						),
					);
					continue;
				}
				out.push(declare(manifest, target, Carrier::indirect(marker, &item.path, key))?);
				reached += 1;
			}
			tracing::debug!(alias = %item.path, %marker, reached, "expanded marker alias");
		}
	}
	tracing::debug!(%marker, count = out.len(), "discovered declarations");
	Ok(out)
}

/// One entry per occurrence of `marker` on `item`: the provider keys, or a single `None`
/// for a gateway.
fn keys(item: &Item, marker: MarkerKind) -> Vec<Option<&str>> {
	match marker {
		MarkerKind::Provider => item.provider_keys().map(Some).collect(),
		MarkerKind::Gateway if item.is_gateway() => vec![None],
		MarkerKind::Gateway => Vec::new(),
	}
}

fn declare(manifest: &Manifest, item: &Item, carrier: Carrier) -> Result<Declaration, Fatal> {
	let kind = if let Some(shape) = manifest.type_shape(item) {
		DeclKind::Type(shape)
	} else if let Category::Function(shape) = &item.category {
		DeclKind::Function(shape.clone())
	} else {
		return Err(Fatal::UnsupportedCategory {
			marker: carrier.marker(),
			category: item.category.describe(),
			name: item.path.clone(),
			location: item.location.clone(),
		});
	};
	Ok(Declaration {
		path: item.path.clone(),
		scope: item.scope.clone(),
		kind,
		carrier,
		location: item.location.clone(),
	})
}
