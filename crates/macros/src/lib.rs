//! Marker attributes for tether bindings.
//!
//! The attributes carry no behavior: each checks its own arguments and returns the item
//! unchanged. `tether-gen` reads them from source at build time.
//!
//! * `#[provider("key")]` - binds a delegate type or function under `key`
//! * `#[gateway]` - installs a delegate type or function as the interceptor
//! * `#[marker_alias]` - turns a unit struct into a marker alias
//! * `#[tagged(Alias)]` - applies the markers carried by `Alias`

use proc_macro::TokenStream;

/// Argument and target checks shared by the attributes.
mod markers;

/// Binds a delegate under a method name.
///
/// ```ignore
/// #[provider("battery.level")]
/// #[derive(Default)]
/// pub struct BatteryLevel;
///
/// impl Delegate for BatteryLevel { /* ... */ }
///
/// #[provider("ping")]
/// pub fn ping(context: Option<&Context>, method: &str, arguments: Option<&Value>, handler: Option<&Handler>) {}
/// ```
#[proc_macro_attribute]
pub fn provider(attr: TokenStream, item: TokenStream) -> TokenStream {
	markers::provider(attr.into(), item.into()).into()
}

/// Installs a delegate as the fallback for unmatched method names. At most one
/// declaration per crate may carry it.
#[proc_macro_attribute]
pub fn gateway(attr: TokenStream, item: TokenStream) -> TokenStream {
	markers::bare("gateway", attr.into(), item.into()).into()
}

/// Declares a marker alias.
///
/// ```ignore
/// #[marker_alias]
/// #[provider("config.read")]
/// pub struct ConfigReader;
///
/// #[tagged(ConfigReader)]
/// pub fn read_config(context: Option<&Context>, method: &str, arguments: Option<&Value>, handler: Option<&Handler>) {}
/// ```
#[proc_macro_attribute]
pub fn marker_alias(attr: TokenStream, item: TokenStream) -> TokenStream {
	markers::marker_alias(attr.into(), item.into()).into()
}

/// Applies the markers carried by a marker alias.
#[proc_macro_attribute]
pub fn tagged(attr: TokenStream, item: TokenStream) -> TokenStream {
	markers::tagged(attr.into(), item.into()).into()
}
