use std::fs;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

const SIG: &str = "context: Option<&Context>, method: &str, arguments: Option<&Value>, handler: Option<&Handler>";

#[rstest]
#[case::lib("lib.rs", Some("crate"))]
#[case::main("main.rs", Some("crate"))]
#[case::file("net.rs", Some("crate::net"))]
#[case::mod_rs("net/mod.rs", Some("crate::net"))]
#[case::nested("net/ping.rs", Some("crate::net::ping"))]
#[case::bin("bin/tool.rs", None)]
fn module_paths(#[case] rel: &str, #[case] expected: Option<&str>) {
	let root = Path::new("/work/src");
	assert_eq!(module_path(root, &root.join(rel), "crate").as_deref(), expected);
}

#[test]
fn records_marked_items_only() {
	let manifest = scan_str(&format!(
		r#"
		pub struct Plain;

		#[provider("ping")]
		#[derive(Default)]
		pub struct Ping {{ count: u32 }}

		#[tether_registry::gateway]
		pub fn fallback({SIG}) {{}}
		"#
	))
	.unwrap();

	let paths: Vec<&str> = manifest.items.iter().map(|i| i.path.as_str()).collect();
	assert_eq!(paths, ["crate::Ping", "crate::fallback"]);
	assert_eq!(manifest.items[0].markers, [Marker::Provider("ping".into())]);
	assert_eq!(
		manifest.items[0].category,
		Category::Type {
			visibility: Visibility::Public,
			unit: false,
			derives_default: true,
		}
	);
	assert!(manifest.items[1].is_gateway());
	assert_eq!(manifest.items[1].location, Location::new("src/lib.rs", 9));
}

#[test]
fn function_shape_is_canonical() {
	let manifest = scan_str(&format!("#[provider(\"f\")] pub fn f<'a>({SIG}, extra: &'a ::std::string::String) -> Option<u8> {{ None }}")).unwrap();
	let Category::Function(shape) = &manifest.items[0].category else {
		panic!("expected a function");
	};
	assert_eq!(
		shape.params,
		["Option<&Context>", "&str", "Option<&Value>", "Option<&Handler>", "&String"]
	);
	assert_eq!(shape.output.as_deref(), Some("Option<u8>"));
	assert!(!shape.receiver);
}

#[test]
fn unit_return_is_no_output() {
	let manifest = scan_str(&format!("#[provider(\"f\")] pub fn f({SIG}) -> () {{}}")).unwrap();
	let Category::Function(shape) = &manifest.items[0].category else {
		panic!("expected a function");
	};
	assert_eq!(shape.output, None);
}

#[test]
fn associated_functions_record_scope_and_receiver() {
	let manifest = scan_str(&format!(
		r#"
		pub struct Owner;
		impl Owner {{
			#[provider("a")]
			pub fn assoc({SIG}) {{}}
			#[provider("b")]
			pub fn method(&self, {SIG}) {{}}
		}}
		"#
	))
	.unwrap();

	assert_eq!(manifest.items[0].path, "crate::Owner::assoc");
	assert_eq!(manifest.items[0].scope.as_deref(), Some("crate::Owner"));
	let receivers: Vec<bool> = manifest
		.items
		.iter()
		.map(|i| matches!(&i.category, Category::Function(f) if f.receiver))
		.collect();
	assert_eq!(receivers, [false, true]);
}

#[test]
fn trait_impls_and_inline_modules() {
	let manifest = scan_str(
		r#"
		pub mod net {
			#[provider("ping")]
			pub struct Ping;
			impl tether_registry::Delegate for Ping {}
		}
		impl Default for Other {}
		"#,
	)
	.unwrap();

	assert_eq!(manifest.items[0].path, "crate::net::Ping");
	let traits: Vec<&str> = manifest.traits_of("Ping").collect();
	assert_eq!(traits, ["Delegate"]);
	assert_eq!(manifest.traits_of("Other").collect::<Vec<_>>(), ["Default"]);
}

#[test]
fn cfg_test_modules_are_skipped() {
	let manifest = scan_str(
		r#"
		#[cfg(test)]
		mod tests {
			#[gateway]
			pub struct Probe;
			impl Delegate for Probe {}
		}
		"#,
	)
	.unwrap();

	assert!(manifest.items.is_empty());
	assert!(manifest.impls.is_empty());
}

#[test]
fn unsupported_categories_are_recorded() {
	let manifest = scan_str(
		r#"
		#[provider("limit")]
		pub const LIMIT: u8 = 1;
		#[gateway]
		pub trait Fallback {}
		"#,
	)
	.unwrap();

	let categories: Vec<&str> = manifest.items.iter().map(|i| i.category.describe()).collect();
	assert_eq!(categories, ["const", "trait"]);
}

#[test]
fn aliases_and_tags() {
	let manifest = scan_str(
		r#"
		#[marker_alias]
		#[provider("config.read")]
		pub struct ConfigReader;

		#[tagged(crate::ConfigReader)]
		pub struct Reader;

		#[tagged(Missing)]
		pub struct Orphan;
		"#,
	)
	.unwrap();

	assert!(manifest.items[0].alias);
	let tagged: Vec<&str> = manifest.tagged_with(&manifest.items[0]).map(|i| i.ident.as_str()).collect();
	assert_eq!(tagged, ["Reader"]);
	let unresolved: Vec<(&str, &str)> = manifest
		.unresolved_tags()
		.into_iter()
		.map(|(item, tag)| (item.ident.as_str(), tag))
		.collect();
	assert_eq!(unresolved, [("Orphan", "Missing")]);
}

#[test]
fn builtin_marker_attribute_is_not_an_alias() {
	let manifest = scan_str("#[marker] pub trait Tag {}\n#[marker_alias] #[gateway] pub struct Catch;").unwrap();
	let aliases: Vec<&str> = manifest.items.iter().filter(|i| i.alias).map(|i| i.ident.as_str()).collect();
	assert_eq!(aliases, ["Catch"]);
	assert_eq!(manifest.items.len(), 1);
}

#[rstest]
#[case::provider_without_key("#[provider] pub struct A;", "provider")]
#[case::provider_empty_key("#[provider(\"\")] pub struct A;", "provider")]
#[case::gateway_with_args("#[gateway(x)] pub struct A;", "gateway")]
#[case::marker_on_fn("#[marker_alias] pub fn a() {}", "marker_alias")]
#[case::marker_on_fields("#[marker_alias] pub struct A { x: u8 }", "marker_alias")]
fn malformed_attributes(#[case] src: &str, #[case] attribute: &str) {
	match scan_str(src) {
		Err(ScanError::Attribute { attribute: found, .. }) => assert_eq!(found, attribute),
		other => panic!("expected an attribute error, got {other:?}"),
	}
}

#[test]
fn parse_errors_name_the_file() {
	let err = scan_str("pub struct").unwrap_err();
	assert!(matches!(err, ScanError::Parse { ref path, .. } if path == Path::new("src/lib.rs")), "{err}");
}

#[test]
fn scans_a_source_tree_in_path_order() {
	let dir = tempfile::tempdir().unwrap();
	let src = dir.path().join("src");
	fs::create_dir_all(src.join("net")).unwrap();
	fs::create_dir_all(src.join("bin")).unwrap();
	fs::write(src.join("lib.rs"), "pub mod net;\n#[provider(\"root\")]\npub struct Root;\n").unwrap();
	fs::write(src.join("net/mod.rs"), "#[provider(\"net\")]\npub struct Net;\n").unwrap();
	fs::write(src.join("bin/tool.rs"), "#[provider(\"tool\")]\npub struct Tool;\n").unwrap();
	fs::write(src.join("main.rs"), "#[provider(\"main\")]\npub struct Main;\n").unwrap();

	let manifest = Scanner::default().scan(&src).unwrap();
	let paths: Vec<&str> = manifest.items.iter().map(|i| i.path.as_str()).collect();
	assert_eq!(paths, ["crate::Root", "crate::net::Net"]);
	assert_eq!(manifest.items[1].location, Location::new(src.join("net/mod.rs"), 2));
}
