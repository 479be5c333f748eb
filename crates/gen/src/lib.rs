//! Build-time binding generator for `tether-registry`.
//!
//! Scans a crate's sources for `#[provider("key")]`, `#[gateway]` and marker aliases,
//! checks each marked declaration against the delegate contract, and emits Rust source
//! that registers the accepted ones:
//!
//! ```text
//! src/**/*.rs -> Scanner -> Manifest -> discover -> ShapeRules -> Step -> Emitter -> OUT_DIR
//! ```
//!
//! | Artifact | Contents | Present |
//! |----------|----------|---------|
//! | `tether_providers.rs` | `register_providers(&Registry)` | at least one provider accepted |
//! | `tether_interceptor.rs` | `register_interceptor(&Registry)` | a gateway accepted |
//! | `tether_bindings.rs` | `TETHER_BINDINGS: Bindings`, includes the above | always |
//!
//! Shape violations are reported and the declaration is skipped. Structural misuse
//! (a second gateway, a marker on a `const`) aborts the round and nothing is written.
//!
//! Most crates only need [`BuildCtx`] from a build script and
//! `include!(concat!(env!("OUT_DIR"), "/tether_bindings.rs"))` in the crate root.

pub mod builder;
mod build_ctx;
pub mod config;
pub mod diagnostics;
pub mod discover;
pub mod emit;
mod error;
pub mod manifest;
pub mod model;
mod pipeline;
pub mod scan;
pub mod types;
pub mod validate;

pub use build_ctx::BuildCtx;
pub use config::GenConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Level};
pub use emit::{Artifact, ArtifactWriter, MemoryWriter, OutDirWriter};
pub use error::{ConfigError, Fatal, GenError, ScanError};
pub use pipeline::{Accepted, Generator};
pub use scan::Scanner;
