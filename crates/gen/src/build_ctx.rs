//! Build-script driver.
//!
//! ```ignore
//! // build.rs
//! fn main() {
//! 	if let Err(err) = tether_gen::BuildCtx::from_env().and_then(|ctx| ctx.run()) {
//! 		panic!("{err}");
//! 	}
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::config::{self, GenConfig};
use crate::diagnostics::Diagnostics;
use crate::emit::{Artifact, OutDirWriter};
use crate::error::GenError;
use crate::pipeline::Generator;
use crate::scan::collect_files_sorted;

pub struct BuildCtx {
	pub manifest_dir: PathBuf,
	pub out_dir: PathBuf,
}

impl BuildCtx {
	pub fn new(manifest_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
		Self {
			manifest_dir: manifest_dir.into(),
			out_dir: out_dir.into(),
		}
	}

	/// Reads `CARGO_MANIFEST_DIR` and `OUT_DIR`, as set by cargo for build scripts.
	pub fn from_env() -> Result<Self, GenError> {
		let var = |name: &'static str| std::env::var_os(name).map(PathBuf::from).ok_or(GenError::Env(name));
		Ok(Self::new(var("CARGO_MANIFEST_DIR")?, var("OUT_DIR")?))
	}

	pub fn src_dir(&self) -> PathBuf {
		self.manifest_dir.join("src")
	}

	pub fn config_path(&self) -> PathBuf {
		self.manifest_dir.join(config::FILE_NAME)
	}

	pub fn rerun_if_changed(&self, path: &Path) {
		println!("cargo:rerun-if-changed={}", path.display());
	}

	pub fn rerun_tree(&self, root: &Path) {
		self.rerun_if_changed(root);
		for file in collect_files_sorted(root, "rs") {
			self.rerun_if_changed(&file);
		}
	}

	/// Generates into `OUT_DIR`, reporting diagnostics as cargo warnings.
	pub fn run(&self) -> Result<Vec<Artifact>, GenError> {
		self.rerun_tree(&self.src_dir());
		self.rerun_if_changed(&self.config_path());

		let mut diags = Diagnostics::new();
		let result = self.generate(&mut diags);
		for line in diags.cargo_lines() {
			println!("{line}");
		}
		result
	}

	/// Loads the config, then scans, generates and writes without printing anything.
	pub fn generate(&self, diags: &mut Diagnostics) -> Result<Vec<Artifact>, GenError> {
		let config = GenConfig::load_or_default(&self.config_path())?;
		let generator = Generator::new(config)?;
		let mut writer = OutDirWriter::new(&self.out_dir);
		generator.run(&self.src_dir(), &mut writer, diags)
	}
}
