//! Tether binding generator CLI.
//!
//! Runs the same generation round a build script would, outside of cargo:
//! - `tether scan <SRC>` lists the declarations that would be bound
//! - `tether generate <SRC> --out <DIR>` writes the generated sources

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tether_gen::{Diagnostics, GenConfig, Generator, OutDirWriter, Scanner};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(about = "Generate delegate bindings from #[provider] and #[gateway] markers")]
struct Args {
	#[command(subcommand)]
	command: Command,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// List accepted declarations and diagnostics
	Scan {
		/// Crate source directory
		#[arg(value_name = "SRC")]
		src: PathBuf,

		/// Generator config (defaults to Tether.toml next to SRC)
		#[arg(short, long, value_name = "FILE")]
		config: Option<PathBuf>,
	},
	/// Write generated sources into a directory
	///
	/// The bindings index includes the other units through `env!("OUT_DIR")`, so DIR must
	/// be the `OUT_DIR` of the crate that includes it.
	Generate {
		/// Crate source directory
		#[arg(value_name = "SRC")]
		src: PathBuf,

		/// Output directory
		#[arg(short, long, value_name = "DIR")]
		out: PathBuf,

		/// Generator config (defaults to Tether.toml next to SRC)
		#[arg(short, long, value_name = "FILE")]
		config: Option<PathBuf>,
	},
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::WARN
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	match args.command {
		Command::Scan { src, config } => scan(&src, config.as_deref()),
		Command::Generate { src, out, config } => generate(&src, &out, config.as_deref()),
	}
}

fn load_config(src: &Path, explicit: Option<&Path>) -> anyhow::Result<GenConfig> {
	match explicit {
		Some(path) => GenConfig::load(path).with_context(|| format!("loading {}", path.display())),
		None => {
			let default = src.parent().unwrap_or(src).join(tether_gen::config::FILE_NAME);
			Ok(GenConfig::load_or_default(&default)?)
		}
	}
}

fn scan(src: &Path, config: Option<&Path>) -> anyhow::Result<()> {
	let generator = Generator::new(load_config(src, config)?)?;
	let manifest = Scanner::new(generator.config().crate_root.clone()).scan(src)?;
	let mut diags = Diagnostics::new();
	let accepted = generator.accept(&manifest, &mut diags);
	report(&diags);

	let accepted = accepted?;
	for decl in accepted.providers.iter().chain(&accepted.gateway) {
		println!("{decl}");
	}
	info!(providers = accepted.providers.len(), gateway = accepted.gateway.is_some(), "scan complete");
	Ok(())
}

fn generate(src: &Path, out: &Path, config: Option<&Path>) -> anyhow::Result<()> {
	let generator = Generator::new(load_config(src, config)?)?;
	let mut writer = OutDirWriter::new(out);
	let mut diags = Diagnostics::new();
	let result = generator.run(src, &mut writer, &mut diags);
	report(&diags);

	let artifacts = result?;
	for artifact in &artifacts {
		println!("{}", out.join(&artifact.file_name).display());
	}
	Ok(())
}

fn report(diags: &Diagnostics) {
	for diag in diags.iter() {
		eprintln!("{diag}");
	}
}
