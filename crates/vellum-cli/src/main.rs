//! Vellum CLI
//!
//! Command-line front end to the Vellum compiler.
//!
//! ## Usage
//!
//! ```bash
//! vellum check pages/index.json
//! vellum compile layouts/main.json --layout --output build/main.layout.json
//! vellum compose pages/index.json --layout layouts/main.json --pretty
//! ```
//!
//! Compiler options are read from the `[compiler]` table of `vellum.toml`.

mod commands;
mod config;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, CompileArgs, ComposeArgs};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "vellum")]
#[command(about = "Check, compile and compose Vellum UI programs", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Verbosity level (can be repeated)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbosity: u8,

	/// Path to vellum.toml (defaults to ./vellum.toml when present)
	#[arg(long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
	/// Analyze a program and report diagnostics
	Check(CheckArgs),

	/// Analyze and lower a program to compiled JSON
	Compile(CompileArgs),

	/// Compile a page and a layout and compose them
	Compose(ComposeArgs),
}

fn init_logging(verbosity: u8) {
	let level = match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbosity > 1)
		.try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
	let config = CliConfig::discover(cli.config.as_deref())?;
	tracing::debug!(options = ?config.compiler, "loaded configuration");

	match cli.command {
		Commands::Check(args) => commands::check::execute(args, &config.compiler),
		Commands::Compile(args) => commands::compile::execute(args, &config.compiler),
		Commands::Compose(args) => commands::compose::execute(args, &config.compiler),
	}
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbosity);

	if let Err(e) = run(cli) {
		output::error(&format!("{e:#}"));
		process::exit(1);
	}
}
