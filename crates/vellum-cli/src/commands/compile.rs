//! Compile command

use std::path::PathBuf;

use clap::Args;
use vellum_ast::{LayoutProgram, Program};
use vellum_compiler::{CompileError, CompileOptions, compile, compile_layout};

use super::{read_json, report};
use crate::output;

#[derive(Args)]
pub(crate) struct CompileArgs {
	/// Program file to compile
	#[arg(value_name = "FILE")]
	pub file: PathBuf,

	/// Treat the file as a layout program
	#[arg(long)]
	pub layout: bool,

	/// Write compiled JSON here instead of stdout
	#[arg(short, long, value_name = "FILE")]
	pub output: Option<PathBuf>,

	/// Pretty-print the compiled JSON
	#[arg(long)]
	pub pretty: bool,
}

pub(crate) fn execute(args: CompileArgs, options: &CompileOptions) -> anyhow::Result<()> {
	let output = args.output.as_deref();
	let written = if args.layout {
		let layout: LayoutProgram = read_json(&args.file)?;
		compile_layout(&layout, options)
			.map(|compiled| output::write_json(&compiled, args.pretty, output))
	} else {
		let program: Program = read_json(&args.file)?;
		compile(&program, options)
			.map(|compiled| output::write_json(&compiled, args.pretty, output))
	};

	match written {
		Ok(result) => result,
		Err(CompileError::Analysis(diagnostics)) => Err(report(&args.file, &diagnostics)),
		Err(err) => Err(err.into()),
	}
}
