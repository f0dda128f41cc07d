//! Check command

use std::path::PathBuf;

use clap::Args;
use vellum_ast::{LayoutProgram, Program};
use vellum_compiler::{CompileOptions, analyze_layout, analyze_program};

use super::{read_json, report};
use crate::output;

#[derive(Args)]
pub(crate) struct CheckArgs {
	/// Program file to analyze
	#[arg(value_name = "FILE")]
	pub file: PathBuf,

	/// Treat the file as a layout program
	#[arg(long)]
	pub layout: bool,
}

/// Analyzes a program, printing every diagnostic found.
pub(crate) fn execute(args: CheckArgs, options: &CompileOptions) -> anyhow::Result<()> {
	output::info(&format!("Checking {}", args.file.display()));

	let result = if args.layout {
		let layout: LayoutProgram = read_json(&args.file)?;
		analyze_layout(&layout, options).map(drop)
	} else {
		let program: Program = read_json(&args.file)?;
		analyze_program(&program, options).map(drop)
	};

	match result {
		Ok(()) => {
			output::success(&format!("{} is valid", args.file.display()));
			Ok(())
		}
		Err(diagnostics) => Err(report(&args.file, &diagnostics)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::commands::test_support::write;
	use serde_json::json;

	#[test]
	fn test_check_valid_page() {
		let dir = tempfile::tempdir().unwrap();
		let file = write(
			&dir,
			"page.json",
			&json!({ "version": "1.0", "view": { "kind": "text", "value": { "expr": "lit", "value": "hi" } } }),
		);

		let result = execute(CheckArgs { file, layout: false }, &CompileOptions::default());

		assert!(result.is_ok());
	}

	#[test]
	fn test_check_layout_without_slot_fails() {
		let dir = tempfile::tempdir().unwrap();
		let file = write(
			&dir,
			"layout.json",
			&json!({ "version": "1.0", "type": "layout", "view": { "kind": "element", "tag": "main" } }),
		);

		let args = CheckArgs { file, layout: true };
		let err = execute(args, &CompileOptions::default()).unwrap_err();

		assert!(err.to_string().ends_with("1 error(s)"));
	}
}
