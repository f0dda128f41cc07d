//! Compose command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indexmap::IndexMap;
use vellum_ast::{LayoutProgram, Program, ViewNode};
use vellum_compiler::{CompileError, CompileOptions, compile, compile_layout, compose_page};

use super::{read_json, report};
use crate::output;

#[derive(Args)]
pub(crate) struct ComposeArgs {
	/// Page program file
	#[arg(value_name = "PAGE")]
	pub page: PathBuf,

	/// Layout program file
	#[arg(long, value_name = "LAYOUT")]
	pub layout: PathBuf,

	/// JSON object mapping slot names to view nodes
	#[arg(long, value_name = "FILE")]
	pub slots: Option<PathBuf>,

	/// Write composed JSON here instead of stdout
	#[arg(short, long, value_name = "FILE")]
	pub output: Option<PathBuf>,

	/// Pretty-print the composed JSON
	#[arg(long)]
	pub pretty: bool,
}

/// Compiles the page and the layout, then composes them using the layout
/// params on the page's route.
pub(crate) fn execute(args: ComposeArgs, options: &CompileOptions) -> anyhow::Result<()> {
	let layout: LayoutProgram = read_json(&args.layout)?;
	let page: Program = read_json(&args.page)?;
	let slots: Option<IndexMap<String, ViewNode>> = args
		.slots
		.as_deref()
		.map(read_json)
		.transpose()
		.context("Cannot load slot content")?;

	let layout = compile_layout(&layout, options).map_err(|err| failure(&args.layout, err))?;
	let page = compile(&page, options).map_err(|err| failure(&args.page, err))?;

	if let Some(requested) = page.layout_name() {
		tracing::debug!(
			layout = %requested,
			file = %args.layout.display(),
			"composing with explicit layout file"
		);
	}
	let composed = compose_page(&layout, &page, slots.as_ref(), options);
	output::write_json(&composed, args.pretty, args.output.as_deref())
}

fn failure(path: &std::path::Path, err: CompileError) -> anyhow::Error {
	match err {
		CompileError::Analysis(diagnostics) => report(path, &diagnostics),
		other => other.into(),
	}
}
