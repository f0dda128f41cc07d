//! Terminal output helpers.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use vellum_compiler::Diagnostic;

pub(crate) fn success(msg: &str) {
	println!("{} {}", "✓".green().bold(), msg);
}

pub(crate) fn error(msg: &str) {
	eprintln!("{} {}", "✗".red().bold(), msg);
}

pub(crate) fn info(msg: &str) {
	eprintln!("{} {}", "ℹ".blue().bold(), msg);
}

/// Prints one diagnostic as `CODE path: message`.
pub(crate) fn diagnostic(diagnostic: &Diagnostic) {
	eprintln!(
		"{} {} {}: {}",
		"✗".red().bold(),
		diagnostic.code.as_str().red(),
		diagnostic.path.dimmed(),
		diagnostic.message
	);
}

pub(crate) fn render_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
	if pretty {
		serde_json::to_string_pretty(value)
	} else {
		serde_json::to_string(value)
	}
}

/// Writes `value` as JSON to `output`, or to stdout when `output` is `None`.
pub(crate) fn write_json<T: Serialize>(
	value: &T,
	pretty: bool,
	output: Option<&Path>,
) -> anyhow::Result<()> {
	let json = render_json(value, pretty)?;
	match output {
		Some(path) => {
			std::fs::write(path, json + "\n")
				.map_err(|e| anyhow::anyhow!("Cannot write {}: {}", path.display(), e))?;
			success(&format!("Wrote {}", path.display()));
		}
		None => println!("{json}"),
	}
	Ok(())
}
