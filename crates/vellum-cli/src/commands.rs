//! Subcommand implementations.

pub(crate) mod check;
pub(crate) mod compile;
pub(crate) mod compose;

pub(crate) use check::CheckArgs;
pub(crate) use compile::CompileArgs;
pub(crate) use compose::ComposeArgs;

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use vellum_compiler::Diagnostic;

use crate::output;

/// Maximum accepted input file size (16 MB).
const MAX_INPUT_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Reads and decodes a JSON input file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
	let metadata =
		std::fs::metadata(path).with_context(|| format!("Cannot access {}", path.display()))?;
	if metadata.len() > MAX_INPUT_FILE_SIZE {
		anyhow::bail!(
			"{} exceeds maximum size ({} bytes, limit {} bytes)",
			path.display(),
			metadata.len(),
			MAX_INPUT_FILE_SIZE
		);
	}
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("Cannot read {}", path.display()))?;
	serde_json::from_str(&content).with_context(|| format!("Invalid program in {}", path.display()))
}

/// Prints diagnostics and turns them into a command failure.
pub(crate) fn report(path: &Path, diagnostics: &[Diagnostic]) -> anyhow::Error {
	for diagnostic in diagnostics {
		output::diagnostic(diagnostic);
	}
	anyhow::anyhow!("{}: {} error(s)", path.display(), diagnostics.len())
}

#[cfg(test)]
pub(crate) mod test_support {
	use std::path::PathBuf;

	use serde_json::Value;

	/// Writes `value` as `name` inside `dir`.
	pub(crate) fn write(dir: &tempfile::TempDir, name: &str, value: &Value) -> PathBuf {
		let path = dir.path().join(name);
		std::fs::write(&path, value.to_string()).unwrap();
		path
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use vellum_ast::Program;

	#[test]
	fn test_read_json_reports_path_on_invalid_input() {
		let dir = tempfile::tempdir().unwrap();
		let path = test_support::write(&dir, "bad.json", &json!({ "version": "1.0" }));

		let err = read_json::<Program>(&path).unwrap_err();

		assert!(format!("{err:#}").contains("bad.json"));
	}
}
