//! `vellum.toml` loading.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use vellum_compiler::CompileOptions;

/// File looked up in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "vellum.toml";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
	#[error("cannot read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid configuration in {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

/// Contents of `vellum.toml`. Every table and key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
	pub compiler: CompileOptions,
}

impl CliConfig {
	pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		toml::from_str(&content).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Loads `explicit` if given, else `./vellum.toml` if it exists, else
	/// defaults.
	pub(crate) fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
		if let Some(path) = explicit {
			return Self::load(path);
		}
		let default = Path::new(DEFAULT_CONFIG_FILE);
		if default.is_file() {
			Self::load(default)
		} else {
			Ok(Self::default())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;
	use vellum_compiler::{DEFAULT_MAX_DEPTH, UnmatchedSlotPolicy};

	fn write_config(content: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	#[rstest]
	fn test_load_compiler_table() {
		// Arrange
		let file = write_config(
			r#"
[compiler]
max-depth = 16
unmatched-slots = "preserve"
slot-container-tag = "section"
"#,
		);

		// Act
		let config = CliConfig::load(file.path()).unwrap();

		// Assert
		assert_eq!(config.compiler.max_depth, 16);
		assert_eq!(config.compiler.unmatched_slots, UnmatchedSlotPolicy::Preserve);
		assert_eq!(config.compiler.slot_container_tag, "section");
		assert_eq!(config.compiler.mdx_slot_name, "mdx-content");
	}

	#[rstest]
	#[case("")]
	#[case("[compiler]\n")]
	fn test_missing_keys_use_defaults(#[case] content: &str) {
		let file = write_config(content);

		let config = CliConfig::load(file.path()).unwrap();

		assert_eq!(config.compiler.max_depth, DEFAULT_MAX_DEPTH);
		assert_eq!(config.compiler, CompileOptions::default());
	}

	#[rstest]
	fn test_invalid_policy_is_a_parse_error() {
		let file = write_config("[compiler]\nunmatched-slots = \"drop\"\n");

		let err = CliConfig::load(file.path()).unwrap_err();

		assert!(matches!(err, ConfigError::Parse { .. }));
	}

	#[rstest]
	fn test_explicit_missing_file_is_a_read_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("absent.toml");

		let err = CliConfig::discover(Some(&path)).unwrap_err();

		assert!(matches!(err, ConfigError::Read { .. }));
		assert!(err.to_string().contains("absent.toml"));
	}
}
