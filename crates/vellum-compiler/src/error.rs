//! Compiler error types.
//!
//! Analysis failures are reported as data: an ordered list of [`Diagnostic`]s
//! wrapped in [`CompileError::Analysis`]. Lowering and composition never fail;
//! only layout resolution in the registry does.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	LayoutMissingSlot,
	DuplicateSlotName,
	DuplicateDefaultSlot,
	SlotInLoop,
	UndefinedState,
	UndefinedAction,
	ComponentNotFound,
	SlotOutsideComponent,
	UndefinedVar,
	UndefinedRouteParam,
	UndefinedImport,
	UndefinedParam,
	ComponentCycle,
	DuplicateRef,
	MaxDepthExceeded,
}

impl ErrorCode {
	/// Returns the code as it appears in serialized diagnostics.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::LayoutMissingSlot => "LAYOUT_MISSING_SLOT",
			Self::DuplicateSlotName => "DUPLICATE_SLOT_NAME",
			Self::DuplicateDefaultSlot => "DUPLICATE_DEFAULT_SLOT",
			Self::SlotInLoop => "SLOT_IN_LOOP",
			Self::UndefinedState => "UNDEFINED_STATE",
			Self::UndefinedAction => "UNDEFINED_ACTION",
			Self::ComponentNotFound => "COMPONENT_NOT_FOUND",
			Self::SlotOutsideComponent => "SLOT_OUTSIDE_COMPONENT",
			Self::UndefinedVar => "UNDEFINED_VAR",
			Self::UndefinedRouteParam => "UNDEFINED_ROUTE_PARAM",
			Self::UndefinedImport => "UNDEFINED_IMPORT",
			Self::UndefinedParam => "UNDEFINED_PARAM",
			Self::ComponentCycle => "COMPONENT_CYCLE",
			Self::DuplicateRef => "DUPLICATE_REF",
			Self::MaxDepthExceeded => "MAX_DEPTH_EXCEEDED",
		}
	}

	/// Returns `true` for the layout slot codes.
	pub fn is_slot_error(self) -> bool {
		matches!(
			self,
			Self::LayoutMissingSlot
				| Self::DuplicateSlotName
				| Self::DuplicateDefaultSlot
				| Self::SlotInLoop
		)
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single analysis finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: ErrorCode,
	pub message: String,
	/// JSON-pointer-like location, e.g. `/view/children/0/props/onClick`.
	pub path: String,
}

impl Diagnostic {
	pub fn new(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			code,
			message: message.into(),
			path: path.into(),
		}
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} at {}: {}", self.code, self.path, self.message)
	}
}

/// Compile pipeline errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
	/// The analyzer rejected the program.
	#[error("analysis failed with {} error(s)", .0.len())]
	Analysis(Vec<Diagnostic>),
}

impl CompileError {
	/// Returns the diagnostics carried by the error.
	pub fn diagnostics(&self) -> &[Diagnostic] {
		match self {
			Self::Analysis(diagnostics) => diagnostics,
		}
	}
}

/// Layout registry errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
	/// A page asked for a layout nobody registered.
	#[error("layout not found: {0}")]
	LayoutNotFound(String),

	/// A layout failed to compile on registration.
	#[error("layout '{name}' failed to compile: {source}")]
	Compile {
		/// Layout name.
		name: String,
		/// Underlying error.
		#[source]
		source: CompileError,
	},
}
