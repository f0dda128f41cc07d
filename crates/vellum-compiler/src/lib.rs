//! Compiler for Vellum UI programs.
//!
//! Turns author-facing [`Program`]s and [`LayoutProgram`]s into the compiled
//! IR consumed by the execution engine.
//!
//! ## Pipeline
//!
//! ```text
//! Program ──► analyzer ──► lower ──► CompiledProgram ─┐
//!                                                      ├─► compose ──► CompiledProgram
//! LayoutProgram ──► analyzer ──► lower ──► registry ───┘
//! ```
//!
//! - [`analyzer`] rejects structurally invalid programs with an ordered list
//!   of [`Diagnostic`]s.
//! - [`lower`] maps the AST onto the IR, inlining every component call.
//! - [`compose`] wraps a page in a layout; it never fails.
//! - [`LayoutRegistry`] caches compiled layouts and resolves them by name.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vellum_compiler::{CompileOptions, compile};
//!
//! let program = vellum_ast::Program::from_json(source)?;
//! let compiled = compile(&program, &CompileOptions::default())?;
//! println!("{}", compiled.to_json()?);
//! ```

pub mod analyzer;
pub mod compose;
pub mod error;
pub mod lower;
pub mod options;
pub mod registry;

pub use analyzer::{AnalysisContext, analyze_layout, analyze_program};
pub use compose::{LAYOUT_PREFIX, compose, compose_page};
pub use error::{
	CompileError, CompileResult, Diagnostic, ErrorCode, RegistryError, RegistryResult,
};
pub use lower::{lower_layout, lower_program};
pub use options::{CompileOptions, DEFAULT_MAX_DEPTH, UnmatchedSlotPolicy};
pub use registry::LayoutRegistry;

use vellum_ast::ir::{CompiledLayoutProgram, CompiledProgram};
use vellum_ast::{LayoutProgram, Program};

/// Analyzes and lowers a page program.
pub fn compile(program: &Program, options: &CompileOptions) -> CompileResult<CompiledProgram> {
	analyze_program(program, options).map_err(CompileError::Analysis)?;
	let compiled = lower_program(program, options);
	tracing::debug!(
		state = compiled.state.len(),
		actions = compiled.actions.len(),
		components = compiled.components.len(),
		"compiled program"
	);
	Ok(compiled)
}

/// Analyzes and lowers a layout program.
pub fn compile_layout(
	layout: &LayoutProgram,
	options: &CompileOptions,
) -> CompileResult<CompiledLayoutProgram> {
	analyze_layout(layout, options).map_err(CompileError::Analysis)?;
	let compiled = lower_layout(layout, options);
	tracing::debug!(
		state = compiled.state.len(),
		actions = compiled.actions.len(),
		"compiled layout"
	);
	Ok(compiled)
}
