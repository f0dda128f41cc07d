//! # Vellum
//!
//! A compiler for declarative UI programs.
//!
//! Programs are JSON documents describing state, actions, reusable
//! components and a view tree. Vellum validates them, inlines every component
//! call, and composes pages into shared layouts, producing a self-contained
//! compiled program for the execution engine.
//!
//! ## Crates
//!
//! - [`ast`] - Program, layout and component definitions plus the compiled IR
//! - [`compiler`] - Analyzer, lowerers, layout composer and layout registry
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use vellum::prelude::*;
//!
//! let registry = LayoutRegistry::new(CompileOptions::default());
//! registry.register("main", &LayoutProgram::from_json(layout_json)?)?;
//!
//! let page = compile(&Program::from_json(page_json)?, registry.options())?;
//! let composed = registry.compose_page(&page)?;
//! println!("{}", composed.to_json_pretty()?);
//! ```

pub use vellum_ast as ast;
pub use vellum_compiler as compiler;

pub use vellum_ast::ir::{CompiledLayoutProgram, CompiledProgram};
pub use vellum_ast::{ComponentDef, LayoutProgram, Program, ViewNode};
pub use vellum_compiler::{
	CompileError, CompileOptions, Diagnostic, ErrorCode, LayoutRegistry, RegistryError,
	UnmatchedSlotPolicy, compile, compile_layout, compose, compose_page,
};

/// Commonly used types and entry points.
pub mod prelude {
	pub use vellum_ast::ir::{CompiledLayoutProgram, CompiledNode, CompiledProgram};
	pub use vellum_ast::{ComponentDef, Expression, LayoutProgram, Program, ViewNode};
	pub use vellum_compiler::{
		CompileError, CompileOptions, CompileResult, Diagnostic, ErrorCode, LayoutRegistry,
		RegistryError, RegistryResult, UnmatchedSlotPolicy, compile, compile_layout, compose_page,
	};
}
