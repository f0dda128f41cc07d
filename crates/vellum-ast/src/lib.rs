//! AST and compiled IR definitions for Vellum UI programs.
//!
//! This crate holds the inert data model shared by the compiler and by the
//! execution engine that consumes compiled output. It carries no logic beyond
//! construction helpers and tree walks over the compiled IR.
//!
//! ## Program Structure
//!
//! ```text
//! {
//!   "version": "1.0",
//!   "state": { "count": { "type": "number", "initial": 0 } },
//!   "actions": [{ "name": "increment", "steps": [{ "do": "update", ... }] }],
//!   "components": { "Card": { "params": { ... }, "view": { ... } } },
//!   "view": { "kind": "element", "tag": "div", "children": [ ... ] }
//! }
//! ```
//!
//! ## Main Types
//!
//! - [`Program`] / [`LayoutProgram`] - Author-facing page and layout programs
//! - [`ComponentDef`] - A reusable, parameterized view fragment
//! - [`ViewNode`] - A node in the unlowered view tree
//! - [`Expression`] - An unlowered expression
//! - [`ActionStep`] - A single step of an action
//! - [`ir`] - The fully lowered representation ([`ir::CompiledProgram`], ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vellum_ast::Program;
//!
//! let program = Program::from_json(r#"{
//!     "version": "1.0",
//!     "view": { "kind": "text", "value": { "expr": "lit", "value": "Hello" } }
//! }"#)?;
//! ```

mod action;
mod expression;
pub mod ir;
mod program;
mod view;

pub use action::{
	ActionDefinition, ActionStep, ClipboardOperation, DomOperation, FocusOperation, HttpMethod,
	NavigateTarget, StorageKind, StorageOperation, UpdateOperation,
};
pub use expression::{BinaryOperator, Expression, RouteSource};
pub use program::{
	ComponentDef, LayoutProgram, LifecycleHooks, ParamDef, ParamType, Program, ProgramKind,
	RouteDefinition, StateField, StateInitial, StateType,
};
pub use view::{EventHandler, IslandStrategy, IslandStrategyOptions, PropValue, ViewNode};
