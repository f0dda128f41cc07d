//! Compiled intermediate representation.
//!
//! The compiled IR is what the compiler hands to the execution engine. It
//! mirrors the AST with three differences:
//!
//! - component calls are gone, every call site having been expanded in place;
//! - per-expansion component state is attached through [`CompiledNode::LocalState`];
//! - parameter references only survive inside a not-yet-composed layout.
//!
//! ## Tree walks
//!
//! ```text
//! CompiledNode::map_expressions   rebuild a tree, rewriting each expression site
//! CompiledNode::visit_expressions read every expression site in walk order
//! CompiledExpression::rewrite     rebuild an expression, replacing matched sub-trees
//! ```

mod action;
mod expression;
mod node;
mod program;

pub use action::{CompiledAction, CompiledActionStep, deserialize_action_table};
pub use expression::CompiledExpression;
pub use node::{
	CompiledEventHandler, CompiledInitial, CompiledNode, CompiledPropValue, CompiledStateField,
};
pub use program::{CompiledLayoutProgram, CompiledProgram, CompiledRoute};
