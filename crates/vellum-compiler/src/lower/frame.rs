//! Substitution frames for component expansion.

use indexmap::IndexMap;
use vellum_ast::ir::{CompiledExpression, CompiledNode};

/// Values bound for one component expansion.
///
/// Built at the call site from the caller's lowered props and children, then
/// passed by reference while the component's own view is lowered. A frame is
/// never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionFrame {
	/// Lowered prop values by param name.
	pub params: IndexMap<String, CompiledExpression>,
	/// Lowered call-site children, spliced into the component's slots.
	pub slot_content: Vec<CompiledNode>,
}

impl SubstitutionFrame {
	pub fn new(
		params: IndexMap<String, CompiledExpression>,
		slot_content: Vec<CompiledNode>,
	) -> Self {
		Self {
			params,
			slot_content,
		}
	}

	/// Resolves a param reference against this frame.
	///
	/// An extra `path` is merged with [`CompiledExpression::with_path`]. A
	/// param the caller did not supply resolves to `null`.
	pub fn resolve(&self, name: &str, path: Option<&str>) -> CompiledExpression {
		match (self.params.get(name), path) {
			(Some(bound), Some(path)) if !path.is_empty() => bound.clone().with_path(path),
			(Some(bound), _) => bound.clone(),
			(None, _) => CompiledExpression::null(),
		}
	}
}

/// The lowering environment: the active frame, if any.
///
/// Outside any component expansion there is no frame, and param references
/// pass through unresolved as layout parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Env<'a> {
	frame: Option<&'a SubstitutionFrame>,
}

impl<'a> Env<'a> {
	/// The environment at the top of a program.
	pub fn root() -> Self {
		Self { frame: None }
	}

	/// An environment with `frame` active.
	pub fn with_frame(frame: &'a SubstitutionFrame) -> Self {
		Self { frame: Some(frame) }
	}

	pub fn frame(&self) -> Option<&'a SubstitutionFrame> {
		self.frame
	}
}
