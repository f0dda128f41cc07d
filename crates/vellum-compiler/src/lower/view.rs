//! View lowering and component inlining.

use indexmap::IndexMap;
use tracing::warn;
use vellum_ast::ir::{CompiledEventHandler, CompiledNode, CompiledPropValue};
use vellum_ast::{ComponentDef, Expression, PropValue, ViewNode};

use super::action::lower_actions;
use super::expression::{lower_expression, lower_opt};
use super::frame::{Env, SubstitutionFrame};
use super::state::lower_state;
use crate::options::CompileOptions;

/// Everything the view lowerer needs at one point of the walk.
#[derive(Debug, Clone, Copy)]
pub struct LowerContext<'a> {
	/// Definitions available to `component` nodes.
	pub components: &'a IndexMap<String, ComponentDef>,
	pub options: &'a CompileOptions,
	pub env: Env<'a>,
	/// Node nesting within the view currently being lowered.
	pub depth: usize,
	/// Component expansions enclosing the current view.
	pub expansions: usize,
}

impl<'a> LowerContext<'a> {
	/// A context at the root of a program, with no active frame.
	pub fn new(
		components: &'a IndexMap<String, ComponentDef>,
		options: &'a CompileOptions,
	) -> Self {
		Self {
			components,
			options,
			env: Env::root(),
			depth: 0,
			expansions: 0,
		}
	}

	/// The same context one level deeper.
	pub fn descend(self) -> Self {
		Self {
			depth: self.depth + 1,
			..self
		}
	}

	/// A context for lowering a component's own view under `frame`.
	///
	/// Node depth restarts at zero: each view is bounded on its own, the way
	/// the analyzer measures it. Expansion chains are bounded separately.
	pub fn enter<'b>(&self, frame: &'b SubstitutionFrame) -> LowerContext<'b>
	where
		'a: 'b,
	{
		LowerContext {
			components: self.components,
			options: self.options,
			env: Env::with_frame(frame),
			depth: 0,
			expansions: self.expansions + 1,
		}
	}
}

/// Lowers a view node.
///
/// Never fails. Unknown components and nesting past
/// [`CompileOptions::max_depth`] degrade to an empty placeholder element.
pub fn lower_node(node: &ViewNode, ctx: LowerContext<'_>) -> CompiledNode {
	if ctx.depth > ctx.options.max_depth {
		warn!(
			depth = ctx.depth,
			max_depth = ctx.options.max_depth,
			kind = node.kind(),
			"view nesting exceeds max depth, emitting placeholder"
		);
		return CompiledNode::empty_element();
	}

	let env = ctx.env;
	let inner = ctx.descend();
	let expr = |expr: &Expression| lower_expression(expr, env);
	let child = |node: &ViewNode| Box::new(lower_node(node, inner));

	match node {
		ViewNode::Element {
			tag,
			ref_name,
			props,
			children,
		} => CompiledNode::Element {
			tag: tag.clone(),
			ref_name: ref_name.clone(),
			props: props
				.iter()
				.map(|(name, value)| (name.clone(), lower_prop(value, env)))
				.collect(),
			children: lower_children(children, inner),
		},
		ViewNode::Text { value } => CompiledNode::Text { value: expr(value) },
		ViewNode::If {
			condition,
			then,
			otherwise,
		} => CompiledNode::If {
			condition: expr(condition),
			then: child(then),
			otherwise: otherwise.as_deref().map(child),
		},
		ViewNode::Each {
			items,
			binding,
			index,
			key,
			body,
		} => CompiledNode::Each {
			items: expr(items),
			binding: binding.clone(),
			index: index.clone(),
			key: lower_opt(key, env),
			body: child(body),
		},
		ViewNode::Component {
			name,
			props,
			children,
		} => expand_component(name, props, children, ctx),
		ViewNode::Slot { name } => lower_slot(name.as_deref(), ctx),
		ViewNode::Markdown { content } => CompiledNode::Markdown {
			content: expr(content),
		},
		ViewNode::Code { language, content } => CompiledNode::Code {
			language: expr(language),
			content: expr(content),
		},
		ViewNode::Portal { target, children } => CompiledNode::Portal {
			target: target.clone(),
			children: lower_children(children, inner),
		},
		ViewNode::Island {
			id,
			strategy,
			options,
			content,
			state,
			actions,
		} => CompiledNode::Island {
			id: id.clone(),
			strategy: *strategy,
			options: options.clone(),
			content: child(content),
			state: state
				.as_ref()
				.map(|state| lower_state(state, env))
				.unwrap_or_default(),
			actions: actions
				.as_deref()
				.map(|actions| lower_actions(actions, env))
				.unwrap_or_default(),
		},
		ViewNode::Suspense {
			id,
			fallback,
			content,
		} => CompiledNode::Suspense {
			id: id.clone(),
			fallback: child(fallback),
			content: child(content),
		},
		ViewNode::ErrorBoundary { fallback, content } => CompiledNode::ErrorBoundary {
			fallback: child(fallback),
			content: child(content),
		},
	}
}

fn lower_children(children: &[ViewNode], ctx: LowerContext<'_>) -> Vec<CompiledNode> {
	children.iter().map(|child| lower_node(child, ctx)).collect()
}

fn lower_prop(value: &PropValue, env: Env<'_>) -> CompiledPropValue {
	match value {
		PropValue::Expression(expr) => CompiledPropValue::Expression(lower_expression(expr, env)),
		PropValue::Event(handler) => CompiledPropValue::Event(CompiledEventHandler {
			event: handler.event.clone(),
			action: handler.action.clone(),
			payload: lower_opt(&handler.payload, env),
			debounce: handler.debounce,
			throttle: handler.throttle,
		}),
	}
}

/// Expands a component call in place.
///
/// Props and children are lowered under the caller's environment, then the
/// definition's view is lowered under a fresh frame binding them.
fn expand_component(
	name: &str,
	props: &IndexMap<String, Expression>,
	children: &[ViewNode],
	ctx: LowerContext<'_>,
) -> CompiledNode {
	let Some(def) = ctx.components.get(name) else {
		warn!(component = %name, "unknown component, emitting placeholder");
		return CompiledNode::empty_element();
	};
	if ctx.expansions >= ctx.options.max_depth {
		warn!(
			component = %name,
			expansions = ctx.expansions,
			max_depth = ctx.options.max_depth,
			"component expansion chain exceeds max depth, emitting placeholder"
		);
		return CompiledNode::empty_element();
	}

	let frame = SubstitutionFrame::new(
		props
			.iter()
			.map(|(param, value)| (param.clone(), lower_expression(value, ctx.env)))
			.collect(),
		lower_children(children, ctx.descend()),
	);
	let inner = ctx.enter(&frame);
	let view = lower_node(&def.view, inner);

	if def.local_state.is_none() && def.local_actions.is_empty() {
		return view;
	}
	CompiledNode::LocalState {
		state: def
			.local_state
			.as_ref()
			.map(|state| lower_state(state, inner.env))
			.unwrap_or_default(),
		actions: lower_actions(&def.local_actions, inner.env),
		child: Box::new(view),
	}
}

/// Replaces a slot with the active frame's slot content.
///
/// Outside a component expansion the slot is kept for the layout composer.
fn lower_slot(name: Option<&str>, ctx: LowerContext<'_>) -> CompiledNode {
	let Some(frame) = ctx.env.frame() else {
		return CompiledNode::Slot {
			name: name.map(str::to_string),
		};
	};
	match frame.slot_content.as_slice() {
		[] => CompiledNode::empty_text(),
		[only] => only.clone(),
		many => CompiledNode::element(ctx.options.slot_container_tag.clone(), many.to_vec()),
	}
}
