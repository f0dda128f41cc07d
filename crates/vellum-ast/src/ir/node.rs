//! Compiled view nodes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::action::{CompiledAction, deserialize_action_table};
use super::expression::CompiledExpression;
use crate::program::StateType;
use crate::view::{IslandStrategy, IslandStrategyOptions};

/// A node of the compiled view tree.
///
/// There is no component variant: each call site has been replaced by the
/// component's lowered view, wrapped in [`CompiledNode::LocalState`] when the
/// component declares private state or actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CompiledNode {
	Element {
		tag: String,
		#[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
		ref_name: Option<String>,
		#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
		props: IndexMap<String, CompiledPropValue>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		children: Vec<CompiledNode>,
	},
	Text {
		value: CompiledExpression,
	},
	If {
		condition: CompiledExpression,
		then: Box<CompiledNode>,
		#[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
		otherwise: Option<Box<CompiledNode>>,
	},
	Each {
		items: CompiledExpression,
		#[serde(rename = "as")]
		binding: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		index: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		key: Option<CompiledExpression>,
		body: Box<CompiledNode>,
	},
	/// An insertion point still waiting for layout content.
	Slot {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		name: Option<String>,
	},
	Markdown {
		content: CompiledExpression,
	},
	Code {
		language: CompiledExpression,
		content: CompiledExpression,
	},
	Portal {
		target: String,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		children: Vec<CompiledNode>,
	},
	Island {
		id: String,
		strategy: IslandStrategy,
		#[serde(
			rename = "strategyOptions",
			default,
			skip_serializing_if = "Option::is_none"
		)]
		options: Option<IslandStrategyOptions>,
		content: Box<CompiledNode>,
		#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
		state: IndexMap<String, CompiledStateField>,
		#[serde(
			default,
			deserialize_with = "deserialize_action_table",
			skip_serializing_if = "IndexMap::is_empty"
		)]
		actions: IndexMap<String, CompiledAction>,
	},
	Suspense {
		id: String,
		fallback: Box<CompiledNode>,
		content: Box<CompiledNode>,
	},
	ErrorBoundary {
		fallback: Box<CompiledNode>,
		content: Box<CompiledNode>,
	},
	/// Scope boundary for one component expansion.
	LocalState {
		#[serde(default)]
		state: IndexMap<String, CompiledStateField>,
		#[serde(
			default,
			deserialize_with = "deserialize_action_table",
			skip_serializing_if = "IndexMap::is_empty"
		)]
		actions: IndexMap<String, CompiledAction>,
		child: Box<CompiledNode>,
	},
}

impl CompiledNode {
	/// An element with the given tag and children.
	pub fn element(tag: impl Into<String>, children: Vec<CompiledNode>) -> Self {
		Self::Element {
			tag: tag.into(),
			ref_name: None,
			props: IndexMap::new(),
			children,
		}
	}

	/// The placeholder emitted when a component cannot be expanded.
	pub fn empty_element() -> Self {
		Self::element("div", Vec::new())
	}

	/// A text node rendering the empty string.
	pub fn empty_text() -> Self {
		Self::Text {
			value: CompiledExpression::literal(""),
		}
	}

	/// A text node with a literal string.
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text {
			value: CompiledExpression::literal(value.into()),
		}
	}

	/// Returns the node tag as it appears on the wire.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Element { .. } => "element",
			Self::Text { .. } => "text",
			Self::If { .. } => "if",
			Self::Each { .. } => "each",
			Self::Slot { .. } => "slot",
			Self::Markdown { .. } => "markdown",
			Self::Code { .. } => "code",
			Self::Portal { .. } => "portal",
			Self::Island { .. } => "island",
			Self::Suspense { .. } => "suspense",
			Self::ErrorBoundary { .. } => "errorBoundary",
			Self::LocalState { .. } => "localState",
		}
	}

	/// Rebuilds the tree with `f` applied to every expression site.
	///
	/// `f` receives root expressions only (a prop value, a text value, a step
	/// argument); it is responsible for descending into them itself.
	pub fn map_expressions<F>(&self, f: &F) -> Self
	where
		F: Fn(&CompiledExpression) -> CompiledExpression,
	{
		let node = |node: &CompiledNode| Box::new(node.map_expressions(f));
		let nodes = |nodes: &[CompiledNode]| -> Vec<CompiledNode> {
			nodes.iter().map(|n| n.map_expressions(f)).collect()
		};
		match self {
			Self::Element {
				tag,
				ref_name,
				props,
				children,
			} => Self::Element {
				tag: tag.clone(),
				ref_name: ref_name.clone(),
				props: props
					.iter()
					.map(|(name, value)| (name.clone(), value.map_expressions(f)))
					.collect(),
				children: nodes(children),
			},
			Self::Text { value } => Self::Text { value: f(value) },
			Self::If {
				condition,
				then,
				otherwise,
			} => Self::If {
				condition: f(condition),
				then: node(then),
				otherwise: otherwise.as_deref().map(node),
			},
			Self::Each {
				items,
				binding,
				index,
				key,
				body,
			} => Self::Each {
				items: f(items),
				binding: binding.clone(),
				index: index.clone(),
				key: key.as_ref().map(f),
				body: node(body),
			},
			Self::Slot { name } => Self::Slot { name: name.clone() },
			Self::Markdown { content } => Self::Markdown {
				content: f(content),
			},
			Self::Code { language, content } => Self::Code {
				language: f(language),
				content: f(content),
			},
			Self::Portal { target, children } => Self::Portal {
				target: target.clone(),
				children: nodes(children),
			},
			Self::Island {
				id,
				strategy,
				options,
				content,
				state,
				actions,
			} => Self::Island {
				id: id.clone(),
				strategy: *strategy,
				options: options.clone(),
				content: node(content),
				state: map_state(state, f),
				actions: map_actions(actions, f),
			},
			Self::Suspense {
				id,
				fallback,
				content,
			} => Self::Suspense {
				id: id.clone(),
				fallback: node(fallback),
				content: node(content),
			},
			Self::ErrorBoundary { fallback, content } => Self::ErrorBoundary {
				fallback: node(fallback),
				content: node(content),
			},
			Self::LocalState {
				state,
				actions,
				child,
			} => Self::LocalState {
				state: map_state(state, f),
				actions: map_actions(actions, f),
				child: node(child),
			},
		}
	}

	/// Calls `visit` on every expression site in walk order.
	pub fn visit_expressions<F>(&self, visit: &mut F)
	where
		F: FnMut(&CompiledExpression),
	{
		match self {
			Self::Element {
				props, children, ..
			} => {
				for value in props.values() {
					match value {
						CompiledPropValue::Expression(expr) => visit(expr),
						CompiledPropValue::Event(handler) => {
							if let Some(payload) = &handler.payload {
								visit(payload);
							}
						}
					}
				}
				for child in children {
					child.visit_expressions(visit);
				}
			}
			Self::Text { value } => visit(value),
			Self::If {
				condition,
				then,
				otherwise,
			} => {
				visit(condition);
				then.visit_expressions(visit);
				if let Some(otherwise) = otherwise {
					otherwise.visit_expressions(visit);
				}
			}
			Self::Each {
				items, key, body, ..
			} => {
				visit(items);
				if let Some(key) = key {
					visit(key);
				}
				body.visit_expressions(visit);
			}
			Self::Slot { .. } => {}
			Self::Markdown { content } => visit(content),
			Self::Code { language, content } => {
				visit(language);
				visit(content);
			}
			Self::Portal { children, .. } => {
				for child in children {
					child.visit_expressions(visit);
				}
			}
			Self::Island {
				content,
				state,
				actions,
				..
			}
			| Self::LocalState {
				child: content,
				state,
				actions,
			} => {
				for field in state.values() {
					if let CompiledInitial::Expression(expr) = &field.initial {
						visit(expr);
					}
				}
				for action in actions.values() {
					action.visit_expressions(visit);
				}
				content.visit_expressions(visit);
			}
			Self::Suspense {
				fallback, content, ..
			}
			| Self::ErrorBoundary { fallback, content } => {
				fallback.visit_expressions(visit);
				content.visit_expressions(visit);
			}
		}
	}

	/// Returns `true` if any expression in the tree still references a
	/// parameter.
	pub fn has_unresolved_params(&self) -> bool {
		let mut found = false;
		self.visit_expressions(&mut |expr: &CompiledExpression| found |= expr.contains_param());
		found
	}
}

fn map_state<F>(
	state: &IndexMap<String, CompiledStateField>,
	f: &F,
) -> IndexMap<String, CompiledStateField>
where
	F: Fn(&CompiledExpression) -> CompiledExpression,
{
	state
		.iter()
		.map(|(name, field)| (name.clone(), field.map_expressions(f)))
		.collect()
}

fn map_actions<F>(
	actions: &IndexMap<String, CompiledAction>,
	f: &F,
) -> IndexMap<String, CompiledAction>
where
	F: Fn(&CompiledExpression) -> CompiledExpression,
{
	actions
		.iter()
		.map(|(name, action)| (name.clone(), action.map_expressions(f)))
		.collect()
}

/// A compiled element prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompiledPropValue {
	Event(CompiledEventHandler),
	Expression(CompiledExpression),
}

impl CompiledPropValue {
	fn map_expressions<F>(&self, f: &F) -> Self
	where
		F: Fn(&CompiledExpression) -> CompiledExpression,
	{
		match self {
			Self::Expression(expr) => Self::Expression(f(expr)),
			Self::Event(handler) => Self::Event(CompiledEventHandler {
				payload: handler.payload.as_ref().map(f),
				..handler.clone()
			}),
		}
	}
}

/// A compiled event binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledEventHandler {
	pub event: String,
	pub action: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payload: Option<CompiledExpression>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub debounce: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub throttle: Option<u64>,
}

/// A compiled state field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledStateField {
	#[serde(rename = "type")]
	pub kind: StateType,
	#[serde(default)]
	pub initial: CompiledInitial,
}

impl CompiledStateField {
	/// Rebuilds the field with `f` applied to an expression initial.
	pub fn map_expressions<F>(&self, f: &F) -> Self
	where
		F: Fn(&CompiledExpression) -> CompiledExpression,
	{
		Self {
			kind: self.kind,
			initial: match &self.initial {
				CompiledInitial::Expression(expr) => CompiledInitial::Expression(f(expr)),
				CompiledInitial::Value(value) => CompiledInitial::Value(value.clone()),
			},
		}
	}
}

/// The initial value of a compiled state field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompiledInitial {
	Expression(CompiledExpression),
	Value(Value),
}

impl Default for CompiledInitial {
	fn default() -> Self {
		Self::Value(Value::Null)
	}
}
