//! Unlowered view nodes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::action::ActionDefinition;
use crate::expression::Expression;
use crate::program::StateField;

/// A node in the author-facing view tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ViewNode {
	/// An HTML element.
	Element {
		tag: String,
		#[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
		ref_name: Option<String>,
		#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
		props: IndexMap<String, PropValue>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		children: Vec<ViewNode>,
	},
	/// A text node.
	Text { value: Expression },
	/// Conditional rendering.
	If {
		condition: Expression,
		then: Box<ViewNode>,
		#[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
		otherwise: Option<Box<ViewNode>>,
	},
	/// List rendering. `binding` names the current item inside `body`.
	Each {
		items: Expression,
		#[serde(rename = "as")]
		binding: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		index: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		key: Option<Expression>,
		body: Box<ViewNode>,
	},
	/// A call to a [`crate::ComponentDef`] declared by the enclosing program.
	Component {
		name: String,
		#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
		props: IndexMap<String, Expression>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		children: Vec<ViewNode>,
	},
	/// An insertion point filled by component children or layout content.
	Slot {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		name: Option<String>,
	},
	/// Markdown rendered downstream.
	Markdown { content: Expression },
	/// A highlighted code block rendered downstream.
	Code {
		language: Expression,
		content: Expression,
	},
	/// Children rendered into another part of the document.
	Portal {
		target: String,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		children: Vec<ViewNode>,
	},
	/// An independently hydrated region with its own optional state.
	Island {
		id: String,
		strategy: IslandStrategy,
		#[serde(
			rename = "strategyOptions",
			default,
			skip_serializing_if = "Option::is_none"
		)]
		options: Option<IslandStrategyOptions>,
		content: Box<ViewNode>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		state: Option<IndexMap<String, StateField>>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		actions: Option<Vec<ActionDefinition>>,
	},
	/// Content shown once async data resolves, with a fallback meanwhile.
	Suspense {
		id: String,
		fallback: Box<ViewNode>,
		content: Box<ViewNode>,
	},
	/// Content guarded by a fallback rendered on error.
	ErrorBoundary {
		fallback: Box<ViewNode>,
		content: Box<ViewNode>,
	},
}

impl ViewNode {
	/// Creates an element with children and no props.
	pub fn element(tag: impl Into<String>, children: Vec<ViewNode>) -> Self {
		Self::Element {
			tag: tag.into(),
			ref_name: None,
			props: IndexMap::new(),
			children,
		}
	}

	/// Creates a text node from a literal string.
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text {
			value: Expression::literal(value.into()),
		}
	}

	/// Creates a slot, unnamed when `name` is `None`.
	pub fn slot(name: Option<&str>) -> Self {
		Self::Slot {
			name: name.map(str::to_string),
		}
	}

	/// Returns the node tag as it appears on the wire.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Element { .. } => "element",
			Self::Text { .. } => "text",
			Self::If { .. } => "if",
			Self::Each { .. } => "each",
			Self::Component { .. } => "component",
			Self::Slot { .. } => "slot",
			Self::Markdown { .. } => "markdown",
			Self::Code { .. } => "code",
			Self::Portal { .. } => "portal",
			Self::Island { .. } => "island",
			Self::Suspense { .. } => "suspense",
			Self::ErrorBoundary { .. } => "errorBoundary",
		}
	}
}

/// The value of an element prop: either an expression or an event handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
	/// An event binding, e.g. `onClick`.
	Event(EventHandler),
	/// An attribute or property value.
	Expression(Expression),
}

/// Binds a DOM event to a named action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHandler {
	/// DOM event name (`click`, `input`, ...).
	pub event: String,
	/// Action to run.
	pub action: String,
	/// Optional payload evaluated when the event fires.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payload: Option<Expression>,
	/// Debounce delay in milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub debounce: Option<u64>,
	/// Throttle interval in milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub throttle: Option<u64>,
}

/// When an island hydrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IslandStrategy {
	Load,
	Idle,
	Visible,
	Interaction,
	Media,
	Never,
}

/// Tuning for the island hydration strategy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IslandStrategyOptions {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub threshold: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub root_margin: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub media: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_prop_value_distinguishes_events_from_expressions() {
		let node: ViewNode = serde_json::from_value(json!({
			"kind": "element",
			"tag": "button",
			"props": {
				"class": { "expr": "lit", "value": "primary" },
				"onClick": { "event": "click", "action": "increment" }
			}
		}))
		.unwrap();

		let ViewNode::Element { props, .. } = node else {
			panic!("expected element");
		};
		assert!(matches!(props["class"], PropValue::Expression(_)));
		assert!(matches!(
			&props["onClick"],
			PropValue::Event(EventHandler { action, .. }) if action == "increment"
		));
	}

	#[test]
	fn test_each_binding_uses_as_field() {
		let node: ViewNode = serde_json::from_value(json!({
			"kind": "each",
			"items": { "expr": "state", "name": "todos" },
			"as": "todo",
			"index": "i",
			"body": { "kind": "text", "value": { "expr": "var", "name": "todo", "path": "title" } }
		}))
		.unwrap();

		let ViewNode::Each { binding, index, .. } = node else {
			panic!("expected each");
		};
		assert_eq!(binding, "todo");
		assert_eq!(index.as_deref(), Some("i"));
	}

	#[test]
	fn test_error_boundary_kind_is_camel_case() {
		let node = ViewNode::ErrorBoundary {
			fallback: Box::new(ViewNode::text("oops")),
			content: Box::new(ViewNode::slot(None)),
		};
		let value = serde_json::to_value(&node).unwrap();
		assert_eq!(value["kind"], "errorBoundary");
		assert_eq!(node.kind(), "errorBoundary");
	}
}
