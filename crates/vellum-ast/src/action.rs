//! Actions and their step sequences.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::expression::Expression;

/// A named action: an ordered list of steps run when the action fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
	/// Name referenced by event handlers, lifecycle hooks and subscriptions.
	pub name: String,
	/// Steps executed in order.
	#[serde(default)]
	pub steps: Vec<ActionStep>,
}

/// A single step of an action.
///
/// Steps that perform I/O carry `onSuccess` / `onError` step lists which are
/// themselves full step sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActionStep {
	/// Replaces a state field's value.
	Set { target: String, value: Expression },
	/// Applies an in-place operation to a state field.
	Update {
		target: String,
		operation: UpdateOperation,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<Expression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		index: Option<Expression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		delete_count: Option<Expression>,
	},
	/// Issues an HTTP request.
	Fetch {
		url: Expression,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		method: Option<HttpMethod>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		body: Option<Expression>,
		#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
		headers: IndexMap<String, Expression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<ActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<ActionStep>,
	},
	/// Reads or writes web storage.
	Storage {
		operation: StorageOperation,
		key: Expression,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<Expression>,
		#[serde(default)]
		storage: StorageKind,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<ActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<ActionStep>,
	},
	/// Reads or writes the clipboard.
	Clipboard {
		operation: ClipboardOperation,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<Expression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<ActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<ActionStep>,
	},
	/// Navigates to another URL.
	Navigate {
		url: Expression,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		target: Option<NavigateTarget>,
		#[serde(default, skip_serializing_if = "std::ops::Not::not")]
		replace: bool,
	},
	/// Dynamically imports a module.
	Import {
		module: String,
		result: String,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<ActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<ActionStep>,
	},
	/// Calls a function value.
	Call {
		target: Expression,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		args: Vec<Expression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<ActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<ActionStep>,
	},
	/// Subscribes an action to events emitted by a target.
	Subscribe {
		target: Expression,
		event: String,
		action: String,
	},
	/// Disposes a subscription or resource.
	Dispose { target: Expression },
	/// Manipulates DOM elements matched by a selector.
	Dom {
		operation: DomOperation,
		selector: Expression,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<Expression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		attribute: Option<String>,
	},
	/// Branches on a condition.
	If {
		condition: Expression,
		#[serde(default)]
		then: Vec<ActionStep>,
		#[serde(rename = "else", default, skip_serializing_if = "Vec::is_empty")]
		otherwise: Vec<ActionStep>,
	},
	/// Runs steps after a delay.
	Delay {
		ms: Expression,
		#[serde(default)]
		then: Vec<ActionStep>,
	},
	/// Fires an action repeatedly.
	Interval {
		ms: Expression,
		action: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
	},
	/// Cancels a timer started by `delay` or `interval`.
	ClearTimer { target: Expression },
	/// Moves focus to (or away from) a referenced element.
	Focus {
		target: Expression,
		#[serde(default)]
		operation: FocusOperation,
	},
	/// Any step tag this version does not recognize.
	#[serde(other)]
	Unknown,
}

impl ActionStep {
	/// Returns the step tag as it appears on the wire.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Set { .. } => "set",
			Self::Update { .. } => "update",
			Self::Fetch { .. } => "fetch",
			Self::Storage { .. } => "storage",
			Self::Clipboard { .. } => "clipboard",
			Self::Navigate { .. } => "navigate",
			Self::Import { .. } => "import",
			Self::Call { .. } => "call",
			Self::Subscribe { .. } => "subscribe",
			Self::Dispose { .. } => "dispose",
			Self::Dom { .. } => "dom",
			Self::If { .. } => "if",
			Self::Delay { .. } => "delay",
			Self::Interval { .. } => "interval",
			Self::ClearTimer { .. } => "clearTimer",
			Self::Focus { .. } => "focus",
			Self::Unknown => "unknown",
		}
	}
}

/// In-place state operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateOperation {
	Increment,
	Decrement,
	Push,
	Pop,
	Remove,
	Toggle,
	Merge,
	ReplaceAt,
	InsertAt,
	Splice,
}

/// HTTP methods understood by `fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	Get,
	Post,
	Put,
	Patch,
	Delete,
}

/// Storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageOperation {
	Get,
	Set,
	Remove,
}

/// Which web storage area a `storage` step touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageKind {
	#[default]
	Local,
	Session,
}

/// Clipboard operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipboardOperation {
	Write,
	Read,
}

/// Browsing context for `navigate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigateTarget {
	#[serde(rename = "_self")]
	SelfTarget,
	#[serde(rename = "_blank")]
	Blank,
}

/// DOM operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DomOperation {
	AddClass,
	RemoveClass,
	ToggleClass,
	SetAttribute,
	RemoveAttribute,
}

/// Focus operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusOperation {
	#[default]
	Focus,
	Blur,
	Select,
}
