//! Programs, layouts, components and state declarations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::ActionDefinition;
use crate::expression::Expression;
use crate::view::ViewNode;

/// A page program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
	/// Program format version.
	pub version: String,
	/// Route this page is mounted at.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub route: Option<RouteDefinition>,
	/// Imported module paths, by import name.
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub imports: IndexMap<String, String>,
	/// Import values already resolved by the loader, by import name.
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub import_data: IndexMap<String, Value>,
	/// State fields, in declaration order.
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub state: IndexMap<String, StateField>,
	/// Actions, in declaration order.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub actions: Vec<ActionDefinition>,
	/// Lifecycle hooks naming actions.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lifecycle: Option<LifecycleHooks>,
	/// Component definitions available to this program's view.
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub components: IndexMap<String, ComponentDef>,
	/// Root of the view tree.
	pub view: ViewNode,
}

impl Program {
	/// Deserializes a program from JSON.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Serializes the program to JSON.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	/// Returns the `:name` parameters of the route path, if a route is declared.
	pub fn route_params(&self) -> Vec<&str> {
		self.route
			.as_ref()
			.map(RouteDefinition::param_names)
			.unwrap_or_default()
	}
}

/// Marker for the `type` field of a layout program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgramKind {
	#[default]
	Layout,
}

/// A layout program: a template with slot insertion points.
///
/// Layouts carry no route and no lifecycle hooks; those always come from the
/// page the layout is composed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutProgram {
	/// Program format version.
	pub version: String,
	/// Always [`ProgramKind::Layout`].
	#[serde(rename = "type", default)]
	pub kind: ProgramKind,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub imports: IndexMap<String, String>,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub import_data: IndexMap<String, Value>,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub state: IndexMap<String, StateField>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub actions: Vec<ActionDefinition>,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub components: IndexMap<String, ComponentDef>,
	/// Root of the layout view; must contain at least one slot.
	pub view: ViewNode,
}

impl LayoutProgram {
	/// Deserializes a layout from JSON.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

/// Route metadata for a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDefinition {
	/// Path pattern, e.g. `/posts/:slug`.
	pub path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<Expression>,
	/// Name of the layout to compose this page with.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub layout: Option<String>,
	/// Values for the layout's parameters.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub layout_params: Option<IndexMap<String, Expression>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<IndexMap<String, Expression>>,
}

impl RouteDefinition {
	/// Returns the names of the `:name` segments in the path.
	pub fn param_names(&self) -> Vec<&str> {
		self.path
			.split('/')
			.filter_map(|segment| segment.strip_prefix(':'))
			.map(|name| name.trim_end_matches('?'))
			.filter(|name| !name.is_empty())
			.collect()
	}
}

/// Lifecycle hooks, each naming an action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleHooks {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub on_mount: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub on_unmount: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub on_route_enter: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub on_route_leave: Option<String>,
}

impl LifecycleHooks {
	/// Iterates over `(hook name, action name)` pairs that are set.
	pub fn hooks(&self) -> impl Iterator<Item = (&'static str, &str)> {
		[
			("onMount", self.on_mount.as_deref()),
			("onUnmount", self.on_unmount.as_deref()),
			("onRouteEnter", self.on_route_enter.as_deref()),
			("onRouteLeave", self.on_route_leave.as_deref()),
		]
		.into_iter()
		.filter_map(|(hook, action)| action.map(|action| (hook, action)))
	}
}

/// Declared type of a state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateType {
	Number,
	String,
	List,
	Boolean,
	Object,
}

/// A state field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateField {
	#[serde(rename = "type")]
	pub kind: StateType,
	#[serde(default)]
	pub initial: StateInitial,
}

impl StateField {
	/// Creates a field with a plain initial value.
	pub fn new(kind: StateType, initial: impl Into<Value>) -> Self {
		Self {
			kind,
			initial: StateInitial::Value(initial.into()),
		}
	}
}

/// The initial value of a state field.
///
/// Component-local state may compute its initial value from the component's
/// parameters, in which case it is an expression specialized per expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateInitial {
	/// An expression (a JSON object tagged with `expr`).
	Expression(Expression),
	/// A plain JSON value.
	Value(Value),
}

impl Default for StateInitial {
	fn default() -> Self {
		Self::Value(Value::Null)
	}
}

/// Declared type of a component parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamType {
	String,
	Number,
	Boolean,
	List,
	Object,
	Json,
}

/// A component parameter declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDef {
	#[serde(rename = "type")]
	pub kind: ParamType,
	#[serde(default = "default_required")]
	pub required: bool,
}

fn default_required() -> bool {
	true
}

/// A reusable, parameterized view fragment expanded at each call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDef {
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub params: IndexMap<String, ParamDef>,
	/// State private to each expansion.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub local_state: Option<IndexMap<String, StateField>>,
	/// Actions private to each expansion.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub local_actions: Vec<ActionDefinition>,
	pub view: ViewNode,
}
