//! Compiled programs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::action::{CompiledAction, deserialize_action_table};
use super::expression::CompiledExpression;
use super::node::{CompiledNode, CompiledStateField};
use crate::program::{ComponentDef, LifecycleHooks, ProgramKind};

/// A compiled page, ready for the execution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledProgram {
	pub version: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub route: Option<CompiledRoute>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lifecycle: Option<LifecycleHooks>,
	#[serde(default)]
	pub state: IndexMap<String, CompiledStateField>,
	/// Actions keyed by name.
	#[serde(default, deserialize_with = "deserialize_action_table")]
	pub actions: IndexMap<String, CompiledAction>,
	pub view: CompiledNode,
	/// Component definitions kept for compose-time expansion.
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub components: IndexMap<String, ComponentDef>,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub imports: IndexMap<String, String>,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub import_data: IndexMap<String, Value>,
}

impl CompiledProgram {
	/// Deserializes a compiled program from JSON.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Serializes the compiled program to JSON.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	/// Serializes the compiled program to indented JSON.
	pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(self)
	}

	/// Returns the name of the layout the page's route asks for.
	pub fn layout_name(&self) -> Option<&str> {
		self.route.as_ref().and_then(|route| route.layout.as_deref())
	}
}

/// A compiled layout, awaiting composition with a page.
///
/// Its view may still contain [`CompiledNode::Slot`] nodes and
/// [`CompiledExpression::Param`] references to layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledLayoutProgram {
	pub version: String,
	#[serde(rename = "type", default)]
	pub kind: ProgramKind,
	#[serde(default)]
	pub state: IndexMap<String, CompiledStateField>,
	#[serde(default, deserialize_with = "deserialize_action_table")]
	pub actions: IndexMap<String, CompiledAction>,
	pub view: CompiledNode,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub components: IndexMap<String, ComponentDef>,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub imports: IndexMap<String, String>,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub import_data: IndexMap<String, Value>,
}

impl CompiledLayoutProgram {
	/// Deserializes a compiled layout from JSON.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Serializes the compiled layout to JSON.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}
}

/// Compiled route metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledRoute {
	pub path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<CompiledExpression>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub layout: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub layout_params: Option<IndexMap<String, CompiledExpression>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<IndexMap<String, CompiledExpression>>,
}
