//! Compiled actions.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::expression::CompiledExpression;
use crate::action::{
	ClipboardOperation, DomOperation, FocusOperation, HttpMethod, NavigateTarget, StorageKind,
	StorageOperation, UpdateOperation,
};

/// A lowered action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledAction {
	pub name: String,
	#[serde(default)]
	pub steps: Vec<CompiledActionStep>,
}

impl CompiledAction {
	/// Rebuilds the action with `f` applied to every expression of every step.
	pub fn map_expressions<F>(&self, f: &F) -> Self
	where
		F: Fn(&CompiledExpression) -> CompiledExpression,
	{
		Self {
			name: self.name.clone(),
			steps: map_steps(&self.steps, f),
		}
	}

	/// Calls `visit` on every expression of every step, in step order.
	pub fn visit_expressions<F>(&self, visit: &mut F)
	where
		F: FnMut(&CompiledExpression),
	{
		for step in &self.steps {
			step.visit_expressions(visit);
		}
	}
}

/// Deserializes an action table from either a list of actions or a
/// name-keyed map.
pub fn deserialize_action_table<'de, D>(
	deserializer: D,
) -> Result<IndexMap<String, CompiledAction>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Repr {
		Map(IndexMap<String, CompiledAction>),
		List(Vec<CompiledAction>),
	}

	Ok(match Repr::deserialize(deserializer)? {
		Repr::Map(map) => map,
		Repr::List(list) => list
			.into_iter()
			.map(|action| (action.name.clone(), action))
			.collect(),
	})
}

/// A lowered action step.
///
/// Mirrors [`crate::ActionStep`]. Unrecognized steps are lowered to
/// [`CompiledActionStep::Noop`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CompiledActionStep {
	Set {
		target: String,
		value: CompiledExpression,
	},
	Update {
		target: String,
		operation: UpdateOperation,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<CompiledExpression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		index: Option<CompiledExpression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		delete_count: Option<CompiledExpression>,
	},
	Fetch {
		url: CompiledExpression,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		method: Option<HttpMethod>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		body: Option<CompiledExpression>,
		#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
		headers: IndexMap<String, CompiledExpression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<CompiledActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<CompiledActionStep>,
	},
	Storage {
		operation: StorageOperation,
		key: CompiledExpression,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<CompiledExpression>,
		#[serde(default)]
		storage: StorageKind,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<CompiledActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<CompiledActionStep>,
	},
	Clipboard {
		operation: ClipboardOperation,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<CompiledExpression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<CompiledActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<CompiledActionStep>,
	},
	Navigate {
		url: CompiledExpression,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		target: Option<NavigateTarget>,
		#[serde(default, skip_serializing_if = "std::ops::Not::not")]
		replace: bool,
	},
	Import {
		module: String,
		result: String,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<CompiledActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<CompiledActionStep>,
	},
	Call {
		target: CompiledExpression,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		args: Vec<CompiledExpression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_success: Vec<CompiledActionStep>,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		on_error: Vec<CompiledActionStep>,
	},
	Subscribe {
		target: CompiledExpression,
		event: String,
		action: String,
	},
	Dispose {
		target: CompiledExpression,
	},
	Dom {
		operation: DomOperation,
		selector: CompiledExpression,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<CompiledExpression>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		attribute: Option<String>,
	},
	If {
		condition: CompiledExpression,
		#[serde(default)]
		then: Vec<CompiledActionStep>,
		#[serde(rename = "else", default, skip_serializing_if = "Vec::is_empty")]
		otherwise: Vec<CompiledActionStep>,
	},
	Delay {
		ms: CompiledExpression,
		#[serde(default)]
		then: Vec<CompiledActionStep>,
	},
	Interval {
		ms: CompiledExpression,
		action: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<String>,
	},
	ClearTimer {
		target: CompiledExpression,
	},
	Focus {
		target: CompiledExpression,
		#[serde(default)]
		operation: FocusOperation,
	},
	/// A step that does nothing when run.
	Noop,
}

fn map_steps<F>(steps: &[CompiledActionStep], f: &F) -> Vec<CompiledActionStep>
where
	F: Fn(&CompiledExpression) -> CompiledExpression,
{
	steps.iter().map(|step| step.map_expressions(f)).collect()
}

impl CompiledActionStep {
	/// Rebuilds the step with `f` applied to each embedded expression,
	/// recursing into nested step lists.
	pub fn map_expressions<F>(&self, f: &F) -> Self
	where
		F: Fn(&CompiledExpression) -> CompiledExpression,
	{
		let opt = |expr: &Option<CompiledExpression>| expr.as_ref().map(f);
		match self {
			Self::Set { target, value } => Self::Set {
				target: target.clone(),
				value: f(value),
			},
			Self::Update {
				target,
				operation,
				value,
				index,
				delete_count,
			} => Self::Update {
				target: target.clone(),
				operation: *operation,
				value: opt(value),
				index: opt(index),
				delete_count: opt(delete_count),
			},
			Self::Fetch {
				url,
				method,
				body,
				headers,
				result,
				on_success,
				on_error,
			} => Self::Fetch {
				url: f(url),
				method: *method,
				body: opt(body),
				headers: headers
					.iter()
					.map(|(name, value)| (name.clone(), f(value)))
					.collect(),
				result: result.clone(),
				on_success: map_steps(on_success, f),
				on_error: map_steps(on_error, f),
			},
			Self::Storage {
				operation,
				key,
				value,
				storage,
				result,
				on_success,
				on_error,
			} => Self::Storage {
				operation: *operation,
				key: f(key),
				value: opt(value),
				storage: *storage,
				result: result.clone(),
				on_success: map_steps(on_success, f),
				on_error: map_steps(on_error, f),
			},
			Self::Clipboard {
				operation,
				value,
				result,
				on_success,
				on_error,
			} => Self::Clipboard {
				operation: *operation,
				value: opt(value),
				result: result.clone(),
				on_success: map_steps(on_success, f),
				on_error: map_steps(on_error, f),
			},
			Self::Navigate {
				url,
				target,
				replace,
			} => Self::Navigate {
				url: f(url),
				target: *target,
				replace: *replace,
			},
			Self::Import {
				module,
				result,
				on_success,
				on_error,
			} => Self::Import {
				module: module.clone(),
				result: result.clone(),
				on_success: map_steps(on_success, f),
				on_error: map_steps(on_error, f),
			},
			Self::Call {
				target,
				args,
				result,
				on_success,
				on_error,
			} => Self::Call {
				target: f(target),
				args: args.iter().map(f).collect(),
				result: result.clone(),
				on_success: map_steps(on_success, f),
				on_error: map_steps(on_error, f),
			},
			Self::Subscribe {
				target,
				event,
				action,
			} => Self::Subscribe {
				target: f(target),
				event: event.clone(),
				action: action.clone(),
			},
			Self::Dispose { target } => Self::Dispose { target: f(target) },
			Self::Dom {
				operation,
				selector,
				value,
				attribute,
			} => Self::Dom {
				operation: *operation,
				selector: f(selector),
				value: opt(value),
				attribute: attribute.clone(),
			},
			Self::If {
				condition,
				then,
				otherwise,
			} => Self::If {
				condition: f(condition),
				then: map_steps(then, f),
				otherwise: map_steps(otherwise, f),
			},
			Self::Delay { ms, then } => Self::Delay {
				ms: f(ms),
				then: map_steps(then, f),
			},
			Self::Interval { ms, action, result } => Self::Interval {
				ms: f(ms),
				action: action.clone(),
				result: result.clone(),
			},
			Self::ClearTimer { target } => Self::ClearTimer { target: f(target) },
			Self::Focus { target, operation } => Self::Focus {
				target: f(target),
				operation: *operation,
			},
			Self::Noop => Self::Noop,
		}
	}

	/// Calls `visit` on each embedded expression, recursing into nested
	/// step lists.
	pub fn visit_expressions<F>(&self, visit: &mut F)
	where
		F: FnMut(&CompiledExpression),
	{
		let mut nested: Vec<&[CompiledActionStep]> = Vec::new();
		match self {
			Self::Set { value, .. } => visit(value),
			Self::Update {
				value,
				index,
				delete_count,
				..
			} => {
				for expr in [value, index, delete_count].into_iter().flatten() {
					visit(expr);
				}
			}
			Self::Fetch {
				url,
				body,
				headers,
				on_success,
				on_error,
				..
			} => {
				visit(url);
				if let Some(body) = body {
					visit(body);
				}
				headers.values().for_each(&mut *visit);
				nested.extend([on_success.as_slice(), on_error.as_slice()]);
			}
			Self::Storage {
				key,
				value,
				on_success,
				on_error,
				..
			} => {
				visit(key);
				if let Some(value) = value {
					visit(value);
				}
				nested.extend([on_success.as_slice(), on_error.as_slice()]);
			}
			Self::Clipboard {
				value,
				on_success,
				on_error,
				..
			} => {
				if let Some(value) = value {
					visit(value);
				}
				nested.extend([on_success.as_slice(), on_error.as_slice()]);
			}
			Self::Navigate { url, .. } => visit(url),
			Self::Import {
				on_success,
				on_error,
				..
			} => nested.extend([on_success.as_slice(), on_error.as_slice()]),
			Self::Call {
				target,
				args,
				on_success,
				on_error,
				..
			} => {
				visit(target);
				args.iter().for_each(&mut *visit);
				nested.extend([on_success.as_slice(), on_error.as_slice()]);
			}
			Self::Subscribe { target, .. }
			| Self::Dispose { target }
			| Self::ClearTimer { target }
			| Self::Focus { target, .. } => visit(target),
			Self::Dom {
				selector, value, ..
			} => {
				visit(selector);
				if let Some(value) = value {
					visit(value);
				}
			}
			Self::If {
				condition,
				then,
				otherwise,
			} => {
				visit(condition);
				nested.extend([then.as_slice(), otherwise.as_slice()]);
			}
			Self::Delay { ms, then } => {
				visit(ms);
				nested.push(then);
			}
			Self::Interval { ms, .. } => visit(ms),
			Self::Noop => {}
		}
		for step in nested.into_iter().flatten() {
			step.visit_expressions(visit);
		}
	}
}
