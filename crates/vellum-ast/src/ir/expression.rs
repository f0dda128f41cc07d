//! Compiled expressions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expression::{BinaryOperator, RouteSource};

/// A lowered expression.
///
/// Same wire shape as [`crate::Expression`]. [`CompiledExpression::Param`]
/// only appears in a compiled layout, where it names a layout parameter
/// resolved at composition time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "camelCase")]
pub enum CompiledExpression {
	#[serde(rename = "lit")]
	Literal {
		#[serde(default)]
		value: Value,
	},
	State {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	Var {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	#[serde(rename = "bin")]
	Binary {
		op: BinaryOperator,
		left: Box<CompiledExpression>,
		right: Box<CompiledExpression>,
	},
	Not {
		operand: Box<CompiledExpression>,
	},
	#[serde(rename = "cond")]
	Conditional {
		#[serde(rename = "if")]
		condition: Box<CompiledExpression>,
		then: Box<CompiledExpression>,
		#[serde(rename = "else")]
		otherwise: Box<CompiledExpression>,
	},
	Get {
		base: Box<CompiledExpression>,
		path: String,
	},
	Route {
		name: String,
		#[serde(default)]
		source: RouteSource,
	},
	Import {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	Data {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	Ref {
		name: String,
	},
	Index {
		base: Box<CompiledExpression>,
		key: Box<CompiledExpression>,
	},
	/// A layout-level parameter awaiting composition.
	Param {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	Call {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		target: Option<Box<CompiledExpression>>,
		method: String,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		args: Vec<CompiledExpression>,
	},
	Lambda {
		param: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		index: Option<String>,
		body: Box<CompiledExpression>,
	},
	Array {
		elements: Vec<CompiledExpression>,
	},
	Concat {
		items: Vec<CompiledExpression>,
	},
}

impl CompiledExpression {
	/// The `null` literal substituted for unbound parameters.
	pub fn null() -> Self {
		Self::Literal { value: Value::Null }
	}

	/// Creates a literal expression.
	pub fn literal(value: impl Into<Value>) -> Self {
		Self::Literal {
			value: value.into(),
		}
	}

	/// Returns `true` for the `null` literal.
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Literal { value: Value::Null })
	}

	/// Appends a property path to this expression.
	///
	/// References that already carry a dotted path (`var`, `state`, `import`,
	/// `data`) get `extra` appended to it; any other expression is wrapped in
	/// a `get`.
	pub fn with_path(self, extra: &str) -> Self {
		fn join(path: Option<String>, extra: &str) -> Option<String> {
			Some(match path {
				Some(path) if !path.is_empty() => format!("{path}.{extra}"),
				_ => extra.to_string(),
			})
		}

		match self {
			Self::Var { name, path } => Self::Var {
				name,
				path: join(path, extra),
			},
			Self::State { name, path } => Self::State {
				name,
				path: join(path, extra),
			},
			Self::Import { name, path } => Self::Import {
				name,
				path: join(path, extra),
			},
			Self::Data { name, path } => Self::Data {
				name,
				path: join(path, extra),
			},
			other => Self::Get {
				base: Box::new(other),
				path: extra.to_string(),
			},
		}
	}

	/// Rebuilds the expression, replacing every sub-tree for which `replace`
	/// returns `Some`.
	///
	/// Replacements are not descended into. Sub-trees left alone are rebuilt
	/// with their children rewritten.
	pub fn rewrite<F>(&self, replace: &F) -> Self
	where
		F: Fn(&CompiledExpression) -> Option<CompiledExpression>,
	{
		if let Some(replacement) = replace(self) {
			return replacement;
		}
		let boxed = |expr: &CompiledExpression| Box::new(expr.rewrite(replace));
		match self {
			Self::Binary { op, left, right } => Self::Binary {
				op: *op,
				left: boxed(left),
				right: boxed(right),
			},
			Self::Not { operand } => Self::Not {
				operand: boxed(operand),
			},
			Self::Conditional {
				condition,
				then,
				otherwise,
			} => Self::Conditional {
				condition: boxed(condition),
				then: boxed(then),
				otherwise: boxed(otherwise),
			},
			Self::Get { base, path } => Self::Get {
				base: boxed(base),
				path: path.clone(),
			},
			Self::Index { base, key } => Self::Index {
				base: boxed(base),
				key: boxed(key),
			},
			Self::Call {
				target,
				method,
				args,
			} => Self::Call {
				target: target.as_deref().map(boxed),
				method: method.clone(),
				args: args.iter().map(|arg| arg.rewrite(replace)).collect(),
			},
			Self::Lambda { param, index, body } => Self::Lambda {
				param: param.clone(),
				index: index.clone(),
				body: boxed(body),
			},
			Self::Array { elements } => Self::Array {
				elements: elements.iter().map(|e| e.rewrite(replace)).collect(),
			},
			Self::Concat { items } => Self::Concat {
				items: items.iter().map(|e| e.rewrite(replace)).collect(),
			},
			leaf => leaf.clone(),
		}
	}

	/// Returns `true` if `pred` holds for this expression or any sub-tree.
	pub fn any<F>(&self, pred: &F) -> bool
	where
		F: Fn(&CompiledExpression) -> bool,
	{
		if pred(self) {
			return true;
		}
		match self {
			Self::Binary { left, right, .. } => left.any(pred) || right.any(pred),
			Self::Not { operand } => operand.any(pred),
			Self::Conditional {
				condition,
				then,
				otherwise,
			} => condition.any(pred) || then.any(pred) || otherwise.any(pred),
			Self::Get { base, .. } => base.any(pred),
			Self::Index { base, key } => base.any(pred) || key.any(pred),
			Self::Call { target, args, .. } => {
				target.as_deref().is_some_and(|t| t.any(pred)) || args.iter().any(|a| a.any(pred))
			}
			Self::Lambda { body, .. } => body.any(pred),
			Self::Array { elements } => elements.iter().any(|e| e.any(pred)),
			Self::Concat { items } => items.iter().any(|e| e.any(pred)),
			_ => false,
		}
	}

	/// Substitutes layout parameters.
	///
	/// A bound parameter is replaced by its value (with any extra path merged
	/// through [`CompiledExpression::with_path`]); an unbound one becomes
	/// `null`.
	pub fn resolve_params(&self, params: &IndexMap<String, CompiledExpression>) -> Self {
		self.rewrite(&|expr| match expr {
			Self::Param { name, path } => Some(match params.get(name) {
				Some(bound) => match path.as_deref() {
					Some(path) if !path.is_empty() => bound.clone().with_path(path),
					_ => bound.clone(),
				},
				None => Self::null(),
			}),
			_ => None,
		})
	}

	/// Returns `true` if a parameter reference remains anywhere in the tree.
	pub fn contains_param(&self) -> bool {
		self.any(&|expr| matches!(expr, Self::Param { .. }))
	}
}
