//! Unlowered expressions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An expression in the author-facing program.
///
/// The variant set is closed. Every variant except [`Expression::Param`] has a
/// one-to-one counterpart in [`crate::ir::CompiledExpression`]; a param-ref is
/// either substituted during component expansion or kept as a layout-level
/// parameter until composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "camelCase")]
pub enum Expression {
	/// A JSON literal.
	#[serde(rename = "lit")]
	Literal {
		#[serde(default)]
		value: Value,
	},
	/// A reference to a state field, optionally followed by a dotted path.
	State {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	/// A reference to a loop or lambda binding.
	Var {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	/// A binary operation.
	#[serde(rename = "bin")]
	Binary {
		op: BinaryOperator,
		left: Box<Expression>,
		right: Box<Expression>,
	},
	/// Logical negation.
	Not { operand: Box<Expression> },
	/// A ternary conditional.
	#[serde(rename = "cond")]
	Conditional {
		#[serde(rename = "if")]
		condition: Box<Expression>,
		then: Box<Expression>,
		#[serde(rename = "else")]
		otherwise: Box<Expression>,
	},
	/// Property access on an arbitrary base expression.
	Get { base: Box<Expression>, path: String },
	/// A route parameter, query value or the current path.
	Route {
		name: String,
		#[serde(default)]
		source: RouteSource,
	},
	/// A value from an imported module.
	Import {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	/// A value from a data source loaded at build time.
	Data {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	/// A reference to a DOM element declared with `ref`.
	Ref { name: String },
	/// Dynamic index access (`base[key]`).
	Index {
		base: Box<Expression>,
		key: Box<Expression>,
	},
	/// A component (or layout) parameter.
	Param {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	/// A method call, either on a target value or a global helper.
	Call {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		target: Option<Box<Expression>>,
		method: String,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		args: Vec<Expression>,
	},
	/// A single-expression lambda (used by array helpers such as `filter`).
	Lambda {
		param: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		index: Option<String>,
		body: Box<Expression>,
	},
	/// An array literal built from expressions.
	Array { elements: Vec<Expression> },
	/// String concatenation.
	Concat { items: Vec<Expression> },
}

impl Expression {
	/// Creates a literal expression.
	pub fn literal(value: impl Into<Value>) -> Self {
		Self::Literal {
			value: value.into(),
		}
	}

	/// Creates a state reference without a path.
	pub fn state(name: impl Into<String>) -> Self {
		Self::State {
			name: name.into(),
			path: None,
		}
	}

	/// Creates a loop/lambda variable reference without a path.
	pub fn var(name: impl Into<String>) -> Self {
		Self::Var {
			name: name.into(),
			path: None,
		}
	}

	/// Creates a parameter reference without a path.
	pub fn param(name: impl Into<String>) -> Self {
		Self::Param {
			name: name.into(),
			path: None,
		}
	}

	/// Returns the variant tag as it appears on the wire.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Literal { .. } => "lit",
			Self::State { .. } => "state",
			Self::Var { .. } => "var",
			Self::Binary { .. } => "bin",
			Self::Not { .. } => "not",
			Self::Conditional { .. } => "cond",
			Self::Get { .. } => "get",
			Self::Route { .. } => "route",
			Self::Import { .. } => "import",
			Self::Data { .. } => "data",
			Self::Ref { .. } => "ref",
			Self::Index { .. } => "index",
			Self::Param { .. } => "param",
			Self::Call { .. } => "call",
			Self::Lambda { .. } => "lambda",
			Self::Array { .. } => "array",
			Self::Concat { .. } => "concat",
		}
	}
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
	#[serde(rename = "+")]
	Add,
	#[serde(rename = "-")]
	Sub,
	#[serde(rename = "*")]
	Mul,
	#[serde(rename = "/")]
	Div,
	#[serde(rename = "%")]
	Rem,
	#[serde(rename = "==")]
	Eq,
	#[serde(rename = "!=")]
	Ne,
	#[serde(rename = "<")]
	Lt,
	#[serde(rename = "<=")]
	Le,
	#[serde(rename = ">")]
	Gt,
	#[serde(rename = ">=")]
	Ge,
	#[serde(rename = "&&")]
	And,
	#[serde(rename = "||")]
	Or,
}

/// Where a route expression reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteSource {
	/// A `:name` segment of the route path.
	#[default]
	Param,
	/// A query-string value.
	Query,
	/// The full current path.
	Path,
}
