//! Expression lowering.

use vellum_ast::Expression;
use vellum_ast::ir::CompiledExpression;

use super::frame::Env;

/// Lowers an expression under `env`.
///
/// Every variant maps to its compiled counterpart with operands lowered
/// recursively. Param references are resolved against the active frame, or
/// kept as-is when no frame is active.
pub fn lower_expression(expr: &Expression, env: Env<'_>) -> CompiledExpression {
	let lower = |expr: &Expression| Box::new(lower_expression(expr, env));
	match expr {
		Expression::Literal { value } => CompiledExpression::Literal {
			value: value.clone(),
		},
		Expression::State { name, path } => CompiledExpression::State {
			name: name.clone(),
			path: path.clone(),
		},
		Expression::Var { name, path } => CompiledExpression::Var {
			name: name.clone(),
			path: path.clone(),
		},
		Expression::Binary { op, left, right } => CompiledExpression::Binary {
			op: *op,
			left: lower(left),
			right: lower(right),
		},
		Expression::Not { operand } => CompiledExpression::Not {
			operand: lower(operand),
		},
		Expression::Conditional {
			condition,
			then,
			otherwise,
		} => CompiledExpression::Conditional {
			condition: lower(condition),
			then: lower(then),
			otherwise: lower(otherwise),
		},
		Expression::Get { base, path } => CompiledExpression::Get {
			base: lower(base),
			path: path.clone(),
		},
		Expression::Route { name, source } => CompiledExpression::Route {
			name: name.clone(),
			source: *source,
		},
		Expression::Import { name, path } => CompiledExpression::Import {
			name: name.clone(),
			path: path.clone(),
		},
		Expression::Data { name, path } => CompiledExpression::Data {
			name: name.clone(),
			path: path.clone(),
		},
		Expression::Ref { name } => CompiledExpression::Ref { name: name.clone() },
		Expression::Index { base, key } => CompiledExpression::Index {
			base: lower(base),
			key: lower(key),
		},
		Expression::Param { name, path } => match env.frame() {
			Some(frame) => frame.resolve(name, path.as_deref()),
			None => CompiledExpression::Param {
				name: name.clone(),
				path: path.clone(),
			},
		},
		Expression::Call {
			target,
			method,
			args,
		} => CompiledExpression::Call {
			target: target.as_deref().map(lower),
			method: method.clone(),
			args: lower_all(args, env),
		},
		Expression::Lambda { param, index, body } => CompiledExpression::Lambda {
			param: param.clone(),
			index: index.clone(),
			body: lower(body),
		},
		Expression::Array { elements } => CompiledExpression::Array {
			elements: lower_all(elements, env),
		},
		Expression::Concat { items } => CompiledExpression::Concat {
			items: lower_all(items, env),
		},
	}
}

/// Lowers an optional expression.
pub(crate) fn lower_opt(expr: &Option<Expression>, env: Env<'_>) -> Option<CompiledExpression> {
	expr.as_ref().map(|expr| lower_expression(expr, env))
}

fn lower_all(exprs: &[Expression], env: Env<'_>) -> Vec<CompiledExpression> {
	exprs.iter().map(|expr| lower_expression(expr, env)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lower::SubstitutionFrame;
	use indexmap::IndexMap;
	use serde_json::json;

	fn expr(value: serde_json::Value) -> Expression {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_param_without_frame_passes_through() {
		let lowered = lower_expression(&Expression::param("title"), Env::root());
		assert_eq!(
			lowered,
			CompiledExpression::Param {
				name: "title".to_string(),
				path: None,
			}
		);
	}

	#[test]
	fn test_param_inside_call_args_is_substituted() {
		let frame = SubstitutionFrame::new(
			IndexMap::from([("data".to_string(), CompiledExpression::literal(json!([1, 2, 3])))]),
			Vec::new(),
		);
		let source = expr(json!({
			"expr": "call",
			"method": "computeBounds",
			"args": [{ "expr": "param", "name": "data" }]
		}));

		let bound = lower_expression(&source, Env::with_frame(&frame));
		let unbound = lower_expression(&source, Env::with_frame(&SubstitutionFrame::default()));

		let CompiledExpression::Call { args, .. } = bound else {
			panic!("expected call");
		};
		assert_eq!(args[0], CompiledExpression::literal(json!([1, 2, 3])));
		let CompiledExpression::Call { args, .. } = unbound else {
			panic!("expected call");
		};
		assert!(args[0].is_null());
	}

	#[test]
	fn test_bound_non_reference_with_path_is_wrapped_in_get() {
		let frame = SubstitutionFrame::new(
			IndexMap::from([(
				"user".to_string(),
				lower_expression(
					&expr(json!({ "expr": "call", "method": "currentUser" })),
					Env::root(),
				),
			)]),
			Vec::new(),
		);

		let lowered = lower_expression(
			&expr(json!({ "expr": "param", "name": "user", "path": "email" })),
			Env::with_frame(&frame),
		);

		assert_eq!(
			serde_json::to_value(&lowered).unwrap(),
			json!({
				"expr": "get",
				"base": { "expr": "call", "method": "currentUser" },
				"path": "email"
			})
		);
	}
}
