//! Property tests for param substitution and composition.

mod fixtures;

use fixtures::{compiled, compiled_layout, element, layout_with_view, program, slot, text};
use proptest::prelude::*;
use serde_json::json;
use vellum_ast::ir::{CompiledExpression, CompiledNode};
use vellum_compiler::{CompileOptions, compose};

fn param_name() -> impl Strategy<Value = String> {
	"[a-z][a-zA-Z0-9]{0,8}"
}

proptest! {
	/// A param the caller does not supply always lowers to a null literal.
	#[test]
	fn prop_unbound_param_is_null(name in param_name(), supplied in param_name()) {
		prop_assume!(name != supplied);

		let page = program(json!({
			"version": "1.0",
			"components": {
				"Echo": {
					"params": {
						name.clone(): { "type": "string", "required": false },
						supplied.clone(): { "type": "string", "required": false }
					},
					"view": { "kind": "text", "value": { "expr": "param", "name": name } }
				}
			},
			"view": {
				"kind": "component",
				"name": "Echo",
				"props": { supplied: { "expr": "lit", "value": "set" } }
			}
		}));

		let compiled = compiled(&page);

		prop_assert_eq!(compiled.view, CompiledNode::Text { value: CompiledExpression::null() });
	}

	/// Composing one layout with many pages never leaks content between them.
	#[test]
	fn prop_compose_is_independent(bodies in prop::collection::vec("[a-z ]{1,12}", 1..6)) {
		let layout = compiled_layout(
			&layout_with_view(element("main", vec![slot(None)])),
			&CompileOptions::default(),
		);
		let snapshot = layout.clone();
		let options = CompileOptions::default();

		for body in &bodies {
			let page = compiled(&program(json!({ "version": "1.0", "view": text(body) })));
			let composed = compose(&layout, &page, None, None, &options);
			prop_assert_eq!(
				composed.view,
				CompiledNode::element("main", vec![CompiledNode::text(body.as_str())])
			);
		}
		prop_assert_eq!(layout, snapshot);
	}
}
