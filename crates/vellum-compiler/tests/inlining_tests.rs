//! Component inlining through the full compile pipeline.

mod fixtures;

use fixtures::{
	compiled, element, init_test_logging, lit, page_with_view, param, program, slot, text,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use vellum_ast::Program;
use vellum_ast::ir::CompiledNode;
use vellum_compiler::{CompileOptions, lower_program};

#[fixture]
fn bounds_page() -> Value {
	json!({
		"version": "1.0",
		"components": {
			"Chart": {
				"params": { "data": { "type": "list", "required": false } },
				"localState": {
					"_bounds": {
						"type": "object",
						"initial": { "expr": "call", "method": "bounds", "args": [param("data")] }
					}
				},
				"view": element("svg", vec![])
			}
		}
	})
}

fn with_view(mut page: Value, view: Value) -> Program {
	page["view"] = view;
	program(page)
}

fn compiled_view(page: &Program) -> Value {
	init_test_logging();
	serde_json::to_value(&compiled(page).view).unwrap()
}

// ============================================================================
// Slots and params
// ============================================================================

#[rstest]
fn test_slot_only_component_yields_its_child() {
	// Arrange
	let page = program(json!({
		"version": "1.0",
		"components": { "Wrap": { "view": slot(None) } },
		"view": { "kind": "component", "name": "Wrap", "children": [text("inner")] }
	}));

	// Act
	let compiled = compiled(&page);

	// Assert
	assert_eq!(compiled.view, CompiledNode::text("inner"));
}

#[rstest]
fn test_missing_prop_resolves_to_null() {
	let page = program(json!({
		"version": "1.0",
		"components": {
			"Label": {
				"params": { "title": { "type": "string", "required": false } },
				"view": { "kind": "text", "value": param("title") }
			}
		},
		"view": { "kind": "component", "name": "Label" }
	}));

	assert_eq!(
		compiled_view(&page),
		json!({ "kind": "text", "value": { "expr": "lit", "value": null } })
	);
}

/// Tests that a param in a component's local state initial is substituted.
#[rstest]
#[case(json!({ "data": lit(json!([1, 2, 3])) }), json!([1, 2, 3]))]
#[case(json!({}), Value::Null)]
fn test_local_state_initial_params(
	bounds_page: Value,
	#[case] props: Value,
	#[case] expected: Value,
) {
	// Arrange
	let page = with_view(
		bounds_page,
		json!({ "kind": "component", "name": "Chart", "props": props }),
	);

	// Act
	let view = compiled_view(&page);

	// Assert
	assert_eq!(view["kind"], "localState");
	assert_eq!(
		view["state"]["_bounds"]["initial"]["args"][0],
		json!({ "expr": "lit", "value": expected })
	);
	assert_eq!(view["child"]["tag"], "svg");
}

#[rstest]
fn test_param_path_merges_into_bound_reference() {
	let page = program(json!({
		"version": "1.0",
		"state": { "user": { "type": "object", "initial": { "name": "Ada" } } },
		"components": {
			"Name": {
				"params": { "user": { "type": "object" } },
				"view": { "kind": "text", "value": { "expr": "param", "name": "user", "path": "name" } }
			}
		},
		"view": {
			"kind": "component",
			"name": "Name",
			"props": { "user": { "expr": "state", "name": "user" } }
		}
	}));

	assert_eq!(
		compiled_view(&page)["value"],
		json!({ "expr": "state", "name": "user", "path": "name" })
	);
}

#[rstest]
fn test_nested_component_sees_only_its_own_frame() {
	// Arrange
	let page = program(json!({
		"version": "1.0",
		"components": {
			"Outer": {
				"params": { "label": { "type": "string" } },
				"view": element("section", vec![
					json!({ "kind": "component", "name": "Inner", "props": { "text": param("label") } })
				])
			},
			"Inner": {
				"params": {
					"text": { "type": "string" },
					"label": { "type": "string", "required": false }
				},
				"view": element("p", vec![
					json!({ "kind": "text", "value": param("text") }),
					json!({ "kind": "text", "value": param("label") }),
				])
			}
		},
		"view": { "kind": "component", "name": "Outer", "props": { "label": lit("Hello") } }
	}));

	// Act
	let compiled = compiled(&page);

	// Assert
	let null_text = CompiledNode::Text {
		value: vellum_ast::ir::CompiledExpression::null(),
	};
	assert_eq!(
		compiled.view,
		CompiledNode::element(
			"section",
			vec![CompiledNode::element("p", vec![CompiledNode::text("Hello"), null_text])]
		)
	);
}

#[rstest]
fn test_children_are_lowered_in_caller_scope() {
	let page = program(json!({
		"version": "1.0",
		"components": {
			"Card": {
				"params": { "title": { "type": "string" } },
				"view": element("article", vec![
					json!({ "kind": "text", "value": param("title") }),
					slot(None),
				])
			},
			"Badge": {
				"params": { "title": { "type": "string" } },
				"view": { "kind": "text", "value": param("title") }
			}
		},
		"view": {
			"kind": "component",
			"name": "Card",
			"props": { "title": lit("Card") },
			"children": [{ "kind": "component", "name": "Badge", "props": { "title": lit("Badge") } }]
		}
	}));

	assert_eq!(
		compiled(&page).view,
		CompiledNode::element(
			"article",
			vec![CompiledNode::text("Card"), CompiledNode::text("Badge")]
		)
	);
}

#[rstest]
#[case(0, CompiledNode::empty_text())]
#[case(1, CompiledNode::text("c0"))]
#[case(3, CompiledNode::element("div", vec![
	CompiledNode::text("c0"),
	CompiledNode::text("c1"),
	CompiledNode::text("c2"),
]))]
fn test_slot_receives_children(#[case] count: usize, #[case] expected: CompiledNode) {
	// Arrange
	let children: Vec<Value> = (0..count).map(|i| text(&format!("c{i}"))).collect();
	let page = program(json!({
		"version": "1.0",
		"components": { "Box": { "view": slot(None) } },
		"view": { "kind": "component", "name": "Box", "children": children }
	}));

	// Act / Assert
	assert_eq!(compiled(&page).view, expected);
}

// ============================================================================
// Degraded lowering
// ============================================================================

#[rstest]
fn test_unknown_component_lowers_to_placeholder() {
	init_test_logging();
	let ghost = json!({ "kind": "component", "name": "Ghost" });
	let page = page_with_view(element("div", vec![ghost]));

	let lowered = lower_program(&page, &CompileOptions::default());

	assert_eq!(
		lowered.view,
		CompiledNode::element("div", vec![CompiledNode::empty_element()])
	);
}

#[rstest]
fn test_self_recursive_component_stops_at_max_depth() {
	init_test_logging();
	let page = program(json!({
		"version": "1.0",
		"components": {
			"Loop": { "view": element("div", vec![json!({ "kind": "component", "name": "Loop" })]) }
		},
		"view": { "kind": "component", "name": "Loop" }
	}));

	let lowered = lower_program(&page, &CompileOptions::new().max_depth(6));

	let mut depth = 0;
	let mut node = &lowered.view;
	while let CompiledNode::Element { children, .. } = node {
		match children.first() {
			Some(child) => {
				depth += 1;
				node = child;
			}
			None => break,
		}
	}
	assert!(depth <= 6, "expansion went {depth} levels deep");
}

#[rstest]
fn test_local_actions_are_carried_by_local_state_node() {
	let page = program(json!({
		"version": "1.0",
		"components": {
			"Counter": {
				"params": { "start": { "type": "number" } },
				"localState": { "n": { "type": "number", "initial": param("start") } },
				"localActions": [{
					"name": "inc",
					"steps": [{ "do": "update", "target": "n", "operation": "increment" }]
				}],
				"view": {
					"kind": "element",
					"tag": "button",
					"props": { "onClick": { "event": "click", "action": "inc" } }
				}
			}
		},
		"view": { "kind": "component", "name": "Counter", "props": { "start": lit(5) } }
	}));

	let view = compiled_view(&page);

	assert_eq!(view["state"]["n"]["initial"], json!({ "expr": "lit", "value": 5 }));
	assert_eq!(view["actions"]["inc"]["name"], "inc");
	assert_eq!(view["child"]["props"]["onClick"]["action"], "inc");
}

fn nested_divs(levels: usize, leaf: Value) -> Value {
	(0..levels).fold(leaf, |inner, _| element("div", vec![inner]))
}

/// Tests that a component view gets its own depth budget instead of
/// inheriting the depth of its call site.
#[rstest]
fn test_deep_component_under_deep_page_keeps_its_leaf() {
	// Arrange
	init_test_logging();
	let page = program(json!({
		"version": "1.0",
		"components": {
			"Deep": { "view": nested_divs(30, text("LEAF")) }
		},
		"view": nested_divs(40, json!({ "kind": "component", "name": "Deep" }))
	}));

	// Act
	let compiled = compiled(&page);

	// Assert
	let mut node = &compiled.view;
	let mut depth = 0;
	while let CompiledNode::Element { children, .. } = node {
		assert_eq!(children.len(), 1);
		depth += 1;
		node = &children[0];
	}
	assert_eq!(depth, 70);
	assert_eq!(*node, CompiledNode::text("LEAF"));
}
