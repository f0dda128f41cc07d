//! Layout composition over compiled programs.

mod fixtures;

use fixtures::{
	compiled, compiled_layout, element, init_test_logging, layout, layout_with_view, program, slot,
	text, view,
};
use indexmap::IndexMap;
use rstest::{fixture, rstest};
use serde_json::json;
use vellum_ast::ViewNode;
use vellum_ast::ir::{CompiledInitial, CompiledLayoutProgram, CompiledNode};
use vellum_compiler::{CompileOptions, UnmatchedSlotPolicy, compose, compose_page};

#[fixture]
fn header_footer_layout() -> CompiledLayoutProgram {
	init_test_logging();
	compiled_layout(
		&layout_with_view(element(
			"div",
			vec![slot(Some("header")), slot(None), slot(Some("footer"))],
		)),
		&CompileOptions::default(),
	)
}

fn header_slots() -> IndexMap<String, ViewNode> {
	IndexMap::from([(
		"header".to_string(),
		view(element("h1", vec![text("Top")])),
	)])
}

// ============================================================================
// Slot filling
// ============================================================================

/// Tests the unmatched-footer outcome under each policy.
#[rstest]
#[case(UnmatchedSlotPolicy::Empty, CompiledNode::empty_text())]
#[case(UnmatchedSlotPolicy::Preserve, CompiledNode::Slot { name: Some("footer".to_string()) })]
fn test_header_footer_layout(
	header_footer_layout: CompiledLayoutProgram,
	#[case] policy: UnmatchedSlotPolicy,
	#[case] footer: CompiledNode,
) {
	// Arrange
	let page = compiled(&layout_page(element("p", vec![text("hi")])));
	let options = CompileOptions::new().unmatched_slots(policy);

	// Act
	let composed = compose(&header_footer_layout, &page, None, Some(&header_slots()), &options);

	// Assert
	assert_eq!(
		composed.view,
		CompiledNode::element(
			"div",
			vec![
				CompiledNode::element("h1", vec![CompiledNode::text("Top")]),
				CompiledNode::element("p", vec![CompiledNode::text("hi")]),
				footer,
			]
		)
	);
}

#[rstest]
fn test_page_named_slots_are_filled(header_footer_layout: CompiledLayoutProgram) {
	// Arrange
	let page = compiled(&layout_page(element("article", vec![slot(Some("header"))])));

	// Act
	let composed = compose(
		&header_footer_layout,
		&page,
		None,
		Some(&header_slots()),
		&CompileOptions::default(),
	);

	// Assert
	let top = CompiledNode::element("h1", vec![CompiledNode::text("Top")]);
	let CompiledNode::Element { children, .. } = &composed.view else {
		panic!("expected element root");
	};
	assert_eq!(children[1], CompiledNode::element("article", vec![top]));
}

fn layout_page(view: serde_json::Value) -> vellum_ast::Program {
	program(json!({ "version": "1.0", "view": view }))
}

#[rstest]
fn test_named_slot_content_expands_components() {
	// Arrange
	let layout = compiled_layout(
		&layout(json!({
			"version": "1.0",
			"type": "layout",
			"components": {
				"Brand": { "view": element("strong", vec![text("Vellum")]) }
			},
			"view": element("div", vec![slot(Some("header")), slot(None)])
		})),
		&CompileOptions::default(),
	);
	let page = compiled(&layout_page(text("body")));
	let named = IndexMap::from([(
		"header".to_string(),
		view(json!({ "kind": "component", "name": "Brand" })),
	)]);

	// Act
	let composed = compose(&layout, &page, None, Some(&named), &CompileOptions::default());

	// Assert
	assert_eq!(
		composed.view,
		CompiledNode::element(
			"div",
			vec![
				CompiledNode::element("strong", vec![CompiledNode::text("Vellum")]),
				CompiledNode::text("body"),
			]
		)
	);
	assert!(composed.components.contains_key("Brand"));
}

// ============================================================================
// Table merging
// ============================================================================

#[rstest]
#[case(&["a"], &["b"], &["a", "b"])]
#[case(&["a"], &["a"], &["$layout.a", "a"])]
fn test_state_merge(
	#[case] layout_state: &[&str],
	#[case] page_state: &[&str],
	#[case] expected: &[&str],
) {
	// Arrange
	let state = |names: &[&str], initial: i64| {
		names
			.iter()
			.map(|name| (name.to_string(), json!({ "type": "number", "initial": initial })))
			.collect::<serde_json::Map<_, _>>()
	};
	let layout = compiled_layout(
		&layout(json!({
			"version": "1.0",
			"type": "layout",
			"state": state(layout_state, 1),
			"view": slot(None)
		})),
		&CompileOptions::default(),
	);
	let page = compiled(&program(json!({
		"version": "1.0",
		"state": state(page_state, 2),
		"view": text("page")
	})));

	// Act
	let composed = compose(&layout, &page, None, None, &CompileOptions::default());

	// Assert
	assert_eq!(
		composed.state.keys().map(String::as_str).collect::<Vec<_>>(),
		expected
	);
	for name in page_state {
		assert_eq!(composed.state[*name].initial, CompiledInitial::Value(json!(2)));
	}
}

#[rstest]
fn test_route_and_lifecycle_come_from_page(header_footer_layout: CompiledLayoutProgram) {
	let page = compiled(&program(json!({
		"version": "1.0",
		"route": { "path": "/posts/:id", "layout": "main" },
		"actions": [{ "name": "load", "steps": [] }],
		"lifecycle": { "onMount": "load" },
		"view": text("post")
	})));

	let composed = compose_page(&header_footer_layout, &page, None, &CompileOptions::default());

	assert_eq!(composed.route, page.route);
	assert_eq!(composed.lifecycle, page.lifecycle);
	assert!(composed.actions.contains_key("load"));
}

#[rstest]
fn test_layout_params_bind_through_route() {
	// Arrange
	let layout = compiled_layout(
		&layout(json!({
			"version": "1.0",
			"type": "layout",
			"view": element("div", vec![
				json!({ "kind": "text", "value": { "expr": "param", "name": "title" } }),
				json!({ "kind": "text", "value": { "expr": "param", "name": "subtitle" } }),
				slot(None),
			])
		})),
		&CompileOptions::default(),
	);
	let page = compiled(&program(json!({
		"version": "1.0",
		"route": {
			"path": "/",
			"layout": "main",
			"layoutParams": { "title": { "expr": "lit", "value": "Home" } }
		},
		"view": text("welcome")
	})));

	// Act
	let composed = compose_page(&layout, &page, None, &CompileOptions::default());

	// Assert
	let null_text = CompiledNode::Text {
		value: vellum_ast::ir::CompiledExpression::null(),
	};
	assert_eq!(
		composed.view,
		CompiledNode::element(
			"div",
			vec![CompiledNode::text("Home"), null_text, CompiledNode::text("welcome")]
		)
	);
	assert!(!composed.view.has_unresolved_params());
}

// ============================================================================
// Independence
// ============================================================================

#[rstest]
fn test_cached_layout_serves_independent_pages(header_footer_layout: CompiledLayoutProgram) {
	// Arrange
	let before = header_footer_layout.clone();
	let first = compiled(&layout_page(text("one")));
	let second = compiled(&layout_page(text("two")));
	let options = CompileOptions::default();

	// Act
	let mut a = compose(&header_footer_layout, &first, None, None, &options);
	let b = compose(&header_footer_layout, &second, None, None, &options);
	a.state.insert(
		"mutated".to_string(),
		serde_json::from_value(json!({ "type": "boolean", "initial": true })).unwrap(),
	);

	// Assert
	assert_ne!(a.view, b.view);
	assert!(b.state.is_empty());
	assert_eq!(header_footer_layout, before);
}
