//! End-to-end: compile a layout and a page, compose through the registry.

use rstest::rstest;
use serde_json::{Value, json};
use vellum::prelude::*;

fn text(value: &str) -> Value {
	json!({ "kind": "text", "value": { "expr": "lit", "value": value } })
}

fn docs_layout() -> LayoutProgram {
	LayoutProgram::from_json(
		&json!({
			"version": "1.0",
			"type": "layout",
			"state": { "menuOpen": { "type": "boolean", "initial": false } },
			"actions": [{
				"name": "toggleMenu",
				"steps": [{ "do": "update", "target": "menuOpen", "operation": "toggle" }]
			}],
			"components": {
				"NavLink": {
					"params": { "label": { "type": "string" } },
					"view": { "kind": "element", "tag": "a", "children": [
						{ "kind": "text", "value": { "expr": "param", "name": "label" } }
					] }
				}
			},
			"view": {
				"kind": "element",
				"tag": "div",
				"children": [
					{ "kind": "element", "tag": "nav", "children": [
						{ "kind": "component", "name": "NavLink", "props": { "label": { "expr": "param", "name": "section" } } }
					] },
					{ "kind": "slot" }
				]
			}
		})
		.to_string(),
	)
	.unwrap()
}

fn page(section: &str, body: &str) -> Program {
	Program::from_json(
		&json!({
			"version": "1.0",
			"route": {
				"path": "/docs/:slug",
				"layout": "docs",
				"layoutParams": { "section": { "expr": "lit", "value": section } }
			},
			"state": { "menuOpen": { "type": "boolean", "initial": true } },
			"view": text(body)
		})
		.to_string(),
	)
	.unwrap()
}

#[rstest]
#[case("Guide", "Getting started")]
#[case("Reference", "API")]
fn test_page_composed_into_registered_layout(#[case] section: &str, #[case] body: &str) {
	// Arrange
	let registry = LayoutRegistry::new(CompileOptions::default());
	registry.register("docs", &docs_layout()).unwrap();
	let compiled = compile(&page(section, body), registry.options()).unwrap();

	// Act
	let composed = registry.compose_page(&compiled).unwrap();

	// Assert
	let view = serde_json::to_value(&composed.view).unwrap();
	assert_eq!(view["children"][0]["children"][0]["children"][0], text(section));
	assert_eq!(view["children"][1], text(body));
	assert_eq!(
		composed.state.keys().map(String::as_str).collect::<Vec<_>>(),
		vec!["$layout.menuOpen", "menuOpen"]
	);
	assert!(composed.actions.contains_key("toggleMenu"));
	assert!(!composed.view.has_unresolved_params());
}

#[rstest]
fn test_composed_program_round_trips_through_json() {
	let registry = LayoutRegistry::new(CompileOptions::default());
	registry.register("docs", &docs_layout()).unwrap();
	let composed = registry
		.compose_page(&compile(&page("Guide", "x"), registry.options()).unwrap())
		.unwrap();

	let decoded = CompiledProgram::from_json(&composed.to_json().unwrap()).unwrap();

	assert_eq!(decoded, composed);
}
