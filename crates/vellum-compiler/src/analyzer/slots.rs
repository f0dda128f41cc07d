//! Layout slot validation.

use indexmap::{IndexMap, IndexSet};
use vellum_ast::{ComponentDef, ViewNode};

use crate::error::{Diagnostic, ErrorCode};

/// Slot facts gathered from a layout view.
#[derive(Debug, Default)]
pub(super) struct SlotScan {
	pub named: IndexSet<String>,
	pub has_default: bool,
	pub count: usize,
	pub diagnostics: Vec<Diagnostic>,
}

/// Walks a layout view and validates its slots.
///
/// Component definitions are not scanned for slots of their own: those
/// belong to the component. Children passed at a component call site are
/// scanned, since they end up in the layout's tree, and count as in a loop
/// when the component places its slot under an `each` body.
pub(super) fn scan_layout_slots(
	view: &ViewNode,
	components: &IndexMap<String, ComponentDef>,
) -> SlotScan {
	let mut scan = SlotScan::default();
	scan_node(view, "/view", false, components, &mut scan);
	if scan.count == 0 {
		scan.diagnostics.push(Diagnostic::new(
			ErrorCode::LayoutMissingSlot,
			"layout view contains no slot",
			"/view",
		));
	}
	scan
}

fn scan_node(
	node: &ViewNode,
	path: &str,
	in_loop: bool,
	components: &IndexMap<String, ComponentDef>,
	scan: &mut SlotScan,
) {
	let scan_child = |child: &ViewNode, path: String, in_loop: bool, scan: &mut SlotScan| {
		scan_node(child, &path, in_loop, components, scan);
	};
	match node {
		ViewNode::Slot { name } => {
			scan.count += 1;
			if in_loop {
				scan.diagnostics.push(Diagnostic::new(
					ErrorCode::SlotInLoop,
					"slot cannot appear inside an each body",
					path,
				));
			}
			match name.as_deref() {
				Some(name) if !name.is_empty() => {
					if !scan.named.insert(name.to_string()) {
						scan.diagnostics.push(Diagnostic::new(
							ErrorCode::DuplicateSlotName,
							format!("slot '{name}' is declared more than once"),
							path,
						));
					}
				}
				_ => {
					if scan.has_default {
						scan.diagnostics.push(Diagnostic::new(
							ErrorCode::DuplicateDefaultSlot,
							"layout declares more than one default slot",
							path,
						));
					}
					scan.has_default = true;
				}
			}
		}
		ViewNode::Component { name, children, .. } => {
			let repeated = in_loop || component_repeats_slot(name, components, &mut Vec::new());
			for (i, child) in children.iter().enumerate() {
				scan_child(child, format!("{path}/children/{i}"), repeated, scan);
			}
		}
		ViewNode::Element { children, .. } | ViewNode::Portal { children, .. } => {
			for (i, child) in children.iter().enumerate() {
				scan_child(child, format!("{path}/children/{i}"), in_loop, scan);
			}
		}
		ViewNode::If {
			then, otherwise, ..
		} => {
			scan_child(then, format!("{path}/then"), in_loop, scan);
			if let Some(otherwise) = otherwise {
				scan_child(otherwise, format!("{path}/else"), in_loop, scan);
			}
		}
		ViewNode::Each { body, .. } => scan_child(body, format!("{path}/body"), true, scan),
		ViewNode::Island { content, .. } => {
			scan_child(content, format!("{path}/content"), in_loop, scan);
		}
		ViewNode::Suspense {
			fallback, content, ..
		}
		| ViewNode::ErrorBoundary { fallback, content } => {
			scan_child(fallback, format!("{path}/fallback"), in_loop, scan);
			scan_child(content, format!("{path}/content"), in_loop, scan);
		}
		ViewNode::Text { .. } | ViewNode::Markdown { .. } | ViewNode::Code { .. } => {}
	}
}

/// Whether expanding `name` places call-site children under an `each` body.
///
/// `visiting` holds the components on the current expansion path; a cycle is
/// reported elsewhere and contributes nothing here.
fn component_repeats_slot<'a>(
	name: &str,
	components: &'a IndexMap<String, ComponentDef>,
	visiting: &mut Vec<&'a str>,
) -> bool {
	let Some((name, def)) = components.get_key_value(name) else {
		return false;
	};
	if visiting.contains(&name.as_str()) {
		return false;
	}
	visiting.push(name.as_str());
	let repeats = slot_under_each(&def.view, false, components, visiting);
	visiting.pop();
	repeats
}

fn slot_under_each<'a>(
	node: &'a ViewNode,
	in_loop: bool,
	components: &'a IndexMap<String, ComponentDef>,
	visiting: &mut Vec<&'a str>,
) -> bool {
	let mut under =
		|node: &'a ViewNode, in_loop: bool| slot_under_each(node, in_loop, components, visiting);
	match node {
		ViewNode::Slot { .. } => in_loop,
		ViewNode::Component { name, children, .. } => {
			if children.is_empty() {
				return false;
			}
			let repeated = in_loop || component_repeats_slot(name, components, visiting);
			children
				.iter()
				.any(|child| slot_under_each(child, repeated, components, visiting))
		}
		ViewNode::Element { children, .. } | ViewNode::Portal { children, .. } => {
			children.iter().any(|child| under(child, in_loop))
		}
		ViewNode::If {
			then, otherwise, ..
		} => under(then, in_loop) || otherwise.as_deref().is_some_and(|node| under(node, in_loop)),
		ViewNode::Each { body, .. } => under(body, true),
		ViewNode::Island { content, .. } => under(content, in_loop),
		ViewNode::Suspense {
			fallback, content, ..
		}
		| ViewNode::ErrorBoundary { fallback, content } => {
			under(fallback, in_loop) || under(content, in_loop)
		}
		ViewNode::Text { .. } | ViewNode::Markdown { .. } | ViewNode::Code { .. } => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn codes(scan: &SlotScan) -> Vec<ErrorCode> {
		scan.diagnostics.iter().map(|d| d.code).collect()
	}

	#[test]
	fn test_slot_under_if_inside_each_is_in_loop() {
		let view = ViewNode::element(
			"ul",
			vec![ViewNode::Each {
				items: vellum_ast::Expression::state("items"),
				binding: "item".to_string(),
				index: None,
				key: None,
				body: Box::new(ViewNode::If {
					condition: vellum_ast::Expression::literal(true),
					then: Box::new(ViewNode::slot(None)),
					otherwise: None,
				}),
			}],
		);

		let scan = scan_layout_slots(&view, &IndexMap::new());

		assert_eq!(codes(&scan), vec![ErrorCode::SlotInLoop]);
		assert_eq!(scan.diagnostics[0].path, "/view/children/0/body/then");
	}

	#[test]
	fn test_empty_name_counts_as_default() {
		let view = ViewNode::element("main", vec![ViewNode::slot(None), ViewNode::slot(Some(""))]);
		let scan = scan_layout_slots(&view, &IndexMap::new());
		assert_eq!(codes(&scan), vec![ErrorCode::DuplicateDefaultSlot]);
	}

	#[test]
	fn test_named_slots_collected_in_order() {
		let view = ViewNode::element(
			"div",
			vec![
				ViewNode::slot(Some("header")),
				ViewNode::slot(None),
				ViewNode::slot(Some("footer")),
			],
		);
		let scan = scan_layout_slots(&view, &IndexMap::new());
		assert!(scan.diagnostics.is_empty());
		assert!(scan.has_default);
		assert_eq!(scan.named.iter().collect::<Vec<_>>(), vec!["header", "footer"]);
	}

	fn components(value: serde_json::Value) -> IndexMap<String, ComponentDef> {
		serde_json::from_value(value).unwrap()
	}

	fn call(name: &str, children: Vec<ViewNode>) -> ViewNode {
		ViewNode::Component {
			name: name.to_string(),
			props: IndexMap::new(),
			children,
		}
	}

	#[rstest]
	#[case::direct("Repeat", true)]
	#[case::through_wrapper("Outer", true)]
	#[case::plain("Frame", false)]
	fn test_call_site_children_inherit_component_loop(
		#[case] component: &str,
		#[case] in_loop: bool,
	) {
		// Arrange
		let table = components(json!({
			"Repeat": {
				"view": {
					"kind": "each",
					"items": { "expr": "state", "name": "items" },
					"as": "item",
					"body": { "kind": "slot" }
				}
			},
			"Outer": {
				"view": { "kind": "component", "name": "Repeat", "children": [{ "kind": "slot" }] }
			},
			"Frame": { "view": { "kind": "element", "tag": "section", "children": [{ "kind": "slot" }] } }
		}));
		let view = call(component, vec![ViewNode::slot(None)]);

		// Act
		let scan = scan_layout_slots(&view, &table);

		// Assert
		let expected = if in_loop { vec![ErrorCode::SlotInLoop] } else { vec![] };
		assert_eq!(codes(&scan), expected);
		assert_eq!(scan.count, 1);
	}

	#[test]
	fn test_recursive_component_does_not_loop_forever() {
		let table = components(json!({
			"Tree": { "view": { "kind": "component", "name": "Tree", "children": [{ "kind": "slot" }] } }
		}));

		let scan = scan_layout_slots(&call("Tree", vec![ViewNode::slot(None)]), &table);

		assert!(scan.diagnostics.is_empty());
	}
}
