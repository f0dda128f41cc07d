//! Layout composition.
//!
//! Composition runs after both programs are lowered. The cached layout is
//! never mutated: every composition works on fresh copies, so one compiled
//! layout can be composed with any number of pages, concurrently.
//!
//! ## Steps
//!
//! 1. Copy the layout view, state and actions, resolving layout params.
//! 2. Lower named slot content (explicit, or derived from the page's import
//!    data) against the union of both component tables, resolving layout
//!    params in it as well.
//! 3. Fill slots: named slots take their content, the default slot takes the
//!    page view, whose own named slots are filled in turn.
//! 4. Merge state and actions (page wins, layout keeps `$layout.<name>`) and
//!    import data (page wins).
//! 5. Carry the page's route and lifecycle hooks over unchanged.

mod merge;
mod slots;

pub use merge::LAYOUT_PREFIX;

use indexmap::IndexMap;
use serde_json::Value;
use vellum_ast::ViewNode;
use vellum_ast::ir::{CompiledExpression, CompiledLayoutProgram, CompiledNode, CompiledProgram};

use crate::lower::{LowerContext, lower_node};
use crate::options::CompileOptions;
use slots::SlotFiller;

/// Composes a lowered layout with a lowered page.
///
/// `layout_params` binds the layout's remaining param references; unbound
/// ones become `null`. `named_slots` supplies content for named slots; when
/// absent, content is derived from the page's import data under
/// [`CompileOptions::mdx_slot_name`].
pub fn compose(
	layout: &CompiledLayoutProgram,
	page: &CompiledProgram,
	layout_params: Option<&IndexMap<String, CompiledExpression>>,
	named_slots: Option<&IndexMap<String, ViewNode>>,
	options: &CompileOptions,
) -> CompiledProgram {
	let empty = IndexMap::new();
	let params = layout_params.unwrap_or(&empty);
	let resolve = |expr: &CompiledExpression| expr.resolve_params(params);

	let view = layout.view.map_expressions(&resolve);
	let layout_state: IndexMap<_, _> = layout
		.state
		.iter()
		.map(|(name, field)| (name.clone(), field.map_expressions(&resolve)))
		.collect();
	let layout_actions: IndexMap<_, _> = layout
		.actions
		.iter()
		.map(|(name, action)| (name.clone(), action.map_expressions(&resolve)))
		.collect();

	let components = merge::merge_shallow(&layout.components, &page.components);
	let ctx = LowerContext::new(&components, options);
	let named: IndexMap<String, CompiledNode> = match named_slots {
		Some(named_slots) => named_slots
			.iter()
			.map(|(name, node)| (name.clone(), lower_node(node, ctx)))
			.collect(),
		None => derive_import_content(&page.import_data, ctx)
			.map(|content| (options.mdx_slot_name.clone(), content))
			.into_iter()
			.collect(),
	};
	let named: IndexMap<String, CompiledNode> = named
		.into_iter()
		.map(|(name, node)| (name, node.map_expressions(&resolve)))
		.collect();

	let filler = SlotFiller {
		named: &named,
		page_view: &page.view,
		unmatched: options.unmatched_slots,
	};
	let view = filler.fill_layout(&view);

	let composed = CompiledProgram {
		version: page.version.clone(),
		route: page.route.clone(),
		lifecycle: page.lifecycle.clone(),
		state: merge::merge_state(&layout_state, &page.state),
		actions: merge::merge_actions(&layout_actions, &page.actions),
		view,
		components,
		imports: merge::merge_shallow(&layout.imports, &page.imports),
		import_data: merge::merge_import_data(&layout.import_data, &page.import_data),
	};
	tracing::debug!(
		named_slots = named.len(),
		state = composed.state.len(),
		actions = composed.actions.len(),
		"composed layout with page"
	);
	composed
}

/// Composes a page with a layout using the layout params declared on the
/// page's route.
pub fn compose_page(
	layout: &CompiledLayoutProgram,
	page: &CompiledProgram,
	named_slots: Option<&IndexMap<String, ViewNode>>,
	options: &CompileOptions,
) -> CompiledProgram {
	let layout_params = page
		.route
		.as_ref()
		.and_then(|route| route.layout_params.as_ref());
	compose(layout, page, layout_params, named_slots, options)
}

/// Finds view content in the page's import data.
///
/// Looks for the first array whose entries carry a `content` field and takes
/// the first such entry. The content may be an unlowered view (lowered here,
/// expanding any components) or an already compiled node.
fn derive_import_content(
	import_data: &IndexMap<String, Value>,
	ctx: LowerContext<'_>,
) -> Option<CompiledNode> {
	let (source, content) = import_data.iter().find_map(|(name, value)| {
		value
			.as_array()?
			.iter()
			.find_map(|entry| entry.get("content"))
			.map(|content| (name, content))
	})?;

	if let Ok(node) = serde_json::from_value::<ViewNode>(content.clone()) {
		return Some(lower_node(&node, ctx));
	}
	match serde_json::from_value::<CompiledNode>(content.clone()) {
		Ok(node) => Some(node),
		Err(err) => {
			tracing::warn!(
				import = %source,
				error = %err,
				"import data content is not a view node, skipping"
			);
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn layout(view: Value) -> CompiledLayoutProgram {
		serde_json::from_value(json!({ "version": "1.0", "type": "layout", "view": view })).unwrap()
	}

	fn page(value: Value) -> CompiledProgram {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_import_content_fills_mdx_slot() {
		let layout = layout(json!({
			"kind": "element",
			"tag": "main",
			"children": [{ "kind": "slot", "name": "mdx-content" }]
		}));
		let page = page(json!({
			"version": "1.0",
			"importData": {
				"docs": [
					{ "slug": "intro", "content": { "kind": "text", "value": { "expr": "lit", "value": "Intro" } } },
					{ "slug": "next", "content": { "kind": "text", "value": { "expr": "lit", "value": "Next" } } }
				]
			},
			"view": { "kind": "text", "value": { "expr": "lit", "value": "page" } }
		}));

		let composed = compose(&layout, &page, None, None, &CompileOptions::default());

		assert_eq!(
			composed.view,
			CompiledNode::element("main", vec![CompiledNode::text("Intro")])
		);
	}

	#[test]
	fn test_invalid_import_content_is_skipped() {
		let layout = layout(json!({ "kind": "slot", "name": "mdx-content" }));
		let page = page(json!({
			"version": "1.0",
			"importData": { "docs": [{ "content": "# just markdown" }] },
			"view": { "kind": "text", "value": { "expr": "lit", "value": "page" } }
		}));

		let composed = compose(&layout, &page, None, None, &CompileOptions::default());

		assert_eq!(composed.view, CompiledNode::empty_text());
	}

	#[test]
	fn test_named_slot_content_params_are_resolved() {
		// Arrange
		let layout = layout(json!({
			"kind": "element",
			"tag": "div",
			"children": [{ "kind": "slot", "name": "header" }, { "kind": "slot" }]
		}));
		let page = page(json!({
			"version": "1.0",
			"view": { "kind": "text", "value": { "expr": "lit", "value": "body" } }
		}));
		let named: IndexMap<String, ViewNode> = serde_json::from_value(json!({
			"header": { "kind": "element", "tag": "h1", "children": [
				{ "kind": "text", "value": { "expr": "param", "name": "title" } },
				{ "kind": "text", "value": { "expr": "param", "name": "missing" } }
			] }
		}))
		.unwrap();
		let params = IndexMap::from([("title".to_string(), CompiledExpression::literal("Docs"))]);

		// Act
		let options = CompileOptions::default();
		let composed = compose(&layout, &page, Some(&params), Some(&named), &options);

		// Assert
		assert!(!composed.view.has_unresolved_params());
		let null_text = CompiledNode::Text {
			value: CompiledExpression::null(),
		};
		assert_eq!(
			composed.view,
			CompiledNode::element(
				"div",
				vec![
					CompiledNode::element("h1", vec![CompiledNode::text("Docs"), null_text]),
					CompiledNode::text("body"),
				]
			)
		);
	}

	#[test]
	fn test_layout_action_params_are_resolved() {
		let layout: CompiledLayoutProgram = serde_json::from_value(json!({
			"version": "1.0",
			"type": "layout",
			"actions": [{
				"name": "track",
				"steps": [{ "do": "set", "target": "section", "value": { "expr": "param", "name": "section" } }]
			}],
			"view": { "kind": "slot" }
		}))
		.unwrap();
		let page = page(json!({
			"version": "1.0",
			"route": {
				"path": "/guide",
				"layout": "docs",
				"layoutParams": { "section": { "expr": "lit", "value": "guide" } }
			},
			"view": { "kind": "text", "value": { "expr": "lit", "value": "page" } }
		}));

		let composed = compose_page(&layout, &page, None, &CompileOptions::default());

		assert!(!composed.view.has_unresolved_params());
		let steps = &composed.actions["track"].steps;
		assert_eq!(
			serde_json::to_value(&steps[0]).unwrap()["value"],
			json!({ "expr": "lit", "value": "guide" })
		);
	}
}
