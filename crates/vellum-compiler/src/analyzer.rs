//! Semantic analysis.
//!
//! The analyzer validates name resolution and layout slot invariants before
//! anything is lowered. It never stops at the first problem: every finding is
//! collected, in walk order, into a list of [`Diagnostic`]s.
//!
//! ## Checks
//!
//! - Layout slots (layouts only): at least one slot, unique names, at most
//!   one default slot, no slot under an `each` body, including an `each`
//!   inside a component the slot is passed to. A slot failure ends the
//!   analysis before any reference check runs.
//! - References: state, actions, components, vars, route params, imports and
//!   component params must resolve.
//! - Structure: no component cycles, no duplicate `ref` names, no view
//!   nesting and no component expansion chain beyond
//!   [`CompileOptions::max_depth`].

mod context;
mod cycles;
mod references;
mod slots;

pub use context::AnalysisContext;

use vellum_ast::{LayoutProgram, Program};

use crate::error::Diagnostic;
use crate::options::CompileOptions;
use references::{ReferenceChecker, Source};

/// Analyzes a page program.
pub fn analyze_program(
	program: &Program,
	options: &CompileOptions,
) -> Result<AnalysisContext, Vec<Diagnostic>> {
	let ctx = AnalysisContext::for_program(program);

	let mut checker =
		ReferenceChecker::new(&ctx, &program.components, Source::Page, options.max_depth);
	checker.check_state(&program.state, "/state");
	checker.check_actions(&program.actions, "/actions");
	if let Some(lifecycle) = &program.lifecycle {
		for (hook, action) in lifecycle.hooks() {
			checker.check_action_name(action, &format!("/lifecycle/{hook}"));
		}
	}
	if let Some(route) = &program.route {
		if let Some(title) = &route.title {
			checker.check_expression(title, "/route/title");
		}
		for (field, exprs) in [("layoutParams", &route.layout_params), ("meta", &route.meta)] {
			for (name, expr) in exprs.iter().flatten() {
				checker.check_expression(expr, &format!("/route/{field}/{name}"));
			}
		}
	}
	checker.check_view(&program.view, "/view");
	for (name, def) in &program.components {
		checker.check_component(name, def);
	}

	let mut diagnostics = checker.finish();
	diagnostics.extend(cycles::check_component_graph(&program.components, options.max_depth));

	finish(ctx, diagnostics, "program")
}

/// Analyzes a layout program.
pub fn analyze_layout(
	layout: &LayoutProgram,
	options: &CompileOptions,
) -> Result<AnalysisContext, Vec<Diagnostic>> {
	let mut ctx = AnalysisContext::for_layout(layout);

	let scan = slots::scan_layout_slots(&layout.view, &layout.components);
	if scan.diagnostics.iter().any(|d| d.code.is_slot_error()) {
		tracing::debug!(errors = scan.diagnostics.len(), "layout slot validation failed");
		return Err(scan.diagnostics);
	}
	ctx.slot_names = scan.named;
	ctx.has_default_slot = scan.has_default;

	let mut checker =
		ReferenceChecker::new(&ctx, &layout.components, Source::Layout, options.max_depth);
	checker.check_state(&layout.state, "/state");
	checker.check_actions(&layout.actions, "/actions");
	checker.check_view(&layout.view, "/view");
	for (name, def) in &layout.components {
		checker.check_component(name, def);
	}

	let mut diagnostics = checker.finish();
	diagnostics.extend(cycles::check_component_graph(&layout.components, options.max_depth));

	finish(ctx, diagnostics, "layout")
}

fn finish(
	ctx: AnalysisContext,
	diagnostics: Vec<Diagnostic>,
	what: &str,
) -> Result<AnalysisContext, Vec<Diagnostic>> {
	if diagnostics.is_empty() {
		tracing::debug!(
			state = ctx.state_names.len(),
			actions = ctx.action_names.len(),
			components = ctx.component_names.len(),
			"{what} analysis passed"
		);
		Ok(ctx)
	} else {
		tracing::debug!(errors = diagnostics.len(), "{what} analysis failed");
		Err(diagnostics)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorCode;
	use serde_json::json;

	fn program(value: serde_json::Value) -> Program {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_context_collects_declared_names() {
		let program = program(json!({
			"version": "1.0",
			"route": { "path": "/posts/:slug" },
			"imports": { "utils": "./utils.js" },
			"state": { "count": { "type": "number", "initial": 0 } },
			"actions": [{ "name": "increment", "steps": [] }],
			"view": { "kind": "text", "value": { "expr": "route", "name": "slug" } }
		}));

		let ctx = analyze_program(&program, &CompileOptions::default()).unwrap();

		assert!(ctx.state_names.contains("count"));
		assert!(ctx.action_names.contains("increment"));
		assert!(ctx.route_params.contains("slug"));
		assert!(ctx.import_names.contains("utils"));
	}

	#[test]
	fn test_lifecycle_hook_must_name_action() {
		let program = program(json!({
			"version": "1.0",
			"lifecycle": { "onMount": "load" },
			"view": { "kind": "text", "value": { "expr": "lit", "value": "" } }
		}));

		let errors = analyze_program(&program, &CompileOptions::default()).unwrap_err();

		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].code, ErrorCode::UndefinedAction);
		assert_eq!(errors[0].path, "/lifecycle/onMount");
	}

	#[test]
	fn test_max_depth_exceeded() {
		let mut view = json!({ "kind": "text", "value": { "expr": "lit", "value": "leaf" } });
		for _ in 0..6 {
			view = json!({ "kind": "element", "tag": "div", "children": [view] });
		}
		let program = program(json!({ "version": "1.0", "view": view }));

		let errors = analyze_program(&program, &CompileOptions::new().max_depth(3)).unwrap_err();

		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].code, ErrorCode::MaxDepthExceeded);
	}
}
