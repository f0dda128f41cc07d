//! Lowering from the AST to the compiled IR.
//!
//! Lowering is a pure, infallible tree mapping. Expressions and action steps
//! are mapped variant by variant; views additionally expand every component
//! call in place (see [`lower_node`]).
//!
//! ## Environment
//!
//! ```text
//! Program root        Env::root()            param refs pass through
//!   component call    ctx.enter(&frame)      param refs resolve against frame
//!     nested call     ctx.enter(&frame2)     fresh frame, outer one not visible
//! ```

mod action;
mod expression;
mod frame;
mod state;
mod view;

pub use action::{lower_action, lower_actions, lower_steps};
pub use expression::lower_expression;
pub use frame::{Env, SubstitutionFrame};
pub use state::{lower_state, lower_state_field};
pub use view::{LowerContext, lower_node};

use indexmap::IndexMap;
use vellum_ast::ir::{CompiledLayoutProgram, CompiledProgram, CompiledRoute};
use vellum_ast::{Expression, LayoutProgram, Program, RouteDefinition};

use crate::options::CompileOptions;

/// Lowers a page program. Assumes the program passed analysis.
pub fn lower_program(program: &Program, options: &CompileOptions) -> CompiledProgram {
	let env = Env::root();
	CompiledProgram {
		version: program.version.clone(),
		route: program.route.as_ref().map(|route| lower_route(route, env)),
		lifecycle: program.lifecycle.clone(),
		state: lower_state(&program.state, env),
		actions: lower_actions(&program.actions, env),
		view: lower_node(&program.view, LowerContext::new(&program.components, options)),
		components: program.components.clone(),
		imports: program.imports.clone(),
		import_data: program.import_data.clone(),
	}
}

/// Lowers a layout program. Layout params and slots are left for the
/// composer.
pub fn lower_layout(layout: &LayoutProgram, options: &CompileOptions) -> CompiledLayoutProgram {
	let env = Env::root();
	CompiledLayoutProgram {
		version: layout.version.clone(),
		kind: layout.kind,
		state: lower_state(&layout.state, env),
		actions: lower_actions(&layout.actions, env),
		view: lower_node(&layout.view, LowerContext::new(&layout.components, options)),
		components: layout.components.clone(),
		imports: layout.imports.clone(),
		import_data: layout.import_data.clone(),
	}
}

fn lower_route(route: &RouteDefinition, env: Env<'_>) -> CompiledRoute {
	let lower_table = |table: &IndexMap<String, Expression>| {
		table
			.iter()
			.map(|(name, expr)| (name.clone(), lower_expression(expr, env)))
			.collect::<IndexMap<_, _>>()
	};
	CompiledRoute {
		path: route.path.clone(),
		title: route.title.as_ref().map(|title| lower_expression(title, env)),
		layout: route.layout.clone(),
		layout_params: route.layout_params.as_ref().map(lower_table),
		meta: route.meta.as_ref().map(lower_table),
	}
}
