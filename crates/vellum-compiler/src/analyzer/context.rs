//! Name tables collected before the reference walk.

use indexmap::IndexSet;
use vellum_ast::{LayoutProgram, Program};

/// Names declared by one program, built fresh for each analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisContext {
	pub state_names: IndexSet<String>,
	pub action_names: IndexSet<String>,
	pub component_names: IndexSet<String>,
	pub route_params: IndexSet<String>,
	/// Names from `imports` and `importData`.
	pub import_names: IndexSet<String>,
	/// Named layout slots, in walk order. Empty for pages.
	pub slot_names: IndexSet<String>,
	pub has_default_slot: bool,
	/// `true` when the page declares a route; route params are checked only then.
	pub has_route: bool,
}

impl AnalysisContext {
	/// Collects the names declared at the top level of a page.
	pub fn for_program(program: &Program) -> Self {
		Self {
			state_names: program.state.keys().cloned().collect(),
			action_names: program.actions.iter().map(|a| a.name.clone()).collect(),
			component_names: program.components.keys().cloned().collect(),
			route_params: program
				.route_params()
				.into_iter()
				.map(str::to_string)
				.collect(),
			import_names: program
				.imports
				.keys()
				.chain(program.import_data.keys())
				.cloned()
				.collect(),
			has_route: program.route.is_some(),
			..Self::default()
		}
	}

	/// Collects the names declared at the top level of a layout.
	pub fn for_layout(layout: &LayoutProgram) -> Self {
		Self {
			state_names: layout.state.keys().cloned().collect(),
			action_names: layout.actions.iter().map(|a| a.name.clone()).collect(),
			component_names: layout.components.keys().cloned().collect(),
			import_names: layout
				.imports
				.keys()
				.chain(layout.import_data.keys())
				.cloned()
				.collect(),
			..Self::default()
		}
	}
}
