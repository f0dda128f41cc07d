//! State field lowering.

use indexmap::IndexMap;
use vellum_ast::ir::{CompiledInitial, CompiledStateField};
use vellum_ast::{StateField, StateInitial};

use super::expression::lower_expression;
use super::frame::Env;

/// Lowers a table of state fields.
pub fn lower_state(
	fields: &IndexMap<String, StateField>,
	env: Env<'_>,
) -> IndexMap<String, CompiledStateField> {
	fields
		.iter()
		.map(|(name, field)| (name.clone(), lower_state_field(field, env)))
		.collect()
}

/// Lowers one field. Expression initials are lowered under `env`; plain
/// values pass through unchanged.
pub fn lower_state_field(field: &StateField, env: Env<'_>) -> CompiledStateField {
	CompiledStateField {
		kind: field.kind,
		initial: match &field.initial {
			StateInitial::Expression(expr) => {
				CompiledInitial::Expression(lower_expression(expr, env))
			}
			StateInitial::Value(value) => CompiledInitial::Value(value.clone()),
		},
	}
}
