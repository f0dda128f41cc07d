//! Action lowering.

use indexmap::IndexMap;
use vellum_ast::ir::{CompiledAction, CompiledActionStep};
use vellum_ast::{ActionDefinition, ActionStep, Expression};

use super::expression::{lower_expression, lower_opt};
use super::frame::Env;

/// Lowers a list of actions into a name-keyed table.
///
/// A later action with the same name replaces an earlier one.
pub fn lower_actions(
	actions: &[ActionDefinition],
	env: Env<'_>,
) -> IndexMap<String, CompiledAction> {
	actions
		.iter()
		.map(|action| (action.name.clone(), lower_action(action, env)))
		.collect()
}

/// Lowers one action.
pub fn lower_action(action: &ActionDefinition, env: Env<'_>) -> CompiledAction {
	CompiledAction {
		name: action.name.clone(),
		steps: lower_steps(&action.steps, env),
	}
}

/// Lowers a step sequence, recursing into nested step lists.
pub fn lower_steps(steps: &[ActionStep], env: Env<'_>) -> Vec<CompiledActionStep> {
	steps.iter().map(|step| lower_step(step, env)).collect()
}

fn lower_step(step: &ActionStep, env: Env<'_>) -> CompiledActionStep {
	let expr = |expr: &Expression| lower_expression(expr, env);
	let steps = |steps: &[ActionStep]| lower_steps(steps, env);
	match step {
		ActionStep::Set { target, value } => CompiledActionStep::Set {
			target: target.clone(),
			value: expr(value),
		},
		ActionStep::Update {
			target,
			operation,
			value,
			index,
			delete_count,
		} => CompiledActionStep::Update {
			target: target.clone(),
			operation: *operation,
			value: lower_opt(value, env),
			index: lower_opt(index, env),
			delete_count: lower_opt(delete_count, env),
		},
		ActionStep::Fetch {
			url,
			method,
			body,
			headers,
			result,
			on_success,
			on_error,
		} => CompiledActionStep::Fetch {
			url: expr(url),
			method: *method,
			body: lower_opt(body, env),
			headers: headers
				.iter()
				.map(|(name, value)| (name.clone(), expr(value)))
				.collect(),
			result: result.clone(),
			on_success: steps(on_success),
			on_error: steps(on_error),
		},
		ActionStep::Storage {
			operation,
			key,
			value,
			storage,
			result,
			on_success,
			on_error,
		} => CompiledActionStep::Storage {
			operation: *operation,
			key: expr(key),
			value: lower_opt(value, env),
			storage: *storage,
			result: result.clone(),
			on_success: steps(on_success),
			on_error: steps(on_error),
		},
		ActionStep::Clipboard {
			operation,
			value,
			result,
			on_success,
			on_error,
		} => CompiledActionStep::Clipboard {
			operation: *operation,
			value: lower_opt(value, env),
			result: result.clone(),
			on_success: steps(on_success),
			on_error: steps(on_error),
		},
		ActionStep::Navigate {
			url,
			target,
			replace,
		} => CompiledActionStep::Navigate {
			url: expr(url),
			target: *target,
			replace: *replace,
		},
		ActionStep::Import {
			module,
			result,
			on_success,
			on_error,
		} => CompiledActionStep::Import {
			module: module.clone(),
			result: result.clone(),
			on_success: steps(on_success),
			on_error: steps(on_error),
		},
		ActionStep::Call {
			target,
			args,
			result,
			on_success,
			on_error,
		} => CompiledActionStep::Call {
			target: expr(target),
			args: args.iter().map(expr).collect(),
			result: result.clone(),
			on_success: steps(on_success),
			on_error: steps(on_error),
		},
		ActionStep::Subscribe {
			target,
			event,
			action,
		} => CompiledActionStep::Subscribe {
			target: expr(target),
			event: event.clone(),
			action: action.clone(),
		},
		ActionStep::Dispose { target } => CompiledActionStep::Dispose {
			target: expr(target),
		},
		ActionStep::Dom {
			operation,
			selector,
			value,
			attribute,
		} => CompiledActionStep::Dom {
			operation: *operation,
			selector: expr(selector),
			value: lower_opt(value, env),
			attribute: attribute.clone(),
		},
		ActionStep::If {
			condition,
			then,
			otherwise,
		} => CompiledActionStep::If {
			condition: expr(condition),
			then: steps(then),
			otherwise: steps(otherwise),
		},
		ActionStep::Delay { ms, then } => CompiledActionStep::Delay {
			ms: expr(ms),
			then: steps(then),
		},
		ActionStep::Interval { ms, action, result } => CompiledActionStep::Interval {
			ms: expr(ms),
			action: action.clone(),
			result: result.clone(),
		},
		ActionStep::ClearTimer { target } => CompiledActionStep::ClearTimer {
			target: expr(target),
		},
		ActionStep::Focus { target, operation } => CompiledActionStep::Focus {
			target: expr(target),
			operation: *operation,
		},
		ActionStep::Unknown => {
			tracing::warn!("unrecognized action step lowered to noop");
			CompiledActionStep::Noop
		}
	}
}
