//! Table merging for layout composition.

use indexmap::IndexMap;
use serde_json::Value;
use vellum_ast::ir::{CompiledAction, CompiledStateField};

/// Prefix kept on a layout entry that lost a name collision.
pub const LAYOUT_PREFIX: &str = "$layout.";

/// Merges two keyed tables, page first in priority.
///
/// Layout entries come first in the result. A layout entry whose name the
/// page also uses is kept under `$layout.<name>`, passed through `rename`.
fn merge_keyed<T: Clone>(
	layout: &IndexMap<String, T>,
	page: &IndexMap<String, T>,
	rename: impl Fn(&T, &str) -> T,
) -> IndexMap<String, T> {
	let mut merged = IndexMap::with_capacity(layout.len() + page.len());
	for (name, entry) in layout {
		if page.contains_key(name) {
			let renamed = format!("{LAYOUT_PREFIX}{name}");
			merged.insert(renamed.clone(), rename(entry, &renamed));
		} else {
			merged.insert(name.clone(), entry.clone());
		}
	}
	for (name, entry) in page {
		merged.insert(name.clone(), entry.clone());
	}
	merged
}

pub(super) fn merge_state(
	layout: &IndexMap<String, CompiledStateField>,
	page: &IndexMap<String, CompiledStateField>,
) -> IndexMap<String, CompiledStateField> {
	merge_keyed(layout, page, |field, _| field.clone())
}

pub(super) fn merge_actions(
	layout: &IndexMap<String, CompiledAction>,
	page: &IndexMap<String, CompiledAction>,
) -> IndexMap<String, CompiledAction> {
	merge_keyed(layout, page, |action, name| CompiledAction {
		name: name.to_string(),
		steps: action.steps.clone(),
	})
}

/// Shallow merge; the page wins on key collision.
pub(super) fn merge_shallow<T: Clone>(
	layout: &IndexMap<String, T>,
	page: &IndexMap<String, T>,
) -> IndexMap<String, T> {
	let mut merged = layout.clone();
	merged.extend(page.iter().map(|(k, v)| (k.clone(), v.clone())));
	merged
}

pub(super) fn merge_import_data(
	layout: &IndexMap<String, Value>,
	page: &IndexMap<String, Value>,
) -> IndexMap<String, Value> {
	merge_shallow(layout, page)
}
