//! Registry of compiled layouts.
//!
//! Layouts are compiled once and shared behind [`Arc`]. Composition only
//! reads a registered layout, so a single layout can serve any number of
//! pages concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use vellum_ast::ir::{CompiledLayoutProgram, CompiledProgram};
use vellum_ast::{LayoutProgram, ViewNode};

use crate::compose::compose_page;
use crate::error::{RegistryError, RegistryResult};
use crate::options::CompileOptions;

/// Compiled layouts by name.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
	layouts: RwLock<HashMap<String, Arc<CompiledLayoutProgram>>>,
	options: CompileOptions,
}

impl LayoutRegistry {
	/// Creates an empty registry using `options` for compilation and
	/// composition.
	pub fn new(options: CompileOptions) -> Self {
		Self {
			layouts: RwLock::new(HashMap::new()),
			options,
		}
	}

	pub fn options(&self) -> &CompileOptions {
		&self.options
	}

	/// Compiles and registers a layout, replacing any layout of the same name.
	pub fn register(&self, name: impl Into<String>, layout: &LayoutProgram) -> RegistryResult<()> {
		let name = name.into();
		let compiled = crate::compile_layout(layout, &self.options).map_err(|source| {
			RegistryError::Compile {
				name: name.clone(),
				source,
			}
		})?;
		self.insert(name, compiled);
		Ok(())
	}

	/// Registers an already compiled layout.
	pub fn insert(&self, name: impl Into<String>, layout: CompiledLayoutProgram) {
		let name = name.into();
		tracing::debug!(layout = %name, "registered layout");
		self.layouts.write().insert(name, Arc::new(layout));
	}

	/// Returns the layout registered under `name`.
	pub fn get(&self, name: &str) -> Option<Arc<CompiledLayoutProgram>> {
		self.layouts.read().get(name).cloned()
	}

	/// Returns the layout registered under `name`, or
	/// [`RegistryError::LayoutNotFound`].
	pub fn resolve(&self, name: &str) -> RegistryResult<Arc<CompiledLayoutProgram>> {
		self.get(name)
			.ok_or_else(|| RegistryError::LayoutNotFound(name.to_string()))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.layouts.read().contains_key(name)
	}

	/// Registered layout names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.layouts.read().keys().cloned().collect();
		names.sort();
		names
	}

	/// Composes a page with the layout named by its route.
	///
	/// A page whose route names no layout is returned unchanged.
	pub fn compose_page(&self, page: &CompiledProgram) -> RegistryResult<CompiledProgram> {
		self.compose_page_with_slots(page, None)
	}

	/// Like [`LayoutRegistry::compose_page`], with explicit named slot content.
	pub fn compose_page_with_slots(
		&self,
		page: &CompiledProgram,
		named_slots: Option<&IndexMap<String, ViewNode>>,
	) -> RegistryResult<CompiledProgram> {
		let Some(name) = page.layout_name() else {
			return Ok(page.clone());
		};
		let layout = self.resolve(name)?;
		Ok(compose_page(&layout, page, named_slots, &self.options))
	}
}
