//! Compiler options.

use serde::{Deserialize, Serialize};

/// Default ceiling on view and expression nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What the composer does with a named slot that received no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedSlotPolicy {
	/// Replace the slot with an empty text node.
	#[default]
	Empty,
	/// Leave the slot node in the composed tree.
	Preserve,
}

/// Options shared by the analyzer, the lowerers and the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompileOptions {
	/// Maximum nesting of view nodes, expressions and component expansions.
	pub max_depth: usize,
	/// Handling of named layout slots nobody filled.
	pub unmatched_slots: UnmatchedSlotPolicy,
	/// Tag of the element wrapping multiple children spliced into one slot.
	pub slot_container_tag: String,
	/// Slot name that receives content derived from the page's import data.
	pub mdx_slot_name: String,
}

impl Default for CompileOptions {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
			unmatched_slots: UnmatchedSlotPolicy::Empty,
			slot_container_tag: "div".to_string(),
			mdx_slot_name: "mdx-content".to_string(),
		}
	}
}

impl CompileOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the nesting ceiling.
	pub fn max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	/// Keeps unmatched named slots in composed output.
	pub fn preserve_unmatched_slots(mut self) -> Self {
		self.unmatched_slots = UnmatchedSlotPolicy::Preserve;
		self
	}

	/// Sets the unmatched slot policy.
	pub fn unmatched_slots(mut self, policy: UnmatchedSlotPolicy) -> Self {
		self.unmatched_slots = policy;
		self
	}

	/// Sets the slot container tag.
	pub fn slot_container_tag(mut self, tag: impl Into<String>) -> Self {
		self.slot_container_tag = tag.into();
		self
	}

	/// Sets the slot name used for import-derived content.
	pub fn mdx_slot_name(mut self, name: impl Into<String>) -> Self {
		self.mdx_slot_name = name.into();
		self
	}
}
