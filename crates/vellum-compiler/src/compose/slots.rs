//! Slot filling for layout composition.

use indexmap::IndexMap;
use vellum_ast::ir::CompiledNode;

use crate::options::UnmatchedSlotPolicy;

/// Which tree the filler is walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
	/// The layout view: the default slot receives the page view.
	Layout,
	/// Page content spliced into the default slot: only named slots are
	/// filled, the default slot is left alone.
	PageContent,
}

/// Content available to the slots of one composition.
pub(super) struct SlotFiller<'a> {
	pub named: &'a IndexMap<String, CompiledNode>,
	pub page_view: &'a CompiledNode,
	pub unmatched: UnmatchedSlotPolicy,
}

impl SlotFiller<'_> {
	/// Fills the slots of a resolved layout view.
	pub fn fill_layout(&self, view: &CompiledNode) -> CompiledNode {
		self.fill(view, Pass::Layout)
	}

	fn fill(&self, node: &CompiledNode, pass: Pass) -> CompiledNode {
		match node {
			CompiledNode::Slot { name } => self.fill_slot(node, name.as_deref(), pass),
			CompiledNode::Element {
				tag,
				ref_name,
				props,
				children,
			} => CompiledNode::Element {
				tag: tag.clone(),
				ref_name: ref_name.clone(),
				props: props.clone(),
				children: self.fill_all(children, pass),
			},
			CompiledNode::If {
				condition,
				then,
				otherwise,
			} => CompiledNode::If {
				condition: condition.clone(),
				then: self.fill_boxed(then, pass),
				otherwise: otherwise.as_ref().map(|node| self.fill_boxed(node, pass)),
			},
			CompiledNode::Each {
				items,
				binding,
				index,
				key,
				body,
			} => CompiledNode::Each {
				items: items.clone(),
				binding: binding.clone(),
				index: index.clone(),
				key: key.clone(),
				body: self.fill_boxed(body, pass),
			},
			CompiledNode::Portal { target, children } => CompiledNode::Portal {
				target: target.clone(),
				children: self.fill_all(children, pass),
			},
			CompiledNode::Island {
				id,
				strategy,
				options,
				content,
				state,
				actions,
			} => CompiledNode::Island {
				id: id.clone(),
				strategy: *strategy,
				options: options.clone(),
				content: self.fill_boxed(content, pass),
				state: state.clone(),
				actions: actions.clone(),
			},
			CompiledNode::Suspense {
				id,
				fallback,
				content,
			} => CompiledNode::Suspense {
				id: id.clone(),
				fallback: self.fill_boxed(fallback, pass),
				content: self.fill_boxed(content, pass),
			},
			CompiledNode::ErrorBoundary { fallback, content } => CompiledNode::ErrorBoundary {
				fallback: self.fill_boxed(fallback, pass),
				content: self.fill_boxed(content, pass),
			},
			CompiledNode::LocalState {
				state,
				actions,
				child,
			} => CompiledNode::LocalState {
				state: state.clone(),
				actions: actions.clone(),
				child: self.fill_boxed(child, pass),
			},
			CompiledNode::Text { .. }
			| CompiledNode::Markdown { .. }
			| CompiledNode::Code { .. } => node.clone(),
		}
	}

	fn fill_slot(&self, slot: &CompiledNode, name: Option<&str>, pass: Pass) -> CompiledNode {
		match name.filter(|name| !name.is_empty()) {
			Some(name) => match self.named.get(name) {
				Some(content) => content.clone(),
				None => match self.unmatched {
					UnmatchedSlotPolicy::Empty => CompiledNode::empty_text(),
					UnmatchedSlotPolicy::Preserve => slot.clone(),
				},
			},
			None => match pass {
				Pass::Layout => self.fill(self.page_view, Pass::PageContent),
				Pass::PageContent => slot.clone(),
			},
		}
	}

	fn fill_all(&self, nodes: &[CompiledNode], pass: Pass) -> Vec<CompiledNode> {
		nodes.iter().map(|node| self.fill(node, pass)).collect()
	}

	fn fill_boxed(&self, node: &CompiledNode, pass: Pass) -> Box<CompiledNode> {
		Box::new(self.fill(node, pass))
	}
}
