//! Component call graph checks: expansion cycles and expansion chain length.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use vellum_ast::{ComponentDef, ViewNode};

use crate::error::{Diagnostic, ErrorCode};

/// Which components each component's view calls.
struct CallGraph<'a> {
	edges: IndexMap<&'a str, IndexSet<&'a str>>,
}

impl<'a> CallGraph<'a> {
	fn new(components: &'a IndexMap<String, ComponentDef>) -> Self {
		let edges = components
			.iter()
			.map(|(name, def)| {
				let mut calls = IndexSet::new();
				collect_calls(&def.view, &mut calls);
				(name.as_str(), calls)
			})
			.collect();
		Self { edges }
	}

	fn reaches(&self, from: &str, target: &str) -> bool {
		let mut stack: Vec<&str> = self
			.edges
			.get(from)
			.map(|calls| calls.iter().copied().collect())
			.unwrap_or_default();
		let mut seen = IndexSet::new();
		while let Some(name) = stack.pop() {
			if name == target {
				return true;
			}
			if !seen.insert(name) {
				continue;
			}
			if let Some(calls) = self.edges.get(name) {
				stack.extend(calls.iter().copied());
			}
		}
		false
	}

	/// Length of the longest expansion chain starting at `name`, counting
	/// `name` itself. `None` when the chain runs into a cycle.
	fn chain_len(
		&self,
		name: &'a str,
		cyclic: &IndexSet<&str>,
		memo: &mut HashMap<&'a str, Option<usize>>,
	) -> Option<usize> {
		if cyclic.contains(name) {
			return None;
		}
		if let Some(known) = memo.get(name) {
			return *known;
		}
		let mut longest = 0;
		let mut result = Some(1);
		if let Some(calls) = self.edges.get(name) {
			for &callee in calls {
				if !self.edges.contains_key(callee) {
					continue;
				}
				match self.chain_len(callee, cyclic, memo) {
					Some(len) => longest = longest.max(len),
					None => result = None,
				}
			}
		}
		let result = result.map(|_| longest + 1);
		memo.insert(name, result);
		result
	}
}

/// Reports every component whose expansion reaches itself, and every
/// component at which an acyclic expansion chain first grows past
/// `max_depth`.
pub(super) fn check_component_graph(
	components: &IndexMap<String, ComponentDef>,
	max_depth: usize,
) -> Vec<Diagnostic> {
	let graph = CallGraph::new(components);
	let cyclic: IndexSet<&str> = graph
		.edges
		.keys()
		.copied()
		.filter(|name| graph.reaches(name, name))
		.collect();

	let mut diagnostics: Vec<_> = cyclic
		.iter()
		.map(|name| {
			Diagnostic::new(
				ErrorCode::ComponentCycle,
				format!("component '{name}' expands into itself"),
				format!("/components/{name}"),
			)
		})
		.collect();

	let mut memo = HashMap::new();
	for name in graph.edges.keys().copied() {
		if graph.chain_len(name, &cyclic, &mut memo) == Some(max_depth + 1) {
			diagnostics.push(Diagnostic::new(
				ErrorCode::MaxDepthExceeded,
				format!(
					"component '{name}' expands {} components deep, past the maximum of {max_depth}",
					max_depth + 1
				),
				format!("/components/{name}"),
			));
		}
	}
	diagnostics
}

fn collect_calls<'a>(node: &'a ViewNode, calls: &mut IndexSet<&'a str>) {
	match node {
		ViewNode::Component {
			name, children, ..
		} => {
			calls.insert(name.as_str());
			children.iter().for_each(|child| collect_calls(child, calls));
		}
		ViewNode::Element { children, .. } | ViewNode::Portal { children, .. } => {
			children.iter().for_each(|child| collect_calls(child, calls));
		}
		ViewNode::If {
			then, otherwise, ..
		} => {
			collect_calls(then, calls);
			if let Some(otherwise) = otherwise {
				collect_calls(otherwise, calls);
			}
		}
		ViewNode::Each { body, .. } => collect_calls(body, calls),
		ViewNode::Island { content, .. } => collect_calls(content, calls),
		ViewNode::Suspense {
			fallback, content, ..
		}
		| ViewNode::ErrorBoundary { fallback, content } => {
			collect_calls(fallback, calls);
			collect_calls(content, calls);
		}
		ViewNode::Text { .. }
		| ViewNode::Slot { .. }
		| ViewNode::Markdown { .. }
		| ViewNode::Code { .. } => {}
	}
}
