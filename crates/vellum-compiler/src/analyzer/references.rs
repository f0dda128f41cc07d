//! Name resolution checks over views, expressions and action steps.

use std::collections::HashSet;

use indexmap::IndexMap;
use vellum_ast::{
	ActionDefinition, ActionStep, ComponentDef, Expression, ParamDef, PropValue, RouteSource,
	StateField, StateInitial, ViewNode,
};

use super::context::AnalysisContext;
use crate::error::{Diagnostic, ErrorCode};

/// Which kind of program is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Source {
	Page,
	Layout,
}

/// Names visible at one point of the walk.
#[derive(Debug, Clone, Default)]
struct Scope<'a> {
	/// `each` bindings and lambda params.
	vars: Vec<&'a str>,
	/// Component-local and island state.
	local_state: Vec<&'a str>,
	/// Component-local and island actions.
	local_actions: Vec<&'a str>,
	/// Declared params of the component being checked.
	params: Option<&'a IndexMap<String, ParamDef>>,
	/// Inside a component definition, where unknown vars may come from the
	/// call site.
	in_component: bool,
	/// Inside action steps, where vars may name step results.
	in_action: bool,
}

impl<'a> Scope<'a> {
	fn with_vars(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
		let mut scope = self.clone();
		scope.vars.extend(names);
		scope
	}

	fn in_action(&self) -> Self {
		Self {
			in_action: true,
			..self.clone()
		}
	}
}

pub(super) struct ReferenceChecker<'a> {
	ctx: &'a AnalysisContext,
	components: &'a IndexMap<String, ComponentDef>,
	source: Source,
	max_depth: usize,
	/// Ref names declared in the tree currently being walked.
	refs: HashSet<String>,
	diagnostics: Vec<Diagnostic>,
}

impl<'a> ReferenceChecker<'a> {
	pub(super) fn new(
		ctx: &'a AnalysisContext,
		components: &'a IndexMap<String, ComponentDef>,
		source: Source,
		max_depth: usize,
	) -> Self {
		Self {
			ctx,
			components,
			source,
			max_depth,
			refs: HashSet::new(),
			diagnostics: Vec::new(),
		}
	}

	pub(super) fn finish(self) -> Vec<Diagnostic> {
		self.diagnostics
	}

	fn report(&mut self, code: ErrorCode, message: impl Into<String>, path: &str) {
		self.diagnostics.push(Diagnostic::new(code, message, path));
	}

	/// Returns `false` (after reporting) once `depth` passes the ceiling.
	fn within_depth(&mut self, depth: usize, path: &str) -> bool {
		if depth > self.max_depth {
			self.report(
				ErrorCode::MaxDepthExceeded,
				format!("nesting exceeds the maximum depth of {}", self.max_depth),
				path,
			);
			return false;
		}
		true
	}

	pub(super) fn check_state(&mut self, fields: &'a IndexMap<String, StateField>, path: &str) {
		self.check_state_fields(fields, path, &Scope::default());
	}

	pub(super) fn check_actions(&mut self, actions: &'a [ActionDefinition], path: &str) {
		self.check_action_list(actions, path, &Scope::default());
	}

	pub(super) fn check_action_name(&mut self, name: &str, path: &str) {
		self.check_action_ref(name, path, &Scope::default());
	}

	pub(super) fn check_expression(&mut self, expr: &'a Expression, path: &str) {
		self.check_expr(expr, path, &Scope::default(), 0);
	}

	pub(super) fn check_view(&mut self, view: &'a ViewNode, path: &str) {
		self.refs.clear();
		self.check_node(view, path, &Scope::default(), 0);
	}

	/// Checks one component definition in its own scope.
	pub(super) fn check_component(&mut self, name: &str, def: &'a ComponentDef) {
		let base = format!("/components/{name}");
		let mut scope = Scope {
			params: Some(&def.params),
			in_component: true,
			..Scope::default()
		};
		if let Some(local_state) = &def.local_state {
			scope
				.local_state
				.extend(local_state.keys().map(String::as_str));
			self.check_state_fields(local_state, &format!("{base}/localState"), &scope);
		}
		scope
			.local_actions
			.extend(def.local_actions.iter().map(|a| a.name.as_str()));
		self.check_action_list(&def.local_actions, &format!("{base}/localActions"), &scope);

		self.refs.clear();
		self.check_node(&def.view, &format!("{base}/view"), &scope, 0);
	}

	fn check_state_fields(
		&mut self,
		fields: &'a IndexMap<String, StateField>,
		path: &str,
		scope: &Scope<'a>,
	) {
		for (name, field) in fields {
			if let StateInitial::Expression(expr) = &field.initial {
				self.check_expr(expr, &format!("{path}/{name}/initial"), scope, 0);
			}
		}
	}

	fn check_action_list(
		&mut self,
		actions: &'a [ActionDefinition],
		path: &str,
		scope: &Scope<'a>,
	) {
		let scope = scope.in_action();
		for (i, action) in actions.iter().enumerate() {
			self.check_steps(&action.steps, &format!("{path}/{i}/steps"), &scope, 0);
		}
	}

	fn check_action_ref(&mut self, name: &str, path: &str, scope: &Scope<'a>) {
		if !self.ctx.action_names.contains(name) && !scope.local_actions.contains(&name) {
			self.report(
				ErrorCode::UndefinedAction,
				format!("action '{name}' is not defined"),
				path,
			);
		}
	}

	fn check_state_target(&mut self, name: &str, path: &str, scope: &Scope<'a>) {
		if !self.ctx.state_names.contains(name) && !scope.local_state.contains(&name) {
			self.report(
				ErrorCode::UndefinedState,
				format!("state '{name}' is not defined"),
				path,
			);
		}
	}

	fn check_steps(
		&mut self,
		steps: &'a [ActionStep],
		path: &str,
		scope: &Scope<'a>,
		depth: usize,
	) {
		for (i, step) in steps.iter().enumerate() {
			self.check_step(step, &format!("{path}/{i}"), scope, depth + 1);
		}
	}

	fn check_step(&mut self, step: &'a ActionStep, path: &str, scope: &Scope<'a>, depth: usize) {
		if !self.within_depth(depth, path) {
			return;
		}
		let expr = |this: &mut Self, expr: &'a Expression, field: &str| {
			this.check_expr(expr, &format!("{path}/{field}"), scope, depth + 1);
		};
		match step {
			ActionStep::Set { target, value } => {
				self.check_state_target(target, &format!("{path}/target"), scope);
				expr(self, value, "value");
			}
			ActionStep::Update {
				target,
				value,
				index,
				delete_count,
				..
			} => {
				self.check_state_target(target, &format!("{path}/target"), scope);
				let fields = [("value", value), ("index", index), ("deleteCount", delete_count)];
				for (field, value) in fields {
					if let Some(value) = value {
						expr(self, value, field);
					}
				}
			}
			ActionStep::Fetch {
				url,
				body,
				headers,
				on_success,
				on_error,
				..
			} => {
				expr(self, url, "url");
				if let Some(body) = body {
					expr(self, body, "body");
				}
				for (name, value) in headers {
					expr(self, value, &format!("headers/{name}"));
				}
				self.check_steps(on_success, &format!("{path}/onSuccess"), scope, depth);
				self.check_steps(on_error, &format!("{path}/onError"), scope, depth);
			}
			ActionStep::Storage {
				key,
				value,
				on_success,
				on_error,
				..
			} => {
				expr(self, key, "key");
				if let Some(value) = value {
					expr(self, value, "value");
				}
				self.check_steps(on_success, &format!("{path}/onSuccess"), scope, depth);
				self.check_steps(on_error, &format!("{path}/onError"), scope, depth);
			}
			ActionStep::Clipboard {
				value,
				on_success,
				on_error,
				..
			} => {
				if let Some(value) = value {
					expr(self, value, "value");
				}
				self.check_steps(on_success, &format!("{path}/onSuccess"), scope, depth);
				self.check_steps(on_error, &format!("{path}/onError"), scope, depth);
			}
			ActionStep::Navigate { url, .. } => expr(self, url, "url"),
			ActionStep::Import {
				on_success,
				on_error,
				..
			} => {
				self.check_steps(on_success, &format!("{path}/onSuccess"), scope, depth);
				self.check_steps(on_error, &format!("{path}/onError"), scope, depth);
			}
			ActionStep::Call {
				target,
				args,
				on_success,
				on_error,
				..
			} => {
				expr(self, target, "target");
				for (i, arg) in args.iter().enumerate() {
					expr(self, arg, &format!("args/{i}"));
				}
				self.check_steps(on_success, &format!("{path}/onSuccess"), scope, depth);
				self.check_steps(on_error, &format!("{path}/onError"), scope, depth);
			}
			ActionStep::Subscribe { target, action, .. } => {
				expr(self, target, "target");
				self.check_action_ref(action, &format!("{path}/action"), scope);
			}
			ActionStep::Dispose { target }
			| ActionStep::ClearTimer { target }
			| ActionStep::Focus { target, .. } => expr(self, target, "target"),
			ActionStep::Dom {
				selector, value, ..
			} => {
				expr(self, selector, "selector");
				if let Some(value) = value {
					expr(self, value, "value");
				}
			}
			ActionStep::If {
				condition,
				then,
				otherwise,
			} => {
				expr(self, condition, "condition");
				self.check_steps(then, &format!("{path}/then"), scope, depth);
				self.check_steps(otherwise, &format!("{path}/else"), scope, depth);
			}
			ActionStep::Delay { ms, then } => {
				expr(self, ms, "ms");
				self.check_steps(then, &format!("{path}/then"), scope, depth);
			}
			ActionStep::Interval { ms, action, .. } => {
				expr(self, ms, "ms");
				self.check_action_ref(action, &format!("{path}/action"), scope);
			}
			ActionStep::Unknown => {}
		}
	}

	fn check_node(&mut self, node: &'a ViewNode, path: &str, scope: &Scope<'a>, depth: usize) {
		if !self.within_depth(depth, path) {
			return;
		}
		let next = depth + 1;
		match node {
			ViewNode::Element {
				ref_name,
				props,
				children,
				..
			} => {
				if let Some(ref_name) = ref_name
					&& !self.refs.insert(ref_name.clone())
				{
					self.report(
						ErrorCode::DuplicateRef,
						format!("ref '{ref_name}' is declared more than once"),
						path,
					);
				}
				for (name, value) in props {
					let prop_path = format!("{path}/props/{name}");
					match value {
						PropValue::Expression(expr) => {
							self.check_expr(expr, &prop_path, scope, next)
						}
						PropValue::Event(handler) => {
							self.check_action_ref(&handler.action, &prop_path, scope);
							if let Some(payload) = &handler.payload {
								let payload_path = format!("{prop_path}/payload");
								self.check_expr(payload, &payload_path, scope, next);
							}
						}
					}
				}
				self.check_children(children, path, scope, next);
			}
			ViewNode::Text { value } => {
				self.check_expr(value, &format!("{path}/value"), scope, next)
			}
			ViewNode::If {
				condition,
				then,
				otherwise,
			} => {
				self.check_expr(condition, &format!("{path}/condition"), scope, next);
				self.check_node(then, &format!("{path}/then"), scope, next);
				if let Some(otherwise) = otherwise {
					self.check_node(otherwise, &format!("{path}/else"), scope, next);
				}
			}
			ViewNode::Each {
				items,
				binding,
				index,
				key,
				body,
			} => {
				self.check_expr(items, &format!("{path}/items"), scope, next);
				let inner =
					scope.with_vars(std::iter::once(binding.as_str()).chain(index.as_deref()));
				if let Some(key) = key {
					self.check_expr(key, &format!("{path}/key"), &inner, next);
				}
				self.check_node(body, &format!("{path}/body"), &inner, next);
			}
			ViewNode::Component {
				name,
				props,
				children,
			} => {
				if !self.components.contains_key(name) {
					self.report(
						ErrorCode::ComponentNotFound,
						format!("component '{name}' is not defined"),
						path,
					);
				}
				for (prop, value) in props {
					self.check_expr(value, &format!("{path}/props/{prop}"), scope, next);
				}
				self.check_children(children, path, scope, next);
			}
			ViewNode::Slot { name } => {
				let bare = name.as_deref().is_none_or(str::is_empty);
				if bare && self.source == Source::Page && !scope.in_component {
					self.report(
						ErrorCode::SlotOutsideComponent,
						"an unnamed slot is only valid inside a component or layout",
						path,
					);
				}
			}
			ViewNode::Markdown { content } => {
				self.check_expr(content, &format!("{path}/content"), scope, next);
			}
			ViewNode::Code { language, content } => {
				self.check_expr(language, &format!("{path}/language"), scope, next);
				self.check_expr(content, &format!("{path}/content"), scope, next);
			}
			ViewNode::Portal { children, .. } => self.check_children(children, path, scope, next),
			ViewNode::Island {
				content,
				state,
				actions,
				..
			} => {
				let mut inner = scope.clone();
				if let Some(state) = state {
					inner.local_state.extend(state.keys().map(String::as_str));
					self.check_state_fields(state, &format!("{path}/state"), scope);
				}
				if let Some(actions) = actions {
					inner
						.local_actions
						.extend(actions.iter().map(|a| a.name.as_str()));
					self.check_action_list(actions, &format!("{path}/actions"), &inner);
				}
				self.check_node(content, &format!("{path}/content"), &inner, next);
			}
			ViewNode::Suspense {
				fallback, content, ..
			}
			| ViewNode::ErrorBoundary { fallback, content } => {
				self.check_node(fallback, &format!("{path}/fallback"), scope, next);
				self.check_node(content, &format!("{path}/content"), scope, next);
			}
		}
	}

	fn check_children(
		&mut self,
		children: &'a [ViewNode],
		path: &str,
		scope: &Scope<'a>,
		depth: usize,
	) {
		for (i, child) in children.iter().enumerate() {
			self.check_node(child, &format!("{path}/children/{i}"), scope, depth);
		}
	}

	fn check_expr(&mut self, expr: &'a Expression, path: &str, scope: &Scope<'a>, depth: usize) {
		if !self.within_depth(depth, path) {
			return;
		}
		let next = depth + 1;
		match expr {
			Expression::State { name, .. } => {
				let is_param = scope.params.is_some_and(|params| params.contains_key(name));
				if !self.ctx.state_names.contains(name)
					&& !scope.local_state.contains(&name.as_str())
					&& !is_param
				{
					self.report(
						ErrorCode::UndefinedState,
						format!("state '{name}' is not defined"),
						path,
					);
				}
			}
			Expression::Var { name, .. } => {
				let lenient = scope.in_component || scope.in_action;
				if !lenient && !scope.vars.contains(&name.as_str()) {
					self.report(
						ErrorCode::UndefinedVar,
						format!("variable '{name}' is not bound by an enclosing each or lambda"),
						path,
					);
				}
			}
			Expression::Route {
				name,
				source: RouteSource::Param,
			} => {
				if self.source == Source::Page
					&& self.ctx.has_route
					&& !self.ctx.route_params.contains(name)
				{
					self.report(
						ErrorCode::UndefinedRouteParam,
						format!("route has no ':{name}' segment"),
						path,
					);
				}
			}
			Expression::Import { name, .. } => {
				if !self.ctx.import_names.contains(name) {
					self.report(
						ErrorCode::UndefinedImport,
						format!("import '{name}' is not declared"),
						path,
					);
				}
			}
			Expression::Param { name, .. } => match scope.params {
				Some(params) if !params.contains_key(name) => self.report(
					ErrorCode::UndefinedParam,
					format!("param '{name}' is not declared by the component"),
					path,
				),
				None if self.source == Source::Page => self.report(
					ErrorCode::UndefinedParam,
					format!("param '{name}' is referenced outside a component"),
					path,
				),
				_ => {}
			},
			Expression::Binary { left, right, .. } => {
				self.check_expr(left, &format!("{path}/left"), scope, next);
				self.check_expr(right, &format!("{path}/right"), scope, next);
			}
			Expression::Not { operand } => {
				self.check_expr(operand, &format!("{path}/operand"), scope, next);
			}
			Expression::Conditional {
				condition,
				then,
				otherwise,
			} => {
				self.check_expr(condition, &format!("{path}/if"), scope, next);
				self.check_expr(then, &format!("{path}/then"), scope, next);
				self.check_expr(otherwise, &format!("{path}/else"), scope, next);
			}
			Expression::Get { base, .. } => {
				self.check_expr(base, &format!("{path}/base"), scope, next);
			}
			Expression::Index { base, key } => {
				self.check_expr(base, &format!("{path}/base"), scope, next);
				self.check_expr(key, &format!("{path}/key"), scope, next);
			}
			Expression::Call { target, args, .. } => {
				if let Some(target) = target {
					self.check_expr(target, &format!("{path}/target"), scope, next);
				}
				for (i, arg) in args.iter().enumerate() {
					self.check_expr(arg, &format!("{path}/args/{i}"), scope, next);
				}
			}
			Expression::Lambda { param, index, body } => {
				let inner =
					scope.with_vars(std::iter::once(param.as_str()).chain(index.as_deref()));
				self.check_expr(body, &format!("{path}/body"), &inner, next);
			}
			Expression::Array { elements } => {
				for (i, element) in elements.iter().enumerate() {
					self.check_expr(element, &format!("{path}/elements/{i}"), scope, next);
				}
			}
			Expression::Concat { items } => {
				for (i, item) in items.iter().enumerate() {
					self.check_expr(item, &format!("{path}/items/{i}"), scope, next);
				}
			}
			Expression::Literal { .. }
			| Expression::Route { .. }
			| Expression::Data { .. }
			| Expression::Ref { .. } => {}
		}
	}
}
