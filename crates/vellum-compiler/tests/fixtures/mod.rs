//! Shared builders for compiler integration tests.

#![allow(dead_code)]

use std::sync::Once;

use serde_json::{Value, json};
use vellum_ast::ir::{CompiledLayoutProgram, CompiledProgram};
use vellum_ast::{LayoutProgram, Program, ViewNode};
use vellum_compiler::{CompileOptions, compile, compile_layout};

static INIT: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
///
/// Set `RUST_LOG=vellum_compiler=debug` to see pipeline logs.
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_test_writer()
			.try_init();
	});
}

pub fn lit(value: impl Into<Value>) -> Value {
	json!({ "expr": "lit", "value": value.into() })
}

pub fn param(name: &str) -> Value {
	json!({ "expr": "param", "name": name })
}

pub fn text(value: &str) -> Value {
	json!({ "kind": "text", "value": lit(value) })
}

pub fn element(tag: &str, children: Vec<Value>) -> Value {
	json!({ "kind": "element", "tag": tag, "children": children })
}

pub fn slot(name: Option<&str>) -> Value {
	match name {
		Some(name) => json!({ "kind": "slot", "name": name }),
		None => json!({ "kind": "slot" }),
	}
}

pub fn program(value: Value) -> Program {
	serde_json::from_value(value).expect("page fixture should deserialize")
}

pub fn layout(value: Value) -> LayoutProgram {
	serde_json::from_value(value).expect("layout fixture should deserialize")
}

pub fn view(value: Value) -> ViewNode {
	serde_json::from_value(value).expect("view fixture should deserialize")
}

/// A page program with only a view.
pub fn page_with_view(view: Value) -> Program {
	program(json!({ "version": "1.0", "view": view }))
}

/// A layout program with only a view.
pub fn layout_with_view(view: Value) -> LayoutProgram {
	layout(json!({ "version": "1.0", "type": "layout", "view": view }))
}

pub fn compiled(program: &Program) -> CompiledProgram {
	compile(program, &CompileOptions::default()).expect("page fixture should compile")
}

pub fn compiled_layout(layout: &LayoutProgram, options: &CompileOptions) -> CompiledLayoutProgram {
	compile_layout(layout, options).expect("layout fixture should compile")
}
