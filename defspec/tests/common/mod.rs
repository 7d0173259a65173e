//! Shared helpers for defspec integration tests.
#![allow(dead_code)]

use defspec::api::compile_str;
use defspec::{ModuleRegistry, Value, ValueModule, Vm};
use defspec_runtime::{Diagnostic, IntegerRange, TextPattern};

/// Trims surrounding whitespace, so a validated parameter is visibly
/// rebound to the module's output.
#[derive(Debug)]
pub struct Trimmed;

impl ValueModule for Trimmed {
    fn default(&self) -> Result<Value, Diagnostic> {
        Ok(Value::text(""))
    }

    fn validate(&self, value: &Value) -> Result<Value, Diagnostic> {
        match value.as_text() {
            Some(s) => Ok(Value::text(s.trim())),
            None => Err(Diagnostic::new(format!("must be text, got: {}", value))),
        }
    }
}

/// `Count`: integers >= 0, default 0. `Name`: non-empty text, no default.
/// `Trimmed`: see [`Trimmed`].
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register("Count", IntegerRange::new(Some(0), None));
    registry.register("Name", TextPattern::any().with_length(1, None).without_default());
    registry.register("Trimmed", Trimmed);
    registry
}

pub fn vm(source: &str) -> Vm {
    let program = compile_str(source).unwrap_or_else(|e| panic!("{}", e.format_with_context(source)));
    Vm::new(program, registry()).unwrap()
}

pub fn int(n: i64) -> Value {
    Value::Int(n)
}

pub fn text(s: &str) -> Value {
    Value::text(s)
}

pub fn atom(s: &str) -> Value {
    Value::atom(s)
}

/// Atom-keyed map.
pub fn map(entries: &[(&str, Value)]) -> Value {
    Value::map(entries.iter().map(|(k, v)| (Value::atom(*k), v.clone())))
}

pub fn record(type_name: &str, fields: &[(&str, Value)]) -> Value {
    Value::Record {
        type_name: type_name.to_string(),
        fields: fields.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
    }
}
