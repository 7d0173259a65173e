//! Rust API for compiling and calling defspec code.
//!
//! Thin wrappers over [`crate::pipeline`] and [`crate::vm`] for programmatic
//! and CLI use.

use std::path::Path;

use defspec_parser::ast::{Expr, ExprKind, UnaryOp};
use defspec_runtime::{ModuleRegistry, Value};

use crate::config::CompilerConfig;
use crate::ir::decl::Program;
use crate::pipeline::{parse_and_compile, PipelineResult};
use crate::vm::Vm;

/// Compile with the default configuration.
pub fn compile_str(source: &str) -> PipelineResult {
    parse_and_compile(source, &CompilerConfig::default())
}

/// Read and compile a file. Errors are rendered with source context.
pub fn compile_file(path: &Path, config: &CompilerConfig) -> Result<Program, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    parse_and_compile(&source, config).map_err(|e| e.format_with_context(&source))
}

/// Textual declarations for every module.
pub fn render_program(program: &Program) -> String {
    program.to_string()
}

/// Compile source to emitted declarations as JSON.
pub fn compile_to_json(source: &str, config: &CompilerConfig) -> Result<String, String> {
    let program = parse_and_compile(source, config).map_err(|e| e.to_string())?;
    program_to_json(&program)
}

pub fn program_to_json(program: &Program) -> Result<String, String> {
    serde_json::to_string_pretty(program).map_err(|e| format!("serialization error: {}", e))
}

/// Compile `source`, then call `qualified` (`Module.function`) with `args`.
pub fn compile_and_call(
    source: &str,
    registry: ModuleRegistry,
    qualified: &str,
    args: Vec<Value>,
) -> Result<Value, String> {
    let config = CompilerConfig::default();
    let program = parse_and_compile(source, &config).map_err(|e| e.to_string())?;
    let vm = Vm::with_config(program, registry, &config)
        .map_err(|e| format!("runtime error: {}", e))?;
    vm.call_qualified(qualified, args)
        .map_err(|e| format!("runtime error: {}", e))
}

/// Parse a constant such as `42`, `:ok`, `"text"`, `[1, 2]` or
/// `%{count: 2}` into a value. Used for CLI call arguments.
pub fn parse_value(text: &str) -> Result<Value, String> {
    let expr = defspec_parser::parse_expression(text).map_err(|e| e.to_string())?;
    constant_value(&expr)
}

fn constant_value(expr: &Expr) -> Result<Value, String> {
    let all = |items: &[Expr]| items.iter().map(constant_value).collect::<Result<Vec<_>, _>>();
    match &expr.kind {
        ExprKind::Integer(n) => Ok(Value::Int(*n)),
        ExprKind::Float(x) => Ok(Value::Float(*x)),
        ExprKind::Text(s) => Ok(Value::text(s.as_str())),
        ExprKind::Atom(a) => Ok(Value::atom(a.as_str())),
        ExprKind::Bool(b) => Ok(Value::Bool(*b)),
        ExprKind::Nil => Ok(Value::Nil),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => match constant_value(operand)? {
            Value::Int(n) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| format!("integer overflow: -({})", n)),
            Value::Float(x) => Ok(Value::Float(-x)),
            other => Err(format!("cannot negate {}", other)),
        },
        ExprKind::Paren(items) if items.len() == 1 => constant_value(&items[0]),
        ExprKind::Tuple(items) => Ok(Value::Tuple(all(items)?)),
        ExprKind::List { items, tail } => {
            let mut values = all(items)?;
            if let Some(tail) = tail {
                match constant_value(tail)? {
                    Value::List(rest) => values.extend(rest),
                    other => return Err(format!("list tail must be a list, got {}", other)),
                }
            }
            Ok(Value::List(values))
        }
        ExprKind::Map(entries) => {
            let mut pairs = Vec::with_capacity(entries.len());
            for entry in entries {
                pairs.push((constant_value(&entry.key)?, constant_value(&entry.value)?));
            }
            Ok(Value::map(pairs))
        }
        _ => Err(format!(
            "not a constant: {}",
            crate::lowering::describe_expr(expr)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_to_json() {
        let json = compile_to_json("def one() -> integer { 1 }", &CompilerConfig::default())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let function = &parsed["modules"][0]["functions"][0];
        assert_eq!(function["name"], "one");
        assert_eq!(function["signature"]["return_type"]["base"], "integer");
    }

    #[test]
    fn test_compile_and_call() {
        let source = "module M { def add(a: integer, b: integer \\\\ 1) { a + b } }";
        let value = compile_and_call(source, ModuleRegistry::new(), "M.add", vec![Value::Int(2)])
            .unwrap();
        assert_eq!(value, Value::Int(3));

        let err = compile_and_call(source, ModuleRegistry::new(), "M.add", vec![Value::text("x")])
            .unwrap_err();
        assert!(err.starts_with("runtime error: "), "got {}", err);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("-3").unwrap(), Value::Int(-3));
        assert_eq!(parse_value(":ok").unwrap(), Value::atom("ok"));
        assert_eq!(
            parse_value("%{count: 2}").unwrap(),
            Value::map([(Value::atom("count"), Value::Int(2))])
        );
        assert_eq!(
            parse_value("{1, [2 | [3]]}").unwrap(),
            Value::Tuple(vec![
                Value::Int(1),
                Value::List(vec![Value::Int(2), Value::Int(3)])
            ])
        );
        assert!(parse_value("x + 1").unwrap_err().starts_with("not a constant"));
    }

    #[test]
    fn test_compile_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.defspec");
        std::fs::write(&path, "def f(x: guard[Name]) { x }\n").unwrap();
        let err = compile_file(&path, &CompilerConfig::default()).unwrap_err();
        assert!(err.contains("1 | def f(x: guard[Name]) { x }"), "got {}", err);

        let err = compile_file(&dir.path().join("missing"), &CompilerConfig::default())
            .unwrap_err();
        assert!(err.starts_with("cannot read "));
    }
}
