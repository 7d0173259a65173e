//! Declaration synthesis.
//!
//! Turns each lowered [`FunctionSpec`] into a [`GeneratedDecl`]:
//! - [`guard`]: `guard[T]` parameters → dispatch predicate
//! - [`validation`]: `validate[M]` parameters → validation statements
//! - [`clauses`]: body classification and one implementation per clause
//! - [`emit`]: signature, forward declaration, duplicate detection

pub mod clauses;
pub mod emit;
pub mod guard;
pub mod validation;

#[cfg(debug_assertions)]
use std::sync::OnceLock;

use crate::error::CompileError;
use crate::ir::decl::{CompiledModule, GeneratedDecl, Program};
use crate::ir::spec::FunctionSpec;
use crate::lowering::ModuleSpec;
use crate::schema::{check_field_cycles, compile_schema};
use emit::SignatureScope;

pub type SynthResult<T> = Result<T, CompileError>;

#[cfg(debug_assertions)]
fn compile_debug_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("DEFSPEC_COMPILE_DEBUG").is_ok())
}

#[cfg(debug_assertions)]
fn compile_debug_log(args: std::fmt::Arguments<'_>) {
    if compile_debug_enabled() {
        use std::io::Write;
        let _ = writeln!(std::io::stderr(), "{args}");
    }
}

/// The module a function is compiled in; `self` refers to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    pub name: String,
}

impl ModuleContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

pub fn compile_function(spec: FunctionSpec, ctx: &ModuleContext) -> SynthResult<GeneratedDecl> {
    let implementations = clauses::expand(&spec, ctx)?;
    #[cfg(debug_assertions)]
    compile_debug_log(format_args!(
        "[defspec] {}.{}/{}: {} implementation(s)",
        ctx.name,
        spec.name,
        spec.arity(),
        implementations.len()
    ));
    Ok(emit::emit(spec, implementations))
}

/// Compile one module. Struct operations are declared before user
/// functions, so a user `new` clashes with the generated one.
pub fn compile_module(module: ModuleSpec) -> SynthResult<CompiledModule> {
    let ctx = ModuleContext::new(module.name.as_str());
    let mut scope = SignatureScope::new(module.name.as_str());
    let mut functions = Vec::new();

    let record = match &module.schema {
        Some(schema) => {
            let compiled = compile_schema(schema, &module.name)?;
            for spec in compiled.functions {
                scope.declare(&spec.name, spec.span)?;
                functions.push(compile_function(spec, &ctx)?);
            }
            Some(compiled.record)
        }
        None => None,
    };

    for spec in module.functions {
        scope.declare(&spec.name, spec.span)?;
        functions.push(compile_function(spec, &ctx)?);
    }

    Ok(CompiledModule {
        name: module.name,
        functions,
        record,
    })
}

pub fn compile_modules(modules: Vec<ModuleSpec>) -> SynthResult<Program> {
    check_field_cycles(&modules)?;
    let modules = modules
        .into_iter()
        .map(compile_module)
        .collect::<SynthResult<Vec<_>>>()?;
    Ok(Program { modules })
}
