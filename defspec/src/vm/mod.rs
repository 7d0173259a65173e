//! Interpreter for emitted declarations.
//!
//! A call resolves defaults from the forward declaration, then tries each
//! implementation in order: patterns first, then the guard. The first match
//! runs its body. When nothing matches the call fails with
//! [`RuntimeError::NoClauseMatch`].

mod builtins;
mod eval;
mod frame;
mod matching;
pub mod record;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use defspec_runtime::{ModuleRegistry, RuntimeError, RuntimeResult, Value, ValueModule};

use crate::config::CompilerConfig;
use crate::ir::decl::{GeneratedDecl, Program, RecordDef};
use eval::Env;
use frame::Frame;
use record::RecordSchema;

/// Check if dispatch debug logging is enabled via `DEFSPEC_DISPATCH_DEBUG`.
#[cfg(debug_assertions)]
fn dispatch_debug_enabled() -> bool {
    use std::sync::OnceLock;
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("DEFSPEC_DISPATCH_DEBUG").is_ok())
}

#[cfg(debug_assertions)]
fn dispatch_debug_log(args: std::fmt::Arguments<'_>) {
    use std::io::Write;
    let _ = writeln!(std::io::stderr(), "{args}");
}

struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

#[derive(Debug)]
pub struct Vm {
    program: Program,
    registry: ModuleRegistry,
    schemas: HashMap<String, Rc<RecordSchema>>,
    max_call_depth: usize,
    depth: Cell<usize>,
}

impl Vm {
    pub fn new(program: Program, registry: ModuleRegistry) -> RuntimeResult<Self> {
        Self::with_config(program, registry, &CompilerConfig::default())
    }

    /// Build the VM. Every struct becomes a value module registered under
    /// its module name; structs whose fields use other structs are built
    /// after them.
    pub fn with_config(
        program: Program,
        registry: ModuleRegistry,
        config: &CompilerConfig,
    ) -> RuntimeResult<Self> {
        let mut registry = registry;
        let mut schemas = HashMap::new();
        let mut pending: Vec<&RecordDef> = program.records().collect();
        while !pending.is_empty() {
            let ready = pending.iter().position(|def| {
                def.fields
                    .iter()
                    .all(|f| registry.contains(f.module.name()))
            });
            let Some(index) = ready else {
                let (owner, missing) = pending
                    .iter()
                    .flat_map(|def| def.fields.iter().map(move |f| (def, f)))
                    .find(|(_, f)| !registry.contains(f.module.name()))
                    .map(|(def, f)| (def.name.clone(), f.module.name().to_string()))
                    .unwrap_or_default();
                if pending.iter().any(|def| def.name == missing) {
                    return Err(RuntimeError::type_error(format!(
                        "struct {} cannot be built: its fields lead back to {}",
                        owner, missing
                    )));
                }
                return Err(RuntimeError::unknown_module(missing));
            };
            let def = pending.remove(index);
            let schema = Rc::new(RecordSchema::build(def, &registry)?);
            registry.register_shared(def.name.as_str(), schema.clone());
            schemas.insert(def.name.clone(), schema);
        }

        Ok(Self {
            program,
            registry,
            schemas,
            max_call_depth: config.max_call_depth,
            depth: Cell::new(0),
        })
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Call `module.function(args...)`.
    ///
    /// Compiled functions take precedence. Otherwise a value module answers
    /// `validate/1` with `{:ok, v}` / `{:error, message}` and `default/0`
    /// with its default.
    pub fn call(&self, module: &str, function: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        if let Some(decl) = self.program.function(module, function) {
            return self.invoke(module, decl, args);
        }
        match self.registry.get(module) {
            Some(value_module) => call_contract(module, value_module.as_ref(), function, args),
            None if self.program.module(module).is_some() => Err(
                RuntimeError::undefined_function(format!("{}.{}/{}", module, function, args.len())),
            ),
            None => Err(RuntimeError::unknown_module(module)),
        }
    }

    /// Call a dotted name such as `Accounts.Users.find`.
    pub fn call_qualified(&self, qualified: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        match qualified.rsplit_once('.') {
            Some((module, function)) => self.call(module, function, args),
            None => Err(RuntimeError::undefined_function(qualified)),
        }
    }

    fn invoke(&self, module: &str, decl: &GeneratedDecl, args: Vec<Value>) -> RuntimeResult<Value> {
        if self.depth.get() >= self.max_call_depth {
            return Err(RuntimeError::StackOverflow(self.max_call_depth));
        }
        self.depth.set(self.depth.get() + 1);
        let _guard = DepthGuard(&self.depth);

        let args = self.apply_defaults(module, decl, args)?;

        for (index, imp) in decl.implementations.iter().enumerate() {
            let mut env = Env {
                module,
                decl,
                frame: Frame::new(decl.bindings.len()),
            };
            if !matching::match_all(&imp.patterns, &args, &mut env.frame) {
                continue;
            }
            let passes = match &imp.guard {
                Some(guard) => self.eval_guard(guard, &mut env),
                None => true,
            };
            if !passes {
                continue;
            }
            #[cfg(debug_assertions)]
            if dispatch_debug_enabled() {
                dispatch_debug_log(format_args!(
                    "[dispatch] {}.{}/{} -> implementation {}",
                    module,
                    decl.name,
                    decl.arity(),
                    index
                ));
            }
            #[cfg(not(debug_assertions))]
            let _ = index;
            return self.exec_block(&imp.body, &mut env);
        }

        Err(RuntimeError::NoClauseMatch {
            function: format!("{}.{}/{}", module, decl.name, decl.arity()),
            args,
        })
    }

    /// Fill omitted arguments. With `k` optional parameters and `n` extra
    /// arguments, the leftmost `n` optional parameters take the arguments.
    fn apply_defaults(
        &self,
        module: &str,
        decl: &GeneratedDecl,
        args: Vec<Value>,
    ) -> RuntimeResult<Vec<Value>> {
        let forward = &decl.forward;
        if !forward.accepts(args.len()) {
            let (required, arity) = (forward.required_arity(), forward.arity());
            return Err(RuntimeError::ArityMismatch {
                function: format!("{}.{}", module, decl.name),
                expected: if required == arity {
                    arity.to_string()
                } else {
                    format!("{}..{}", required, arity)
                },
                got: args.len(),
            });
        }
        if args.len() == forward.arity() {
            return Ok(args);
        }

        let mut optional_budget = args.len() - forward.required_arity();
        let mut supplied = args.into_iter();
        let mut full = Vec::with_capacity(forward.arity());
        for param in &forward.params {
            match &param.default {
                Some(default) if optional_budget == 0 => {
                    let mut env = Env {
                        module,
                        decl,
                        frame: Frame::new(decl.bindings.len()),
                    };
                    full.push(self.eval_expr(default, &mut env)?);
                }
                Some(_) => {
                    optional_budget -= 1;
                    full.extend(supplied.next());
                }
                None => full.extend(supplied.next()),
            }
        }
        Ok(full)
    }

    fn schema(&self, record: &str) -> RuntimeResult<&RecordSchema> {
        self.schemas
            .get(record)
            .map(Rc::as_ref)
            .ok_or_else(|| RuntimeError::unknown_module(record))
    }
}

fn call_contract(
    module: &str,
    value_module: &dyn ValueModule,
    function: &str,
    args: Vec<Value>,
) -> RuntimeResult<Value> {
    match (function, args.as_slice()) {
        ("validate", [value]) => Ok(match value_module.validate(value) {
            Ok(v) => Value::ok(v),
            Err(d) => Value::error(Value::text(d.message())),
        }),
        ("default", []) => Ok(match value_module.default() {
            Ok(v) => v,
            Err(d) => Value::error(Value::text(d.message())),
        }),
        _ => Err(RuntimeError::undefined_function(format!(
            "{}.{}/{}",
            module,
            function,
            args.len()
        ))),
    }
}
