//! defspec
//!
//! A declarative function-definition compiler. Each `def` carries a typed
//! parameter list whose entries may request a default value, a runtime type
//! guard or validation through a value module. The compiler turns every
//! definition into one signature declaration, one forward declaration and
//! one or more implementations, and the [`vm`] executes the result.
//!
//! ```text
//! source ── defspec_parser ──► ast
//!        ── lowering ───────► FunctionSpec (hygienic bindings)
//!        ── synth ──────────► GeneratedDecl (guards, validation, clauses)
//!        ── vm ─────────────► Value
//! ```

#![deny(clippy::print_stderr)]

pub mod api;
pub mod config;
pub mod error;
pub mod ir;
pub mod lowering;
pub mod pipeline;
pub mod schema;
pub mod span;
pub mod synth;
pub mod types;
pub mod vm;

pub use config::CompilerConfig;
pub use error::{CompileError, CompileErrorKind, CompileResult};
pub use ir::decl::{CompiledModule, GeneratedDecl, Program};
pub use pipeline::{parse_and_compile, PipelineError};
pub use vm::Vm;

pub use defspec_runtime::{ModuleRegistry, RuntimeError, Value, ValueModule};
