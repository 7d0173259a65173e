//! Compile-time errors.

mod compile;

pub use compile::{CompileError, CompileErrorKind, CompileResult};
