//! defspec runtime library
//!
//! Support code shared by the compiler and its interpreter:
//!
//! - `Value` enum for dynamically typed runtime values
//! - `RuntimeError` for fatal runtime failures
//! - Dynamic operator dispatch
//! - The value module contract (`ValueModule`, `Diagnostic`) and a registry
//! - Reference bounded value modules (ranges, text patterns, enumerations)

#![deny(clippy::print_stderr)]

pub mod bounded;
pub mod dispatch;
pub mod error;
pub mod module;
pub mod value;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use defspec_runtime::prelude::*;
///
/// let mut registry = ModuleRegistry::new();
/// registry.register("Count", IntegerRange::new(Some(0), None));
/// assert!(registry.get("Count").is_some());
/// ```
pub mod prelude {
    pub use super::bounded::{AtomEnum, BoundedList, FloatRange, IntegerRange, TextPattern};
    pub use super::dispatch::{compare, dynamic_binop, loose_eq, BinOp};
    pub use super::error::{RuntimeError, RuntimeResult};
    pub use super::module::{Diagnostic, ModuleRegistry, ValueModule};
    pub use super::value::Value;
}

pub use prelude::*;
