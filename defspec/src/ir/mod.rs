//! Intermediate representations.
//!
//! - [`core`]: expressions, patterns and statements after name resolution
//! - [`binding`]: per-function binding arena
//! - [`spec`]: lowered function definitions (compiler input)
//! - [`decl`]: emitted declarations (compiler output)

pub mod binding;
pub mod core;
pub mod decl;
mod render;
pub mod spec;
