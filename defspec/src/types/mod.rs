//! Declared parameter and return types.

mod base;
mod type_expr;

pub use base::BaseType;
pub use type_expr::{GenericConstraint, ModuleRef, TypeExpr};
