//! Resolution of type annotations into [`TypeExpr`]s.

use defspec_parser::ast::{Expr, ExprKind};

use super::super::{describe_expr, LowerResult};
use crate::error::{CompileError, CompileErrorKind};
use crate::types::{BaseType, ModuleRef, TypeExpr};

/// Resolve a (descriptor-stripped) type annotation.
///
/// - a name from the `where` list is a type variable
/// - `self` is the enclosing module's type
/// - a lowercase base name is a base type
/// - a capitalized name or dotted path is a value module
pub fn resolve_type(expr: &Expr, type_vars: &[&str]) -> LowerResult<TypeExpr> {
    if let ExprKind::Ident(name) = &expr.kind {
        if type_vars.contains(&name.as_str()) {
            return Ok(TypeExpr::Var(name.clone()));
        }
        if name == "self" {
            return Ok(TypeExpr::SelfType);
        }
        if let Some(base) = BaseType::from_name(name) {
            return Ok(TypeExpr::Base(base));
        }
    }

    match expr.as_path() {
        Some(path) if path.starts_with(|c: char| c.is_ascii_uppercase()) => {
            Ok(TypeExpr::External(ModuleRef(path)))
        }
        Some(path) => Err(CompileError::new(
            CompileErrorKind::InvalidTypeExpr(format!("unknown type {}", path)),
            expr.span,
        )
        .with_hint(format!(
            "expected one of {}, self, or a module name",
            BaseType::names()
        ))),
        None => Err(CompileError::new(
            CompileErrorKind::InvalidTypeExpr(describe_expr(expr).to_string()),
            expr.span,
        )),
    }
}
