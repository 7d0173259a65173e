//! Function lowering: `def` → [`FunctionSpec`].

pub mod descriptor;
pub mod signature;

use std::collections::HashSet;

use defspec_parser::ast::FunctionDef;

use super::expr::{lower_expr, lower_stmts};
use super::pattern::lower_patterns;
use super::scope::Scope;
use super::LowerResult;
use crate::error::{CompileError, CompileErrorKind};
use crate::ir::binding::{BindingKind, BindingTable};
use crate::ir::core::{Block, Expr};
use crate::ir::spec::{ClauseSpec, FunctionBody, FunctionSpec, ParamSpec};
use crate::synth::clauses::{classify, BodyShape};
use crate::types::{GenericConstraint, TypeExpr};
use descriptor::describe;
use signature::resolve_type;

pub fn lower_function(def: &FunctionDef) -> LowerResult<FunctionSpec> {
    let type_vars: Vec<&str> = def.constraints.iter().map(|c| c.name.as_str()).collect();
    let constraints = def
        .constraints
        .iter()
        .map(|c| {
            Ok(GenericConstraint {
                name: c.name.clone(),
                bound: resolve_type(&c.bound, &type_vars)?,
            })
        })
        .collect::<LowerResult<Vec<_>>>()?;

    // Parameters go into the table first so every later fragment sees the
    // same bindings.
    let mut bindings = BindingTable::new();
    let mut seen = HashSet::new();
    let mut params = Vec::with_capacity(def.params.len());
    let mut defaults = Vec::with_capacity(def.params.len());
    for (position, param) in def.params.iter().enumerate() {
        if !seen.insert(param.name.as_str()) {
            return Err(CompileError::new(
                CompileErrorKind::DuplicateParameter(param.name.clone()),
                param.span,
            ));
        }
        let descriptor = describe(&param.ty);
        params.push(ParamSpec {
            name: param.name.clone(),
            binding: bindings.add(param.name.as_str(), BindingKind::Param(position)),
            ty: resolve_type(descriptor.ty, &type_vars)?,
            default: None,
            mode: descriptor.mode,
            span: param.span,
        });
        defaults.push(descriptor.default);
    }

    for (param, default) in params.iter_mut().zip(defaults) {
        if let Some(default) = default {
            param.default = Some(lower_default(default, &mut bindings)?);
        }
    }

    let return_type = match &def.return_type {
        Some(ty) => resolve_type(ty, &type_vars)?,
        None => TypeExpr::any(),
    };

    let body = match classify(&def.body) {
        BodyShape::Single(stmts) => {
            let mut scope = Scope::new(&mut bindings);
            for param in &params {
                scope.bring_into_scope(&param.name, param.binding);
            }
            FunctionBody::Single(lower_stmts(stmts, &mut scope)?)
        }
        BodyShape::Clauses(shapes) => {
            let mut clauses = Vec::with_capacity(shapes.len());
            for shape in shapes {
                // clause heads bind their own names; parameters are not visible
                let mut scope = Scope::new(&mut bindings);
                let patterns = lower_patterns(shape.patterns, &mut scope)?;
                let guard = match shape.guard {
                    Some(g) => Some(lower_expr(g, &mut scope)?),
                    None => None,
                };
                let body = Block::expr(lower_expr(shape.body, &mut scope)?);
                clauses.push(ClauseSpec {
                    patterns,
                    guard,
                    body,
                    span: shape.span,
                });
            }
            FunctionBody::Clauses(clauses)
        }
    };

    Ok(FunctionSpec {
        name: def.name.clone(),
        params,
        return_type,
        constraints,
        body,
        bindings,
        span: def.span,
    })
}

/// Defaults are evaluated at the call site, before any parameter is bound.
fn lower_default(
    default: &defspec_parser::ast::Expr,
    bindings: &mut BindingTable,
) -> LowerResult<Expr> {
    let mut scope = Scope::new(bindings);
    lower_expr(default, &mut scope).map_err(|err| match err.kind {
        CompileErrorKind::UnboundVariable(_) => {
            err.with_hint("default values cannot refer to parameters")
        }
        _ => err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::binding::BindingId;
    use crate::ir::core::{Literal, Pattern, Stmt};
    use crate::ir::spec::ParamMode;
    use crate::types::{BaseType, ModuleRef};
    use defspec_parser::ast::Item;
    use pretty_assertions::assert_eq;

    fn lower(source: &str) -> LowerResult<FunctionSpec> {
        let file = defspec_parser::parse(source).unwrap();
        let Item::Function(def) = &file.items[0] else {
            panic!("expected a function");
        };
        lower_function(def)
    }

    #[test]
    fn test_parameter_vocabulary() {
        let spec = lower(
            r"def f(a: integer, b: guard[float], c: validate[Count] \\ 3, d: self) -> self { a }",
        )
        .unwrap();
        let summary: Vec<_> = spec
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.ty.clone(), p.mode, p.default.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a", TypeExpr::Base(BaseType::Integer), ParamMode::None, None),
                ("b", TypeExpr::Base(BaseType::Float), ParamMode::Guard, None),
                (
                    "c",
                    TypeExpr::External(ModuleRef::new("Count")),
                    ParamMode::Validate,
                    Some(Expr::Literal(Literal::Int(3)))
                ),
                ("d", TypeExpr::SelfType, ParamMode::None, None),
            ]
        );
        assert_eq!(spec.return_type, TypeExpr::SelfType);
        assert_eq!(
            spec.body,
            FunctionBody::Single(Block::expr(Expr::Local(BindingId(0))))
        );
    }

    #[test]
    fn test_missing_return_type_is_any() {
        let spec = lower("def f() { nil }").unwrap();
        assert_eq!(spec.return_type, TypeExpr::any());
        assert_eq!(spec.arity(), 0);
    }

    #[test]
    fn test_type_variables() {
        let spec = lower("def id(x: T) -> T where T: integer { x }").unwrap();
        assert_eq!(spec.params[0].ty, TypeExpr::Var("T".to_string()));
        assert_eq!(
            spec.constraints,
            vec![GenericConstraint {
                name: "T".to_string(),
                bound: TypeExpr::Base(BaseType::Integer),
            }]
        );
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = lower("def f(a: integer, a: float) { a }").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::DuplicateParameter("a".to_string()));
    }

    #[test]
    fn test_defaults_cannot_see_parameters() {
        let err = lower(r"def f(a: integer, b: integer \\ a) { b }").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnboundVariable("a".to_string()));
        assert_eq!(
            err.hint.as_deref(),
            Some("default values cannot refer to parameters")
        );
    }

    #[test]
    fn test_clause_scopes_are_isolated() {
        let spec = lower("def sign(n: integer) {\n(0) -> :zero\n(k) when k > 0 -> k\n(_) -> n\n}");
        let err = spec.unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnboundVariable("n".to_string()));

        let spec = lower("def sign(n: integer) {\n(0) -> :zero\n(k) when k > 0 -> k\n}").unwrap();
        let FunctionBody::Clauses(clauses) = &spec.body else {
            panic!("expected clauses");
        };
        assert_eq!(clauses.len(), 2);
        let Pattern::Bind(k) = clauses[1].patterns[0] else {
            panic!("expected a binding");
        };
        assert_ne!(k, spec.params[0].binding);
        assert_eq!(clauses[1].body.stmts, vec![Stmt::Expr(Expr::Local(k))]);
    }

    #[test]
    fn test_unresolvable_parameter_type() {
        let err = lower("def f(a: 12) { a }").unwrap_err();
        assert!(matches!(err.kind, CompileErrorKind::InvalidTypeExpr(_)));
    }
}
