//! Clause expansion.
//!
//! A body is a clause list when it is non-empty and every entry has the shape
//! `(patterns) [when guard] -> expr`. Each clause becomes one implementation,
//! tried in declaration order at runtime.

use defspec_parser::ast::{self, ExprKind};

use super::guard::combined_guard;
use super::validation::validation_stmts;
use super::{ModuleContext, SynthResult};
use crate::error::{CompileError, CompileErrorKind};
use crate::ir::core::{Expr, Pattern};
use crate::ir::decl::Implementation;
use crate::ir::spec::{ClauseSpec, FunctionBody, FunctionSpec, ParamMode};
use crate::span::Span;

/// Surface body, before lowering.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyShape<'a> {
    Single(&'a [ast::Stmt]),
    Clauses(Vec<ClauseShape<'a>>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClauseShape<'a> {
    pub patterns: &'a [ast::Expr],
    pub guard: Option<&'a ast::Expr>,
    pub body: &'a ast::Expr,
    pub span: Span,
}

pub fn classify(body: &[ast::Stmt]) -> BodyShape<'_> {
    if body.is_empty() {
        return BodyShape::Single(body);
    }
    match body.iter().map(clause_shape).collect::<Option<Vec<_>>>() {
        Some(clauses) => BodyShape::Clauses(clauses),
        None => BodyShape::Single(body),
    }
}

fn clause_shape(stmt: &ast::Stmt) -> Option<ClauseShape<'_>> {
    let ast::Stmt::Expr(expr) = stmt else {
        return None;
    };
    let ExprKind::Clause { head, body } = &expr.kind else {
        return None;
    };
    let (patterns, guard) = match &head.kind {
        ExprKind::Paren(patterns) => (patterns, None),
        ExprKind::When { subject, guard } => match &subject.kind {
            ExprKind::Paren(patterns) => (patterns, Some(guard.as_ref())),
            _ => return None,
        },
        _ => return None,
    };
    Some(ClauseShape {
        patterns,
        guard,
        body,
        span: expr.span,
    })
}

/// Clause bodies cannot be combined with guard or validation parameters.
/// Guards are checked first.
pub fn check_conflicts(spec: &FunctionSpec) -> SynthResult<()> {
    if !spec.has_clauses() {
        return Ok(());
    }
    let hint = "use a single body, or check the type in each clause guard";
    if let Some(param) = spec.params.iter().find(|p| p.mode == ParamMode::Guard) {
        return Err(CompileError::new(
            CompileErrorKind::ClauseGuardConflict {
                function: spec.name.clone(),
                param: param.name.clone(),
            },
            param.span,
        )
        .with_hint(hint));
    }
    if let Some(param) = spec.params.iter().find(|p| p.mode == ParamMode::Validate) {
        return Err(CompileError::new(
            CompileErrorKind::ClauseValidationConflict {
                function: spec.name.clone(),
                param: param.name.clone(),
            },
            param.span,
        )
        .with_hint(hint));
    }
    Ok(())
}

fn check_clause(spec: &FunctionSpec, clause: &ClauseSpec) -> SynthResult<()> {
    if clause.patterns.len() != spec.arity() {
        return Err(CompileError::new(
            CompileErrorKind::ClauseArityMismatch {
                function: spec.name.clone(),
                expected: spec.arity(),
                found: clause.patterns.len(),
            },
            clause.span,
        ));
    }
    if let Some(what) = clause.guard.as_ref().and_then(Expr::first_unsafe_call) {
        return Err(CompileError::new(
            CompileErrorKind::UnsafeGuardExpression(what),
            clause.span,
        ));
    }
    Ok(())
}

/// Build the implementations of one function.
pub fn expand(spec: &FunctionSpec, ctx: &ModuleContext) -> SynthResult<Vec<Implementation>> {
    check_conflicts(spec)?;
    match &spec.body {
        FunctionBody::Clauses(clauses) => clauses
            .iter()
            .map(|clause| {
                check_clause(spec, clause)?;
                Ok(Implementation {
                    patterns: clause.patterns.clone(),
                    guard: clause.guard.clone(),
                    body: clause.body.clone(),
                })
            })
            .collect(),
        FunctionBody::Single(body) => {
            let guard = combined_guard(&spec.params, &spec.constraints)?;
            let validations = validation_stmts(&spec.params, ctx)?;
            Ok(vec![Implementation {
                patterns: spec.params.iter().map(|p| Pattern::Bind(p.binding)).collect(),
                guard,
                body: body.clone().prepended(validations),
            }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use defspec_parser::ast::Item;

    fn body_of(source: &str) -> Vec<ast::Stmt> {
        let file = defspec_parser::parse(source).unwrap();
        let Item::Function(def) = &file.items[0] else {
            panic!("expected a function");
        };
        def.body.clone()
    }

    #[test]
    fn test_clause_list() {
        let body = body_of("def f(a: any, b: any) {\n(0, _) -> 1\n(x, y) when x > y -> 2\n}");
        let BodyShape::Clauses(clauses) = classify(&body) else {
            panic!("expected clauses");
        };
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].patterns.len(), 2);
        assert!(clauses[0].guard.is_none());
        assert!(clauses[1].guard.is_some());
    }

    #[test]
    fn test_single_bodies() {
        let body = body_of("def f(a: any) {\nlet b = a\nb\n}");
        assert!(matches!(classify(&body), BodyShape::Single(s) if s.len() == 2));

        let empty: Vec<ast::Stmt> = Vec::new();
        assert!(matches!(classify(&empty), BodyShape::Single(_)));

        // one non-clause entry makes the whole body a single body
        let mixed = body_of("def f(a: any) {\n(0) -> 1\na\n}");
        assert!(matches!(classify(&mixed), BodyShape::Single(s) if s.len() == 2));
    }

    #[test]
    fn test_arrow_without_parenthesized_head_is_not_a_clause() {
        let body = body_of("def f(a: any) {\na -> 1\n}");
        assert!(matches!(classify(&body), BodyShape::Single(_)));
    }
}
