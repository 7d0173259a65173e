//! Clause pattern lowering.

use std::collections::HashMap;

use defspec_parser::ast::{self, ExprKind, UnaryOp};

use super::scope::{is_wildcard_name, Scope};
use super::{describe_expr, LowerResult};
use crate::error::{CompileError, CompileErrorKind};
use crate::ir::binding::{BindingId, BindingKind};
use crate::ir::core::{Literal, Pattern};

/// Lower one clause head. Variables bound by any pattern of the head are
/// shared: a repeated name must match an equal value.
pub fn lower_patterns(exprs: &[ast::Expr], scope: &mut Scope<'_>) -> LowerResult<Vec<Pattern>> {
    let mut bound = HashMap::new();
    exprs
        .iter()
        .map(|e| lower_pattern(e, scope, &mut bound))
        .collect()
}

fn lower_pattern(
    expr: &ast::Expr,
    scope: &mut Scope<'_>,
    bound: &mut HashMap<String, BindingId>,
) -> LowerResult<Pattern> {
    Ok(match &expr.kind {
        ExprKind::Ident(name) if is_wildcard_name(name) => Pattern::Wildcard,
        ExprKind::Ident(name) => match bound.get(name) {
            Some(id) => Pattern::Same(*id),
            None => {
                let id = scope.declare(name, BindingKind::Pattern);
                bound.insert(name.clone(), id);
                Pattern::Bind(id)
            }
        },
        ExprKind::Paren(items) if items.len() == 1 => lower_pattern(&items[0], scope, bound)?,
        ExprKind::Tuple(items) => Pattern::Tuple(
            items
                .iter()
                .map(|e| lower_pattern(e, scope, bound))
                .collect::<LowerResult<_>>()?,
        ),
        ExprKind::List { items, tail } => Pattern::List {
            items: items
                .iter()
                .map(|e| lower_pattern(e, scope, bound))
                .collect::<LowerResult<_>>()?,
            tail: match tail {
                Some(t) => Some(Box::new(lower_pattern(t, scope, bound)?)),
                None => None,
            },
        },
        ExprKind::Map(entries) => Pattern::Map(
            entries
                .iter()
                .map(|entry| {
                    let key = literal_of(&entry.key).ok_or_else(|| {
                        invalid(&entry.key, "map pattern keys must be literals")
                    })?;
                    Ok((key, lower_pattern(&entry.value, scope, bound)?))
                })
                .collect::<LowerResult<_>>()?,
        ),
        _ => match literal_of(expr) {
            Some(lit) => Pattern::Literal(lit),
            None => return Err(invalid(expr, describe_expr(expr))),
        },
    })
}

fn literal_of(expr: &ast::Expr) -> Option<Literal> {
    match &expr.kind {
        ExprKind::Integer(n) => Some(Literal::Int(*n)),
        ExprKind::Float(x) => Some(Literal::Float(*x)),
        ExprKind::Text(s) => Some(Literal::Text(s.clone())),
        ExprKind::Atom(a) => Some(Literal::Atom(a.clone())),
        ExprKind::Bool(b) => Some(Literal::Bool(*b)),
        ExprKind::Nil => Some(Literal::Nil),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => match &operand.kind {
            ExprKind::Float(x) => Some(Literal::Float(-x)),
            _ => None,
        },
        _ => None,
    }
}

fn invalid(expr: &ast::Expr, what: &str) -> CompileError {
    CompileError::new(CompileErrorKind::InvalidPattern(what.to_string()), expr.span)
}
