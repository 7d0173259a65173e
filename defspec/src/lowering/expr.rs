//! Expression and block lowering.

use defspec_parser::ast::{self, ExprKind};

use super::scope::{is_wildcard_name, Scope};
use super::{describe_expr, LowerResult};
use crate::error::CompileError;
use crate::ir::binding::BindingKind;
use crate::ir::core::{Block, Builtin, Callee, Expr, Literal, Stmt, UnaryOp};

pub fn lower_expr(expr: &ast::Expr, scope: &mut Scope<'_>) -> LowerResult<Expr> {
    let span = expr.span;
    Ok(match &expr.kind {
        ExprKind::Integer(n) => Expr::Literal(Literal::Int(*n)),
        ExprKind::Float(x) => Expr::Literal(Literal::Float(*x)),
        ExprKind::Text(s) => Expr::Literal(Literal::Text(s.clone())),
        ExprKind::Atom(a) => Expr::Literal(Literal::Atom(a.clone())),
        ExprKind::Bool(b) => Expr::Literal(Literal::Bool(*b)),
        ExprKind::Nil => Expr::Literal(Literal::Nil),

        ExprKind::Ident(name) => match scope.resolve(name) {
            Some(id) => Expr::Local(id),
            None if is_wildcard_name(name) => {
                return Err(CompileError::unbound(name.as_str(), span)
                    .with_hint("names starting with _ only match, they never bind"))
            }
            None => return Err(CompileError::unbound(name.as_str(), span)),
        },

        ExprKind::Unary { op, operand } => Expr::Unary {
            op: match op {
                ast::UnaryOp::Neg => UnaryOp::Neg,
                ast::UnaryOp::Not => UnaryOp::Not,
            },
            operand: Box::new(lower_expr(operand, scope)?),
        },

        ExprKind::Binary { op, left, right } => Expr::binary(
            (*op).into(),
            lower_expr(left, scope)?,
            lower_expr(right, scope)?,
        ),

        ExprKind::Call { callee, args } => {
            let callee = lower_callee(callee, scope)?;
            let args = lower_all(args, scope)?;
            Expr::Call { callee, args }
        }

        ExprKind::Field { target, name } => {
            if is_module_path(target, scope) {
                return Err(CompileError::unsupported("module reference as a value", span)
                    .with_hint(format!("call it instead, e.g. {}()", name)));
            }
            Expr::Field {
                target: Box::new(lower_expr(target, scope)?),
                field: name.clone(),
            }
        }

        ExprKind::Paren(items) => match items.as_slice() {
            [single] => lower_expr(single, scope)?,
            _ => {
                return Err(CompileError::unsupported(describe_expr(expr), span)
                    .with_hint("use {a, b} for a tuple"))
            }
        },

        ExprKind::List { items, tail } => Expr::List {
            items: lower_all(items, scope)?,
            tail: match tail {
                Some(t) => Some(Box::new(lower_expr(t, scope)?)),
                None => None,
            },
        },

        ExprKind::Tuple(items) => Expr::Tuple(lower_all(items, scope)?),

        ExprKind::Map(entries) => Expr::Map(
            entries
                .iter()
                .map(|e| Ok((lower_expr(&e.key, scope)?, lower_expr(&e.value, scope)?)))
                .collect::<LowerResult<Vec<_>>>()?,
        ),

        ExprKind::If {
            cond,
            then_block,
            else_block,
        } => Expr::If {
            cond: Box::new(lower_expr(cond, scope)?),
            then_branch: lower_block(then_block, scope)?,
            else_branch: lower_block(else_block, scope)?,
        },

        ExprKind::Clause { .. } => {
            return Err(CompileError::unsupported(describe_expr(expr), span)
                .with_hint("a body is either one block or a list made only of clauses"))
        }
        ExprKind::When { .. } => {
            return Err(CompileError::unsupported(describe_expr(expr), span)
                .with_hint("`when` only follows a clause head"))
        }
        ExprKind::Default { .. } => {
            return Err(CompileError::unsupported(describe_expr(expr), span)
                .with_hint("defaults belong in parameter types"))
        }
        ExprKind::Index { .. } => {
            return Err(CompileError::unsupported(describe_expr(expr), span)
                .with_hint("guard[...] and validate[...] belong in parameter types"))
        }
    })
}

fn lower_all(exprs: &[ast::Expr], scope: &mut Scope<'_>) -> LowerResult<Vec<Expr>> {
    exprs.iter().map(|e| lower_expr(e, scope)).collect()
}

/// A dotted path whose root is not a variable and is capitalized.
fn is_module_path(expr: &ast::Expr, scope: &Scope<'_>) -> bool {
    match expr.as_path() {
        Some(path) => {
            let root = path.split('.').next().unwrap_or_default();
            scope.resolve(root).is_none() && root.starts_with(|c: char| c.is_ascii_uppercase())
        }
        None => false,
    }
}

fn lower_callee(callee: &ast::Expr, scope: &mut Scope<'_>) -> LowerResult<Callee> {
    match &callee.kind {
        ExprKind::Ident(name) if scope.resolve(name).is_some() => Err(CompileError::unsupported(
            format!("calling the variable {}", name),
            callee.span,
        )),
        ExprKind::Ident(name) => Ok(match Builtin::from_name(name) {
            Some(builtin) => Callee::Builtin(builtin),
            None => Callee::Local(name.clone()),
        }),
        ExprKind::Field { target, name } if is_module_path(target, scope) => Ok(Callee::Remote {
            module: target.as_path().unwrap_or_default(),
            function: name.clone(),
        }),
        _ => Err(CompileError::unsupported(
            format!("call through a {}", describe_expr(callee)),
            callee.span,
        )),
    }
}

/// Lower statements in a new frame; `let` bindings end with the block.
pub fn lower_block(stmts: &[ast::Stmt], scope: &mut Scope<'_>) -> LowerResult<Block> {
    scope.push();
    let block = lower_stmts(stmts, scope);
    scope.pop();
    block
}

/// Lower statements in the current frame. An empty list evaluates to `nil`.
pub fn lower_stmts(stmts: &[ast::Stmt], scope: &mut Scope<'_>) -> LowerResult<Block> {
    if stmts.is_empty() {
        return Ok(Block::expr(Expr::Literal(Literal::Nil)));
    }
    let mut lowered = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        lowered.push(match stmt {
            ast::Stmt::Let { name, value, span } => {
                // the value sees the previous binding of `name`
                let value = lower_expr(value, scope)?;
                if is_wildcard_name(name) {
                    return Err(CompileError::unsupported(
                        format!("let {}", name),
                        *span,
                    )
                    .with_hint("let needs a binding name"));
                }
                let binding = scope.declare(name, BindingKind::Local);
                Stmt::Let { binding, value }
            }
            ast::Stmt::Expr(e) => Stmt::Expr(lower_expr(e, scope)?),
        });
    }
    Ok(Block::new(lowered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileErrorKind;
    use crate::ir::binding::{BindingId, BindingTable};
    use defspec_parser::parse_expression;

    fn lower_with(source: &str, params: &[&str]) -> LowerResult<Expr> {
        let mut table = BindingTable::new();
        let mut scope = Scope::new(&mut table);
        for (i, p) in params.iter().enumerate() {
            scope.declare(p, BindingKind::Param(i));
        }
        lower_expr(&parse_expression(source).unwrap(), &mut scope)
    }

    #[test]
    fn test_variables_resolve_to_bindings() {
        let e = lower_with("a + b", &["a", "b"]).unwrap();
        assert_eq!(
            e,
            Expr::binary(
                crate::ir::core::BinaryOp::Add,
                Expr::Local(BindingId(0)),
                Expr::Local(BindingId(1))
            )
        );
    }

    #[test]
    fn test_unbound_variable() {
        let err = lower_with("a + c", &["a"]).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnboundVariable("c".to_string()));
        let err = lower_with("_x", &[]).unwrap_err();
        assert!(err.hint.is_some());
    }

    #[test]
    fn test_callees() {
        let e = lower_with("is_integer(x)", &["x"]).unwrap();
        assert!(
            matches!(&e, Expr::Call { callee: Callee::Builtin(Builtin::IsInteger), .. }),
            "got {:?}",
            e
        );

        let e = lower_with("helper(1)", &[]).unwrap();
        assert!(matches!(&e, Expr::Call { callee: Callee::Local(n), .. } if n == "helper"));

        let e = lower_with("Accounts.Users.find(1)", &[]).unwrap();
        assert!(
            matches!(&e, Expr::Call { callee: Callee::Remote { module, function }, .. }
                if module == "Accounts.Users" && function == "find"),
            "got {:?}",
            e
        );

        assert!(lower_with("f(1)", &["f"]).is_err());
    }

    #[test]
    fn test_field_access_on_variable() {
        let e = lower_with("user.name", &["user"]).unwrap();
        assert!(matches!(&e, Expr::Field { field, .. } if field == "name"));
        assert!(lower_with("Accounts.name", &[]).is_err());
    }

    #[test]
    fn test_surface_only_forms_are_rejected() {
        for source in [r"x \\ 1", "x when true", "(x) -> x", "v[1]", "(1, 2)"] {
            let err = lower_with(source, &["x", "v"]).unwrap_err();
            assert!(
                matches!(err.kind, CompileErrorKind::UnsupportedExpression(_)),
                "{}: got {:?}",
                source,
                err
            );
        }
    }

    #[test]
    fn test_let_shadowing_sees_previous_binding() {
        let mut table = BindingTable::new();
        let mut scope = Scope::new(&mut table);
        let x = scope.declare("x", BindingKind::Param(0));
        let file = defspec_parser::parse("def f(x: integer) {\nlet x = x + 1\nx\n}").unwrap();
        let defspec_parser::ast::Item::Function(def) = &file.items[0] else {
            panic!("expected a function");
        };
        let block = lower_stmts(&def.body, &mut scope).unwrap();
        drop(scope);
        let [Stmt::Let { binding, value }, Stmt::Expr(Expr::Local(result))] =
            block.stmts.as_slice()
        else {
            panic!("unexpected block {:?}", block);
        };
        assert_ne!(*binding, x);
        assert_eq!(*result, *binding);
        assert!(matches!(value, Expr::Binary { left, .. } if **left == Expr::Local(x)));
    }
}
