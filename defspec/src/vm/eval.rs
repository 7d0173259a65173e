//! Expression evaluation.

use defspec_runtime::{dynamic_binop, RuntimeError, RuntimeResult, Value};

use super::builtins::call_builtin;
use super::frame::Frame;
use super::record::expected_map;
use super::Vm;
use crate::ir::core::{BinaryOp, Block, Callee, Expr, Intrinsic, Stmt, UnaryOp};
use crate::ir::decl::GeneratedDecl;

/// One running implementation.
pub(crate) struct Env<'p> {
    pub module: &'p str,
    pub decl: &'p GeneratedDecl,
    pub frame: Frame,
}

impl Vm {
    pub(crate) fn exec_block(&self, block: &Block, env: &mut Env<'_>) -> RuntimeResult<Value> {
        let mut last = Value::Nil;
        for stmt in &block.stmts {
            last = match stmt {
                Stmt::Let { binding, value } => {
                    let v = self.eval_expr(value, env)?;
                    env.frame.set(*binding, v.clone());
                    v
                }
                Stmt::Validate { binding, module } => {
                    let value_module = self
                        .registry
                        .get(module.name())
                        .ok_or_else(|| RuntimeError::unknown_module(module.name()))?;
                    let raw = env.frame.get(*binding).cloned().unwrap_or(Value::Nil);
                    match value_module.validate(&raw) {
                        Ok(v) => {
                            env.frame.set(*binding, v.clone());
                            v
                        }
                        Err(diagnostic) => {
                            return Err(RuntimeError::ValidationAbort {
                                name: env.decl.bindings.name(*binding).to_string(),
                                value: raw,
                                diagnostic: diagnostic.to_string(),
                            })
                        }
                    }
                }
                Stmt::Expr(e) => self.eval_expr(e, env)?,
            };
        }
        Ok(last)
    }

    /// A guard passes only when it evaluates to `true`; errors count as
    /// failure.
    pub(crate) fn eval_guard(&self, guard: &Expr, env: &mut Env<'_>) -> bool {
        matches!(self.eval_expr(guard, env), Ok(Value::Bool(true)))
    }

    pub(crate) fn eval_expr(&self, expr: &Expr, env: &mut Env<'_>) -> RuntimeResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(lit.to_value()),
            Expr::Local(id) => env.frame.get(*id).cloned().ok_or_else(|| {
                RuntimeError::type_error(format!(
                    "{} is not bound",
                    env.decl.bindings.name(*id)
                ))
            }),
            Expr::Unary { op, operand } => {
                let v = self.eval_expr(operand, env)?;
                match (op, &v) {
                    (UnaryOp::Neg, Value::Int(n)) => n
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or_else(|| RuntimeError::overflow(format!("-({})", n))),
                    (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnaryOp::Neg, other) => Err(RuntimeError::type_error(format!(
                        "cannot negate {} ({})",
                        other,
                        other.type_name()
                    ))),
                    (UnaryOp::Not, other) => Err(RuntimeError::type_error(format!(
                        "not expects a boolean, got {} ({})",
                        other,
                        other.type_name()
                    ))),
                }
            }
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right, env),
            Expr::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|a| self.eval_expr(a, env))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                match callee {
                    Callee::Builtin(builtin) => call_builtin(*builtin, &args),
                    Callee::Local(name) => self.call(env.module, name, args),
                    Callee::Remote { module, function } => self.call(module, function, args),
                }
            }
            Expr::List { items, tail } => {
                let mut values = items
                    .iter()
                    .map(|e| self.eval_expr(e, env))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                if let Some(tail) = tail {
                    match self.eval_expr(tail, env)? {
                        Value::List(rest) => values.extend(rest),
                        other => {
                            return Err(RuntimeError::type_error(format!(
                                "list tail must be a list, got {} ({})",
                                other,
                                other.type_name()
                            )))
                        }
                    }
                }
                Ok(Value::List(values))
            }
            Expr::Tuple(items) => Ok(Value::Tuple(
                items
                    .iter()
                    .map(|e| self.eval_expr(e, env))
                    .collect::<RuntimeResult<Vec<_>>>()?,
            )),
            Expr::Map(entries) => {
                let mut pairs = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    pairs.push((self.eval_expr(k, env)?, self.eval_expr(v, env)?));
                }
                Ok(Value::map(pairs))
            }
            Expr::Field { target, field } => {
                let target = self.eval_expr(target, env)?;
                let found = match &target {
                    Value::Record { .. } => target.record_field(field),
                    Value::Map(_) => target.map_get(&Value::atom(field.as_str())),
                    _ => None,
                };
                found
                    .cloned()
                    .ok_or_else(|| RuntimeError::field_error(field.as_str(), target.type_name()))
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => match self.eval_expr(cond, env)? {
                Value::Bool(true) => self.exec_block(then_branch, env),
                Value::Bool(false) => self.exec_block(else_branch, env),
                other => Err(RuntimeError::type_error(format!(
                    "if condition must be a boolean, got {} ({})",
                    other,
                    other.type_name()
                ))),
            },
            Expr::Intrinsic { op, record, args } => {
                let args = args
                    .iter()
                    .map(|a| self.eval_expr(a, env))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                self.eval_intrinsic(*op, record, args)
            }
        }
    }

    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        env: &mut Env<'_>,
    ) -> RuntimeResult<Value> {
        let lhs = self.eval_expr(left, env)?;
        if let Some(runtime_op) = op.runtime_op() {
            let rhs = self.eval_expr(right, env)?;
            return dynamic_binop(runtime_op, &lhs, &rhs);
        }
        // and / or short-circuit
        let short_circuit = op == BinaryOp::Or;
        match lhs {
            Value::Bool(b) if b == short_circuit => Ok(Value::Bool(b)),
            Value::Bool(_) => match self.eval_expr(right, env)? {
                Value::Bool(b) => Ok(Value::Bool(b)),
                other => Err(boolean_operand(op, &other)),
            },
            other => Err(boolean_operand(op, &other)),
        }
    }

    fn eval_intrinsic(&self, op: Intrinsic, record: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        let schema = self.schema(record)?;
        match (op, args.as_slice()) {
            (Intrinsic::RecordNew, [mapping]) => {
                if !mapping.is_map() {
                    return Ok(expected_map(mapping));
                }
                schema.construct(mapping).map_err(|f| f.into_abort())
            }
            (Intrinsic::RecordValidate, [mapping]) => {
                if !mapping.is_map() {
                    return Ok(expected_map(mapping));
                }
                Ok(match schema.construct(mapping) {
                    Ok(rec) => Value::ok(rec),
                    Err(failure) => Value::error(failure.to_value()),
                })
            }
            (Intrinsic::RecordUpdate, [existing, mapping]) => {
                if !existing.is_record_of(schema.name()) {
                    return Err(RuntimeError::NoClauseMatch {
                        function: format!("{}.update/2", record),
                        args,
                    });
                }
                if !mapping.is_map() {
                    return Ok(expected_map(mapping));
                }
                Ok(match schema.update(existing, mapping) {
                    Ok(rec) => Value::ok(rec),
                    Err(failure) => Value::error(failure.to_value()),
                })
            }
            _ => Err(RuntimeError::ArityMismatch {
                function: format!("{}.{}", record, op.name()),
                expected: match op {
                    Intrinsic::RecordUpdate => "2".to_string(),
                    _ => "1".to_string(),
                },
                got: args.len(),
            }),
        }
    }
}

fn boolean_operand(op: BinaryOp, value: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "{} expects booleans, got {} ({})",
        op.symbol(),
        value,
        value.type_name()
    ))
}
