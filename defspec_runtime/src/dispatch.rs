//! Dynamic operator dispatch
//!
//! Binary operators dispatch on the runtime types of their operands.
//! `and`/`or` are not here: they short-circuit and live in the interpreter.

use std::cmp::Ordering;

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::Value;

/// Binary operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    Concat,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Concat => "<>",
        }
    }
}

pub fn dynamic_binop(op: BinOp, lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    match op {
        BinOp::Add => arith(op, lhs, rhs, i64::checked_add, |a, b| a + b),
        BinOp::Sub => arith(op, lhs, rhs, i64::checked_sub, |a, b| a - b),
        BinOp::Mul => arith(op, lhs, rhs, i64::checked_mul, |a, b| a * b),
        BinOp::Div => dynamic_div(lhs, rhs),
        BinOp::Eq => Ok(Value::Bool(loose_eq(lhs, rhs))),
        BinOp::Ne => Ok(Value::Bool(!loose_eq(lhs, rhs))),
        BinOp::Lt => ordered(op, lhs, rhs, Ordering::is_lt),
        BinOp::Gt => ordered(op, lhs, rhs, Ordering::is_gt),
        BinOp::Le => ordered(op, lhs, rhs, Ordering::is_le),
        BinOp::Ge => ordered(op, lhs, rhs, Ordering::is_ge),
        BinOp::Concat => dynamic_concat(lhs, rhs),
    }
}

fn operand_error(op: BinOp, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "bad operands for {}: {} ({}) and {} ({})",
        op.as_str(),
        lhs,
        lhs.type_name(),
        rhs,
        rhs.type_name()
    ))
}

fn arith(
    op: BinOp,
    lhs: &Value,
    rhs: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> RuntimeResult<Value> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::overflow(format!("{} {} {}", a, op.as_str(), b))),
        _ => match (lhs.as_float(), rhs.as_float()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(operand_error(op, lhs, rhs)),
        },
    }
}

/// `/` always produces a float.
fn dynamic_div(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    match (lhs.as_float(), rhs.as_float()) {
        (Some(_), Some(b)) if b == 0.0 => Err(RuntimeError::DivisionByZero),
        (Some(a), Some(b)) => Ok(Value::Float(a / b)),
        _ => Err(operand_error(BinOp::Div, lhs, rhs)),
    }
}

fn dynamic_concat(lhs: &Value, rhs: &Value) -> RuntimeResult<Value> {
    match (lhs, rhs) {
        (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{}{}", a, b))),
        (Value::Binary(a), Value::Binary(b)) => {
            Ok(Value::Binary(a.iter().chain(b.iter()).copied().collect()))
        }
        _ => Err(operand_error(BinOp::Concat, lhs, rhs)),
    }
}

fn ordered(
    op: BinOp,
    lhs: &Value,
    rhs: &Value,
    test: fn(Ordering) -> bool,
) -> RuntimeResult<Value> {
    compare(lhs, rhs)
        .map(|ord| Value::Bool(test(ord)))
        .ok_or_else(|| operand_error(op, lhs, rhs))
}

/// Ordering for comparable pairs: numbers (across int/float), text, atoms.
pub fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Atom(a), Value::Atom(b)) => Some(a.cmp(b)),
        _ => match (lhs.as_float(), rhs.as_float()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    }
}

/// `==` semantics: structural, except that an integer equals a float of the
/// same numeric value. This holds at any depth inside lists, tuples, map
/// values and record fields. Map keys still compare strictly.
pub fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => (*a as f64) == *b,
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            all_loose_eq(a, b)
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.iter().any(|(k2, v2)| k == k2 && loose_eq(v, v2)))
        }
        (
            Value::Record {
                type_name: t1,
                fields: f1,
            },
            Value::Record {
                type_name: t2,
                fields: f2,
            },
        ) => {
            t1 == t2
                && f1.len() == f2.len()
                && f1
                    .iter()
                    .zip(f2)
                    .all(|((n1, v1), (n2, v2))| n1 == n2 && loose_eq(v1, v2))
        }
        _ => lhs == rhs,
    }
}

fn all_loose_eq(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
}
