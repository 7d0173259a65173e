use std::collections::HashMap;

use defspec_runtime::{BinOp, Value};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::binding::BindingId;
use crate::types::ModuleRef;

/// Core IR: resolved expressions, patterns and statements.
///
/// Every variable reference is a [`BindingId`]; names only survive in the
/// owning function's binding table.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Text(String),
    Atom(String),
    Bool(bool),
    Nil,
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Text(s) => Value::Text(s.clone()),
            Literal::Atom(a) => Value::Atom(a.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Nil => Value::Nil,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Concat,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Concat => "<>",
        }
    }

    /// The runtime operator, or `None` for the short-circuiting `and`/`or`.
    pub fn runtime_op(self) -> Option<BinOp> {
        Some(match self {
            BinaryOp::Add => BinOp::Add,
            BinaryOp::Sub => BinOp::Sub,
            BinaryOp::Mul => BinOp::Mul,
            BinaryOp::Div => BinOp::Div,
            BinaryOp::Eq => BinOp::Eq,
            BinaryOp::NotEq => BinOp::Ne,
            BinaryOp::Lt => BinOp::Lt,
            BinaryOp::LtEq => BinOp::Le,
            BinaryOp::Gt => BinOp::Gt,
            BinaryOp::GtEq => BinOp::Ge,
            BinaryOp::Concat => BinOp::Concat,
            BinaryOp::And | BinaryOp::Or => return None,
        })
    }
}

impl From<defspec_parser::ast::BinaryOp> for BinaryOp {
    fn from(op: defspec_parser::ast::BinaryOp) -> Self {
        use defspec_parser::ast::BinaryOp as Surface;
        match op {
            Surface::Add => BinaryOp::Add,
            Surface::Sub => BinaryOp::Sub,
            Surface::Mul => BinaryOp::Mul,
            Surface::Div => BinaryOp::Div,
            Surface::Eq => BinaryOp::Eq,
            Surface::NotEq => BinaryOp::NotEq,
            Surface::Lt => BinaryOp::Lt,
            Surface::LtEq => BinaryOp::LtEq,
            Surface::Gt => BinaryOp::Gt,
            Surface::GtEq => BinaryOp::GtEq,
            Surface::And => BinaryOp::And,
            Surface::Or => BinaryOp::Or,
            Surface::Concat => BinaryOp::Concat,
        }
    }
}

/// Functions every program can call without qualification. All of them are
/// pure, so they are also the only calls allowed inside clause guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Builtin {
    IsInteger,
    IsFloat,
    IsNumber,
    IsBoolean,
    IsText,
    IsBinary,
    IsAtom,
    IsNil,
    IsList,
    IsTuple,
    IsMap,
    IsFunction,
    IsPid,
    IsReference,
    Length,
    Abs,
    ToText,
    Min,
    Max,
    Hd,
    Tl,
    Elem,
    MapGet,
}

static BUILTIN_NAMES: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    Builtin::ALL.iter().map(|b| (b.name(), *b)).collect()
});

impl Builtin {
    pub const ALL: [Builtin; 23] = [
        Builtin::IsInteger,
        Builtin::IsFloat,
        Builtin::IsNumber,
        Builtin::IsBoolean,
        Builtin::IsText,
        Builtin::IsBinary,
        Builtin::IsAtom,
        Builtin::IsNil,
        Builtin::IsList,
        Builtin::IsTuple,
        Builtin::IsMap,
        Builtin::IsFunction,
        Builtin::IsPid,
        Builtin::IsReference,
        Builtin::Length,
        Builtin::Abs,
        Builtin::ToText,
        Builtin::Min,
        Builtin::Max,
        Builtin::Hd,
        Builtin::Tl,
        Builtin::Elem,
        Builtin::MapGet,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        BUILTIN_NAMES.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::IsInteger => "is_integer",
            Builtin::IsFloat => "is_float",
            Builtin::IsNumber => "is_number",
            Builtin::IsBoolean => "is_boolean",
            Builtin::IsText => "is_text",
            Builtin::IsBinary => "is_binary",
            Builtin::IsAtom => "is_atom",
            Builtin::IsNil => "is_nil",
            Builtin::IsList => "is_list",
            Builtin::IsTuple => "is_tuple",
            Builtin::IsMap => "is_map",
            Builtin::IsFunction => "is_function",
            Builtin::IsPid => "is_pid",
            Builtin::IsReference => "is_reference",
            Builtin::Length => "length",
            Builtin::Abs => "abs",
            Builtin::ToText => "to_text",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Hd => "hd",
            Builtin::Tl => "tl",
            Builtin::Elem => "elem",
            Builtin::MapGet => "map_get",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Builtin::Min | Builtin::Max | Builtin::Elem | Builtin::MapGet => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Callee {
    Builtin(Builtin),
    /// Function of the enclosing module.
    Local(String),
    /// `Module.function`
    Remote { module: String, function: String },
}

/// Record operations synthesized for `struct` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intrinsic {
    RecordNew,
    RecordValidate,
    RecordUpdate,
}

impl Intrinsic {
    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::RecordNew => "record_new",
            Intrinsic::RecordValidate => "record_validate",
            Intrinsic::RecordUpdate => "record_update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    Local(BindingId),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        callee: Callee,
        args: Vec<Expr>,
    },
    List {
        items: Vec<Expr>,
        tail: Option<Box<Expr>>,
    },
    Tuple(Vec<Expr>),
    Map(Vec<(Expr, Expr)>),
    Field {
        target: Box<Expr>,
        field: String,
    },
    If {
        cond: Box<Expr>,
        then_branch: Block,
        else_branch: Block,
    },
    Intrinsic {
        op: Intrinsic,
        record: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn builtin(builtin: Builtin, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Builtin(builtin),
            args,
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// First call that may not appear in a clause guard, if any.
    pub fn first_unsafe_call(&self) -> Option<String> {
        match self {
            Expr::Literal(_) | Expr::Local(_) => None,
            Expr::Unary { operand, .. } => operand.first_unsafe_call(),
            Expr::Binary { left, right, .. } => left
                .first_unsafe_call()
                .or_else(|| right.first_unsafe_call()),
            Expr::Call { callee, args } => match callee {
                Callee::Builtin(_) => args.iter().find_map(Expr::first_unsafe_call),
                Callee::Local(name) => Some(format!("call to {}", name)),
                Callee::Remote { module, function } => {
                    Some(format!("call to {}.{}", module, function))
                }
            },
            Expr::List { items, tail } => items
                .iter()
                .find_map(Expr::first_unsafe_call)
                .or_else(|| tail.as_ref().and_then(|t| t.first_unsafe_call())),
            Expr::Tuple(items) => items.iter().find_map(Expr::first_unsafe_call),
            Expr::Map(entries) => entries
                .iter()
                .find_map(|(k, v)| k.first_unsafe_call().or_else(|| v.first_unsafe_call())),
            Expr::Field { target, .. } => target.first_unsafe_call(),
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => cond
                .first_unsafe_call()
                .or_else(|| then_branch.first_unsafe_call())
                .or_else(|| else_branch.first_unsafe_call()),
            Expr::Intrinsic { op, .. } => Some(format!("record operation {}", op.name())),
        }
    }
}

/// Clause pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// `_` or `_name`
    Wildcard,
    /// First occurrence of a variable: binds it.
    Bind(BindingId),
    /// Later occurrence of the same variable: must equal the bound value.
    Same(BindingId),
    Literal(Literal),
    Tuple(Vec<Pattern>),
    List {
        items: Vec<Pattern>,
        tail: Option<Box<Pattern>>,
    },
    /// Partial map match on literal keys.
    Map(Vec<(Literal, Pattern)>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Let { binding: BindingId, value: Expr },
    /// Rebind `binding` to `module.validate(binding)`, aborting on failure.
    Validate { binding: BindingId, module: ModuleRef },
    Expr(Expr),
}

/// Statements evaluated in order; the value of the last one is the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn expr(expr: Expr) -> Self {
        Self {
            stmts: vec![Stmt::Expr(expr)],
        }
    }

    /// `prefix` followed by this block's statements.
    pub fn prepended(self, mut prefix: Vec<Stmt>) -> Self {
        prefix.extend(self.stmts);
        Self { stmts: prefix }
    }

    fn first_unsafe_call(&self) -> Option<String> {
        self.stmts.iter().find_map(|stmt| match stmt {
            Stmt::Let { value, .. } => value.first_unsafe_call(),
            Stmt::Validate { module, .. } => Some(format!("validation through {}", module)),
            Stmt::Expr(e) => e.first_unsafe_call(),
        })
    }
}
