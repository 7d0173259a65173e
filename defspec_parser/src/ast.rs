//! Surface syntax tree.
//!
//! The parser keeps this tree deliberately generic: a parameter's type
//! annotation, a clause head and an ordinary expression are all [`Expr`]s.
//! Deciding what a given shape *means* (a guard request, a clause list, a
//! default value) is left to the compiler.

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub items: Vec<Item>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Module(ModuleDef),
    Function(FunctionDef),
    Struct(StructDef),
}

impl Item {
    pub fn span(&self) -> Span {
        match self {
            Item::Module(m) => m.span,
            Item::Function(f) => f.span,
            Item::Struct(s) => s.span,
        }
    }
}

/// `module Name { ... }`; dotted names are kept whole (`Accounts.Users`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDef {
    pub name: String,
    pub items: Vec<Item>,
    pub span: Span,
}

/// `def name(params) -> ret where constraints { body }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<Expr>,
    pub constraints: Vec<Constraint>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// One `name: type-expression` entry of a parameter list. The type
/// expression may carry `\\ default` and `guard[...]` / `validate[...]`
/// wrappers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Expr,
    pub span: Span,
}

/// `T: bound` inside a `where` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub bound: Expr,
    pub span: Span,
}

/// `struct { field: Module, ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Let { name: String, value: Expr, span: Span },
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let { span, .. } => *span,
            Stmt::Expr(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The identifier name when this is a bare identifier.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Dotted path (`A.B.c`) when the expression is a chain of field
    /// accesses rooted at an identifier.
    pub fn as_path(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name.clone()),
            ExprKind::Field { target, name } => {
                target.as_path().map(|base| format!("{}.{}", base, name))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Integer(i64),
    Float(f64),
    Text(String),
    Atom(String),
    Bool(bool),
    Nil,
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `head -> body`
    Clause {
        head: Box<Expr>,
        body: Box<Expr>,
    },
    /// `subject when guard`
    When {
        subject: Box<Expr>,
        guard: Box<Expr>,
    },
    /// `inner \\ default`
    Default {
        inner: Box<Expr>,
        default: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `target[args]`
    Index {
        target: Box<Expr>,
        args: Vec<Expr>,
    },
    Field {
        target: Box<Expr>,
        name: String,
    },
    /// `(a, b, ...)`; a single element is plain grouping.
    Paren(Vec<Expr>),
    /// `[a, b]` or `[h | t]`
    List {
        items: Vec<Expr>,
        tail: Option<Box<Expr>>,
    },
    /// `{a, b}`
    Tuple(Vec<Expr>),
    /// `%{k => v, key: v}`
    Map(Vec<MapEntry>),
    If {
        cond: Box<Expr>,
        then_block: Vec<Stmt>,
        else_block: Vec<Stmt>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Expr,
    pub value: Expr,
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
}
