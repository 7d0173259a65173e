//! Lowered function definitions.
//!
//! A [`FunctionSpec`] is built once from surface syntax and consumed once by
//! the declaration emitter.

use serde::{Deserialize, Serialize};

use super::binding::{BindingId, BindingTable};
use super::core::{Block, Expr, Pattern};
use crate::span::Span;
use crate::types::{GenericConstraint, TypeExpr};

/// What a parameter asks the compiler to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamMode {
    None,
    /// `guard[T]`: a runtime type predicate in the dispatch condition.
    Guard,
    /// `validate[M]`: a validation statement ahead of the body.
    Validate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub binding: BindingId,
    pub ty: TypeExpr,
    pub default: Option<Expr>,
    pub mode: ParamMode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseSpec {
    pub patterns: Vec<Pattern>,
    pub guard: Option<Expr>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionBody {
    Single(Block),
    Clauses(Vec<ClauseSpec>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub params: Vec<ParamSpec>,
    pub return_type: TypeExpr,
    pub constraints: Vec<GenericConstraint>,
    pub body: FunctionBody,
    pub bindings: BindingTable,
    pub span: Span,
}

impl FunctionSpec {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn has_clauses(&self) -> bool {
        matches!(self.body, FunctionBody::Clauses(_))
    }
}
