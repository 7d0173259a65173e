//! Emitted declarations.

use serde::{Deserialize, Serialize};

use super::binding::{BindingId, BindingTable};
use super::core::{Block, Expr, Pattern};
use crate::types::{GenericConstraint, ModuleRef, TypeExpr};

/// The documented contract: types only, no code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureDecl {
    pub name: String,
    pub params: Vec<TypeExpr>,
    pub return_type: TypeExpr,
    pub constraints: Vec<GenericConstraint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardParam {
    pub name: String,
    pub binding: BindingId,
    pub default: Option<Expr>,
}

/// The externally visible arity and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardDecl {
    pub name: String,
    pub params: Vec<ForwardParam>,
}

impl ForwardDecl {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameters without a default.
    pub fn required_arity(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }

    pub fn accepts(&self, argc: usize) -> bool {
        (self.required_arity()..=self.arity()).contains(&argc)
    }
}

/// One dispatchable clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub patterns: Vec<Pattern>,
    pub guard: Option<Expr>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDecl {
    pub name: String,
    pub signature: SignatureDecl,
    pub forward: ForwardDecl,
    pub implementations: Vec<Implementation>,
    pub bindings: BindingTable,
}

impl GeneratedDecl {
    pub fn arity(&self) -> usize {
        self.forward.arity()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    pub name: String,
    pub module: ModuleRef,
}

/// Record type derived from a `struct` block; named after its module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDef {
    pub name: String,
    pub fields: Vec<RecordField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledModule {
    pub name: String,
    pub functions: Vec<GeneratedDecl>,
    pub record: Option<RecordDef>,
}

impl CompiledModule {
    pub fn function(&self, name: &str) -> Option<&GeneratedDecl> {
        self.functions.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub modules: Vec<CompiledModule>,
}

impl Program {
    pub fn module(&self, name: &str) -> Option<&CompiledModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn function(&self, module: &str, name: &str) -> Option<&GeneratedDecl> {
        self.module(module).and_then(|m| m.function(name))
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordDef> {
        self.modules.iter().filter_map(|m| m.record.as_ref())
    }
}
