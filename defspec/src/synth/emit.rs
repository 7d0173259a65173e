//! Declaration emission.

use std::collections::HashMap;

use super::SynthResult;
use crate::error::{CompileError, CompileErrorKind};
use crate::ir::decl::{ForwardDecl, ForwardParam, GeneratedDecl, Implementation, SignatureDecl};
use crate::ir::spec::FunctionSpec;
use crate::span::Span;

/// Function names declared so far in one module.
#[derive(Debug)]
pub struct SignatureScope {
    module: String,
    declared: HashMap<String, Span>,
}

impl SignatureScope {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            declared: HashMap::new(),
        }
    }

    /// One declared contract per name.
    pub fn declare(&mut self, name: &str, span: Span) -> SynthResult<()> {
        match self.declared.get(name) {
            Some(first) => {
                let err = CompileError::new(
                    CompileErrorKind::DuplicateSignature {
                        module: self.module.clone(),
                        function: name.to_string(),
                    },
                    span,
                );
                Err(if first.is_synthetic() {
                    err.with_hint("this name is generated for the module's struct")
                } else {
                    err.with_hint(format!("first declared at {}", first))
                })
            }
            None => {
                self.declared.insert(name.to_string(), span);
                Ok(())
            }
        }
    }
}

/// Assemble the signature, forward declaration and implementations of one
/// function.
pub fn emit(spec: FunctionSpec, implementations: Vec<Implementation>) -> GeneratedDecl {
    let FunctionSpec {
        name,
        params,
        return_type,
        constraints,
        bindings,
        ..
    } = spec;
    debug_assert!(implementations
        .iter()
        .all(|imp| imp.patterns.len() == params.len()));

    let signature = SignatureDecl {
        name: name.clone(),
        params: params.iter().map(|p| p.ty.clone()).collect(),
        return_type,
        constraints,
    };
    let forward = ForwardDecl {
        name: name.clone(),
        params: params
            .into_iter()
            .map(|p| ForwardParam {
                name: p.name,
                binding: p.binding,
                default: p.default,
            })
            .collect(),
    };
    GeneratedDecl {
        name,
        signature,
        forward,
        implementations,
        bindings,
    }
}
