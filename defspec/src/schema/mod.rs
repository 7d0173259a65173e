//! Struct schema compilation.
//!
//! `struct { name: Name, count: Count }` inside module `M` produces a record
//! definition named `M` and three ordinary function definitions whose bodies
//! are record intrinsics:
//!
//! ```text
//! def new(mapping: any \\ %{}) -> self
//! def validate(mapping: any) -> any
//! def update(record: self, mapping: any) -> any
//! ```
//!
//! These go through the same synthesis as user functions.

use std::collections::{HashMap, HashSet};

use crate::error::{CompileError, CompileErrorKind, CompileResult};
use crate::ir::binding::{BindingKind, BindingTable};
use crate::ir::core::{Block, Expr, Intrinsic};
use crate::ir::decl::{RecordDef, RecordField};
use crate::ir::spec::{FunctionBody, FunctionSpec, ParamMode, ParamSpec};
use crate::lowering::struct_::StructSchema;
use crate::lowering::ModuleSpec;
use crate::span::Span;
use crate::types::TypeExpr;

/// Output of [`compile_schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    pub record: RecordDef,
    pub functions: Vec<FunctionSpec>,
}

pub fn compile_schema(schema: &StructSchema, module: &str) -> CompileResult<CompiledSchema> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(CompileError::new(
                CompileErrorKind::DuplicateField(field.name.clone()),
                field.span,
            ));
        }
        fields.push(RecordField {
            name: field.name.clone(),
            module: field.module.clone(),
        });
    }

    Ok(CompiledSchema {
        record: RecordDef {
            name: module.to_string(),
            fields,
        },
        functions: vec![
            record_function(
                "new",
                &[("mapping", TypeExpr::any(), Some(Expr::Map(Vec::new())))],
                TypeExpr::SelfType,
                Intrinsic::RecordNew,
                module,
            ),
            record_function(
                "validate",
                &[("mapping", TypeExpr::any(), None)],
                TypeExpr::any(),
                Intrinsic::RecordValidate,
                module,
            ),
            record_function(
                "update",
                &[
                    ("record", TypeExpr::SelfType, None),
                    ("mapping", TypeExpr::any(), None),
                ],
                TypeExpr::any(),
                Intrinsic::RecordUpdate,
                module,
            ),
        ],
    })
}

/// Reject structs whose fields lead back to themselves, directly or through
/// other structs. Such a record could never be built.
pub fn check_field_cycles(modules: &[ModuleSpec]) -> CompileResult<()> {
    let structs: HashMap<&str, &StructSchema> = modules
        .iter()
        .filter_map(|m| m.schema.as_ref().map(|s| (m.name.as_str(), s)))
        .collect();
    let mut done = HashSet::new();
    for module in modules {
        let mut path = Vec::new();
        visit_fields(module.name.as_str(), &structs, &mut path, &mut done)?;
    }
    Ok(())
}

fn visit_fields<'a>(
    name: &'a str,
    structs: &HashMap<&'a str, &'a StructSchema>,
    path: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> CompileResult<()> {
    if done.contains(name) {
        return Ok(());
    }
    let Some(&schema) = structs.get(name) else {
        return Ok(());
    };
    path.push(name);
    for field in &schema.fields {
        let target = field.module.name();
        if let Some(start) = path.iter().position(|p| *p == target) {
            let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(target.to_string());
            return Err(CompileError::new(
                CompileErrorKind::RecursiveStruct { cycle },
                field.span,
            )
            .with_hint(format!(
                "field {} cannot hold a {} record; use a plain value module",
                field.name, target
            )));
        }
        visit_fields(target, structs, path, done)?;
    }
    path.pop();
    done.insert(name);
    Ok(())
}

fn record_function(
    name: &str,
    params: &[(&str, TypeExpr, Option<Expr>)],
    return_type: TypeExpr,
    op: Intrinsic,
    module: &str,
) -> FunctionSpec {
    let mut bindings = BindingTable::new();
    let params: Vec<ParamSpec> = params
        .iter()
        .enumerate()
        .map(|(position, (param, ty, default))| ParamSpec {
            name: param.to_string(),
            binding: bindings.add(*param, BindingKind::Param(position)),
            ty: ty.clone(),
            default: default.clone(),
            mode: ParamMode::None,
            span: Span::synthetic(),
        })
        .collect();
    let body = Block::expr(Expr::Intrinsic {
        op,
        record: module.to_string(),
        args: params.iter().map(|p| Expr::Local(p.binding)).collect(),
    });
    FunctionSpec {
        name: name.to_string(),
        params,
        return_type,
        constraints: Vec::new(),
        body: FunctionBody::Single(body),
        bindings,
        span: Span::synthetic(),
    }
}
