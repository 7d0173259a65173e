//! Struct lowering: `struct { field: Module, ... }`.

use defspec_parser::ast::StructDef;

use super::function::signature::resolve_type;
use super::LowerResult;
use crate::error::{CompileError, CompileErrorKind};
use crate::span::Span;
use crate::types::{ModuleRef, TypeExpr};

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub module: ModuleRef,
    pub span: Span,
}

/// Field list of a struct, in declaration order. Duplicate names are kept
/// here and rejected by the schema compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct StructSchema {
    pub fields: Vec<SchemaField>,
    pub span: Span,
}

pub fn lower_struct(def: &StructDef) -> LowerResult<StructSchema> {
    let fields = def
        .fields
        .iter()
        .map(|field| match resolve_type(&field.ty, &[])? {
            TypeExpr::External(module) => Ok(SchemaField {
                name: field.name.clone(),
                module,
                span: field.span,
            }),
            other => Err(CompileError::new(
                CompileErrorKind::InvalidTypeExpr(format!(
                    "field {} has type {}",
                    field.name, other
                )),
                field.ty.span,
            )
            .with_hint("struct fields name a value module, e.g. Count")),
        })
        .collect::<LowerResult<Vec<_>>>()?;
    Ok(StructSchema {
        fields,
        span: def.span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use defspec_parser::ast::Item;

    fn lower(source: &str) -> LowerResult<StructSchema> {
        let file = defspec_parser::parse(source).unwrap();
        let Item::Struct(def) = &file.items[0] else {
            panic!("expected a struct");
        };
        lower_struct(def)
    }

    #[test]
    fn test_fields_in_order() {
        let schema = lower("struct { name: Name, count: Accounts.Count }").unwrap();
        let fields: Vec<_> = schema
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.module.name()))
            .collect();
        assert_eq!(fields, vec![("name", "Name"), ("count", "Accounts.Count")]);
    }

    #[test]
    fn test_base_typed_field_is_rejected() {
        let err = lower("struct { count: integer }").unwrap_err();
        assert_eq!(
            err.kind,
            CompileErrorKind::InvalidTypeExpr("field count has type integer".to_string())
        );
    }
}
