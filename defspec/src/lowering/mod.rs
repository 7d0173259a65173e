//! Lowering: surface syntax → lowered function definitions.
//!
//! Names are resolved here. Every parameter is registered in its function's
//! binding table before any default, guard or body fragment is lowered, and
//! all fragments refer to variables by [`BindingId`](crate::ir::binding::BindingId).

pub mod expr;
pub mod function;
pub mod pattern;
pub mod scope;
pub mod struct_;

use defspec_parser::ast::{self, ExprKind, Item};

use crate::error::{CompileError, CompileErrorKind};
use crate::ir::spec::FunctionSpec;
use crate::span::Span;
use struct_::StructSchema;

pub type LowerResult<T> = Result<T, CompileError>;

/// Everything one module declares, ready for synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSpec {
    pub name: String,
    pub functions: Vec<FunctionSpec>,
    pub schema: Option<StructSchema>,
    pub span: Span,
}

impl ModuleSpec {
    fn new(name: &str, span: Span) -> Self {
        Self {
            name: name.to_string(),
            functions: Vec::new(),
            schema: None,
            span,
        }
    }
}

/// Lower a whole file. Items outside `module` blocks go to `default_module`;
/// repeated `module` blocks with the same name are merged.
pub fn lower_source(file: &ast::SourceFile, default_module: &str) -> LowerResult<Vec<ModuleSpec>> {
    let mut modules: Vec<ModuleSpec> = Vec::new();
    for item in &file.items {
        match item {
            Item::Module(def) => {
                for inner in &def.items {
                    lower_item(inner, &def.name, def.span, &mut modules)?;
                }
                // an empty module still exists
                module_entry(&mut modules, &def.name, def.span);
            }
            other => lower_item(other, default_module, other.span(), &mut modules)?,
        }
    }
    Ok(modules)
}

fn module_entry<'m>(modules: &'m mut Vec<ModuleSpec>, name: &str, span: Span) -> &'m mut ModuleSpec {
    let index = match modules.iter().position(|m| m.name == name) {
        Some(i) => i,
        None => {
            modules.push(ModuleSpec::new(name, span));
            modules.len() - 1
        }
    };
    &mut modules[index]
}

fn lower_item(item: &Item, module: &str, module_span: Span, modules: &mut Vec<ModuleSpec>) -> LowerResult<()> {
    match item {
        Item::Function(def) => {
            let spec = function::lower_function(def)?;
            module_entry(modules, module, module_span).functions.push(spec);
        }
        Item::Struct(def) => {
            let schema = struct_::lower_struct(def)?;
            let entry = module_entry(modules, module, module_span);
            if entry.schema.is_some() {
                return Err(CompileError::new(
                    CompileErrorKind::DuplicateSignature {
                        module: module.to_string(),
                        function: "new".to_string(),
                    },
                    def.span,
                )
                .with_hint("a module defines at most one struct"));
            }
            entry.schema = Some(schema);
        }
        Item::Module(def) => {
            return Err(CompileError::unsupported("nested module", def.span));
        }
    }
    Ok(())
}

/// Short description of a surface expression for diagnostics.
pub(crate) fn describe_expr(expr: &ast::Expr) -> &'static str {
    match &expr.kind {
        ExprKind::Integer(_) => "integer literal",
        ExprKind::Float(_) => "float literal",
        ExprKind::Text(_) => "text literal",
        ExprKind::Atom(_) => "atom literal",
        ExprKind::Bool(_) => "boolean literal",
        ExprKind::Nil => "nil",
        ExprKind::Ident(_) => "identifier",
        ExprKind::Unary { .. } => "unary expression",
        ExprKind::Binary { .. } => "binary expression",
        ExprKind::Clause { .. } => "clause",
        ExprKind::When { .. } => "`when` expression",
        ExprKind::Default { .. } => "default value",
        ExprKind::Call { .. } => "call",
        ExprKind::Index { .. } => "index expression",
        ExprKind::Field { .. } => "field access",
        ExprKind::Paren(_) => "parenthesized list",
        ExprKind::List { .. } => "list",
        ExprKind::Tuple(_) => "tuple",
        ExprKind::Map(_) => "map",
        ExprKind::If { .. } => "if expression",
    }
}
