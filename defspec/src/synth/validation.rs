//! Validation statements for `validate[M]` parameters.
//!
//! Each statement rebinds its parameter to `M.validate(param)` and aborts the
//! call on failure. Statements run in parameter order before the body; the
//! first failure wins.

use super::{ModuleContext, SynthResult};
use crate::error::{CompileError, CompileErrorKind};
use crate::ir::core::Stmt;
use crate::ir::spec::{ParamMode, ParamSpec};
use crate::types::{ModuleRef, TypeExpr};

pub fn validation_stmt(param: &ParamSpec, ctx: &ModuleContext) -> SynthResult<Option<Stmt>> {
    if param.mode != ParamMode::Validate {
        return Ok(None);
    }
    let module = match &param.ty {
        TypeExpr::External(module) => module.clone(),
        TypeExpr::SelfType => ModuleRef::new(ctx.name.as_str()),
        other => {
            return Err(CompileError::new(
                CompileErrorKind::UnsupportedValidationType {
                    param: param.name.clone(),
                    ty: other.to_string(),
                },
                param.span,
            )
            .with_hint(match other {
                TypeExpr::Base(base) => format!("use guard[{}] for base types", base),
                _ => "validate[...] needs a value module or self".to_string(),
            }))
        }
    };
    Ok(Some(Stmt::Validate {
        binding: param.binding,
        module,
    }))
}

pub fn validation_stmts(params: &[ParamSpec], ctx: &ModuleContext) -> SynthResult<Vec<Stmt>> {
    let mut stmts = Vec::new();
    for param in params {
        stmts.extend(validation_stmt(param, ctx)?);
    }
    Ok(stmts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::binding::BindingId;
    use crate::span::Span;
    use crate::types::BaseType;

    fn param(index: u32, ty: TypeExpr, mode: ParamMode) -> ParamSpec {
        ParamSpec {
            name: format!("p{}", index),
            binding: BindingId(index),
            ty,
            default: None,
            mode,
            span: Span::synthetic(),
        }
    }

    fn ctx() -> ModuleContext {
        ModuleContext::new("Accounts")
    }

    #[test]
    fn test_external_and_self() {
        let params = vec![
            param(0, TypeExpr::External(ModuleRef::new("Name")), ParamMode::Validate),
            param(1, TypeExpr::Base(BaseType::Integer), ParamMode::None),
            param(2, TypeExpr::SelfType, ParamMode::Validate),
        ];
        assert_eq!(
            validation_stmts(&params, &ctx()).unwrap(),
            vec![
                Stmt::Validate {
                    binding: BindingId(0),
                    module: ModuleRef::new("Name"),
                },
                Stmt::Validate {
                    binding: BindingId(2),
                    module: ModuleRef::new("Accounts"),
                },
            ]
        );
    }

    #[test]
    fn test_base_types_and_variables_cannot_be_validated() {
        for ty in [TypeExpr::Base(BaseType::Integer), TypeExpr::Var("T".to_string())] {
            let err = validation_stmt(&param(0, ty.clone(), ParamMode::Validate), &ctx())
                .unwrap_err();
            assert_eq!(
                err.kind,
                CompileErrorKind::UnsupportedValidationType {
                    param: "p0".to_string(),
                    ty: ty.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_guard_mode_is_not_validated() {
        let p = param(0, TypeExpr::Base(BaseType::Integer), ParamMode::Guard);
        assert_eq!(validation_stmt(&p, &ctx()).unwrap(), None);
    }
}
