//! Guard synthesis for `guard[T]` parameters.

use super::SynthResult;
use crate::error::{CompileError, CompileErrorKind};
use crate::ir::core::{BinaryOp, Builtin, Expr};
use crate::ir::spec::{ParamMode, ParamSpec};
use crate::types::{BaseType, GenericConstraint, TypeExpr};

/// Runtime predicate for a base type. `any` has none.
pub fn predicate_for(base: BaseType) -> Option<Builtin> {
    Some(match base {
        BaseType::Integer => Builtin::IsInteger,
        BaseType::Float => Builtin::IsFloat,
        BaseType::Boolean => Builtin::IsBoolean,
        BaseType::Text => Builtin::IsText,
        BaseType::Binary => Builtin::IsBinary,
        BaseType::List => Builtin::IsList,
        BaseType::Tuple => Builtin::IsTuple,
        BaseType::Map => Builtin::IsMap,
        BaseType::Function => Builtin::IsFunction,
        BaseType::Pid => Builtin::IsPid,
        BaseType::Reference => Builtin::IsReference,
        BaseType::Any => return None,
    })
}

/// `is_<type>(param)` for a guarded parameter, `None` otherwise.
pub fn guard_expr(
    param: &ParamSpec,
    constraints: &[GenericConstraint],
) -> SynthResult<Option<Expr>> {
    if param.mode != ParamMode::Guard {
        return Ok(None);
    }
    let predicate = match param.ty.resolve(constraints) {
        Some(TypeExpr::Base(base)) => predicate_for(*base),
        _ => None,
    };
    match predicate {
        Some(builtin) => Ok(Some(Expr::builtin(builtin, vec![Expr::Local(param.binding)]))),
        None => Err(CompileError::new(
            CompileErrorKind::UnsupportedGuardType {
                param: param.name.clone(),
                ty: param.ty.to_string(),
            },
            param.span,
        )
        .with_hint(match &param.ty {
            TypeExpr::External(m) => format!("use validate[{}] for value modules", m),
            TypeExpr::SelfType => "use validate[self] for the module's own type".to_string(),
            _ => "guards need a concrete base type other than any".to_string(),
        })),
    }
}

/// All guards joined with `and`, left to right in parameter order.
pub fn combined_guard(
    params: &[ParamSpec],
    constraints: &[GenericConstraint],
) -> SynthResult<Option<Expr>> {
    let mut combined: Option<Expr> = None;
    for param in params {
        if let Some(guard) = guard_expr(param, constraints)? {
            combined = Some(match combined {
                Some(acc) => Expr::binary(BinaryOp::And, acc, guard),
                None => guard,
            });
        }
    }
    Ok(combined)
}
