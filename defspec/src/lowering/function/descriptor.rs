//! Parameter descriptors.
//!
//! A parameter's type annotation may wrap the actual type:
//!
//! ```text
//! count: integer \\ 0           default
//! count: guard[integer]         runtime type guard
//! count: validate[Count] \\ 1   validation, with a default
//! ```
//!
//! The split never fails. Anything that is not one of the wrappers is the
//! type itself, and turning that into a [`TypeExpr`](crate::types::TypeExpr)
//! is a separate step.

use defspec_parser::ast::{Expr, ExprKind};

use crate::ir::spec::ParamMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor<'a> {
    pub ty: &'a Expr,
    pub default: Option<&'a Expr>,
    pub mode: ParamMode,
}

pub fn describe(annotation: &Expr) -> ParamDescriptor<'_> {
    let (inner, default) = extract_default(annotation);
    let (ty, mode) = extract_mode(inner);
    ParamDescriptor { ty, default, mode }
}

/// `inner \\ default`
pub fn extract_default(expr: &Expr) -> (&Expr, Option<&Expr>) {
    match &expr.kind {
        ExprKind::Default { inner, default } => (inner, Some(default)),
        _ => (expr, None),
    }
}

/// `guard[inner]` / `validate[inner]`
pub fn extract_mode(expr: &Expr) -> (&Expr, ParamMode) {
    if let ExprKind::Index { target, args } = &expr.kind {
        if let [inner] = args.as_slice() {
            match target.as_ident() {
                Some("guard") => return (inner, ParamMode::Guard),
                Some("validate") => return (inner, ParamMode::Validate),
                _ => {}
            }
        }
    }
    (expr, ParamMode::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use defspec_parser::parse_expression;

    fn descriptor_of(source: &str) -> (String, Option<String>, ParamMode) {
        let expr = parse_expression(source).unwrap();
        let d = describe(&expr);
        let text = |e: &Expr| e.span.text(source).to_string();
        (text(d.ty), d.default.map(text), d.mode)
    }

    #[test]
    fn test_plain_type() {
        assert_eq!(
            descriptor_of("integer"),
            ("integer".to_string(), None, ParamMode::None)
        );
    }

    #[test]
    fn test_default_then_mode() {
        assert_eq!(
            descriptor_of(r"validate[Count] \\ 1"),
            ("Count".to_string(), Some("1".to_string()), ParamMode::Validate)
        );
        assert_eq!(
            descriptor_of(r"guard[float] \\ 0.5"),
            ("float".to_string(), Some("0.5".to_string()), ParamMode::Guard)
        );
    }

    #[test]
    fn test_unrecognized_wrappers_are_the_type() {
        let (ty, default, mode) = descriptor_of("check[integer]");
        assert_eq!((ty.as_str(), default, mode), ("check[integer]", None, ParamMode::None));

        let (ty, _, mode) = descriptor_of("guard[integer, float]");
        assert_eq!((ty.as_str(), mode), ("guard[integer, float]", ParamMode::None));
    }

    #[test]
    fn test_default_inside_wrapper_stays_inside() {
        let (ty, default, mode) = descriptor_of(r"guard[integer \\ 0]");
        assert_eq!(ty, r"integer \\ 0");
        assert_eq!(default, None);
        assert_eq!(mode, ParamMode::Guard);
    }
}
