use crate::span::Span;

/// What went wrong while turning a function definition into declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// `guard[T]` where `T` has no runtime predicate.
    UnsupportedGuardType { param: String, ty: String },
    /// `validate[T]` where `T` is not a value module.
    UnsupportedValidationType { param: String, ty: String },
    /// Clause-list body combined with a guarded parameter.
    ClauseGuardConflict { function: String, param: String },
    /// Clause-list body combined with a validated parameter.
    ClauseValidationConflict { function: String, param: String },
    /// A function name declared twice in one module.
    DuplicateSignature { module: String, function: String },
    /// A clause whose pattern count differs from the declared arity.
    ClauseArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },
    /// A clause guard that calls something other than a builtin.
    UnsafeGuardExpression(String),
    InvalidTypeExpr(String),
    UnboundVariable(String),
    InvalidPattern(String),
    DuplicateParameter(String),
    DuplicateField(String),
    /// Struct fields that lead back to the struct itself, e.g. `Node -> Node`.
    RecursiveStruct { cycle: Vec<String> },
    UnsupportedExpression(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub span: Span,
    pub hint: Option<String>,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn unbound(name: impl Into<String>, span: Span) -> Self {
        Self::new(CompileErrorKind::UnboundVariable(name.into()), span)
    }

    pub fn unsupported(what: impl Into<String>, span: Span) -> Self {
        Self::new(CompileErrorKind::UnsupportedExpression(what.into()), span)
    }
}

impl std::fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedGuardType { param, ty } => {
                write!(f, "cannot guard parameter {} on type {}", param, ty)
            }
            Self::UnsupportedValidationType { param, ty } => write!(
                f,
                "cannot validate parameter {}: {} is not a value module",
                param, ty
            ),
            Self::ClauseGuardConflict { function, param } => write!(
                f,
                "{} has a clause body and a guarded parameter {}",
                function, param
            ),
            Self::ClauseValidationConflict { function, param } => write!(
                f,
                "{} has a clause body and a validated parameter {}",
                function, param
            ),
            Self::DuplicateSignature { module, function } => {
                write!(f, "{}.{} is declared more than once", module, function)
            }
            Self::ClauseArityMismatch {
                function,
                expected,
                found,
            } => write!(
                f,
                "clause of {} has {} pattern(s), expected {}",
                function, found, expected
            ),
            Self::UnsafeGuardExpression(what) => {
                write!(f, "guard may only call builtins, found {}", what)
            }
            Self::InvalidTypeExpr(what) => write!(f, "invalid type expression: {}", what),
            Self::UnboundVariable(name) => write!(f, "unbound variable {}", name),
            Self::InvalidPattern(what) => write!(f, "invalid pattern: {}", what),
            Self::DuplicateParameter(name) => write!(f, "duplicate parameter {}", name),
            Self::DuplicateField(name) => write!(f, "duplicate struct field {}", name),
            Self::RecursiveStruct { cycle } => {
                write!(f, "struct fields form a cycle: {}", cycle.join(" -> "))
            }
            Self::UnsupportedExpression(what) => write!(f, "unsupported expression: {}", what),
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.span.is_synthetic() {
            write!(f, " at {}", self.span)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {}

pub type CompileResult<T> = Result<T, CompileError>;
