use serde::{Deserialize, Serialize};
use std::fmt;

use super::BaseType;

/// Name of a value module, e.g. `Count` or `Accounts.Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleRef(pub String);

impl ModuleRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    Base(BaseType),
    /// A value module's `t`.
    External(ModuleRef),
    /// The enclosing module's own `t`.
    SelfType,
    /// A type variable bound in the `where` list.
    Var(String),
}

impl TypeExpr {
    pub fn any() -> Self {
        TypeExpr::Base(BaseType::Any)
    }

    /// Follow type variables to their bounds. `None` when a variable has no
    /// bound or the bounds form a cycle.
    pub fn resolve<'a>(&'a self, constraints: &'a [GenericConstraint]) -> Option<&'a TypeExpr> {
        let mut current = self;
        for _ in 0..=constraints.len() {
            match current {
                TypeExpr::Var(name) => {
                    current = &constraints.iter().find(|c| &c.name == name)?.bound;
                }
                resolved => return Some(resolved),
            }
        }
        None
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Base(base) => write!(f, "{}", base),
            TypeExpr::External(module) => write!(f, "{}", module),
            TypeExpr::SelfType => f.write_str("self"),
            TypeExpr::Var(name) => f.write_str(name),
        }
    }
}

/// `name: bound` from a `where` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericConstraint {
    pub name: String,
    pub bound: TypeExpr,
}

impl fmt::Display for GenericConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.bound)
    }
}
