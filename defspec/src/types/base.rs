use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in types a parameter may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseType {
    Integer,
    Float,
    Boolean,
    Text,
    Binary,
    List,
    Tuple,
    Map,
    Function,
    Pid,
    Reference,
    Any,
}

impl BaseType {
    pub const ALL: [BaseType; 12] = [
        BaseType::Integer,
        BaseType::Float,
        BaseType::Boolean,
        BaseType::Text,
        BaseType::Binary,
        BaseType::List,
        BaseType::Tuple,
        BaseType::Map,
        BaseType::Function,
        BaseType::Pid,
        BaseType::Reference,
        BaseType::Any,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            BaseType::Integer => "integer",
            BaseType::Float => "float",
            BaseType::Boolean => "boolean",
            BaseType::Text => "text",
            BaseType::Binary => "binary",
            BaseType::List => "list",
            BaseType::Tuple => "tuple",
            BaseType::Map => "map",
            BaseType::Function => "function",
            BaseType::Pid => "pid",
            BaseType::Reference => "reference",
            BaseType::Any => "any",
        }
    }

    /// Comma-separated names, for hints.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for ty in BaseType::ALL {
            assert_eq!(BaseType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(BaseType::from_name("Integer"), None);
        assert_eq!(BaseType::from_name("atom"), None);
    }
}
