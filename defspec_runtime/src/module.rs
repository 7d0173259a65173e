//! Value module contract
//!
//! A value module is the external collaborator a `validate[M]` parameter or a
//! struct field refers to. The compiler only ever relies on two operations,
//! `default()` and `validate(value)`; everything else about a module is
//! opaque to it.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Human-readable reason a value module rejected a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
}

impl Diagnostic {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prefix the message with a location, e.g. a list index or field name.
    pub fn context<S: fmt::Display>(self, at: S) -> Self {
        Self {
            message: format!("{}: {}", at, self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// The contract consumed by validation statements and struct schemas.
pub trait ValueModule: fmt::Debug {
    /// The module's default value.
    fn default(&self) -> Result<Value, Diagnostic>;

    /// Check (and possibly normalize) a value.
    fn validate(&self, value: &Value) -> Result<Value, Diagnostic>;
}

/// Value modules by name (`"Count"`, `"Accounts.Name"`).
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Rc<dyn ValueModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module, replacing any previous module with the same name.
    pub fn register<M>(&mut self, name: impl Into<String>, module: M)
    where
        M: ValueModule + 'static,
    {
        self.modules.insert(name.into(), Rc::new(module));
    }

    pub fn register_shared(&mut self, name: impl Into<String>, module: Rc<dyn ValueModule>) {
        self.modules.insert(name.into(), module);
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn ValueModule>> {
        self.modules.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Positive;

    impl ValueModule for Positive {
        fn default(&self) -> Result<Value, Diagnostic> {
            Ok(Value::Int(1))
        }

        fn validate(&self, value: &Value) -> Result<Value, Diagnostic> {
            match value {
                Value::Int(n) if *n > 0 => Ok(value.clone()),
                other => Err(Diagnostic::new(format!("expected a positive integer, got {}", other))),
            }
        }
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = ModuleRegistry::new();
        assert!(registry.is_empty());
        registry.register("Positive", Positive);
        registry.register("Accounts.Count", Positive);
        assert_eq!(registry.names(), vec!["Accounts.Count", "Positive"]);

        let module = registry.get("Positive").unwrap();
        assert_eq!(module.validate(&Value::Int(3)).unwrap(), Value::Int(3));
        assert_eq!(
            module.validate(&Value::Int(0)).unwrap_err().message(),
            "expected a positive integer, got 0"
        );
        assert!(registry.get("Missing").is_none());
    }

    #[test]
    fn test_diagnostic_context() {
        let d = Diagnostic::new("too short").context("element 2");
        assert_eq!(d.to_string(), "element 2: too short");
    }
}
