//! Reference bounded value modules.
//!
//! Small implementations of the [`ValueModule`] contract so compiled
//! programs can be run and tested: numeric ranges, text patterns, atom
//! enumerations and bounded lists.

use std::rc::Rc;

use regex::Regex;

use crate::module::{Diagnostic, ValueModule};
use crate::value::Value;

fn expected(kind: &str, got: &Value) -> Diagnostic {
    Diagnostic::new(format!("must be {}, got: {} ({})", kind, got, got.type_name()))
}

// ============================================================================
// Numeric ranges
// ============================================================================

/// Integers within optional inclusive bounds.
#[derive(Debug, Clone)]
pub struct IntegerRange {
    min: Option<i64>,
    max: Option<i64>,
    default: Option<i64>,
}

impl IntegerRange {
    /// The default is the lower bound, or 0 clamped into range.
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        let default = match (min, max) {
            (Some(lo), _) => lo,
            (None, Some(hi)) => hi.min(0),
            (None, None) => 0,
        };
        Self {
            min,
            max,
            default: Some(default),
        }
    }

    pub fn with_default(mut self, default: i64) -> Self {
        self.default = Some(default);
        self
    }

    /// No default at all; `default()` fails.
    pub fn without_default(mut self) -> Self {
        self.default = None;
        self
    }
}

impl ValueModule for IntegerRange {
    fn default(&self) -> Result<Value, Diagnostic> {
        match self.default {
            Some(d) => self.validate(&Value::Int(d)),
            None => Err(Diagnostic::new("no default value")),
        }
    }

    fn validate(&self, value: &Value) -> Result<Value, Diagnostic> {
        let n = value.as_int().ok_or_else(|| expected("an integer", value))?;
        if let Some(min) = self.min {
            if n < min {
                return Err(Diagnostic::new(format!(
                    "must be greater than or equal to {}",
                    min
                )));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(Diagnostic::new(format!("must be less than or equal to {}", max)));
            }
        }
        Ok(Value::Int(n))
    }
}

/// Floats within optional inclusive bounds; integers are widened.
#[derive(Debug, Clone)]
pub struct FloatRange {
    min: Option<f64>,
    max: Option<f64>,
    default: f64,
}

impl FloatRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            default: min.unwrap_or(0.0),
        }
    }

    pub fn with_default(mut self, default: f64) -> Self {
        self.default = default;
        self
    }
}

impl ValueModule for FloatRange {
    fn default(&self) -> Result<Value, Diagnostic> {
        self.validate(&Value::Float(self.default))
    }

    fn validate(&self, value: &Value) -> Result<Value, Diagnostic> {
        let x = value.as_float().ok_or_else(|| expected("a number", value))?;
        if !x.is_finite() {
            return Err(Diagnostic::new("must be a finite number"));
        }
        if let Some(min) = self.min {
            if x < min {
                return Err(Diagnostic::new(format!(
                    "must be greater than or equal to {}",
                    min
                )));
            }
        }
        if let Some(max) = self.max {
            if x > max {
                return Err(Diagnostic::new(format!("must be less than or equal to {}", max)));
            }
        }
        Ok(Value::Float(x))
    }
}

// ============================================================================
// Text
// ============================================================================

/// Text with optional length bounds and an optional regex.
#[derive(Debug, Clone)]
pub struct TextPattern {
    pattern: Option<Regex>,
    min_len: usize,
    max_len: Option<usize>,
    default: Option<String>,
}

impl TextPattern {
    /// Any text.
    pub fn any() -> Self {
        Self {
            pattern: None,
            min_len: 0,
            max_len: None,
            default: Some(String::new()),
        }
    }

    /// Text that must match `pattern`. There is no default until one is set.
    pub fn matching(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Some(Regex::new(pattern)?),
            min_len: 0,
            max_len: None,
            default: None,
        })
    }

    pub fn with_length(mut self, min_len: usize, max_len: Option<usize>) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn without_default(mut self) -> Self {
        self.default = None;
        self
    }
}

impl ValueModule for TextPattern {
    fn default(&self) -> Result<Value, Diagnostic> {
        match &self.default {
            Some(d) => self.validate(&Value::text(d.as_str())),
            None => Err(Diagnostic::new("no default value")),
        }
    }

    fn validate(&self, value: &Value) -> Result<Value, Diagnostic> {
        let s = value.as_text().ok_or_else(|| expected("text", value))?;
        let len = s.chars().count();
        if len < self.min_len {
            return Err(Diagnostic::new(format!(
                "must be at least {} characters",
                self.min_len
            )));
        }
        if let Some(max) = self.max_len {
            if len > max {
                return Err(Diagnostic::new(format!("must be at most {} characters", max)));
            }
        }
        if let Some(re) = &self.pattern {
            if !re.is_match(s) {
                return Err(Diagnostic::new(format!("must match {}", re.as_str())));
            }
        }
        Ok(value.clone())
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// One of a fixed set of atoms. Text naming a member is accepted and
/// normalized to the atom.
#[derive(Debug, Clone)]
pub struct AtomEnum {
    members: Vec<String>,
    default: Option<String>,
}

impl AtomEnum {
    /// The first member is the default.
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        let default = members.first().cloned();
        Self { members, default }
    }

    fn describe(&self) -> String {
        let listed: Vec<String> = self.members.iter().map(|m| format!(":{}", m)).collect();
        format!("one of [{}]", listed.join(", "))
    }
}

impl ValueModule for AtomEnum {
    fn default(&self) -> Result<Value, Diagnostic> {
        self.default
            .as_ref()
            .map(|d| Value::atom(d.as_str()))
            .ok_or_else(|| Diagnostic::new("no default value"))
    }

    fn validate(&self, value: &Value) -> Result<Value, Diagnostic> {
        let name = match value {
            Value::Atom(a) | Value::Text(a) => a,
            other => return Err(expected(&self.describe(), other)),
        };
        if self.members.iter().any(|m| m == name) {
            Ok(Value::atom(name.as_str()))
        } else {
            Err(expected(&self.describe(), value))
        }
    }
}

// ============================================================================
// Lists
// ============================================================================

/// Lists with length bounds whose elements are checked by another module.
#[derive(Debug, Clone)]
pub struct BoundedList {
    element: Option<Rc<dyn ValueModule>>,
    min_len: usize,
    max_len: Option<usize>,
}

impl BoundedList {
    pub fn new(min_len: usize, max_len: Option<usize>) -> Self {
        Self {
            element: None,
            min_len,
            max_len,
        }
    }

    pub fn of<M: ValueModule + 'static>(mut self, element: M) -> Self {
        self.element = Some(Rc::new(element));
        self
    }
}

impl ValueModule for BoundedList {
    fn default(&self) -> Result<Value, Diagnostic> {
        self.validate(&Value::List(Vec::new()))
    }

    fn validate(&self, value: &Value) -> Result<Value, Diagnostic> {
        let Value::List(items) = value else {
            return Err(expected("a list", value));
        };
        if items.len() < self.min_len {
            return Err(Diagnostic::new(format!(
                "must have at least {} element(s)",
                self.min_len
            )));
        }
        if let Some(max) = self.max_len {
            if items.len() > max {
                return Err(Diagnostic::new(format!("must have at most {} element(s)", max)));
            }
        }
        match &self.element {
            None => Ok(value.clone()),
            Some(element) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    element
                        .validate(item)
                        .map_err(|d| d.context(format!("element {}", i)))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
        }
    }
}
