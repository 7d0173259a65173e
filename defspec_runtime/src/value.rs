//! Dynamic runtime values
//!
//! Every value a compiled program can produce or receive. The variants line
//! up with the base types a parameter may be guarded on (integer, float,
//! boolean, text, binary, list, tuple, map, function, pid, reference), plus
//! atoms, `nil` and records built by struct schemas.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    // ========== Scalars ==========
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Binary(Vec<u8>),
    Atom(String),
    Nil,

    // ========== Collections ==========
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Insertion-ordered association list; keys are unique.
    Map(Vec<(Value, Value)>),

    // ========== Handles ==========
    /// Reference to a compiled function
    Function {
        module: String,
        name: String,
        arity: usize,
    },
    Pid(u64),
    Reference(u64),

    // ========== Records ==========
    /// Instance of a struct schema; fields keep declaration order.
    Record {
        type_name: String,
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    /// Name of the value's runtime type, as used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "text",
            Value::Binary(_) => "binary",
            Value::Atom(_) => "atom",
            Value::Nil => "nil",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Function { .. } => "function",
            Value::Pid(_) => "pid",
            Value::Reference(_) => "reference",
            Value::Record { type_name, .. } => type_name,
        }
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Value::Atom(name.into())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// `{:ok, value}`
    pub fn ok(value: Value) -> Self {
        Value::Tuple(vec![Value::atom("ok"), value])
    }

    /// `{:error, reason}`
    pub fn error(reason: Value) -> Self {
        Value::Tuple(vec![Value::atom("error"), reason])
    }

    /// Build a map from key/value pairs; later duplicates replace earlier ones.
    pub fn map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (k, v) in entries {
            match out.iter_mut().find(|(existing, _)| *existing == k) {
                Some(slot) => slot.1 = v,
                None => out.push((k, v)),
            }
        }
        Value::Map(out)
    }

    pub fn map_get(&self, key: &Value) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn record_field(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Record { fields, .. } => {
                fields.iter().find(|(name, _)| name == field).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function { .. })
    }

    pub fn is_pid(&self) -> bool {
        matches!(self, Value::Pid(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }

    pub fn is_record_of(&self, record: &str) -> bool {
        matches!(self, Value::Record { type_name, .. } if type_name == record)
    }
}

// ========== From implementations ==========

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

// ========== Display implementation ==========

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", v)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => {
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{}.0", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            Value::Bool(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Binary(bytes) => {
                write!(f, "<<")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", b)?;
                }
                write!(f, ">>")
            }
            Value::Atom(a) => write!(f, ":{}", a),
            Value::Nil => write!(f, "nil"),
            Value::List(items) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "{{")?;
                write_seq(f, items)?;
                write!(f, "}}")
            }
            Value::Map(entries) => {
                write!(f, "%{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match k {
                        Value::Atom(a) => write!(f, "{}: {}", a, v)?,
                        other => write!(f, "{} => {}", other, v)?,
                    }
                }
                write!(f, "}}")
            }
            Value::Function {
                module,
                name,
                arity,
            } => write!(f, "&{}.{}/{}", module, name, arity),
            Value::Pid(id) => write!(f, "#PID<0.{}.0>", id),
            Value::Reference(id) => write!(f, "#Reference<{}>", id),
            Value::Record { type_name, fields } => {
                write!(f, "%{}{{", type_name)?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ========== PartialEq implementation ==========

/// Structural equality. Maps compare as sets of entries; numbers of
/// different kinds are never equal here (see `dispatch::loose_eq`).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.iter().any(|(k2, v2)| k == k2 && v == v2))
            }
            (
                Value::Function {
                    module: m1,
                    name: n1,
                    arity: a1,
                },
                Value::Function {
                    module: m2,
                    name: n2,
                    arity: a2,
                },
            ) => m1 == m2 && n1 == n2 && a1 == a2,
            (Value::Pid(a), Value::Pid(b)) => a == b,
            (Value::Reference(a), Value::Reference(b)) => a == b,
            (
                Value::Record {
                    type_name: t1,
                    fields: f1,
                },
                Value::Record {
                    type_name: t2,
                    fields: f2,
                },
            ) => t1 == t2 && f1 == f2,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(1).type_name(), "integer");
        assert_eq!(Value::Binary(vec![]).type_name(), "binary");
        assert_eq!(Value::Pid(3).type_name(), "pid");
        let rec = Value::Record {
            type_name: "Accounts".to_string(),
            fields: vec![],
        };
        assert_eq!(rec.type_name(), "Accounts");
    }

    #[test]
    fn test_display() {
        let v = Value::ok(Value::map(vec![
            (Value::atom("name"), Value::text("x")),
            (Value::Int(1), Value::List(vec![Value::Float(2.0), Value::Nil])),
        ]));
        assert_eq!(v.to_string(), r#"{:ok, %{name: "x", 1 => [2.0, nil]}}"#);

        let rec = Value::Record {
            type_name: "Point".to_string(),
            fields: vec![("x".to_string(), Value::Int(1))],
        };
        assert_eq!(rec.to_string(), "%Point{x: 1}");
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let a = Value::map(vec![
            (Value::atom("a"), Value::Int(1)),
            (Value::atom("b"), Value::Int(2)),
        ]);
        let b = Value::map(vec![
            (Value::atom("b"), Value::Int(2)),
            (Value::atom("a"), Value::Int(1)),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_later_keys_replace() {
        let m = Value::map(vec![
            (Value::atom("a"), Value::Int(1)),
            (Value::atom("a"), Value::Int(2)),
        ]);
        assert_eq!(m.map_get(&Value::atom("a")), Some(&Value::Int(2)));
        assert_eq!(m.map_get(&Value::text("a")), None);
    }

    #[test]
    fn test_int_and_float_are_structurally_distinct() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Int(1).as_float(), Some(1.0));
    }
}
