//! Clause pattern matching.

use defspec_runtime::Value;

use super::frame::Frame;
use crate::ir::core::Pattern;

/// Match `value` against `pattern`, binding variables into `frame`.
/// Literals match strictly: `1` does not match `1.0`.
pub(crate) fn match_pattern(pattern: &Pattern, value: &Value, frame: &mut Frame) -> bool {
    match pattern {
        Pattern::Wildcard => true,
        Pattern::Bind(id) => {
            frame.set(*id, value.clone());
            true
        }
        Pattern::Same(id) => frame.get(*id) == Some(value),
        Pattern::Literal(lit) => lit.to_value() == *value,
        Pattern::Tuple(items) => match value {
            Value::Tuple(values) => match_all(items, values, frame),
            _ => false,
        },
        Pattern::List { items, tail } => {
            let Value::List(values) = value else {
                return false;
            };
            match tail {
                None => match_all(items, values, frame),
                Some(tail) => {
                    values.len() >= items.len()
                        && match_all(items, &values[..items.len()], frame)
                        && match_pattern(tail, &Value::List(values[items.len()..].to_vec()), frame)
                }
            }
        }
        Pattern::Map(entries) => entries.iter().all(|(key, p)| {
            value
                .map_get(&key.to_value())
                .is_some_and(|v| match_pattern(p, v, frame))
        }),
    }
}

pub(crate) fn match_all(patterns: &[Pattern], values: &[Value], frame: &mut Frame) -> bool {
    patterns.len() == values.len()
        && patterns
            .iter()
            .zip(values)
            .all(|(p, v)| match_pattern(p, v, frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::binding::BindingId;
    use crate::ir::core::Literal;

    #[test]
    fn test_literals_are_strict() {
        let mut frame = Frame::new(0);
        let one = Pattern::Literal(Literal::Int(1));
        assert!(match_pattern(&one, &Value::Int(1), &mut frame));
        assert!(!match_pattern(&one, &Value::Float(1.0), &mut frame));
    }

    #[test]
    fn test_repeated_variable_requires_equal_values() {
        let pair = Pattern::Tuple(vec![Pattern::Bind(BindingId(0)), Pattern::Same(BindingId(0))]);
        let mut frame = Frame::new(1);
        assert!(match_pattern(
            &pair,
            &Value::Tuple(vec![Value::Int(2), Value::Int(2)]),
            &mut frame
        ));
        let mut frame = Frame::new(1);
        assert!(!match_pattern(
            &pair,
            &Value::Tuple(vec![Value::Int(2), Value::Int(3)]),
            &mut frame
        ));
    }

    #[test]
    fn test_list_with_tail() {
        let pattern = Pattern::List {
            items: vec![Pattern::Bind(BindingId(0))],
            tail: Some(Box::new(Pattern::Bind(BindingId(1)))),
        };
        let mut frame = Frame::new(2);
        let list = Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(match_pattern(&pattern, &list, &mut frame));
        assert_eq!(frame.get(BindingId(0)), Some(&Value::Int(1)));
        assert_eq!(
            frame.get(BindingId(1)),
            Some(&Value::List(vec![Value::Int(2), Value::Int(3)]))
        );
        assert!(!match_pattern(&pattern, &Value::List(vec![]), &mut Frame::new(2)));
    }

    #[test]
    fn test_partial_map() {
        let pattern = Pattern::Map(vec![(
            Literal::Atom("status".to_string()),
            Pattern::Literal(Literal::Atom("ok".to_string())),
        )]);
        let map = Value::map([
            (Value::atom("status"), Value::atom("ok")),
            (Value::atom("extra"), Value::Int(1)),
        ]);
        assert!(match_pattern(&pattern, &map, &mut Frame::new(0)));
        assert!(!match_pattern(&pattern, &Value::Map(vec![]), &mut Frame::new(0)));
        assert!(!match_pattern(&pattern, &Value::Nil, &mut Frame::new(0)));
    }
}
