//! Builtin functions.

use std::cmp::Ordering;

use defspec_runtime::{compare, RuntimeError, RuntimeResult, Value};

use crate::ir::core::Builtin;

pub(crate) fn call_builtin(builtin: Builtin, args: &[Value]) -> RuntimeResult<Value> {
    if args.len() != builtin.arity() {
        return Err(RuntimeError::ArityMismatch {
            function: builtin.name().to_string(),
            expected: builtin.arity().to_string(),
            got: args.len(),
        });
    }
    let x = &args[0];
    Ok(match builtin {
        Builtin::IsInteger => Value::Bool(x.is_integer()),
        Builtin::IsFloat => Value::Bool(x.is_float()),
        Builtin::IsNumber => Value::Bool(x.is_integer() || x.is_float()),
        Builtin::IsBoolean => Value::Bool(x.is_boolean()),
        Builtin::IsText => Value::Bool(x.is_text()),
        Builtin::IsBinary => Value::Bool(x.is_binary()),
        Builtin::IsAtom => Value::Bool(matches!(x, Value::Atom(_))),
        Builtin::IsNil => Value::Bool(matches!(x, Value::Nil)),
        Builtin::IsList => Value::Bool(x.is_list()),
        Builtin::IsTuple => Value::Bool(x.is_tuple()),
        Builtin::IsMap => Value::Bool(x.is_map()),
        Builtin::IsFunction => Value::Bool(x.is_function()),
        Builtin::IsPid => Value::Bool(x.is_pid()),
        Builtin::IsReference => Value::Bool(x.is_reference()),

        Builtin::Length => {
            let len = match x {
                Value::List(items) | Value::Tuple(items) => items.len(),
                Value::Map(entries) => entries.len(),
                Value::Text(s) => s.chars().count(),
                Value::Binary(bytes) => bytes.len(),
                other => return Err(bad_argument(builtin, other)),
            };
            Value::Int(len as i64)
        }
        Builtin::Abs => match x {
            Value::Int(n) => Value::Int(
                n.checked_abs()
                    .ok_or_else(|| RuntimeError::overflow(format!("abs({})", n)))?,
            ),
            Value::Float(f) => Value::Float(f.abs()),
            other => return Err(bad_argument(builtin, other)),
        },
        Builtin::ToText => match x {
            Value::Text(_) => x.clone(),
            Value::Atom(a) => Value::text(a.as_str()),
            other => Value::text(other.to_string()),
        },
        Builtin::Min | Builtin::Max => {
            let y = &args[1];
            let ord = compare(x, y).ok_or_else(|| {
                RuntimeError::type_error(format!(
                    "{} cannot compare {} ({}) and {} ({})",
                    builtin.name(),
                    x,
                    x.type_name(),
                    y,
                    y.type_name()
                ))
            })?;
            let take_first = match builtin {
                Builtin::Min => ord != Ordering::Greater,
                _ => ord != Ordering::Less,
            };
            if take_first {
                x.clone()
            } else {
                y.clone()
            }
        }
        Builtin::Hd => match x {
            Value::List(items) if !items.is_empty() => items[0].clone(),
            other => return Err(bad_argument(builtin, other)),
        },
        Builtin::Tl => match x {
            Value::List(items) if !items.is_empty() => Value::List(items[1..].to_vec()),
            other => return Err(bad_argument(builtin, other)),
        },
        Builtin::Elem => {
            let (Value::Tuple(items), Value::Int(i)) = (x, &args[1]) else {
                return Err(bad_argument(builtin, x));
            };
            usize::try_from(*i)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or_else(|| {
                    RuntimeError::type_error(format!(
                        "elem: index {} out of range for a tuple of {}",
                        i,
                        items.len()
                    ))
                })?
        }
        Builtin::MapGet => match x {
            Value::Map(_) => x.map_get(&args[1]).cloned().unwrap_or(Value::Nil),
            Value::Record { .. } => match &args[1] {
                Value::Atom(field) => x.record_field(field).cloned().unwrap_or(Value::Nil),
                _ => Value::Nil,
            },
            other => return Err(bad_argument(builtin, other)),
        },
    })
}

fn bad_argument(builtin: Builtin, value: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "{}: bad argument {} ({})",
        builtin.name(),
        value,
        value.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(builtin: Builtin, args: &[Value]) -> RuntimeResult<Value> {
        call_builtin(builtin, args)
    }

    #[test]
    fn test_predicates() {
        assert_eq!(call(Builtin::IsInteger, &[Value::Int(1)]).unwrap(), Value::Bool(true));
        assert_eq!(call(Builtin::IsInteger, &[Value::Float(1.0)]).unwrap(), Value::Bool(false));
        assert_eq!(call(Builtin::IsNumber, &[Value::Float(1.0)]).unwrap(), Value::Bool(true));
        assert_eq!(call(Builtin::IsAtom, &[Value::atom("a")]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_arity_is_checked() {
        let err = call(Builtin::Max, &[Value::Int(1)]).unwrap_err();
        assert!(matches!(err, RuntimeError::ArityMismatch { got: 1, .. }), "got {:?}", err);
    }

    #[test]
    fn test_collections() {
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(call(Builtin::Length, &[list.clone()]).unwrap(), Value::Int(2));
        assert_eq!(call(Builtin::Hd, &[list.clone()]).unwrap(), Value::Int(1));
        assert_eq!(
            call(Builtin::Tl, &[list]).unwrap(),
            Value::List(vec![Value::Int(2)])
        );
        assert!(call(Builtin::Hd, &[Value::List(vec![])]).is_err());
        assert_eq!(call(Builtin::Length, &[Value::text("héllo")]).unwrap(), Value::Int(5));

        let pair = Value::Tuple(vec![Value::atom("ok"), Value::Int(3)]);
        assert_eq!(call(Builtin::Elem, &[pair.clone(), Value::Int(1)]).unwrap(), Value::Int(3));
        assert!(call(Builtin::Elem, &[pair, Value::Int(2)]).is_err());
    }

    #[test]
    fn test_min_max_and_text() {
        assert_eq!(
            call(Builtin::Max, &[Value::Int(2), Value::Float(2.5)]).unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(call(Builtin::Min, &[Value::Int(2), Value::Int(7)]).unwrap(), Value::Int(2));
        assert_eq!(call(Builtin::ToText, &[Value::atom("ok")]).unwrap(), Value::text("ok"));
        assert_eq!(call(Builtin::ToText, &[Value::Int(42)]).unwrap(), Value::text("42"));
        assert!(call(Builtin::Abs, &[Value::Int(i64::MIN)]).is_err());
    }

    #[test]
    fn test_map_get() {
        let map = Value::map([(Value::atom("a"), Value::Int(1))]);
        assert_eq!(call(Builtin::MapGet, &[map.clone(), Value::atom("a")]).unwrap(), Value::Int(1));
        assert_eq!(call(Builtin::MapGet, &[map, Value::atom("b")]).unwrap(), Value::Nil);
    }
}
