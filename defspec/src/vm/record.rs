//! Record schemas at runtime.
//!
//! A [`RecordSchema`] backs the `new` / `validate` / `update` intrinsics of
//! one struct and doubles as the value module registered under the struct's
//! module name.

use std::rc::Rc;

use defspec_runtime::{Diagnostic, ModuleRegistry, RuntimeError, RuntimeResult, Value, ValueModule};

use crate::ir::decl::RecordDef;

#[derive(Debug)]
struct SchemaSlot {
    name: String,
    module: Rc<dyn ValueModule>,
    default: Value,
}

/// The first field a mapping failed on.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFailure {
    pub field: String,
    pub value: Value,
    pub diagnostic: Diagnostic,
}

impl FieldFailure {
    /// `{:field, value, "message"}`
    pub fn to_value(&self) -> Value {
        Value::Tuple(vec![
            Value::atom(self.field.as_str()),
            self.value.clone(),
            Value::text(self.diagnostic.message()),
        ])
    }

    pub fn into_abort(self) -> RuntimeError {
        RuntimeError::ValidationAbort {
            name: self.field,
            value: self.value,
            diagnostic: self.diagnostic.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct RecordSchema {
    name: String,
    slots: Vec<SchemaSlot>,
}

impl RecordSchema {
    /// Resolve every field module. A module whose `default()` fails gives the
    /// field a `nil` default.
    pub fn build(def: &RecordDef, registry: &ModuleRegistry) -> RuntimeResult<Self> {
        let slots = def
            .fields
            .iter()
            .map(|field| {
                let module = registry
                    .get(field.module.name())
                    .ok_or_else(|| RuntimeError::unknown_module(field.module.name()))?;
                let default = module.default().unwrap_or(Value::Nil);
                Ok(SchemaSlot {
                    name: field.name.clone(),
                    module,
                    default,
                })
            })
            .collect::<RuntimeResult<Vec<_>>>()?;
        Ok(Self {
            name: def.name.clone(),
            slots,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Atom key first, then its text form.
    fn lookup<'v>(mapping: &'v Value, field: &str) -> Option<&'v Value> {
        mapping
            .map_get(&Value::atom(field))
            .or_else(|| mapping.map_get(&Value::text(field)))
    }

    fn check(slot: &SchemaSlot, raw: &Value) -> Result<Value, FieldFailure> {
        slot.module.validate(raw).map_err(|diagnostic| FieldFailure {
            field: slot.name.clone(),
            value: raw.clone(),
            diagnostic,
        })
    }

    pub fn defaults(&self) -> Value {
        Value::Record {
            type_name: self.name.clone(),
            fields: self
                .slots
                .iter()
                .map(|s| (s.name.clone(), s.default.clone()))
                .collect(),
        }
    }

    /// Build a record from a map. Absent fields take their defaults; the
    /// first failing field stops construction.
    pub fn construct(&self, mapping: &Value) -> Result<Value, FieldFailure> {
        let mut fields = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let value = match Self::lookup(mapping, &slot.name) {
                Some(raw) => Self::check(slot, raw)?,
                None => slot.default.clone(),
            };
            fields.push((slot.name.clone(), value));
        }
        Ok(Value::Record {
            type_name: self.name.clone(),
            fields,
        })
    }

    /// Replace only the fields present in `mapping`.
    pub fn update(&self, record: &Value, mapping: &Value) -> Result<Value, FieldFailure> {
        let mut updated = record.clone();
        if let Value::Record { fields, .. } = &mut updated {
            for slot in &self.slots {
                if let Some(raw) = Self::lookup(mapping, &slot.name) {
                    let value = Self::check(slot, raw)?;
                    match fields.iter_mut().find(|(name, _)| *name == slot.name) {
                        Some(entry) => entry.1 = value,
                        None => fields.push((slot.name.clone(), value)),
                    }
                }
            }
        }
        Ok(updated)
    }

    /// Record fields as an atom-keyed map.
    fn as_mapping(record: &Value) -> Value {
        match record {
            Value::Record { fields, .. } => Value::map(
                fields
                    .iter()
                    .map(|(name, v)| (Value::atom(name.as_str()), v.clone())),
            ),
            other => other.clone(),
        }
    }
}

/// `{:error, "expected a map, got: ..."}`
pub fn expected_map(value: &Value) -> Value {
    Value::error(Value::text(format!(
        "expected a map, got: {} ({})",
        value,
        value.type_name()
    )))
}

impl ValueModule for RecordSchema {
    fn default(&self) -> Result<Value, Diagnostic> {
        Ok(self.defaults())
    }

    fn validate(&self, value: &Value) -> Result<Value, Diagnostic> {
        let mapping = match value {
            Value::Map(_) => value.clone(),
            v if v.is_record_of(&self.name) => Self::as_mapping(v),
            other => {
                return Err(Diagnostic::new(format!(
                    "must be a map or %{}{{}} record, got: {} ({})",
                    self.name,
                    other,
                    other.type_name()
                )))
            }
        };
        self.construct(&mapping).map_err(|failure| {
            Diagnostic::new(format!(
                "{}: {} (got {})",
                failure.field, failure.diagnostic, failure.value
            ))
        })
    }
}
