//! Struct schemas: generated new / validate / update.

mod common;

use common::{int, map, record, text, vm};
use defspec::{RuntimeError, Value, Vm};
use pretty_assertions::assert_eq;

const ACCT: &str = "module Acct {\nstruct { name: Name, count: Count }\n}\n";

fn acct_vm() -> Vm {
    vm(ACCT)
}

fn acct(name: Value, count: i64) -> Value {
    record("Acct", &[("name", name), ("count", int(count))])
}

#[test]
fn test_new_with_valid_values() {
    let vm = acct_vm();
    let mapping = map(&[("name", text("x")), ("count", int(5))]);
    assert_eq!(vm.call("Acct", "new", vec![mapping]).unwrap(), acct(text("x"), 5));
}

#[test]
fn test_new_fills_defaults() {
    let vm = acct_vm();
    assert_eq!(
        vm.call("Acct", "new", vec![map(&[("name", text("x"))])]).unwrap(),
        acct(text("x"), 0)
    );
    // Name has no default
    assert_eq!(vm.call("Acct", "new", vec![]).unwrap(), acct(Value::Nil, 0));
}

#[test]
fn test_new_accepts_text_keys() {
    let vm = acct_vm();
    let mapping = Value::map([(text("name"), text("y")), (text("count"), int(2))]);
    assert_eq!(vm.call("Acct", "new", vec![mapping]).unwrap(), acct(text("y"), 2));
}

#[test]
fn test_new_aborts_on_invalid_field() {
    let vm = acct_vm();
    let err = vm
        .call("Acct", "new", vec![map(&[("name", text("x")), ("count", int(-3))])])
        .unwrap_err();
    assert_eq!(
        err,
        RuntimeError::ValidationAbort {
            name: "count".to_string(),
            value: int(-3),
            diagnostic: "must be greater than or equal to 0".to_string(),
        }
    );
}

#[test]
fn test_new_rejects_non_map() {
    let vm = acct_vm();
    assert_eq!(
        vm.call("Acct", "new", vec![int(5)]).unwrap(),
        Value::error(text("expected a map, got: 5 (integer)"))
    );
}

#[test]
fn test_validate_returns_failure_value() {
    let vm = acct_vm();
    let mapping = Value::map([(text("name"), text("x")), (text("count"), int(-1))]);
    let result = vm.call("Acct", "validate", vec![mapping]).unwrap();
    assert_eq!(
        result,
        Value::error(Value::Tuple(vec![
            Value::atom("count"),
            int(-1),
            text("must be greater than or equal to 0"),
        ]))
    );
}

#[test]
fn test_validate_success() {
    let vm = acct_vm();
    let result = vm
        .call("Acct", "validate", vec![map(&[("name", text("x")), ("count", int(1))])])
        .unwrap();
    assert_eq!(result, Value::ok(acct(text("x"), 1)));

    assert_eq!(
        vm.call("Acct", "validate", vec![Value::List(vec![])]).unwrap(),
        Value::error(text("expected a map, got: [] (list)"))
    );
}

#[test]
fn test_update_changes_only_given_fields() {
    let vm = acct_vm();
    let existing = acct(text("x"), 5);
    let result = vm
        .call("Acct", "update", vec![existing.clone(), map(&[("count", int(10))])])
        .unwrap();
    assert_eq!(result, Value::ok(acct(text("x"), 10)));

    let result = vm
        .call("Acct", "update", vec![existing, map(&[("name", text(""))])])
        .unwrap();
    assert_eq!(
        result,
        Value::error(Value::Tuple(vec![
            Value::atom("name"),
            text(""),
            text("must be at least 1 characters"),
        ]))
    );
}

#[test]
fn test_update_requires_own_record() {
    let vm = acct_vm();
    let err = vm
        .call("Acct", "update", vec![int(1), map(&[("count", int(10))])])
        .unwrap_err();
    assert!(
        matches!(&err, RuntimeError::NoClauseMatch { function, .. } if function == "Acct.update/2"),
        "got {:?}",
        err
    );

    let other = record("Other", &[("count", int(1))]);
    assert!(matches!(
        vm.call("Acct", "update", vec![other, map(&[])]),
        Err(RuntimeError::NoClauseMatch { .. })
    ));
}

#[test]
fn test_struct_module_validates_its_own_type() {
    let vm = vm(concat!(
        "module Acct {\n",
        "struct { name: Name, count: Count }\n",
        "def bump(acct: validate[self]) { acct.count + 1 }\n",
        "}\n",
    ));
    assert_eq!(
        vm.call("Acct", "bump", vec![map(&[("name", text("x")), ("count", int(2))])])
            .unwrap(),
        int(3)
    );
    assert_eq!(vm.call("Acct", "bump", vec![acct(text("x"), 4)]).unwrap(), int(5));

    let err = vm
        .call("Acct", "bump", vec![map(&[("count", int(-1))])])
        .unwrap_err();
    assert_eq!(
        err,
        RuntimeError::ValidationAbort {
            name: "acct".to_string(),
            value: map(&[("count", int(-1))]),
            diagnostic: "count: must be greater than or equal to 0 (got -1)".to_string(),
        }
    );
}

#[test]
fn test_struct_fields_using_other_structs() {
    // Order is declared first but built after Acct
    let vm = vm(concat!(
        "module Order {\n",
        "struct { owner: Acct, qty: Count }\n",
        "}\n",
        "module Acct {\n",
        "struct { name: Name, count: Count }\n",
        "}\n",
    ));
    let order = vm
        .call("Order", "new", vec![map(&[("owner", map(&[("name", text("x"))]))])])
        .unwrap();
    assert_eq!(
        order,
        record("Order", &[("owner", acct(text("x"), 0)), ("qty", int(0))])
    );

    let result = vm
        .call("Order", "validate", vec![map(&[("owner", int(3))])])
        .unwrap();
    assert_eq!(
        result,
        Value::error(Value::Tuple(vec![
            Value::atom("owner"),
            int(3),
            text("must be a map or %Acct{} record, got: 3 (integer)"),
        ]))
    );
}

#[test]
fn test_schema_function_from_user_code() {
    let vm = vm(concat!(
        "module Acct {\n",
        "struct { name: Name, count: Count }\n",
        "}\n",
        "module Shop {\n",
        "def open(name: text) { Acct.new(%{name: name}) }\n",
        "}\n",
    ));
    assert_eq!(
        vm.call("Shop", "open", vec![text("ada")]).unwrap(),
        acct(text("ada"), 0)
    );
}
