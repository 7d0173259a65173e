//! Guards, validation and clause dispatch, end to end.

mod common;

use common::{atom, int, map, text, vm};
use defspec::{RuntimeError, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_failed_guard_does_not_run_body() {
    let vm = vm("def inc(x: guard[integer]) -> integer { x + 1 }");
    assert_eq!(vm.call("Main", "inc", vec![int(2)]).unwrap(), int(3));

    // the body would raise a TypeError on text; the guard rejects first
    let err = vm.call("Main", "inc", vec![text("2")]).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::NoClauseMatch {
            function: "Main.inc/1".to_string(),
            args: vec![text("2")],
        }
    );
}

#[test]
fn test_every_guarded_parameter_must_pass() {
    let vm = vm("def pair(a: guard[integer], b: guard[text], c: any) { {a, b, c} }");
    assert_eq!(
        vm.call("Main", "pair", vec![int(1), text("x"), Value::Nil]).unwrap(),
        Value::Tuple(vec![int(1), text("x"), Value::Nil])
    );
    assert!(matches!(
        vm.call("Main", "pair", vec![int(1), int(2), Value::Nil]),
        Err(RuntimeError::NoClauseMatch { .. })
    ));
    assert!(matches!(
        vm.call("Main", "pair", vec![Value::Float(1.0), text("x"), Value::Nil]),
        Err(RuntimeError::NoClauseMatch { .. })
    ));
}

#[test]
fn test_guard_through_type_variable() {
    let vm = vm("def id(x: guard[T]) -> T where T: float { x }");
    assert_eq!(vm.call("Main", "id", vec![Value::Float(1.5)]).unwrap(), Value::Float(1.5));
    assert!(matches!(
        vm.call("Main", "id", vec![int(1)]),
        Err(RuntimeError::NoClauseMatch { .. })
    ));
}

#[test]
fn test_guarded_default() {
    let vm = vm(r"def f(a: guard[integer] \\ 5) { a * 2 }");
    assert_eq!(vm.call("Main", "f", vec![]).unwrap(), int(10));
    assert_eq!(vm.call("Main", "f", vec![int(1)]).unwrap(), int(2));
}

#[test]
fn test_validation_aborts_before_body() {
    let vm = vm("def ratio(n: validate[Count], d: integer) {\nlet q = 10 / d\nn + q\n}");
    // without the abort the body would divide by zero
    let err = vm.call("Main", "ratio", vec![int(-1), int(0)]).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::ValidationAbort {
            name: "n".to_string(),
            value: int(-1),
            diagnostic: "must be greater than or equal to 0".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "ValidationError: validation error for n: must be greater than or equal to 0 (got -1)"
    );
    assert_eq!(
        vm.call("Main", "ratio", vec![int(0), int(0)]),
        Err(RuntimeError::DivisionByZero)
    );
}

#[test]
fn test_first_failing_validation_wins() {
    let vm = vm("def both(a: validate[Count], b: validate[Name]) { {a, b} }");
    let err = vm.call("Main", "both", vec![int(-1), text("")]).unwrap_err();
    assert!(
        matches!(&err, RuntimeError::ValidationAbort { name, .. } if name == "a"),
        "got {:?}",
        err
    );
    let err = vm.call("Main", "both", vec![int(1), text("")]).unwrap_err();
    assert!(
        matches!(&err, RuntimeError::ValidationAbort { name, .. } if name == "b"),
        "got {:?}",
        err
    );
}

#[test]
fn test_validation_rebinds_parameter() {
    let vm = vm("def greet(name: validate[Trimmed]) { \"hi \" <> name }");
    assert_eq!(
        vm.call("Main", "greet", vec![text("  ada ")]).unwrap(),
        text("hi ada")
    );
}

#[test]
fn test_validation_module_must_exist_at_runtime() {
    let vm = vm("def f(x: validate[Ghost]) { x }");
    assert_eq!(
        vm.call("Main", "f", vec![int(1)]),
        Err(RuntimeError::UnknownModule("Ghost".to_string()))
    );
}

#[test]
fn test_clause_order_decides() {
    let vm = vm("def pick(x: any) {\n(n) when n > 0 -> :first\n(1) -> :second\n(_) -> :other\n}");
    assert_eq!(vm.call("Main", "pick", vec![int(1)]).unwrap(), atom("first"));
    assert_eq!(vm.call("Main", "pick", vec![int(0)]).unwrap(), atom("other"));
}

#[test]
fn test_clause_sign() {
    let vm = vm("def sign(n: integer) -> any {\n(0) -> :zero\n(k) when k > 0 -> :pos\n(_) -> :neg\n}");
    let sign = |n| vm.call("Main", "sign", vec![int(n)]).unwrap();
    assert_eq!(sign(0), atom("zero"));
    assert_eq!(sign(7), atom("pos"));
    assert_eq!(sign(-7), atom("neg"));
}

#[test]
fn test_guard_error_counts_as_no_match() {
    // comparing text with an integer raises inside the guard
    let vm = vm("def f(x: any) {\n(n) when n > 0 -> :pos\n(_) -> :other\n}");
    assert_eq!(vm.call("Main", "f", vec![text("a")]).unwrap(), atom("other"));
}

#[test]
fn test_no_clause_matches() {
    let vm = vm("def only_zero(x: integer) {\n(0) -> :zero\n}");
    let err = vm.call("Main", "only_zero", vec![int(1)]).unwrap_err();
    assert!(err.is_fatal_dispatch_failure());
    assert_eq!(
        err.to_string(),
        "NoClauseMatch: no clause of Main.only_zero/1 matches (1)"
    );
}

#[test]
fn test_structural_patterns() {
    let vm = vm(concat!(
        "def head(xs: list) {\n",
        "([h | _]) -> h\n",
        "([]) -> nil\n",
        "}\n",
        "def same(a: any, b: any) {\n",
        "(x, x) -> :same\n",
        "(_, _) -> :different\n",
        "}\n",
        "def kind(m: map) {\n",
        "(%{kind: :circle, r: r}) -> r * r\n",
        "(%{kind: k}) -> k\n",
        "}\n",
        "def first(t: tuple) {\n",
        "({:ok, v}) -> v\n",
        "({:error, _}) -> nil\n",
        "}\n",
    ));
    let call = |f: &str, args: Vec<Value>| vm.call("Main", f, args).unwrap();

    assert_eq!(call("head", vec![Value::List(vec![int(1), int(2)])]), int(1));
    assert_eq!(call("head", vec![Value::List(vec![])]), Value::Nil);

    assert_eq!(call("same", vec![int(1), int(1)]), atom("same"));
    assert_eq!(call("same", vec![int(1), int(2)]), atom("different"));

    let circle = map(&[("kind", atom("circle")), ("r", int(3)), ("color", atom("red"))]);
    assert_eq!(call("kind", vec![circle]), int(9));
    assert_eq!(call("kind", vec![map(&[("kind", atom("square"))])]), atom("square"));

    assert_eq!(call("first", vec![Value::ok(int(4))]), int(4));
    assert_eq!(call("first", vec![Value::error(atom("nope"))]), Value::Nil);
}

#[test]
fn test_calls_between_modules() {
    let vm = vm(concat!(
        "module Math {\n",
        "def square(x: guard[integer]) { x * x }\n",
        "def sum_squares(a: integer, b: integer) { square(a) + square(b) }\n",
        "}\n",
        "module App {\n",
        "def run(n: integer) { Math.sum_squares(n, n + 1) }\n",
        "}\n",
    ));
    assert_eq!(vm.call_qualified("App.run", vec![int(2)]).unwrap(), int(13));
}

#[test]
fn test_recursion_with_clauses() {
    let vm = vm("def fact(n: integer) {\n(0) -> 1\n(k) when k > 0 -> k * fact(k - 1)\n}");
    assert_eq!(vm.call("Main", "fact", vec![int(10)]).unwrap(), int(3_628_800));
}

#[test]
fn test_let_and_if() {
    let vm = vm(concat!(
        "def classify(n: guard[integer]) {\n",
        "let big = n > 100\n",
        "if big { :big } else { :small }\n",
        "}\n",
    ));
    assert_eq!(vm.call("Main", "classify", vec![int(500)]).unwrap(), atom("big"));
    assert_eq!(vm.call("Main", "classify", vec![int(5)]).unwrap(), atom("small"));
}

#[test]
fn test_equality_is_numeric_inside_collections() {
    let vm = vm(concat!(
        "def same_value(a: any, b: any) {\n",
        "(x, y) when x == y -> :same\n",
        "(_, _) -> :different\n",
        "}\n",
    ));
    let call = |a: Value, b: Value| vm.call("Main", "same_value", vec![a, b]).unwrap();
    assert_eq!(
        call(Value::List(vec![int(1)]), Value::List(vec![Value::Float(1.0)])),
        atom("same")
    );
    assert_eq!(
        call(Value::Tuple(vec![int(1)]), Value::Tuple(vec![Value::Float(1.0)])),
        atom("same")
    );
    assert_eq!(
        call(map(&[("n", int(2))]), map(&[("n", Value::Float(2.0))])),
        atom("same")
    );
    assert_eq!(
        call(Value::List(vec![int(1)]), Value::List(vec![int(2)])),
        atom("different")
    );
}
