//! Primitive library tests

use sloth::*;

fn eval_ok(source: &str) -> Value {
    Interpreter::new().eval_source(source).unwrap()
}

fn eval_err(source: &str) -> EvalError {
    match Interpreter::new().eval_source(source).unwrap_err() {
        Error::Eval(err) => err,
        Error::Parse(err) => panic!("expected eval error, got parse error: {}", err),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_add_and_mul_are_variadic_with_identities() {
    assert_eq!(eval_ok("(+)"), Value::Number(0));
    assert_eq!(eval_ok("(*)"), Value::Number(1));
    assert_eq!(eval_ok("(+ 1 2 3 4)"), Value::Number(10));
    assert_eq!(eval_ok("(* 2 3 4)"), Value::Number(24));
}

#[test]
fn test_sub_and_div_are_binary() {
    assert_eq!(eval_ok("(- 10 4)"), Value::Number(6));
    assert_eq!(eval_ok("(/ 7 2)"), Value::Number(3));
    assert!(matches!(
        eval_err("(- 1 2 3)"),
        EvalError::ArityMismatch { .. }
    ));
}

#[test]
fn test_division_by_zero_errors() {
    assert_eq!(
        eval_err("(/ 1 0)"),
        EvalError::Primitive {
            op: "/".into(),
            message: "division by zero".into(),
        }
    );
}

#[test]
fn test_type_errors_name_the_operation() {
    let err = eval_err("(+ 1 \"a\")");
    assert_eq!(
        err,
        EvalError::Primitive {
            op: "+".into(),
            message: "expected numbers, got string".into(),
        }
    );

    // The same error regardless of which position held the bad operand.
    assert_eq!(eval_err("(+ \"a\" 1)"), err);
}

// ═══════════════════════════════════════════════════════════════════════
// Comparisons and Equality
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_numeric_comparisons() {
    assert_eq!(eval_ok("(> 2 1)"), Value::Bool(true));
    assert_eq!(eval_ok("(< 2 1)"), Value::Bool(false));
    assert_eq!(eval_ok("(= 3 3)"), Value::Bool(true));
    assert!(matches!(
        eval_err("(> 1 #t)"),
        EvalError::Primitive { .. }
    ));
}

#[test]
fn test_not_requires_a_boolean() {
    assert_eq!(eval_ok("(not #f)"), Value::Bool(true));
    assert_eq!(eval_ok("(not #t)"), Value::Bool(false));
    assert!(matches!(eval_err("(not 0)"), EvalError::Primitive { .. }));
}

#[test]
fn test_eq_on_same_kind_atoms() {
    assert_eq!(eval_ok("(eq? 'a 'a)"), Value::Bool(true));
    assert_eq!(eval_ok("(eq? 'a 'b)"), Value::Bool(false));
    assert_eq!(eval_ok("(eq? 1 1)"), Value::Bool(true));
    assert_eq!(eval_ok("(eq? \"a\" \"a\")"), Value::Bool(true));
    assert_eq!(eval_ok("(eq? #t #t)"), Value::Bool(true));
    assert_eq!(eval_ok("(eq? '() '())"), Value::Bool(true));
}

#[test]
fn test_eq_across_kinds_and_on_compounds_is_false() {
    assert_eq!(eval_ok("(eq? 1 #t)"), Value::Bool(false));
    assert_eq!(eval_ok("(eq? 'a \"a\")"), Value::Bool(false));
    assert_eq!(eval_ok("(eq? '(1) '(1))"), Value::Bool(false));
}

#[test]
fn test_string_equality() {
    assert_eq!(eval_ok("(string=? \"a\" \"a\")"), Value::Bool(true));
    assert_eq!(eval_ok("(string=? \"a\" \"b\")"), Value::Bool(false));
    assert!(matches!(
        eval_err("(string=? \"a\" 1)"),
        EvalError::Primitive { .. }
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Structures
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_car_of_cons_is_the_head() {
    assert_eq!(eval_ok("(car (cons 1 '()))"), Value::Number(1));
    assert_eq!(eval_ok("(car (cons 1 '(2 3)))"), Value::Number(1));
}

#[test]
fn test_cdr_of_cons_is_the_tail() {
    assert_eq!(eval_ok("(cdr (cons 1 '()))"), Value::Empty);
    assert_eq!(
        eval_ok("(cdr (cons 1 '(2 3)))"),
        Value::compound(vec![Value::Number(2), Value::Number(3)])
    );
}

#[test]
fn test_cons_rejects_a_non_structure_tail() {
    let err = eval_err("(cons 1 2)");
    assert!(matches!(err, EvalError::Primitive { .. }));
    assert!(err.to_string().contains("`cons`"));
}

#[test]
fn test_car_and_cdr_require_a_compound() {
    assert!(eval_err("(car 5)").to_string().contains("`car`"));
    assert!(eval_err("(car '())").to_string().contains("`car`"));
    assert!(eval_err("(cdr #t)").to_string().contains("`cdr`"));
}

#[test]
fn test_list_predicate() {
    assert_eq!(eval_ok("(list? '())"), Value::Bool(true));
    assert_eq!(eval_ok("(list? '(1 2))"), Value::Bool(true));
    assert_eq!(eval_ok("(list? 5)"), Value::Bool(false));
}

// ═══════════════════════════════════════════════════════════════════════
// Type Predicates
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_type_predicates() {
    assert_eq!(eval_ok("(number? 1)"), Value::Bool(true));
    assert_eq!(eval_ok("(number? \"x\")"), Value::Bool(false));
    assert_eq!(eval_ok("(boolean? #f)"), Value::Bool(true));
    assert_eq!(eval_ok("(boolean? '())"), Value::Bool(false));
    assert_eq!(eval_ok("(symbol? 'a)"), Value::Bool(true));
    assert_eq!(eval_ok("(symbol? \"a\")"), Value::Bool(false));
    assert_eq!(eval_ok("(string? \"s\")"), Value::Bool(true));
    assert_eq!(eval_ok("(string? 's)"), Value::Bool(false));
}

// ═══════════════════════════════════════════════════════════════════════
// Operand Error Aggregation
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_operand_errors_are_aggregated() {
    let err = eval_err("(+ (/ 1 0) nope)");
    let message = err.to_string();
    assert!(message.contains("division by zero"), "{}", message);
    assert!(message.contains("unbound variable `nope`"), "{}", message);
    assert!(matches!(err, EvalError::Aggregate(_)));
}

#[test]
fn test_unknown_primitive_via_direct_application() {
    let err = apply_primitive(&PrimOp::new("bogus"), &[]).unwrap_err();
    assert_eq!(err, EvalError::UnknownPrimitive("bogus".into()));
}
