//! Lazy parameter and thunk-forcing tests

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
// Deferral
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unused_lazy_argument_never_runs() {
    // The division would error, but the lazy position is never forced.
    assert_eq!(
        eval_ok("((lambda (a (b lazy)) a) 1 (/ 1 0))"),
        Value::Number(1)
    );
}

#[test]
fn test_eager_argument_is_forced_at_call_time() {
    // The same procedure with the erroring expression in the eager position.
    let err = eval_err("((lambda (a (b lazy)) a) (/ 1 0) 1)");
    assert_eq!(
        err,
        EvalError::Primitive {
            op: "/".into(),
            message: "division by zero".into(),
        }
    );
}

#[test]
fn test_condition_does_not_force() {
    // A thunk is not #f, so the then-branch is taken without forcing.
    assert_eq!(
        eval_ok("((lambda ((x lazy)) (if x 1 2)) (/ 1 0))"),
        Value::Number(1)
    );
}

#[test]
fn test_thunk_passes_through_nested_calls_unforced() {
    assert_eq!(
        eval_ok("((lambda ((x lazy)) ((lambda ((y lazy)) 42) x)) (/ 1 0))"),
        Value::Number(42)
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Forcing Points
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_primitive_operands_are_forced() {
    assert_eq!(eval_ok("((lambda ((b lazy)) (+ b 1)) 2)"), Value::Number(3));
}

#[test]
fn test_forcing_surfaces_the_deferred_error() {
    let err = eval_err("((lambda ((b lazy)) (+ b 1)) (/ 1 0))");
    assert_eq!(
        err,
        EvalError::Primitive {
            op: "/".into(),
            message: "division by zero".into(),
        }
    );
}

#[test]
fn test_final_program_value_is_forced() {
    assert_eq!(eval_ok("((lambda ((b lazy)) b) (* 2 3))"), Value::Number(6));
}

#[test]
fn test_returned_thunk_is_forced_by_the_caller_s_primitive() {
    // The inner closure hands its thunk back unforced; the enclosing `+`
    // is the forcing point.
    assert_eq!(eval_ok("(+ 1 ((lambda ((x lazy)) x) 41))"), Value::Number(42));
}

#[test]
fn test_chained_lazy_references_force_all_the_way_down() {
    assert_eq!(
        eval_ok("((lambda ((x lazy)) ((lambda ((y lazy)) (+ y 1)) x)) 4)"),
        Value::Number(5)
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Call-by-Name (No Memoization)
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_each_forcing_repeats_the_work() {
    let session = Interpreter::new();
    let source = "
        (define counter 0)
        (define bump (lambda () (set! counter (+ counter 1)) counter))
        ((lambda ((t lazy)) (+ t t)) (bump))";
    // Two forcing points, two increments: 1 + 2, never a cached 1 + 1.
    assert_eq!(session.eval_source(source).unwrap(), Value::Number(3));
    assert_eq!(session.eval_source("counter").unwrap(), Value::Number(2));
}

// ═══════════════════════════════════════════════════════════════════════
// Captured Environments
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_thunk_evaluates_in_the_caller_s_environment() {
    // The body's own `x` must not capture the suspended reference.
    let source = "
        (let ((x 1))
          ((lambda ((t lazy)) (let ((x 99)) (+ t 0))) x))";
    assert_eq!(eval_ok(source), Value::Number(1));
}

#[test]
fn test_forcing_sees_mutations_made_before_the_forcing_point() {
    let source = "
        (let ((x 1))
          ((lambda ((t lazy)) (set! x 2) (+ t 0)) x))";
    assert_eq!(eval_ok(source), Value::Number(2));
}
