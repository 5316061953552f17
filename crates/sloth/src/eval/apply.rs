//! Procedure application and thunk forcing

use std::rc::Rc;

use super::{eval, eval_body};
use crate::ast::{Expr, ParamMode};
use crate::environment::Env;
use crate::error::{aggregate, EvalError, EvalResult};
use crate::primitives::apply_primitive;
use crate::value::{Closure, Thunk, Value};

/// Apply an evaluated operator to not-yet-evaluated operand expressions.
///
/// Operand handling depends on the operator's runtime kind: primitives take
/// every operand eagerly and forced; closures bind each operand according to
/// the matching parameter's eager/lazy tag. Anything else is inapplicable.
pub fn apply(rator: Value, rands: &[Expr], env: &Env) -> EvalResult {
    match rator {
        Value::Prim(op) => {
            let args = eval_operands(rands, env)?;
            apply_primitive(&op, &args)
        }
        Value::Closure(closure) => apply_closure(&closure, rands, env),
        other => Err(EvalError::NotApplicable(other.to_string())),
    }
}

/// Force a suspended computation to a plain value.
///
/// Loops until a non-thunk surfaces, re-evaluating the stored expression in
/// its captured environment each time. Nothing is cached: forcing the same
/// suspension twice performs the work twice, effects included.
pub fn force(mut value: Value) -> EvalResult {
    while let Value::Thunk(thunk) = value {
        value = eval(&thunk.expr, &thunk.env)?;
    }
    Ok(value)
}

// Primitive operands: evaluated in the caller's environment and forced, so
// primitives never see a suspension. All failures are reported together.
fn eval_operands(rands: &[Expr], env: &Env) -> Result<Vec<Value>, EvalError> {
    let mut values = Vec::with_capacity(rands.len());
    let mut errors = Vec::new();
    for rand in rands {
        match eval(rand, env).and_then(force) {
            Ok(value) => values.push(value),
            Err(err) => errors.push(err),
        }
    }
    if errors.is_empty() {
        Ok(values)
    } else {
        Err(aggregate(errors))
    }
}

fn apply_closure(closure: &Closure, rands: &[Expr], env: &Env) -> EvalResult {
    if rands.len() != closure.params.len() {
        return Err(EvalError::ArityMismatch {
            name: closure.to_string(),
            expected: closure.params.len(),
            got: rands.len(),
        });
    }

    let mut values = Vec::with_capacity(rands.len());
    for (param, rand) in closure.params.iter().zip(rands) {
        let bound = match param.mode {
            // Eager: the caller's environment, right now.
            ParamMode::Eager => eval(rand, env)?,
            // Lazy: no evaluation; suspend the operand with the caller's
            // environment for a later forcing point.
            ParamMode::Lazy => Value::Thunk(Rc::new(Thunk::new(rand.clone(), env.clone()))),
        };
        values.push(bound);
    }

    let names: Vec<String> = closure.params.iter().map(|p| p.name.clone()).collect();
    let scope = closure.env.extend(&names, values);
    eval_body(&closure.body, &scope)
}
