//! Expression evaluation

mod apply;

pub use apply::{apply, force};

use std::rc::Rc;

use crate::ast::Expr;
use crate::environment::Env;
use crate::error::{aggregate, EvalError, EvalResult};
use crate::value::{Closure, Value};

/// Evaluate an expression in the given environment.
///
/// Total over the expression union: one exhaustive match, no fallthrough.
/// The result may be a suspended computation; laziness is resolved only at
/// forcing points (operands entering a primitive, the final value of a
/// top-level program), never here.
pub fn eval(expr: &Expr, env: &Env) -> EvalResult {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Quote(value) => Ok(value.clone()),
        Expr::Var(name) => env.lookup(name),
        Expr::Prim(op) => Ok(Value::Prim(op.clone())),
        Expr::If { test, then, alt } => eval_if(test, then, alt, env),
        Expr::Lambda { params, body } => Ok(Value::Closure(Rc::new(Closure {
            params: params.clone(),
            body: body.clone(),
            env: env.clone(),
        }))),
        Expr::Let { bindings, body } => eval_let(bindings, body, env),
        Expr::Letrec { bindings, body } => eval_letrec(bindings, body, env),
        Expr::Set { name, expr } => eval_set(name, expr, env),
        Expr::App { rator, rands } => {
            let rator = eval(rator, env)?;
            apply(rator, rands, env)
        }
    }
}

/// Evaluate an ordered body sequence, returning the last expression's value.
///
/// Earlier expressions run for effect; any error short-circuits the rest.
/// The final value is handed back unforced.
pub fn eval_body(body: &[Expr], env: &Env) -> EvalResult {
    let (last, init) = body.split_last().ok_or(EvalError::EmptyBody)?;
    for expr in init {
        eval(expr, env)?;
    }
    eval(last, env)
}

fn eval_if(test: &Expr, then: &Expr, alt: &Expr, env: &Env) -> EvalResult {
    let test = eval(test, env)?;
    if test.is_truthy() {
        eval(then, env)
    } else {
        eval(alt, env)
    }
}

// Binding right-hand sides are evaluated in the enclosing environment, then
// one new frame binds all names at once.
fn eval_let(bindings: &[(String, Expr)], body: &[Expr], env: &Env) -> EvalResult {
    let names: Vec<String> = bindings.iter().map(|(name, _)| name.clone()).collect();
    let values = eval_all(bindings.iter().map(|(_, expr)| expr), env)?;
    eval_body(body, &env.extend(&names, values))
}

// Letrec: bind every name to a placeholder, evaluate right-hand sides in the
// extended frame so they may reference one another, then overwrite each cell
// with its computed value. Nothing is installed when any side errors.
fn eval_letrec(bindings: &[(String, Expr)], body: &[Expr], env: &Env) -> EvalResult {
    let names: Vec<String> = bindings.iter().map(|(name, _)| name.clone()).collect();
    let scope = env.extend(&names, vec![Value::Void; names.len()]);
    let values = eval_all(bindings.iter().map(|(_, expr)| expr), &scope)?;
    for (name, value) in names.iter().zip(values) {
        if let Some(cell) = scope.lookup_cell(name) {
            cell.set(value);
        }
    }
    eval_body(body, &scope)
}

fn eval_set(name: &str, expr: &Expr, env: &Env) -> EvalResult {
    let value = eval(expr, env)?;
    match env.lookup_cell(name) {
        Some(cell) => {
            cell.set(value);
            Ok(Value::Void)
        }
        None => Err(EvalError::UndefinedAssignment(name.to_string())),
    }
}

/// Evaluate every expression, collecting all failures into one error.
fn eval_all<'a>(
    exprs: impl Iterator<Item = &'a Expr>,
    env: &Env,
) -> Result<Vec<Value>, EvalError> {
    let mut values = Vec::new();
    let mut errors = Vec::new();
    for expr in exprs {
        match eval(expr, env) {
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
