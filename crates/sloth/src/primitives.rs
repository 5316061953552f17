//! The fixed primitive operation library
//!
//! Every operation validates its operand kinds (and count) and reports a
//! violation as an error naming the operation. Callers force operands
//! before arriving here: a primitive never sees a suspended computation.

use crate::error::{EvalError, EvalResult};
use crate::value::{PrimOp, Value};

/// Names the reader resolves to primitive-operation references.
pub const PRIMITIVE_NAMES: &[&str] = &[
    "+", "-", "*", "/", ">", "<", "=", "not", "eq?", "string=?", "cons", "car", "cdr", "list?",
    "number?", "boolean?", "symbol?", "string?",
];

/// Whether `name` is one of the fixed primitive operations.
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_NAMES.contains(&name)
}

/// Apply a primitive operation tag to fully-forced operand values.
pub fn apply_primitive(op: &PrimOp, args: &[Value]) -> EvalResult {
    match op.name() {
        "+" => fold_numbers(op, args, 0, i64::checked_add),
        "*" => fold_numbers(op, args, 1, i64::checked_mul),
        "-" => {
            let (x, y) = two_numbers(op, args)?;
            x.checked_sub(y)
                .map(Value::Number)
                .ok_or_else(|| overflow(op))
        }
        "/" => {
            let (x, y) = two_numbers(op, args)?;
            if y == 0 {
                return Err(prim_error(op, "division by zero"));
            }
            x.checked_div(y)
                .map(Value::Number)
                .ok_or_else(|| overflow(op))
        }
        ">" => {
            let (x, y) = two_numbers(op, args)?;
            Ok(Value::Bool(x > y))
        }
        "<" => {
            let (x, y) = two_numbers(op, args)?;
            Ok(Value::Bool(x < y))
        }
        "=" => {
            let (x, y) = two_numbers(op, args)?;
            Ok(Value::Bool(x == y))
        }
        "not" => match one_arg(op, args)? {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => Err(expected(op, "a boolean", other)),
        },
        "eq?" => {
            let (a, b) = two_args(op, args)?;
            Ok(Value::Bool(eq_values(a, b)))
        }
        "string=?" => {
            let (a, b) = two_args(op, args)?;
            match (a, b) {
                (Value::Str(x), Value::Str(y)) => Ok(Value::Bool(x == y)),
                (Value::Str(_), other) | (other, _) => Err(expected(op, "strings", other)),
            }
        }
        "cons" => cons(op, args),
        "car" => match one_arg(op, args)? {
            Value::Compound(items) => Ok(items[0].clone()),
            other => Err(expected(op, "a compound structure", other)),
        },
        "cdr" => match one_arg(op, args)? {
            Value::Compound(items) => {
                if items.len() > 1 {
                    Ok(Value::compound(items[1..].to_vec()))
                } else {
                    Ok(Value::Empty)
                }
            }
            other => Err(expected(op, "a compound structure", other)),
        },
        "list?" => {
            let v = one_arg(op, args)?;
            Ok(Value::Bool(matches!(
                v,
                Value::Empty | Value::Compound(_)
            )))
        }
        "number?" => Ok(Value::Bool(matches!(
            one_arg(op, args)?,
            Value::Number(_)
        ))),
        "boolean?" => Ok(Value::Bool(matches!(one_arg(op, args)?, Value::Bool(_)))),
        "symbol?" => Ok(Value::Bool(matches!(
            one_arg(op, args)?,
            Value::Symbol(_)
        ))),
        "string?" => Ok(Value::Bool(matches!(one_arg(op, args)?, Value::Str(_)))),
        other => Err(EvalError::UnknownPrimitive(other.to_string())),
    }
}

// Same-kind atoms compare by value; the empty markers are equal; everything
// else, compound structures included, is #f.
fn eq_values(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Empty, Value::Empty) => true,
        _ => false,
    }
}

fn cons(op: &PrimOp, args: &[Value]) -> EvalResult {
    let (head, tail) = two_args(op, args)?;
    match tail {
        Value::Empty => Ok(Value::compound(vec![head.clone()])),
        Value::Compound(items) => {
            let mut list = Vec::with_capacity(items.len() + 1);
            list.push(head.clone());
            list.extend(items.iter().cloned());
            Ok(Value::compound(list))
        }
        other => Err(expected(op, "a structure or the empty structure", other)),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Operand Extraction
// ═══════════════════════════════════════════════════════════════════════

fn prim_error(op: &PrimOp, message: impl Into<String>) -> EvalError {
    EvalError::Primitive {
        op: op.name().to_string(),
        message: message.into(),
    }
}

fn expected(op: &PrimOp, what: &str, got: &Value) -> EvalError {
    prim_error(op, format!("expected {}, got {}", what, got.type_name()))
}

fn overflow(op: &PrimOp) -> EvalError {
    prim_error(op, "arithmetic overflow")
}

fn arity(op: &PrimOp, expected: usize, got: usize) -> EvalError {
    EvalError::ArityMismatch {
        name: op.name().to_string(),
        expected,
        got,
    }
}

fn one_arg<'a>(op: &PrimOp, args: &'a [Value]) -> Result<&'a Value, EvalError> {
    match args {
        [v] => Ok(v),
        _ => Err(arity(op, 1, args.len())),
    }
}

fn two_args<'a>(op: &PrimOp, args: &'a [Value]) -> Result<(&'a Value, &'a Value), EvalError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(arity(op, 2, args.len())),
    }
}

fn number(op: &PrimOp, v: &Value) -> Result<i64, EvalError> {
    match v {
        Value::Number(n) => Ok(*n),
        other => Err(expected(op, "numbers", other)),
    }
}

fn two_numbers(op: &PrimOp, args: &[Value]) -> Result<(i64, i64), EvalError> {
    let (a, b) = two_args(op, args)?;
    Ok((number(op, a)?, number(op, b)?))
}

// `+` and `*` fold over any number of operands from their identity element.
fn fold_numbers(
    op: &PrimOp,
    args: &[Value],
    identity: i64,
    combine: fn(i64, i64) -> Option<i64>,
) -> EvalResult {
    let mut acc = identity;
    for arg in args {
        let n = number(op, arg)?;
        acc = combine(acc, n).ok_or_else(|| overflow(op))?;
    }
    Ok(Value::Number(acc))
}
