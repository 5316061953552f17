//! Top-level program evaluation
//!
//! The driver threads a session's global frame through an ordered sequence
//! of expressions and definitions. Definitions evaluate their right-hand
//! side against the global frame and install there; every form after a
//! definition continues in the global frame. The sequence's final value is
//! the program's value, forced if it is a suspended computation (the second
//! of the two forcing points).

use crate::ast::{Program, TopForm};
use crate::environment::Env;
use crate::error::{Error, EvalError, EvalResult};
use crate::eval::{eval, force};
use crate::reader::parse_program;
use crate::value::Value;

/// Evaluate a top-level program against a session's global frame.
///
/// Errors short-circuit the remainder. A program with no forms, or whose
/// last form is a definition, produces nothing and is reported as such.
///
/// # Example
///
/// ```
/// use sloth::{eval_program, parse_program, Env, Value};
///
/// let globals = Env::global();
/// let program = parse_program("(define x 20) (+ x 1)").unwrap();
/// assert_eq!(eval_program(&program, &globals).unwrap(), Value::Number(21));
/// ```
pub fn eval_program(program: &Program, env: &Env) -> EvalResult {
    let globals = env.globals();
    let mut scope = env.clone();
    let mut last = None;

    for form in &program.forms {
        match form {
            TopForm::Define(def) => {
                let value = eval(&def.expr, &globals)?;
                globals.define_global(&def.name, value);
                scope = globals.clone();
                last = None;
            }
            TopForm::Expr(expr) => last = Some(eval(expr, &scope)?),
        }
    }

    match last {
        Some(value) => force(value),
        None => Err(EvalError::EmptyProgram),
    }
}

/// Parse-then-evaluate pipeline: evaluate source text against a session's
/// global frame.
pub fn eval_source(source: &str, env: &Env) -> Result<Value, Error> {
    let program = parse_program(source)?;
    Ok(eval_program(&program, env)?)
}

/// One interpretation session.
///
/// Owns the global frame for its lifetime; definitions accumulate across
/// calls, so a REPL keeps one `Interpreter` for the whole conversation.
/// Dropping the session drops the frame and everything it retains.
pub struct Interpreter {
    globals: Env,
}

impl Interpreter {
    /// Start a session with a fresh, empty global frame.
    pub fn new() -> Self {
        Self {
            globals: Env::global(),
        }
    }

    /// The session's global frame.
    pub fn globals(&self) -> &Env {
        &self.globals
    }

    /// Evaluate an already-parsed program in this session.
    pub fn eval_program(&self, program: &Program) -> EvalResult {
        eval_program(program, &self.globals)
    }

    /// Parse and evaluate source text in this session.
    pub fn eval_source(&self, source: &str) -> Result<Value, Error> {
        eval_source(source, &self.globals)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
