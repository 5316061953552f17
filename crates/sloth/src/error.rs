//! Error types for reading and evaluation
//!
//! Evaluation errors are ordinary data: every function on the evaluation
//! path returns `Result` and every caller checks before proceeding. There
//! is no unwinding control flow; aggregation of several operand errors into
//! one message depends on being able to inspect all results first.

use thiserror::Error;

use crate::value::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Errors produced by the s-expression reader.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input that is not a well-formed datum
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Nesting beyond the reader's depth limit
    #[error("expression nesting exceeds the reader depth limit ({limit})")]
    TooDeep {
        /// The configured limit
        limit: usize,
    },

    /// Extra input after a complete expression
    #[error("trailing input after expression: `{0}`")]
    Trailing(String),

    /// A special form with the wrong shape
    #[error("malformed `{form}` form: {message}")]
    BadForm {
        /// The special form's keyword
        form: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// `define` somewhere other than the top level
    #[error("`define` is only allowed at the top level")]
    NestedDefine,
}

/// Errors produced during evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Variable reference with no binding anywhere on the chain
    #[error("unbound variable `{0}`")]
    UnboundVariable(String),

    /// `set!` of a name with no binding cell anywhere on the chain
    #[error("variable not found `{0}`")]
    UndefinedAssignment(String),

    /// Operator position evaluated to neither a primitive nor a closure
    #[error("cannot apply `{0}`")]
    NotApplicable(String),

    /// A primitive rejected its operands; the message names the operation
    #[error("`{op}`: {message}")]
    Primitive {
        /// The operation's opcode name
        op: String,
        /// Per-operation description of the violation
        message: String,
    },

    /// An operation tag naming no known primitive
    #[error("unknown primitive `{0}`")]
    UnknownPrimitive(String),

    /// Wrong number of operands for a closure or fixed-arity primitive
    #[error("`{name}` expects {expected} arguments, got {got}")]
    ArityMismatch {
        /// The callee, as displayed to the user
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Operands supplied
        got: usize,
    },

    /// A program with no forms, or one ending in a definition
    #[error("empty program")]
    EmptyProgram,

    /// A closure, let, or letrec body with no expressions
    #[error("empty body")]
    EmptyBody,

    /// Several simultaneously-evaluated operands failed; all messages kept
    #[error("{}", join_messages(.0))]
    Aggregate(Vec<EvalError>),
}

/// Combine per-operand failures into a single error listing every message.
///
/// A single failure stays unwrapped so its variant remains matchable.
pub(crate) fn aggregate(mut errors: Vec<EvalError>) -> EvalError {
    if errors.len() == 1 {
        errors.remove(0)
    } else {
        EvalError::Aggregate(errors)
    }
}

fn join_messages(errors: &[EvalError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Umbrella error for the parse-then-evaluate pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The source text did not parse
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The program did not evaluate
    #[error(transparent)]
    Eval(#[from] EvalError),
}
