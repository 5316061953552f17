//! # Sloth
//!
//! A tree-walking interpreter for a small Scheme-like language with lexical
//! closures, mutable bindings, and a per-parameter choice of eager or lazy
//! argument evaluation.
//!
//! Laziness is explicit and selective: a procedure tags each parameter
//! `eager` or `(name lazy)` when it is defined, and lazy positions receive
//! suspended computations instead of values. Suspensions are forced only
//! when they reach a primitive operation or become a program's final value,
//! and forcing never memoizes (call-by-name, not call-by-need).
//!
//! ## Architecture
//!
//! - **Reader**: source text → s-expression datums → expression tree
//! - **Evaluator**: one recursive, exhaustive match over the tree
//! - **Environment**: chained frames of shared, mutable binding cells
//! - **Primitives**: the fixed built-in operation set
//! - **Driver**: top-level sequencing, global definitions, the REPL
//!
//! ## Example
//!
//! ```
//! use sloth::{Interpreter, Value};
//!
//! let session = Interpreter::new();
//! let value = session
//!     .eval_source("((lambda (a (b lazy)) a) 1 (/ 1 0))")
//!     .unwrap();
//! assert_eq!(value, Value::Number(1)); // the division never runs
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod environment;
pub mod error;
pub mod eval;
pub mod primitives;
pub mod program;
pub mod reader;
pub mod value;

// Re-export main types
pub use ast::{Define, Expr, Param, ParamMode, Program, TopForm};
pub use environment::{BindingCell, Env};
pub use error::{Error, EvalError, EvalResult, ParseError};
pub use eval::{apply, eval, eval_body, force};
pub use primitives::{apply_primitive, is_primitive, PRIMITIVE_NAMES};
pub use program::{eval_program, eval_source, Interpreter};
pub use reader::{parse_expr, parse_program, MAX_READ_DEPTH};
pub use value::{Closure, PrimOp, Thunk, Value};

/// Sloth version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
