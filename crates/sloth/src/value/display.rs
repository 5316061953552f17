//! Display and Debug implementations for Value

use std::fmt;

use super::*;
use crate::ast::ParamMode;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::Str(s) => write!(f, "{:?}", s.as_ref()),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Empty => write!(f, "()"),

            Value::Compound(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, ")")
            }

            Value::Prim(op) => write!(f, "#<primitive {}>", op.name()),

            // Shallow on purpose: the captured environment may be cyclic.
            Value::Closure(c) => write!(f, "{}", c),

            Value::Thunk(_) => write!(f, "#<thunk>"),
            Value::Void => write!(f, "#<void>"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display is user-facing: strings print without quotes
        match self {
            Value::Str(s) => write!(f, "{}", s.as_ref()),
            _ => fmt::Debug::fmt(self, f),
        }
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<closure (")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match param.mode {
                ParamMode::Eager => write!(f, "{}", param.name)?,
                ParamMode::Lazy => write!(f, "({} lazy)", param.name)?,
            }
        }
        write!(f, ")>")
    }
}

impl fmt::Debug for PrimOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimOp({})", self.name())
    }
}

impl fmt::Display for PrimOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_quotes_strings_display_does_not() {
        let v = Value::string("hi");
        assert_eq!(format!("{:?}", v), "\"hi\"");
        assert_eq!(format!("{}", v), "hi");
    }

    #[test]
    fn test_compound_renders_as_list() {
        let v = Value::compound(vec![
            Value::Number(1),
            Value::symbol("x"),
            Value::Empty,
        ]);
        assert_eq!(format!("{}", v), "(1 x ())");
    }

    #[test]
    fn test_booleans_render_in_source_syntax() {
        assert_eq!(format!("{}", Value::Bool(true)), "#t");
        assert_eq!(format!("{}", Value::Bool(false)), "#f");
    }
}
