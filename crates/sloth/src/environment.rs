//! Chained environment frames with shared, mutable binding cells

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::EvalError;
use crate::value::Value;

/// A mutable binding cell, shared by every chain that can reach its frame.
///
/// Assignment (`set!`) and letrec finalization mutate the cell in place;
/// the change is observed through every alias.
#[derive(Debug, Clone)]
pub struct BindingCell(Rc<RefCell<Value>>);

impl BindingCell {
    fn new(value: Value) -> Self {
        BindingCell(Rc::new(RefCell::new(value)))
    }

    /// The currently held value.
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Overwrite the held value in place.
    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = value;
    }
}

struct Frame {
    bindings: RefCell<HashMap<String, BindingCell>>,
    parent: Option<Env>,
}

/// An environment: a chain of frames ending in a session's global frame.
///
/// `Env` is a cheap handle; cloning shares the underlying frame, never
/// copies it, so closures and thunks capturing an environment observe
/// later mutations to any frame on the chain. Lookup walks the chain from
/// the innermost frame outward; within one frame names are unique, and
/// shadowing across frames resolves innermost-wins.
///
/// # Example
///
/// ```
/// use sloth::{Env, Value};
///
/// let globals = Env::global();
/// globals.define_global("x", Value::Number(1));
///
/// let inner = globals.extend(&["x".to_string()], vec![Value::Number(10)]);
/// assert_eq!(inner.lookup("x").unwrap(), Value::Number(10)); // shadows
/// assert_eq!(globals.lookup("x").unwrap(), Value::Number(1));
/// ```
#[derive(Clone)]
pub struct Env {
    frame: Rc<Frame>,
}

impl Env {
    /// Create a fresh global frame: the unique terminus of a session's
    /// every chain. The driver creates one per session and passes it
    /// explicitly; there is no ambient singleton.
    pub fn global() -> Self {
        Env {
            frame: Rc::new(Frame {
                bindings: RefCell::new(HashMap::new()),
                parent: None,
            }),
        }
    }

    /// Create a child frame binding `names[i]` to `values[i]` pairwise.
    ///
    /// The two slices must have equal length; the evaluator checks arity
    /// before extending.
    pub fn extend(&self, names: &[String], values: Vec<Value>) -> Env {
        debug_assert_eq!(names.len(), values.len());
        let bindings = names
            .iter()
            .cloned()
            .zip(values.into_iter().map(BindingCell::new))
            .collect();
        Env {
            frame: Rc::new(Frame {
                bindings: RefCell::new(bindings),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Look up the value bound to `name`, walking the chain outward.
    pub fn lookup(&self, name: &str) -> Result<Value, EvalError> {
        self.lookup_cell(name)
            .map(|cell| cell.get())
            .ok_or_else(|| EvalError::UnboundVariable(name.to_string()))
    }

    /// Look up the binding cell itself, for mutation through `set!`.
    pub fn lookup_cell(&self, name: &str) -> Option<BindingCell> {
        let mut current = Some(self);
        while let Some(env) = current {
            if let Some(cell) = env.frame.bindings.borrow().get(name) {
                return Some(cell.clone());
            }
            current = env.frame.parent.as_ref();
        }
        None
    }

    /// Whether `name` is bound anywhere on the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup_cell(name).is_some()
    }

    /// Insert or overwrite `name` in the global frame, unconditionally.
    ///
    /// `define` always targets the global frame regardless of lexical
    /// nesting; the language admits only top-level definitions, so callers
    /// uphold that restriction. Overwriting an existing name mutates its
    /// cell, so chains already holding the cell see the new value.
    pub fn define_global(&self, name: &str, value: Value) {
        let globals = self.globals();
        let existing = globals.frame.bindings.borrow().get(name).cloned();
        match existing {
            Some(cell) => cell.set(value),
            None => {
                globals
                    .frame
                    .bindings
                    .borrow_mut()
                    .insert(name.to_string(), BindingCell::new(value));
            }
        }
    }

    /// The global frame at the terminus of this chain.
    pub fn globals(&self) -> Env {
        let mut current = self.clone();
        while let Some(parent) = current.frame.parent.clone() {
            current = parent;
        }
        current
    }

    /// Whether this handle points directly at a global frame.
    pub fn is_global(&self) -> bool {
        self.frame.parent.is_none()
    }

    /// Number of frames on the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.frame.parent.clone();
        while let Some(env) = current {
            depth += 1;
            current = env.frame.parent.clone();
        }
        depth
    }
}

// Frames never print their values: a closure bound in a frame can capture
// that same frame (letrec), so only names are shown.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut frames = Vec::new();
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let mut names: Vec<String> = env.frame.bindings.borrow().keys().cloned().collect();
            names.sort();
            frames.push(names);
            current = env.frame.parent.clone();
        }
        f.debug_struct("Env").field("frames", &frames).finish()
    }
}
