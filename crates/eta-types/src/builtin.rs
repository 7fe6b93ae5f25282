//! Calling convention for host-supplied builtin functions.

use std::fmt;

use crate::env::Environment;
use crate::eval_error::EtaError;
use crate::value::{first_error, Value};

/// Signature every builtin implements: the calling environment plus the
/// already-evaluated arguments, in order.
pub type BuiltinFn = fn(&mut Environment<'_>, Vec<Value>) -> Value;

/// How many arguments a builtin accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(1) => write!(f, "exactly 1 argument"),
            Self::Exactly(n) => write!(f, "exactly {n} arguments"),
            Self::AtLeast(1) => write!(f, "at least 1 argument"),
            Self::AtLeast(n) => write!(f, "at least {n} arguments"),
        }
    }
}

/// A named host function.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    arity: Arity,
    func: BuiltinFn,
}

impl Builtin {
    pub const fn new(name: &'static str, arity: Arity, func: BuiltinFn) -> Self {
        Self { name, arity, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// A builtin that expects no arguments is invoked even when it appears
    /// alone in a form, e.g. `(symbols)`.
    pub fn takes_no_arguments(&self) -> bool {
        self.arity == Arity::Exactly(0)
    }

    /// Invoke the builtin.
    ///
    /// An error among the arguments is returned as-is before anything else
    /// happens; a wrong argument count is a malformed form.
    pub fn call(&self, env: &mut Environment<'_>, args: Vec<Value>) -> Value {
        if let Some(err) = first_error(&args) {
            return err.clone();
        }
        if !self.arity.accepts(args.len()) {
            return EtaError::malformed(format!(
                "'{}' expects {}, got {}",
                self.name,
                self.arity,
                args.len()
            ))
            .into();
        }
        (self.func)(env, args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}
