//! Eta evaluator.
//!
//! Reduces the `Value` nodes produced by `eta-parser` against an
//! `Environment`: applicative-order application, closures with partial
//! application, quoting, lazy `if`, short-circuiting `and`/`or`, and errors
//! carried as values. [`Interpreter`] wraps the evaluator with a global
//! environment holding the builtins, constants and prelude.

pub mod evaluator;
pub mod interpreter;
pub mod stdlib;

pub use evaluator::{apply_lambda, eval_sequence, evaluate, TRACE_TARGET};
pub use interpreter::{Interpreter, InterpreterError, PRELUDE};
pub use stdlib::{install_builtins, install_constants, values_equal, BUILTINS, CONSTANTS};
