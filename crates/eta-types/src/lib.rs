//! Shared types for Eta.
//!
//! This crate defines the value model (which is also the AST the reader
//! produces), closures, the builtin calling convention, environment frames,
//! the evaluation context, runtime error values, and reader diagnostics.

mod builtin;
mod context;
mod env;
mod error;
mod eval_error;
mod span;
mod symbol;
mod value;

pub use builtin::{Arity, Builtin, BuiltinFn};
pub use context::{EvalContext, TRACE_ENV_VAR};
pub use env::{Environment, Frame};
pub use error::{ErrorCode, SyntaxError, SyntaxErrors, MAX_ERRORS};
pub use eval_error::{ErrorKind, EtaError};
pub use span::{SourceFile, Span};
pub use symbol::Symbol;
pub use value::{first_error, Definition, Expression, IfExpr, Lambda, QuoteKind, Value};
