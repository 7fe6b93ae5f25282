//! Runtime error values.
//!
//! Errors produced while evaluating are ordinary values ([`crate::Value::Error`]),
//! never host-level panics. Every evaluation step that produces one returns it
//! unchanged instead of computing further with it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The kind of a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A symbol was not bound anywhere along the environment chain.
    UnboundSymbol,
    /// A closure was applied to more arguments than it has formals.
    ArityMismatch,
    /// A value of the wrong type reached a conditional or a typed builtin.
    TypeMismatch,
    /// Wrong argument count for a builtin (`head`, `tail`, comparisons, ...).
    MalformedForm,
    /// An unexpected failure inside a builtin's own computation.
    HostFault,
    /// Raised explicitly by program code through `error`.
    UserRaised,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundSymbol => write!(f, "unbound symbol"),
            Self::ArityMismatch => write!(f, "arity mismatch"),
            Self::TypeMismatch => write!(f, "type mismatch"),
            Self::MalformedForm => write!(f, "malformed form"),
            Self::HostFault => write!(f, "host fault"),
            Self::UserRaised => write!(f, "error"),
        }
    }
}

/// A runtime error carried as a value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct EtaError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EtaError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unbound(name: &str) -> Self {
        Self::new(ErrorKind::UnboundSymbol, name)
    }

    pub fn arity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArityMismatch, message)
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedForm, message)
    }

    /// Lift a failure from a builtin's own computation.
    pub fn host_fault(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HostFault, message)
    }

    pub fn user(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserRaised, message)
    }
}
