//! Token types for the Eta lexer.

use eta_types::Span;
use std::fmt;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every token kind in Eta.
///
/// Special-form names (`if`, `define`, ...) are plain symbols here; the
/// parser recognises them by position.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `'`
    Quote,
    /// `` ` ``
    QuasiQuote,
    /// `42`, `-7`
    Int(i64),
    /// `2.7`, `-1e3`
    Float(f64),
    /// `#t` / `#f`
    Bool(bool),
    /// `"text"`, escapes already resolved.
    Str(String),
    /// Any other name: `x`, `+`, `<=`, `some-name`.
    Symbol(String),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Quote => write!(f, "'"),
            Self::QuasiQuote => write!(f, "`"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(true) => write!(f, "#t"),
            Self::Bool(false) => write!(f, "#f"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Symbol(name) => write!(f, "{name}"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}
