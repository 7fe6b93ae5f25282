use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of syntax errors stored before the rest are only counted.
pub const MAX_ERRORS: usize = 20;

/// Numeric syntax error code (E100–E199).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lexical (E100–E129) ──
    pub const UNEXPECTED_CHARACTER: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);
    pub const INVALID_NUMBER: Self = Self(102);
    pub const INVALID_LITERAL: Self = Self(103);

    // ── Structural (E130–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(130);
    pub const UNCLOSED_PAREN: Self = Self(131);
    pub const MALFORMED_SPECIAL_FORM: Self = Self(140);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A syntax error found while reading source text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{span}: {code} {message}")]
pub struct SyntaxError {
    pub file: String,
    pub code: ErrorCode,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The offending source line, for context.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggestion: Option<String>,
}

impl SyntaxError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Syntax errors collected across one read, capped at [`MAX_ERRORS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxErrors {
    pub errors: Vec<SyntaxError>,
    pub total_errors: usize,
}

impl SyntaxErrors {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Whether the cap has been reached; readers stop early once it has.
    pub fn is_full(&self) -> bool {
        self.total_errors >= MAX_ERRORS
    }

    pub fn push_error(&mut self, error: SyntaxError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Append every error from `other`.
    pub fn extend(&mut self, other: SyntaxErrors) {
        let dropped = other.total_errors - other.errors.len();
        for error in other.errors {
            self.push_error(error);
        }
        self.total_errors += dropped;
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:{error}", error.file)?;
        }
        let hidden = self.total_errors - self.errors.len();
        if hidden > 0 {
            write!(f, "\n... and {hidden} more")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(code: ErrorCode) -> SyntaxError {
        SyntaxError::new(
            "test.eta",
            code,
            "unexpected ')'",
            Span::new(2, 5, 2, 5),
            "  (+ 1 2))",
        )
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.to_string(), "E130");
        assert_eq!(ErrorCode::UNTERMINATED_STRING.to_string(), "E101");
    }

    #[test]
    fn test_syntax_error_display() {
        assert_eq!(
            sample(ErrorCode::UNEXPECTED_TOKEN).to_string(),
            "2:5: E130 unexpected ')'"
        );
    }

    #[test]
    fn test_syntax_error_json() {
        let err = sample(ErrorCode::UNEXPECTED_TOKEN).with_suggestion("remove the extra ')'");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"line\":2"));
        assert!(json.contains("\"column\":5"));
        assert!(json.contains("\"suggestion\""));
        let back: SyntaxError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_max_errors_cap() {
        let mut errs = SyntaxErrors::empty();
        for _ in 0..25 {
            errs.push_error(sample(ErrorCode::UNEXPECTED_TOKEN));
        }
        assert_eq!(errs.errors.len(), MAX_ERRORS);
        assert_eq!(errs.total_errors, 25);
        assert!(errs.is_full());
        assert!(errs.to_string().ends_with("... and 5 more"));
    }

    #[test]
    fn test_extend_keeps_totals() {
        let mut a = SyntaxErrors::empty();
        a.push_error(sample(ErrorCode::INVALID_NUMBER));
        let mut b = SyntaxErrors::empty();
        b.push_error(sample(ErrorCode::UNCLOSED_PAREN));
        a.extend(b);
        assert_eq!(a.total_errors, 2);
        assert_eq!(a.errors[1].code, ErrorCode::UNCLOSED_PAREN);
    }
}
