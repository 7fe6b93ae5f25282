//! Core Eta lexer: converts source text to a token stream.
//!
//! - Whitespace, including newlines, only separates tokens
//! - `;` comments run to the end of the line
//! - A `+` or `-` directly followed by a digit starts a signed number
//! - Error recovery: collects up to 20 errors instead of stopping at the first

use eta_types::{ErrorCode, SourceFile, Span, SyntaxError, SyntaxErrors};

use crate::token::{Token, TokenKind};

/// Bytes that may appear in a symbol besides ASCII letters and digits.
const SYMBOL_PUNCTUATION: &[u8] = b"+-*/<>=!%^_?&.";

fn is_symbol_byte(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || SYMBOL_PUNCTUATION.contains(&ch) || ch >= 0x80
}

/// The Eta lexer.
pub struct Lexer<'src> {
    source: &'src [u8],
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    line: u32,
    col: u32,
    errors: SyntaxErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    pub errors: SyntaxErrors,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            errors: SyntaxErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ── Character-level helpers ──────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn text_from(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = SyntaxError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_whitespace() {
                self.advance();
            } else if ch == b';' {
                while !matches!(self.peek(), None | Some(b'\n')) {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    // ── Scanning ─────────────────────────────────────────────────────────

    fn scan(&mut self) -> Token {
        self.skip_trivia();

        if self.errors.is_full() {
            return Token::new(TokenKind::Eof, self.current_span());
        }

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, self.current_span());
        };

        let kind = match ch {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'\'' => TokenKind::Quote,
            b'`' => TokenKind::QuasiQuote,
            b'"' => return self.scan_string(start_line, start_col),
            b'#' => return self.scan_hash(start, start_line, start_col),
            b'0'..=b'9' => return self.scan_number(start, start_line, start_col),
            b'+' | b'-' if matches!(self.peek(), Some(b'0'..=b'9')) => {
                return self.scan_number(start, start_line, start_col)
            }
            c if is_symbol_byte(c) => {
                while self.peek().is_some_and(is_symbol_byte) {
                    self.advance();
                }
                TokenKind::Symbol(self.text_from(start))
            }
            other => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{}'", other as char),
                    span,
                );
                return self.scan();
            }
        };
        Token::new(kind, self.span_from(start_line, start_col))
    }

    fn scan_number(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        let mut is_float = false;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.advance();
        }
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_float = true;
            self.advance();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let digits_at = if matches!(self.peek_at(1), Some(b'+' | b'-')) { 2 } else { 1 };
            if matches!(self.peek_at(digits_at), Some(b'0'..=b'9')) {
                is_float = true;
                for _ in 0..digits_at {
                    self.advance();
                }
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.advance();
                }
            }
        }

        let text = self.text_from(start);
        let span = self.span_from(start_line, start_col);
        let kind = if is_float {
            text.parse::<f64>().ok().map(TokenKind::Float)
        } else {
            text.parse::<i64>().ok().map(TokenKind::Int)
        };
        match kind {
            Some(kind) => Token::new(kind, span),
            None => {
                self.emit_error(
                    ErrorCode::INVALID_NUMBER,
                    format!("number literal '{text}' is out of range"),
                    span,
                );
                self.scan()
            }
        }
    }

    fn scan_hash(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        while self.peek().is_some_and(is_symbol_byte) {
            self.advance();
        }
        let text = self.text_from(start);
        let span = self.span_from(start_line, start_col);
        match text.as_str() {
            "#t" => Token::new(TokenKind::Bool(true), span),
            "#f" => Token::new(TokenKind::Bool(false), span),
            _ => {
                let err = SyntaxError::new(
                    &self.source_file.name,
                    ErrorCode::INVALID_LITERAL,
                    format!("unknown literal '{text}'"),
                    span,
                    self.source_file.line(span.start_line).unwrap_or(""),
                )
                .with_suggestion("booleans are written #t and #f");
                self.errors.push_error(err);
                self.scan()
            }
        }
    }

    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        let mut bytes = Vec::new();
        loop {
            match self.advance() {
                None => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_STRING,
                        "unterminated string literal",
                        span,
                    );
                    return Token::new(TokenKind::Eof, self.current_span());
                }
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(b'"') => bytes.push(b'"'),
                    Some(b'\\') => bytes.push(b'\\'),
                    Some(b'n') => bytes.push(b'\n'),
                    Some(b't') => bytes.push(b'\t'),
                    Some(other) => bytes.extend([b'\\', other]),
                    None => {}
                },
                Some(ch) => bytes.push(ch),
            }
        }
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Token::new(TokenKind::Str(text), self.span_from(start_line, start_col))
    }
}
