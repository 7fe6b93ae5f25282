//! Core parser infrastructure: token cursor, error reporting, recovery, and
//! the datum reader that every form builds on.

use eta_lexer::token::{Token, TokenKind};
use eta_types::{ErrorCode, Expression, QuoteKind, SourceFile, Span, SyntaxError, SyntaxErrors, Value};

use crate::parse_form::SPECIAL_FORMS;

/// The Eta parser.
///
/// Consumes a token stream produced by the lexer and builds [`Value`] nodes,
/// which double as the evaluator's AST. Collects errors and recovers at the
/// closing parenthesis of the form that failed.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    /// Current index into `tokens`; the last token is always `Eof`.
    pos: usize,
    source_file: &'src SourceFile,
    errors: SyntaxErrors,
}

/// Result of parsing.
pub struct ParseResult {
    /// Top-level forms, in source order.
    pub program: Vec<Value>,
    pub errors: SyntaxErrors,
}

impl<'src> Parser<'src> {
    pub fn new(mut tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let span = tokens.last().map_or(Span::point(1, 1), |t| t.span);
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: SyntaxErrors::empty(),
        }
    }

    /// Parse every top-level form.
    pub fn parse(mut self) -> ParseResult {
        let mut program = Vec::new();
        while !self.at_end() && !self.too_many_errors() {
            if self.check(&TokenKind::RParen) {
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "unexpected ')'");
                self.advance();
                continue;
            }
            if let Some(value) = self.parse_datum() {
                program.push(value);
            }
        }
        ParseResult {
            program,
            errors: self.errors,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// The span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        match self.pos {
            0 => Span::point(1, 1),
            n => self.tokens[n - 1].span,
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let error = self.make_error(code, message, span);
        self.errors.push_error(error);
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: &str,
    ) {
        let error = self.make_error(code, message, span).with_suggestion(suggestion);
        self.errors.push_error(error);
    }

    fn make_error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> SyntaxError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        SyntaxError::new(&self.source_file.name, code, message, span, source_line)
    }

    pub(crate) fn error_unclosed(&mut self, open: Span) {
        self.error_with_suggestion(
            ErrorCode::UNCLOSED_PAREN,
            format!("unclosed '(' opened at {open}"),
            open,
            "add the missing ')'",
        );
    }

    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.is_full()
    }

    // ── Recovery ──────────────────────────────────────────────────────────────

    /// Skip to and consume the `)` that closes the form currently being read.
    ///
    /// Nested lists are skipped whole. Stops at `Eof` if the form is unclosed.
    pub(crate) fn recover(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ── Datums ────────────────────────────────────────────────────────────────

    /// Parse one datum: an atom, a (possibly quoted) list, or a special form.
    ///
    /// On `None` an error has been reported and every token of the failed
    /// datum has been consumed, up to `Eof` if it never closed.
    pub(crate) fn parse_datum(&mut self) -> Option<Value> {
        match self.peek_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Some(Value::Int(n))
            }
            TokenKind::Float(n) => {
                self.advance();
                Some(Value::Float(n))
            }
            TokenKind::Bool(b) => {
                self.advance();
                Some(Value::Bool(b))
            }
            TokenKind::Str(s) => {
                self.advance();
                Some(Value::Str(s))
            }
            TokenKind::Symbol(name) => {
                self.advance();
                Some(Value::symbol(name))
            }
            TokenKind::LParen => self.parse_list(QuoteKind::Plain),
            TokenKind::Quote => self.parse_quoted(QuoteKind::Quoted),
            TokenKind::QuasiQuote => self.parse_quoted(QuoteKind::QuasiQuoted),
            TokenKind::RParen => {
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "unexpected ')'");
                None
            }
            TokenKind::Eof => {
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "unexpected end of input");
                None
            }
        }
    }

    fn parse_quoted(&mut self, quote: QuoteKind) -> Option<Value> {
        let mark = self.advance();
        if self.check(&TokenKind::LParen) {
            return self.parse_list(quote);
        }
        let found = self.peek_kind().clone();
        self.error_with_suggestion(
            ErrorCode::UNEXPECTED_TOKEN,
            format!("expected '(' after '{}', got '{found}'", mark.kind),
            mark.span.merge(self.current_span()),
            "quote marks apply to parenthesised lists only",
        );
        if !matches!(
            found,
            TokenKind::RParen | TokenKind::Eof | TokenKind::Quote | TokenKind::QuasiQuote
        ) {
            self.advance();
        }
        None
    }

    /// Parse a parenthesised list. The head of a plain list may name a
    /// special form; quoted lists are always data.
    fn parse_list(&mut self, quote: QuoteKind) -> Option<Value> {
        let open = self.advance().span;
        if quote == QuoteKind::Plain {
            if let TokenKind::Symbol(name) = self.peek_kind() {
                if let Some(form) = SPECIAL_FORMS.iter().copied().find(|f| *f == name.as_str()) {
                    self.advance();
                    return self.parse_special_form(form, open);
                }
            }
        }
        let cells = self.parse_until_close(open)?;
        Some(Value::Expr(Expression::new(cells).with_quote(quote)))
    }

    /// Parse datums up to and including the closing `)` of the current form.
    pub(crate) fn parse_until_close(&mut self, open: Span) -> Option<Vec<Value>> {
        let mut cells = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::RParen => {
                    self.advance();
                    return Some(cells);
                }
                TokenKind::Eof => {
                    self.error_unclosed(open);
                    return None;
                }
                _ => match self.parse_datum() {
                    Some(value) => cells.push(value),
                    None => {
                        self.recover();
                        return None;
                    }
                },
            }
        }
    }
}
