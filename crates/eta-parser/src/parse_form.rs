//! Special forms: `if`, `define`/`def`, `defun`, `lambda`, `and`, `or`, `let`.
//!
//! Each parser is entered with the opening `(` and the form's name already
//! consumed, and consumes everything up to and including the closing `)`.

use eta_lexer::token::TokenKind;
use eta_types::{ErrorCode, Expression, Lambda, Span, Symbol, Value};

use crate::parser::Parser;

/// Names recognised as special forms in head position of a plain list.
pub const SPECIAL_FORMS: &[&str] = &["if", "define", "def", "defun", "lambda", "and", "or", "let"];

impl<'src> Parser<'src> {
    pub(crate) fn parse_special_form(&mut self, form: &'static str, open: Span) -> Option<Value> {
        match form {
            "if" => self.parse_if(open),
            "define" | "def" => self.parse_define(form, open),
            "defun" => self.parse_defun(open),
            "lambda" => self.parse_lambda(open),
            "and" | "or" => self.parse_logical(form, open),
            "let" => self.parse_let(open),
            _ => {
                self.error_at(
                    ErrorCode::MALFORMED_SPECIAL_FORM,
                    format!("unknown special form '{form}'"),
                    open,
                );
                self.recover();
                None
            }
        }
    }

    /// Report a malformed form spanning from `open` to the last consumed token.
    fn malformed(&mut self, open: Span, message: String, suggestion: &str) {
        let span = open.merge(self.previous_span());
        self.error_with_suggestion(ErrorCode::MALFORMED_SPECIAL_FORM, message, span, suggestion);
    }

    // ── if ────────────────────────────────────────────────────────────────────

    fn parse_if(&mut self, open: Span) -> Option<Value> {
        let operands = self.parse_until_close(open)?;
        match <[Value; 3]>::try_from(operands) {
            Ok([clause, then_branch, else_branch]) => {
                Some(Value::if_expr(clause, then_branch, else_branch))
            }
            Err(operands) => {
                self.malformed(
                    open,
                    format!("'if' takes exactly 3 forms, got {}", operands.len()),
                    "write (if condition then else)",
                );
                None
            }
        }
    }

    // ── define / def ──────────────────────────────────────────────────────────

    fn parse_define(&mut self, form: &str, open: Span) -> Option<Value> {
        let name = match self.peek_kind().clone() {
            TokenKind::Symbol(name) => {
                self.advance();
                Symbol::new(name)
            }
            TokenKind::LParen => {
                let Some(names) = self.parse_symbol_list(form) else {
                    self.recover();
                    return None;
                };
                match <[Symbol; 1]>::try_from(names) {
                    Ok([name]) => name,
                    Err(_) => {
                        self.malformed(
                            open,
                            format!("'{form}' with a parenthesised name takes exactly one symbol"),
                            "use defun to define a function: (defun (name x y) body)",
                        );
                        self.recover();
                        return None;
                    }
                }
            }
            TokenKind::Eof => {
                self.error_unclosed(open);
                return None;
            }
            other => {
                self.error_with_suggestion(
                    ErrorCode::MALFORMED_SPECIAL_FORM,
                    format!("'{form}' expects a symbol to bind, got '{other}'"),
                    self.current_span(),
                    "write (define name expression)",
                );
                self.recover();
                return None;
            }
        };
        let value = self.parse_single_body(form, open)?;
        Some(Value::define(name, value))
    }

    // ── defun / lambda ────────────────────────────────────────────────────────

    fn parse_defun(&mut self, open: Span) -> Option<Value> {
        let mut names = self.parse_formals("defun", open)?.into_iter();
        let Some(name) = names.next() else {
            self.malformed(
                open,
                "'defun' needs a function name".to_string(),
                "write (defun (name x y) body)",
            );
            self.recover();
            return None;
        };
        let formals: Vec<Symbol> = names.collect();
        if formals.is_empty() {
            self.malformed(
                open,
                format!("'defun' of '{name}' declares no parameters"),
                "a function takes at least one parameter: (defun (name x) body)",
            );
            self.recover();
            return None;
        }
        let body = self.parse_single_body("defun", open)?;
        Some(Value::define(name, Value::Lambda(Lambda::new(formals, body))))
    }

    fn parse_lambda(&mut self, open: Span) -> Option<Value> {
        let formals = self.parse_formals("lambda", open)?;
        if formals.is_empty() {
            self.malformed(
                open,
                "'lambda' declares no parameters".to_string(),
                "a lambda takes at least one parameter: (lambda (x) body)",
            );
            self.recover();
            return None;
        }
        let body = self.parse_single_body("lambda", open)?;
        Some(Value::Lambda(Lambda::new(formals, body)))
    }

    /// Parse the parenthesised parameter list of `defun` or `lambda`,
    /// recovering to the end of the enclosing form on failure.
    fn parse_formals(&mut self, form: &str, open: Span) -> Option<Vec<Symbol>> {
        match self.peek_kind().clone() {
            TokenKind::LParen => match self.parse_symbol_list(form) {
                Some(names) => Some(names),
                None => {
                    self.recover();
                    None
                }
            },
            TokenKind::Eof => {
                self.error_unclosed(open);
                None
            }
            other => {
                let message = format!("'{form}' expects a parameter list, got '{other}'");
                self.error_with_suggestion(
                    ErrorCode::MALFORMED_SPECIAL_FORM,
                    message,
                    self.current_span(),
                    "parameters are written in parentheses: (x y)",
                );
                self.recover();
                None
            }
        }
    }

    /// Parse `( sym* )`. On failure the list itself has been consumed.
    fn parse_symbol_list(&mut self, form: &str) -> Option<Vec<Symbol>> {
        let open = self.advance().span;
        let mut names = Vec::new();
        loop {
            match self.peek_kind().clone() {
                TokenKind::Symbol(name) => {
                    self.advance();
                    names.push(Symbol::new(name));
                }
                TokenKind::RParen => {
                    self.advance();
                    return Some(names);
                }
                TokenKind::Eof => {
                    self.error_unclosed(open);
                    return None;
                }
                other => {
                    self.error_at_current(
                        ErrorCode::MALFORMED_SPECIAL_FORM,
                        format!("'{form}' parameter names must be symbols, got '{other}'"),
                    );
                    self.recover();
                    return None;
                }
            }
        }
    }

    /// Parse the remaining single body form and the closing `)`.
    fn parse_single_body(&mut self, form: &str, open: Span) -> Option<Value> {
        let rest = self.parse_until_close(open)?;
        match <[Value; 1]>::try_from(rest) {
            Ok([body]) => Some(body),
            Err(rest) => {
                self.malformed(
                    open,
                    format!("'{form}' takes exactly one body form, got {}", rest.len()),
                    "wrap several forms in a list",
                );
                None
            }
        }
    }

    // ── and / or ──────────────────────────────────────────────────────────────

    fn parse_logical(&mut self, form: &str, open: Span) -> Option<Value> {
        let operands = self.parse_until_close(open)?;
        if operands.is_empty() {
            self.malformed(
                open,
                format!("'{form}' needs at least one operand"),
                "write (and a b) or (or a b)",
            );
            return None;
        }
        Some(if form == "and" {
            Value::And(operands)
        } else {
            Value::Or(operands)
        })
    }

    // ── let ───────────────────────────────────────────────────────────────────

    /// `(let (v1 e1) (v2 e2) ...)` becomes a plain list of definitions.
    fn parse_let(&mut self, open: Span) -> Option<Value> {
        let mut bindings = Expression::empty();
        loop {
            match self.peek_kind().clone() {
                TokenKind::RParen => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => {
                    self.error_unclosed(open);
                    return None;
                }
                TokenKind::LParen => match self.parse_let_binding() {
                    Some(definition) => bindings.push(definition),
                    None => {
                        self.recover();
                        return None;
                    }
                },
                other => {
                    self.error_with_suggestion(
                        ErrorCode::MALFORMED_SPECIAL_FORM,
                        format!("'let' expects (name value) pairs, got '{other}'"),
                        self.current_span(),
                        "write (let (x 1) (y 2))",
                    );
                    self.recover();
                    return None;
                }
            }
        }
        if bindings.is_empty() {
            self.malformed(
                open,
                "'let' needs at least one binding".to_string(),
                "write (let (x 1) (y 2))",
            );
            return None;
        }
        Some(Value::Expr(bindings))
    }

    fn parse_let_binding(&mut self) -> Option<Value> {
        let open = self.advance().span;
        let name = match self.peek_kind().clone() {
            TokenKind::Symbol(name) => {
                self.advance();
                Symbol::new(name)
            }
            TokenKind::Eof => {
                self.error_unclosed(open);
                return None;
            }
            other => {
                self.error_at_current(
                    ErrorCode::MALFORMED_SPECIAL_FORM,
                    format!("'let' binding must start with a symbol, got '{other}'"),
                );
                self.recover();
                return None;
            }
        };
        let rest = self.parse_until_close(open)?;
        match <[Value; 1]>::try_from(rest) {
            Ok([value]) => Some(Value::define(name, value)),
            Err(rest) => {
                self.malformed(
                    open,
                    format!("'let' binding of '{name}' takes exactly one value, got {}", rest.len()),
                    "write (let (x 1) (y 2))",
                );
                None
            }
        }
    }
}
