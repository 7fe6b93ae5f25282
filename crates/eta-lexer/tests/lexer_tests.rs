//! Lexer tests: delimiters, quoting marks, literals, symbols, comments,
//! spans, and error recovery.

use eta_lexer::{Lexer, TokenKind};
use eta_types::{ErrorCode, SourceFile, Span, MAX_ERRORS};
use pretty_assertions::assert_eq;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.eta", source);
    Lexer::new(&sf)
        .lex()
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

fn sym(name: &str) -> TokenKind {
    TokenKind::Symbol(name.to_string())
}

fn error_count(source: &str) -> usize {
    let sf = SourceFile::new("test.eta", source);
    Lexer::new(&sf).lex().errors.total_errors
}

fn first_error_code(source: &str) -> Option<ErrorCode> {
    let sf = SourceFile::new("test.eta", source);
    Lexer::new(&sf).lex().errors.errors.first().map(|e| e.code)
}

// ─────────────────────────────────────────────────────────────────────
// Structure
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_simple_s_expression() {
    assert_eq!(
        kinds("(+ 1 2)"),
        vec![
            TokenKind::LParen,
            sym("+"),
            TokenKind::Int(1),
            TokenKind::Int(2),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_quote_marks() {
    assert_eq!(
        kinds("'(a) `(b)"),
        vec![
            TokenKind::Quote,
            TokenKind::LParen,
            sym("a"),
            TokenKind::RParen,
            TokenKind::QuasiQuote,
            TokenKind::LParen,
            sym("b"),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_empty_source_is_only_eof() {
    let sf = SourceFile::new("test.eta", "");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].kind, TokenKind::Eof);
    assert!(!result.errors.has_errors());
}

#[test]
fn test_newlines_separate_tokens() {
    assert_eq!(kinds("a\nb\r\n\tc"), vec![sym("a"), sym("b"), sym("c")]);
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("; leading comment\n(f x) ; trailing\n; last"),
        vec![TokenKind::LParen, sym("f"), sym("x"), TokenKind::RParen]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integers() {
    assert_eq!(
        kinds("0 42 -7 +3"),
        vec![
            TokenKind::Int(0),
            TokenKind::Int(42),
            TokenKind::Int(-7),
            TokenKind::Int(3),
        ]
    );
}

#[test]
fn test_floats() {
    assert_eq!(
        kinds("2.5 -0.5 1e3 2.5E-1"),
        vec![
            TokenKind::Float(2.5),
            TokenKind::Float(-0.5),
            TokenKind::Float(1000.0),
            TokenKind::Float(0.25),
        ]
    );
}

#[test]
fn test_trailing_dot_is_not_part_of_number() {
    assert_eq!(kinds("1."), vec![TokenKind::Int(1), sym(".")]);
}

#[test]
fn test_sign_alone_is_a_symbol() {
    assert_eq!(
        kinds("(- 5 x)"),
        vec![
            TokenKind::LParen,
            sym("-"),
            TokenKind::Int(5),
            sym("x"),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_booleans() {
    assert_eq!(
        kinds("#t #f"),
        vec![TokenKind::Bool(true), TokenKind::Bool(false)]
    );
}

#[test]
fn test_strings_with_escapes() {
    assert_eq!(
        kinds(r#""hi" "a\"b" "line\nnext" "tab\tend" "back\\slash""#),
        vec![
            TokenKind::Str("hi".into()),
            TokenKind::Str("a\"b".into()),
            TokenKind::Str("line\nnext".into()),
            TokenKind::Str("tab\tend".into()),
            TokenKind::Str("back\\slash".into()),
        ]
    );
}

#[test]
fn test_unknown_escape_is_kept() {
    assert_eq!(kinds(r#""\q""#), vec![TokenKind::Str("\\q".into())]);
}

#[test]
fn test_string_may_contain_parens_and_semicolons() {
    assert_eq!(kinds(r#""(not ; code)""#), vec![TokenKind::Str("(not ; code)".into())]);
}

// ─────────────────────────────────────────────────────────────────────
// Symbols
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_operator_symbols() {
    assert_eq!(
        kinds("<= >= == != % _pi"),
        vec![sym("<="), sym(">="), sym("=="), sym("!="), sym("%"), sym("_pi")]
    );
}

#[test]
fn test_special_form_names_are_symbols() {
    assert_eq!(
        kinds("if define lambda"),
        vec![sym("if"), sym("define"), sym("lambda")]
    );
}

#[test]
fn test_unicode_symbol() {
    assert_eq!(kinds("λ"), vec![sym("λ")]);
}

#[test]
fn test_symbol_with_digits() {
    assert_eq!(kinds("x1 list2"), vec![sym("x1"), sym("list2")]);
}

// ─────────────────────────────────────────────────────────────────────
// Spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_token_spans() {
    let sf = SourceFile::new("test.eta", "(+ 10\n  x)");
    let tokens = Lexer::new(&sf).lex().tokens;
    assert_eq!(tokens[0].span, Span::new(1, 1, 1, 1));
    assert_eq!(tokens[1].span, Span::new(1, 2, 1, 2));
    assert_eq!(tokens[2].span, Span::new(1, 4, 1, 5));
    assert_eq!(tokens[3].span, Span::new(2, 3, 2, 3));
    assert_eq!(tokens[4].span, Span::new(2, 4, 2, 4));
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unexpected_character_recovers() {
    assert_eq!(kinds("a , b"), vec![sym("a"), sym("b")]);
    assert_eq!(first_error_code("a , b"), Some(ErrorCode::UNEXPECTED_CHARACTER));
}

#[test]
fn test_unterminated_string() {
    assert_eq!(error_count("\"open"), 1);
    assert_eq!(first_error_code("\"open"), Some(ErrorCode::UNTERMINATED_STRING));
}

#[test]
fn test_unknown_hash_literal() {
    let sf = SourceFile::new("test.eta", "#true");
    let result = Lexer::new(&sf).lex();
    let err = &result.errors.errors[0];
    assert_eq!(err.code, ErrorCode::INVALID_LITERAL);
    assert_eq!(err.message, "unknown literal '#true'");
    assert!(err.suggestion.is_some());
}

#[test]
fn test_integer_out_of_range() {
    assert_eq!(
        first_error_code("99999999999999999999"),
        Some(ErrorCode::INVALID_NUMBER)
    );
}

#[test]
fn test_error_carries_source_line() {
    let sf = SourceFile::new("test.eta", "(a)\n(b , c)");
    let result = Lexer::new(&sf).lex();
    let err = &result.errors.errors[0];
    assert_eq!(err.source_line, "(b , c)");
    assert_eq!(err.span.start_line, 2);
    assert_eq!(err.span.start_col, 4);
}

#[test]
fn test_errors_stop_at_cap() {
    let source = ", ".repeat(MAX_ERRORS + 10);
    assert_eq!(error_count(&source), MAX_ERRORS);
}

#[test]
fn test_lexing_is_deterministic() {
    let source = "(define (f x) (if (< x 0) 'neg \"pos\")) ; done";
    let first = kinds(source);
    for _ in 0..100 {
        assert_eq!(kinds(source), first);
    }
}
