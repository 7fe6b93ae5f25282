//! Parser tests: atoms, lists, quoting, every special form, error recovery,
//! and the `read` entry point.

use eta_lexer::Lexer;
use eta_parser::{read, ParseResult, Parser};
use eta_types::{ErrorCode, Expression, Lambda, QuoteKind, SourceFile, Symbol, Value};
use pretty_assertions::assert_eq;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse(source: &str) -> ParseResult {
    let sf = SourceFile::new("test.eta", source);
    let lex = Lexer::new(&sf).lex();
    Parser::new(lex.tokens, &sf).parse()
}

/// Parse source and return the program, panicking if there are errors.
fn parse_ok(source: &str) -> Vec<Value> {
    let result = parse(source);
    if result.errors.has_errors() {
        for e in &result.errors.errors {
            eprintln!("  ERROR: {} ({})", e.message, e.code);
        }
        panic!("unexpected parse errors (see above)");
    }
    result.program
}

/// Parse a single top-level form.
fn parse_one(source: &str) -> Value {
    let mut program = parse_ok(source);
    assert_eq!(program.len(), 1, "expected one form in {source:?}");
    program.remove(0)
}

fn error_count(source: &str) -> usize {
    parse(source).errors.total_errors
}

fn first_error_code(source: &str) -> ErrorCode {
    parse(source).errors.errors[0].code
}

fn sym(name: &str) -> Value {
    Value::symbol(name)
}

fn syms(names: &[&str]) -> Vec<Symbol> {
    names.iter().map(|n| Symbol::new(n)).collect()
}

// ─────────────────────────────────────────────────────────────────────
// Atoms and lists
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_atoms_at_top_level() {
    assert_eq!(
        parse_ok(r#"42 2.5 #t "s" x"#),
        vec![
            Value::Int(42),
            Value::Float(2.5),
            Value::Bool(true),
            Value::string("s"),
            sym("x"),
        ]
    );
}

#[test]
fn test_application_form() {
    let value = parse_one("(+ 1 2)");
    assert_eq!(value, Value::list(vec![sym("+"), Value::Int(1), Value::Int(2)]));
    assert_eq!(value.as_expression().map(Expression::quote_kind), Some(QuoteKind::Plain));
}

#[test]
fn test_negative_number_in_list() {
    assert_eq!(parse_one("(-1)"), Value::list(vec![Value::Int(-1)]));
}

#[test]
fn test_empty_list() {
    assert_eq!(parse_one("()"), Value::list(vec![]));
}

#[test]
fn test_nested_lists() {
    assert_eq!(
        parse_one("(f (g x) ())"),
        Value::list(vec![
            sym("f"),
            Value::list(vec![sym("g"), sym("x")]),
            Value::list(vec![]),
        ])
    );
}

#[test]
fn test_multiple_forms_in_order() {
    let program = parse_ok("(define x 1)\n(+ x 1)\n; comment\nx");
    assert_eq!(program.len(), 3);
    assert_eq!(program[2], sym("x"));
}

// ─────────────────────────────────────────────────────────────────────
// Quoting
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_quoted_list() {
    let value = parse_one("'(1 2 3)");
    let expr = value.as_expression().expect("expression");
    assert_eq!(expr.quote_kind(), QuoteKind::Quoted);
    assert_eq!(expr.cells(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_quasi_quoted_list() {
    let value = parse_one("`(a b)");
    assert_eq!(
        value.as_expression().map(Expression::quote_kind),
        Some(QuoteKind::QuasiQuoted)
    );
}

#[test]
fn test_quoted_list_head_is_data() {
    let value = parse_one("'(if 1 2 3)");
    let expr = value.as_expression().expect("expression");
    assert_eq!(expr.cells()[0], sym("if"));
    assert_eq!(expr.len(), 4);
}

#[test]
fn test_nested_form_inside_quoted_list() {
    let value = parse_one("'(a (if #t 1 2))");
    let expr = value.as_expression().expect("expression");
    assert!(matches!(expr.cells()[1], Value::If(_)));
}

#[test]
fn test_quote_requires_list() {
    assert_eq!(first_error_code("'x"), ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(error_count("'x"), 1);
    let result = parse("'x (+ 1 2)");
    assert_eq!(result.program.len(), 1);
}

// ─────────────────────────────────────────────────────────────────────
// Special forms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_if_form() {
    assert_eq!(
        parse_one("(if (< x 1) 1 2)"),
        Value::if_expr(
            Value::list(vec![sym("<"), sym("x"), Value::Int(1)]),
            Value::Int(1),
            Value::Int(2),
        )
    );
}

#[test]
fn test_if_wrong_operand_count() {
    assert_eq!(first_error_code("(if #t 1)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(if #t 1 2 3)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert!(parse("(if #t 1)").errors.errors[0].suggestion.is_some());
}

#[test]
fn test_define_forms() {
    let expected = Value::define("x", Value::Int(5));
    assert_eq!(parse_one("(define x 5)"), expected);
    assert_eq!(parse_one("(def x 5)"), expected);
    assert_eq!(parse_one("(define (x) 5)"), expected);
}

#[test]
fn test_define_rejects_non_symbol_name() {
    assert_eq!(first_error_code("(define 5 x)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(define (f x) x)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(define x)"), ErrorCode::MALFORMED_SPECIAL_FORM);
}

#[test]
fn test_defun_form() {
    let body = Value::list(vec![sym("+"), sym("x"), sym("y")]);
    assert_eq!(
        parse_one("(defun (foo x y) (+ x y))"),
        Value::define("foo", Value::Lambda(Lambda::new(syms(&["x", "y"]), body)))
    );
}

#[test]
fn test_defun_requires_parameters() {
    assert_eq!(first_error_code("(defun (f) 1)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(defun () 1)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(defun f 1)"), ErrorCode::MALFORMED_SPECIAL_FORM);
}

#[test]
fn test_lambda_form() {
    let value = parse_one("(lambda (x y) (* x y))");
    let Value::Lambda(lambda) = value else {
        panic!("expected lambda, got {value:?}");
    };
    assert_eq!(lambda.formals(), syms(&["x", "y"]).as_slice());
    assert!(lambda.captured().is_empty());
    assert_eq!(lambda.body(), &Value::list(vec![sym("*"), sym("x"), sym("y")]));
}

#[test]
fn test_lambda_body_may_be_an_if() {
    let value = parse_one("(lambda (x) (if x 1 0))");
    let Value::Lambda(lambda) = value else {
        panic!("expected lambda");
    };
    assert!(matches!(lambda.body(), Value::If(_)));
}

#[test]
fn test_lambda_errors() {
    assert_eq!(first_error_code("(lambda (1) x)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(lambda (x) a b)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(lambda () 1)"), ErrorCode::MALFORMED_SPECIAL_FORM);
}

#[test]
fn test_and_or_forms() {
    assert_eq!(
        parse_one("(and #t x)"),
        Value::And(vec![Value::Bool(true), sym("x")])
    );
    assert_eq!(parse_one("(or #f)"), Value::Or(vec![Value::Bool(false)]));
    assert_eq!(first_error_code("(and)"), ErrorCode::MALFORMED_SPECIAL_FORM);
}

#[test]
fn test_let_form() {
    assert_eq!(
        parse_one("(let (x 1) (y (+ x 1)))"),
        Value::list(vec![
            Value::define("x", Value::Int(1)),
            Value::define("y", Value::list(vec![sym("+"), sym("x"), Value::Int(1)])),
        ])
    );
}

#[test]
fn test_let_errors() {
    assert_eq!(first_error_code("(let)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(let x 1)"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(let (1 2))"), ErrorCode::MALFORMED_SPECIAL_FORM);
    assert_eq!(first_error_code("(let (x 1 2))"), ErrorCode::MALFORMED_SPECIAL_FORM);
}

#[test]
fn test_special_name_outside_head_is_a_symbol() {
    assert_eq!(parse_one("(f if)"), Value::list(vec![sym("f"), sym("if")]));
}

// ─────────────────────────────────────────────────────────────────────
// Error recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unclosed_paren() {
    let result = parse("(+ 1 (f 2)");
    assert_eq!(result.errors.total_errors, 1);
    assert_eq!(result.errors.errors[0].code, ErrorCode::UNCLOSED_PAREN);
    assert!(result.program.is_empty());
}

#[test]
fn test_stray_close_paren() {
    let result = parse("(+ 1 2))");
    assert_eq!(result.errors.total_errors, 1);
    assert_eq!(result.errors.errors[0].code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(result.program.len(), 1);
}

#[test]
fn test_recovery_resumes_after_bad_form() {
    let result = parse("(if 1) (define y 2) (lambda 3 4) y");
    assert_eq!(result.errors.total_errors, 2);
    assert_eq!(
        result.program,
        vec![Value::define("y", Value::Int(2)), sym("y")]
    );
}

#[test]
fn test_nested_error_discards_enclosing_form() {
    let result = parse("(f (if 1) x) (g)");
    assert_eq!(result.errors.total_errors, 1);
    assert_eq!(result.program, vec![Value::list(vec![sym("g")])]);
}

#[test]
fn test_error_span_and_source_line() {
    let result = parse("(define x 1)\n(if #t)");
    let err = &result.errors.errors[0];
    assert_eq!(err.span.start_line, 2);
    assert_eq!(err.span.start_col, 1);
    assert_eq!(err.source_line, "(if #t)");
}

#[test]
fn test_errors_capped() {
    let source = "(if) ".repeat(30);
    let result = parse(&source);
    assert_eq!(result.errors.total_errors, eta_types::MAX_ERRORS);
}

// ─────────────────────────────────────────────────────────────────────
// read
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_read_parses_source() {
    let sf = SourceFile::new("test.eta", "(defun (id x) x) (id 1)");
    let result = read(&sf);
    assert!(!result.errors.has_errors());
    assert_eq!(result.program.len(), 2);
}

#[test]
fn test_read_stops_on_lex_errors() {
    let sf = SourceFile::new("test.eta", "(+ 1 #x)");
    let result = read(&sf);
    assert!(result.program.is_empty());
    assert_eq!(result.errors.errors[0].code, ErrorCode::INVALID_LITERAL);
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "(defun (len xs) (if (== xs nil) 0 (+ 1 (len (tail xs)))))";
    let first = parse_ok(source);
    for _ in 0..100 {
        assert_eq!(parse_ok(source), first);
    }
}
