//! Eta parser: converts a token stream into evaluable `Value` nodes.

mod parse_form;
mod parser;

pub use parse_form::SPECIAL_FORMS;
pub use parser::{ParseResult, Parser};

use eta_lexer::Lexer;
use eta_types::SourceFile;

/// Lex and parse a whole source file.
///
/// Lexical errors stop the read before parsing; the program is then empty.
pub fn read(source_file: &SourceFile) -> ParseResult {
    let lexed = Lexer::new(source_file).lex();
    if lexed.errors.has_errors() {
        return ParseResult {
            program: Vec::new(),
            errors: lexed.errors,
        };
    }
    Parser::new(lexed.tokens, source_file).parse()
}
