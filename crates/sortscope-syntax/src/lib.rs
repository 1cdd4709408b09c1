//! Lexer, parser and AST for the JavaScript subset that sorting snippets
//! are written in.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;
pub mod visit;

pub use ast::Program;
pub use error::SyntaxError;
pub use span::Span;
pub use visit::Visit;

/// Lex and parse `source` into a [`Program`].
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    let tokens = lexer::Lexer::new(source).tokenize()?;
    parser::Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reports_lex_errors() {
        let err = parse("let s = 'unterminated").unwrap_err();
        assert!(matches!(err, SyntaxError::Lex { .. }));
    }

    #[test]
    fn test_program_serializes() {
        let program = parse("let arr = [1, 2];").unwrap();
        let json = serde_json::to_string(&program).unwrap();
        assert!(json.contains("\"arr\""));
    }
}
