//! Lexing and parsing failures.

use crate::span::Span;

/// Errors produced while turning source text into a [`Program`](crate::ast::Program).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("lex error at {span}: {message}")]
    Lex { message: String, span: Span },

    #[error("parse error at {span}: {message}")]
    Parse { message: String, span: Span },
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex { span, .. } | SyntaxError::Parse { span, .. } => *span,
        }
    }
}
