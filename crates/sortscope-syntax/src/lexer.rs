use crate::error::SyntaxError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

// ═══════════════════════════════════════════════════════════════
//  Lexer
// ═══════════════════════════════════════════════════════════════

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the entire source into a Vec<Token>, ending with `EOF`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind.is_eof();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace_and_comments()?;

        if self.is_at_end() {
            return Ok(Token::new(
                TokenKind::EOF,
                Span::new(self.pos, self.pos, self.line, self.col),
            ));
        }

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;
        let c = self.advance();

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '?' => TokenKind::Question,

            '.' => {
                if self.peek().map_or(false, |c| c.is_ascii_digit()) {
                    return self.lex_number(start, start_line, start_col);
                }
                TokenKind::Dot
            }

            '+' => match self.peek() {
                Some('+') => {
                    self.advance();
                    TokenKind::PlusPlus
                }
                Some('=') => {
                    self.advance();
                    TokenKind::PlusEq
                }
                _ => TokenKind::Plus,
            },

            '-' => match self.peek() {
                Some('-') => {
                    self.advance();
                    TokenKind::MinusMinus
                }
                Some('=') => {
                    self.advance();
                    TokenKind::MinusEq
                }
                _ => TokenKind::Minus,
            },

            '*' => self.with_eq(TokenKind::StarEq, TokenKind::Star),
            '/' => self.with_eq(TokenKind::SlashEq, TokenKind::Slash),
            '%' => self.with_eq(TokenKind::PercentEq, TokenKind::Percent),
            '<' => self.with_eq(TokenKind::LtEq, TokenKind::Lt),
            '>' => self.with_eq(TokenKind::GtEq, TokenKind::Gt),

            '=' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.with_eq(TokenKind::EqEqEq, TokenKind::EqEq)
                }
                Some('>') => {
                    self.advance();
                    TokenKind::FatArrow
                }
                _ => TokenKind::Eq,
            },

            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.with_eq(TokenKind::NotEqEq, TokenKind::NotEq)
                } else {
                    TokenKind::Bang
                }
            }

            '&' if self.peek() == Some('&') => {
                self.advance();
                TokenKind::AmpAmp
            }

            '|' if self.peek() == Some('|') => {
                self.advance();
                TokenKind::PipePipe
            }

            '"' | '\'' => return self.lex_string(c, start, start_line, start_col),
            '`' => return self.lex_template(start, start_line, start_col),

            c if c.is_ascii_digit() => {
                return self.lex_number(start, start_line, start_col);
            }

            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                return Ok(self.lex_ident_or_keyword(start, start_line, start_col));
            }

            other => {
                return Err(SyntaxError::Lex {
                    message: format!("unexpected character '{}'", other),
                    span: Span::new(start, self.pos, start_line, start_col),
                });
            }
        };

        Ok(Token::new(
            kind,
            Span::new(start, self.pos, start_line, start_col),
        ))
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.pos];
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        c
    }

    /// Consumes a trailing `=` if present, choosing between two kinds.
    fn with_eq(&mut self, with: TokenKind, without: TokenKind) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            with
        } else {
            without
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), SyntaxError> {
        loop {
            while self.peek().map_or(false, |c| c.is_whitespace()) {
                self.advance();
            }

            // Line comments: //
            if self.peek() == Some('/') && self.peek_next() == Some('/') {
                while !self.is_at_end() && self.peek() != Some('\n') {
                    self.advance();
                }
                continue;
            }

            // Block comments: /* ... */ (not nested in JavaScript)
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                let (start, line, col) = (self.pos, self.line, self.col);
                self.advance();
                self.advance();
                loop {
                    if self.is_at_end() {
                        return Err(SyntaxError::Lex {
                            message: "unterminated block comment".to_string(),
                            span: Span::new(start, self.pos, line, col),
                        });
                    }
                    if self.peek() == Some('*') && self.peek_next() == Some('/') {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            return Ok(());
        }
    }

    fn lex_string(
        &mut self,
        quote: char,
        start: usize,
        start_line: u32,
        start_col: u32,
    ) -> Result<Token, SyntaxError> {
        let mut value = String::new();

        loop {
            if self.is_at_end() || self.peek() == Some('\n') {
                return Err(SyntaxError::Lex {
                    message: "unterminated string literal".to_string(),
                    span: Span::new(start, self.pos, start_line, start_col),
                });
            }

            let c = self.advance();
            match c {
                c if c == quote => break,
                '\\' => {
                    if self.is_at_end() {
                        return Err(SyntaxError::Lex {
                            message: "unterminated escape sequence".to_string(),
                            span: Span::new(start, self.pos, start_line, start_col),
                        });
                    }
                    match self.advance() {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        // \\, \', \" and any other escaped char stand for themselves
                        other => value.push(other),
                    }
                }
                _ => value.push(c),
            }
        }

        Ok(Token::new(
            TokenKind::Str(value),
            Span::new(start, self.pos, start_line, start_col),
        ))
    }

    fn lex_template(
        &mut self,
        start: usize,
        start_line: u32,
        start_col: u32,
    ) -> Result<Token, SyntaxError> {
        let mut value = String::new();
        loop {
            if self.is_at_end() {
                return Err(SyntaxError::Lex {
                    message: "unterminated template literal".to_string(),
                    span: Span::new(start, self.pos, start_line, start_col),
                });
            }
            match self.advance() {
                '`' => break,
                '\\' if !self.is_at_end() => {
                    let escaped = self.advance();
                    value.push(escaped);
                }
                c => value.push(c),
            }
        }
        Ok(Token::new(
            TokenKind::Template(value),
            Span::new(start, self.pos, start_line, start_col),
        ))
    }

    fn lex_number(
        &mut self,
        start: usize,
        start_line: u32,
        start_col: u32,
    ) -> Result<Token, SyntaxError> {
        // First digit (or leading '.') already consumed
        while self.peek().map_or(false, |c| c.is_ascii_digit() || c == '_') {
            self.advance();
        }

        let leading_dot = self.source[start] == '.';
        if !leading_dot
            && self.peek() == Some('.')
            && self.peek_next().map_or(false, |c| c.is_ascii_digit())
        {
            self.advance();
            while self.peek().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = matches!(self.peek_next(), Some('+') | Some('-'));
            let digit_at = if sign { self.pos + 2 } else { self.pos + 1 };
            if self
                .source
                .get(digit_at)
                .map_or(false, |c| c.is_ascii_digit())
            {
                self.advance();
                if sign {
                    self.advance();
                }
                while self.peek().map_or(false, |c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let text: String = self.source[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let value: f64 = text.parse().map_err(|_| SyntaxError::Lex {
            message: format!("invalid number literal '{}'", text),
            span: Span::new(start, self.pos, start_line, start_col),
        })?;

        Ok(Token::new(
            TokenKind::Number(value),
            Span::new(start, self.pos, start_line, start_col),
        ))
    }

    fn lex_ident_or_keyword(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        while self
            .peek()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }

        let text: String = self.source[start..self.pos].iter().collect();
        let kind = TokenKind::keyword_from_str(&text).unwrap_or(TokenKind::Ident(text));

        Token::new(kind, Span::new(start, self.pos, start_line, start_col))
    }
}

// ═══════════════════════════════════════════════════════════════
//  Unit tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        lexer
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_array_declaration() {
        let tokens = lex("let arr = [5, 3];");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Let,
                TokenKind::Ident("arr".into()),
                TokenKind::Eq,
                TokenKind::LBracket,
                TokenKind::Number(5.0),
                TokenKind::Comma,
                TokenKind::Number(3.0),
                TokenKind::RBracket,
                TokenKind::Semicolon,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_multi_char_operators() {
        let tokens = lex("a === b !== c <= d >= e && f || !g => i++ j-- += -= == !=");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::EqEqEq,
                TokenKind::Ident("b".into()),
                TokenKind::NotEqEq,
                TokenKind::Ident("c".into()),
                TokenKind::LtEq,
                TokenKind::Ident("d".into()),
                TokenKind::GtEq,
                TokenKind::Ident("e".into()),
                TokenKind::AmpAmp,
                TokenKind::Ident("f".into()),
                TokenKind::PipePipe,
                TokenKind::Bang,
                TokenKind::Ident("g".into()),
                TokenKind::FatArrow,
                TokenKind::Ident("i".into()),
                TokenKind::PlusPlus,
                TokenKind::Ident("j".into()),
                TokenKind::MinusMinus,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = lex("// leading\nx /* inline */ = 1; /* tail */");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Eq,
                TokenKind::Number(1.0),
                TokenKind::Semicolon,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(lex("3.25")[0], TokenKind::Number(3.25));
        assert_eq!(lex(".5")[0], TokenKind::Number(0.5));
        assert_eq!(lex("1e3")[0], TokenKind::Number(1000.0));
        assert_eq!(lex("1_000")[0], TokenKind::Number(1000.0));
    }

    #[test]
    fn test_member_access_after_number_is_not_fraction() {
        let tokens = lex("arr.length");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Ident("arr".into()),
                TokenKind::Dot,
                TokenKind::Ident("length".into()),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_strings_and_templates() {
        assert_eq!(lex("'it\\'s'")[0], TokenKind::Str("it's".into()));
        assert_eq!(lex("\"a\\nb\"")[0], TokenKind::Str("a\nb".into()));
        assert_eq!(lex("`x ${y}`")[0], TokenKind::Template("x ${y}".into()));
    }

    #[test]
    fn test_keywords() {
        let tokens = lex("const var function for while do of in");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Const,
                TokenKind::Var,
                TokenKind::Function,
                TokenKind::For,
                TokenKind::While,
                TokenKind::Do,
                TokenKind::Ident("of".into()),
                TokenKind::In,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let mut lexer = Lexer::new("let a\n  = 1");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.col, 3);
    }

    #[test]
    fn test_unterminated_string_errors() {
        let err = Lexer::new("'abc").tokenize().unwrap_err();
        assert!(matches!(err, SyntaxError::Lex { .. }));
        assert!(err.to_string().contains("unterminated string"));
    }

    #[test]
    fn test_unexpected_character_errors() {
        let err = Lexer::new("let # = 1").tokenize().unwrap_err();
        assert_eq!(err.span().col, 5);
    }
}
