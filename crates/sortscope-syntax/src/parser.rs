use crate::ast::*;
use crate::error::SyntaxError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

// ═══════════════════════════════════════════════════════════════
//  Parser
// ═══════════════════════════════════════════════════════════════

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let start_span = self.current_span();
        let mut body = Vec::new();
        while !self.check(&TokenKind::EOF) {
            body.push(self.parse_stmt()?);
        }
        let end_span = self.current_span();
        Ok(Program {
            body,
            span: start_span.to(end_span),
        })
    }

    // ── Statements ───────────────────────────────────────────

    fn parse_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.current_span();
        let kind = match self.peek_kind() {
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                let decl = self.parse_var_decl()?;
                self.eat_semicolon();
                StmtKind::VarDecl(decl)
            }
            TokenKind::Function => StmtKind::Function(self.parse_function(false)?),
            TokenKind::If => self.parse_if_stmt()?,
            TokenKind::For => StmtKind::Loop(self.parse_for_stmt()?),
            TokenKind::While => StmtKind::Loop(self.parse_while_stmt()?),
            TokenKind::Do => StmtKind::Loop(self.parse_do_while_stmt()?),
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            TokenKind::Return => {
                self.advance();
                let value = if self.at_stmt_end() {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.eat_semicolon();
                StmtKind::Return(value)
            }
            TokenKind::Break => {
                self.advance();
                self.eat_semicolon();
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance();
                self.eat_semicolon();
                StmtKind::Continue
            }
            TokenKind::Semicolon => {
                self.advance();
                StmtKind::Empty
            }
            _ => {
                let expr = self.parse_expr()?;
                self.eat_semicolon();
                StmtKind::Expr(expr)
            }
        };
        Ok(Stmt {
            kind,
            span: start.to(self.prev_span()),
        })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::EOF) {
                return Err(self.error("expected '}', found end of input"));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_decl_kind(&mut self) -> Result<DeclKind, SyntaxError> {
        let kind = match self.peek_kind() {
            TokenKind::Let => DeclKind::Let,
            TokenKind::Const => DeclKind::Const,
            TokenKind::Var => DeclKind::Var,
            other => {
                return Err(self.error(&format!("expected declaration, found '{}'", other)));
            }
        };
        self.advance();
        Ok(kind)
    }

    fn parse_var_decl(&mut self) -> Result<VarDecl, SyntaxError> {
        let start = self.current_span();
        let kind = self.parse_decl_kind()?;
        let first = self.expect_ident()?;
        self.parse_declarators(kind, first, start)
    }

    /// Parses the declarator list once the kind and the first name are known.
    fn parse_declarators(
        &mut self,
        kind: DeclKind,
        first: (String, Span),
        start: Span,
    ) -> Result<VarDecl, SyntaxError> {
        let mut declarators = vec![self.parse_declarator_init(first)?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            let next = self.expect_ident()?;
            declarators.push(self.parse_declarator_init(next)?);
        }
        Ok(VarDecl {
            kind,
            declarators,
            span: start.to(self.prev_span()),
        })
    }

    fn parse_declarator_init(
        &mut self,
        (name, name_span): (String, Span),
    ) -> Result<Declarator, SyntaxError> {
        let init = if self.check(&TokenKind::Eq) {
            self.advance();
            Some(self.parse_assignment()?)
        } else {
            None
        };
        Ok(Declarator {
            name,
            init,
            span: name_span.to(self.prev_span()),
        })
    }

    fn parse_function(&mut self, is_expr: bool) -> Result<Function, SyntaxError> {
        let start = self.current_span();
        self.expect(&TokenKind::Function)?;
        let name = if matches!(self.peek_kind(), TokenKind::Ident(_)) {
            Some(self.expect_ident()?.0)
        } else if is_expr {
            None
        } else {
            return Err(self.error("expected function name"));
        };
        let params = self.parse_params()?;
        let body = FunctionBody::Block(self.parse_block()?);
        Ok(Function {
            name,
            params,
            body,
            is_arrow: false,
            span: start.to(self.prev_span()),
        })
    }

    fn parse_params(&mut self) -> Result<Vec<String>, SyntaxError> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            params.push(self.expect_ident()?.0);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_if_stmt(&mut self) -> Result<StmtKind, SyntaxError> {
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let consequent = Box::new(self.parse_stmt()?);
        let alternate = if self.check(&TokenKind::Else) {
            self.advance();
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(StmtKind::If {
            test,
            consequent,
            alternate,
        })
    }

    fn parse_for_stmt(&mut self) -> Result<Loop, SyntaxError> {
        let start = self.current_span();
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LParen)?;

        let init = match self.peek_kind() {
            TokenKind::Semicolon => None,
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                let decl_start = self.current_span();
                let kind = self.parse_decl_kind()?;
                let first = self.expect_ident()?;
                if let Some(of) = self.for_each_keyword() {
                    return self.finish_for_each(start, Some(kind), first.0, of);
                }
                Some(ForInit::VarDecl(self.parse_declarators(
                    kind, first, decl_start,
                )?))
            }
            TokenKind::Ident(name) if self.for_each_keyword_at(self.pos + 1).is_some() => {
                self.advance();
                let of = self.for_each_keyword().unwrap_or(true);
                return self.finish_for_each(start, None, name, of);
            }
            _ => Some(ForInit::Expr(self.parse_expr()?)),
        };
        self.expect(&TokenKind::Semicolon)?;

        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::RParen)?;

        let body = Box::new(self.parse_stmt()?);
        Ok(Loop {
            kind: LoopKind::For { init, test, update },
            body,
            span: start.to(self.prev_span()),
        })
    }

    /// `of` (true) or `in` (false) at the current position.
    fn for_each_keyword(&self) -> Option<bool> {
        self.for_each_keyword_at(self.pos)
    }

    fn for_each_keyword_at(&self, pos: usize) -> Option<bool> {
        match self.peek_kind_at(pos) {
            TokenKind::Ident(word) if word == "of" => Some(true),
            TokenKind::In => Some(false),
            _ => None,
        }
    }

    fn finish_for_each(
        &mut self,
        start: Span,
        decl: Option<DeclKind>,
        binding: String,
        of: bool,
    ) -> Result<Loop, SyntaxError> {
        self.advance(); // `of` / `in`
        let iterable = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Loop {
            kind: LoopKind::ForEach {
                decl,
                binding,
                iterable,
                of,
            },
            body,
            span: start.to(self.prev_span()),
        })
    }

    fn parse_while_stmt(&mut self) -> Result<Loop, SyntaxError> {
        let start = self.current_span();
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Loop {
            kind: LoopKind::While { test },
            body,
            span: start.to(self.prev_span()),
        })
    }

    fn parse_do_while_stmt(&mut self) -> Result<Loop, SyntaxError> {
        let start = self.current_span();
        self.expect(&TokenKind::Do)?;
        let body = Box::new(self.parse_stmt()?);
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        self.eat_semicolon();
        Ok(Loop {
            kind: LoopKind::DoWhile { test },
            body,
            span: start.to(self.prev_span()),
        })
    }

    // ── Expressions ──────────────────────────────────────────

    pub fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_assignment()
    }

    /// Assignment is right-associative and binds loosest.
    fn parse_assignment(&mut self) -> Result<Expr, SyntaxError> {
        if self.is_arrow_ahead() {
            return self.parse_arrow();
        }

        let target = self.parse_conditional()?;

        let Some(op) = self.try_assign_op() else {
            return Ok(target);
        };
        if !is_assign_target(&target) {
            return Err(self.error(&format!("invalid assignment target '{}'", target)));
        }
        self.advance();
        let value = self.parse_assignment()?;
        let span = target.span.to(value.span);
        Ok(Expr {
            kind: ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        })
    }

    fn parse_conditional(&mut self) -> Result<Expr, SyntaxError> {
        let test = self.parse_expr_bp(0)?;
        if !self.check(&TokenKind::Question) {
            return Ok(test);
        }
        self.advance();
        let consequent = self.parse_assignment()?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;
        let span = test.span.to(alternate.span);
        Ok(Expr {
            kind: ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        })
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_unary()?;

        while let Some(op) = self.try_binop() {
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(r_bp)?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr {
                kind: ExprKind::Binary(Box::new(lhs), op, Box::new(rhs)),
                span,
            };
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.current_span();

        let unary = match self.peek_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            _ => None,
        };
        if let Some(op) = unary {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.to(operand.span);
            return Ok(Expr {
                kind: ExprKind::Unary(op, Box::new(operand)),
                span,
            });
        }

        let update = match self.peek_kind() {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(op) = update {
            self.advance();
            let target = self.parse_unary()?;
            let span = start.to(target.span);
            return Ok(Expr {
                kind: ExprKind::Update {
                    op,
                    prefix: true,
                    target: Box::new(target),
                },
                span,
            });
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&TokenKind::LParen) {
                self.advance();
                let args = self.parse_expr_list(&TokenKind::RParen)?;
                let span = expr.span.to(self.prev_span());
                expr = Expr {
                    kind: ExprKind::Call(Box::new(expr), args),
                    span,
                };
            } else if self.check(&TokenKind::Dot) {
                self.advance();
                let (property, _) = self.expect_property_name()?;
                let span = expr.span.to(self.prev_span());
                expr = Expr {
                    kind: ExprKind::Member(Box::new(expr), property),
                    span,
                };
            } else if self.check(&TokenKind::LBracket) {
                self.advance();
                let index = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                let span = expr.span.to(self.prev_span());
                expr = Expr {
                    kind: ExprKind::Index(Box::new(expr), Box::new(index)),
                    span,
                };
            } else if self.check(&TokenKind::PlusPlus) || self.check(&TokenKind::MinusMinus) {
                let op = if self.check(&TokenKind::PlusPlus) {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                let span = expr.span.to(self.advance().span);
                expr = Expr {
                    kind: ExprKind::Update {
                        op,
                        prefix: false,
                        target: Box::new(expr),
                    },
                    span,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.current_span();

        let kind = match self.peek_kind() {
            TokenKind::Number(n) => {
                self.advance();
                ExprKind::Number(n)
            }
            TokenKind::Str(s) => {
                self.advance();
                ExprKind::Str(s)
            }
            TokenKind::Template(s) => {
                self.advance();
                ExprKind::Template(s)
            }
            TokenKind::True => {
                self.advance();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Bool(false)
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Null
            }
            TokenKind::Ident(name) => {
                self.advance();
                ExprKind::Ident(name)
            }
            TokenKind::LBracket => {
                self.advance();
                ExprKind::Array(self.parse_expr_list(&TokenKind::RBracket)?)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                // Parentheses only group; keep the inner node with the wider span
                return Ok(Expr {
                    kind: inner.kind,
                    span: start.to(self.prev_span()),
                });
            }
            TokenKind::Function => ExprKind::Function(Box::new(self.parse_function(true)?)),
            other => {
                return Err(self.error(&format!("expected expression, found '{}'", other)));
            }
        };

        Ok(Expr {
            kind,
            span: start.to(self.prev_span()),
        })
    }

    /// Comma-separated expressions up to `close`, which is consumed.
    /// A trailing comma is allowed.
    fn parse_expr_list(&mut self, close: &TokenKind) -> Result<Vec<Expr>, SyntaxError> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(self.parse_assignment()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(close)?;
        Ok(items)
    }

    // ── Arrow functions ──────────────────────────────────────

    /// `ident =>` or `( ... ) =>` at the current position.
    fn is_arrow_ahead(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Ident(_) => self.peek_kind_at(self.pos + 1) == TokenKind::FatArrow,
            TokenKind::LParen => {
                let mut depth = 0usize;
                let mut i = self.pos;
                loop {
                    match self.peek_kind_at(i) {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => {
                            depth -= 1;
                            if depth == 0 {
                                return self.peek_kind_at(i + 1) == TokenKind::FatArrow;
                            }
                        }
                        TokenKind::EOF => return false,
                        _ => {}
                    }
                    i += 1;
                }
            }
            _ => false,
        }
    }

    fn parse_arrow(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.current_span();
        let params = if self.check(&TokenKind::LParen) {
            self.parse_params()?
        } else {
            vec![self.expect_ident()?.0]
        };
        self.expect(&TokenKind::FatArrow)?;
        let body = if self.check(&TokenKind::LBrace) {
            FunctionBody::Block(self.parse_block()?)
        } else {
            FunctionBody::Expr(Box::new(self.parse_assignment()?))
        };
        let span = start.to(self.prev_span());
        Ok(Expr {
            kind: ExprKind::Function(Box::new(Function {
                name: None,
                params,
                body,
                is_arrow: true,
                span,
            })),
            span,
        })
    }

    // ── Operator lookup ──────────────────────────────────────

    fn try_assign_op(&self) -> Option<AssignOp> {
        match self.peek_kind() {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::Add),
            TokenKind::MinusEq => Some(AssignOp::Sub),
            TokenKind::StarEq => Some(AssignOp::Mul),
            TokenKind::SlashEq => Some(AssignOp::Div),
            TokenKind::PercentEq => Some(AssignOp::Mod),
            _ => None,
        }
    }

    fn try_binop(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::Percent => Some(BinOp::Mod),
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::EqEqEq => Some(BinOp::StrictEq),
            TokenKind::NotEq => Some(BinOp::NotEq),
            TokenKind::NotEqEq => Some(BinOp::StrictNotEq),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::LtEq => Some(BinOp::LtEq),
            TokenKind::GtEq => Some(BinOp::GtEq),
            TokenKind::AmpAmp => Some(BinOp::And),
            TokenKind::PipePipe => Some(BinOp::Or),
            _ => None,
        }
    }

    // ── Token utilities ──────────────────────────────────────

    fn peek_kind_at(&self, pos: usize) -> TokenKind {
        self.tokens
            .get(pos)
            .map(|t| t.kind.clone())
            .unwrap_or(TokenKind::EOF)
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek_kind_at(self.pos)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| t.span)
            .unwrap_or_default()
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::default()
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek_kind()) == std::mem::discriminant(kind)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if !tok.kind.is_eof() {
            self.pos += 1;
        }
        tok
    }

    fn eat_semicolon(&mut self) {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn at_stmt_end(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::EOF
        )
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(&format!(
                "expected '{}', found '{}'",
                kind,
                self.peek_kind()
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), SyntaxError> {
        match self.peek_kind() {
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                Ok((name, span))
            }
            other => Err(self.error(&format!("expected identifier, found '{}'", other))),
        }
    }

    /// Property names after `.` may be reserved words (`a.for`, `x.in`).
    fn expect_property_name(&mut self) -> Result<(String, Span), SyntaxError> {
        let kind = self.peek_kind();
        match kind {
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                Ok((name, span))
            }
            TokenKind::Let
            | TokenKind::Const
            | TokenKind::Var
            | TokenKind::Function
            | TokenKind::Return
            | TokenKind::If
            | TokenKind::Else
            | TokenKind::For
            | TokenKind::While
            | TokenKind::Do
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::In
            | TokenKind::Typeof
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => {
                let span = self.advance().span;
                Ok((kind.to_string(), span))
            }
            other => Err(self.error(&format!("expected property name, found '{}'", other))),
        }
    }

    fn error(&self, msg: &str) -> SyntaxError {
        SyntaxError::Parse {
            message: msg.to_string(),
            span: self.current_span(),
        }
    }
}

fn is_assign_target(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Ident(_) | ExprKind::Member(..) | ExprKind::Index(..) => true,
        ExprKind::Array(items) => items.iter().all(is_assign_target),
        _ => false,
    }
}

// ── Operator binding power (precedence) ──────────────────────

/// Returns (left_bp, right_bp). Higher = tighter binding.
/// Left < Right gives left-associativity.
fn infix_binding_power(op: BinOp) -> (u8, u8) {
    let p = op.precedence() * 2;
    (p - 1, p)
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(input: &str) -> Program {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        parser.parse_program().unwrap()
    }

    fn parse_err(input: &str) -> SyntaxError {
        let tokens = Lexer::new(input).tokenize().unwrap();
        Parser::new(tokens).parse_program().unwrap_err()
    }

    fn expr_of(stmt: &Stmt) -> &Expr {
        match &stmt.kind {
            StmtKind::Expr(e) => e,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_program() {
        assert!(parse("").body.is_empty());
        assert!(parse("// only a comment").body.is_empty());
    }

    #[test]
    fn test_array_declaration() {
        let prog = parse("let arr = [5, 3, -1];");
        let StmtKind::VarDecl(decl) = &prog.body[0].kind else {
            panic!("expected declaration");
        };
        assert_eq!(decl.kind, DeclKind::Let);
        assert_eq!(decl.declarators[0].name, "arr");
        let init = decl.declarators[0].init.as_ref().unwrap();
        let ExprKind::Array(items) = &init.kind else {
            panic!("expected array literal");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_number(), Some(-1.0));
    }

    #[test]
    fn test_multiple_declarators() {
        let prog = parse("var a = 1, b, c = [2]");
        let StmtKind::VarDecl(decl) = &prog.body[0].kind else {
            panic!("expected declaration");
        };
        let names: Vec<_> = decl.declarators.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(decl.declarators[1].init.is_none());
    }

    #[test]
    fn test_destructuring_swap() {
        let prog = parse("[arr[0], arr[1]] = [arr[1], arr[0]];");
        let expr = expr_of(&prog.body[0]);
        let ExprKind::Assign { op, target, value } = &expr.kind else {
            panic!("expected assignment");
        };
        assert_eq!(*op, AssignOp::Assign);
        assert_eq!(target.to_string(), "[arr[0], arr[1]]");
        assert_eq!(value.to_string(), "[arr[1], arr[0]]");
    }

    #[test]
    fn test_precedence_and_printing() {
        let prog = parse("x = arr.length - i - 1; y = (a + b) * c; z = a - (b - c);");
        assert_eq!(expr_of(&prog.body[0]).to_string(), "x = arr.length - i - 1");
        assert_eq!(expr_of(&prog.body[1]).to_string(), "y = (a + b) * c");
        assert_eq!(expr_of(&prog.body[2]).to_string(), "z = a - (b - c)");
    }

    #[test]
    fn test_comparison_binds_looser_than_arithmetic() {
        let prog = parse("arr[j] > arr[j + 1] && ok");
        let ExprKind::Binary(lhs, BinOp::And, _) = &expr_of(&prog.body[0]).kind else {
            panic!("expected &&");
        };
        let ExprKind::Binary(_, op, rhs) = &lhs.kind else {
            panic!("expected comparison");
        };
        assert_eq!(*op, BinOp::Gt);
        assert_eq!(rhs.to_string(), "arr[j + 1]");
    }

    #[test]
    fn test_classic_for_loop() {
        let prog = parse("for (let i = 0; i < arr.length - 1; i++) { sum += arr[i]; }");
        let StmtKind::Loop(lp) = &prog.body[0].kind else {
            panic!("expected loop");
        };
        let LoopKind::For { init, test, update } = &lp.kind else {
            panic!("expected for loop");
        };
        assert!(matches!(init, Some(ForInit::VarDecl(_))));
        assert_eq!(test.as_ref().unwrap().to_string(), "i < arr.length - 1");
        assert_eq!(update.as_ref().unwrap().to_string(), "i++");
        assert_eq!(lp.body.as_block().len(), 1);
    }

    #[test]
    fn test_for_of_and_for_in() {
        let prog = parse("for (const x of arr) {} for (k in obj) ;");
        let StmtKind::Loop(first) = &prog.body[0].kind else {
            panic!("expected loop");
        };
        assert!(matches!(
            &first.kind,
            LoopKind::ForEach { binding, of: true, decl: Some(DeclKind::Const), .. } if binding == "x"
        ));
        let StmtKind::Loop(second) = &prog.body[1].kind else {
            panic!("expected loop");
        };
        assert!(matches!(
            &second.kind,
            LoopKind::ForEach { of: false, decl: None, .. }
        ));
    }

    #[test]
    fn test_while_and_do_while() {
        let prog = parse("while (j > 0) j--; do { i++ } while (i < 3);");
        assert!(matches!(
            &prog.body[0].kind,
            StmtKind::Loop(Loop { kind: LoopKind::While { .. }, .. })
        ));
        assert!(matches!(
            &prog.body[1].kind,
            StmtKind::Loop(Loop { kind: LoopKind::DoWhile { .. }, .. })
        ));
    }

    #[test]
    fn test_if_else_chain() {
        let prog = parse("if (a < b) { x = 1 } else if (a > b) x = 2; else { x = 3 }");
        let StmtKind::If { alternate, .. } = &prog.body[0].kind else {
            panic!("expected if");
        };
        let nested = alternate.as_ref().unwrap();
        assert!(matches!(nested.kind, StmtKind::If { alternate: Some(_), .. }));
    }

    #[test]
    fn test_function_declaration_and_arrows() {
        let prog = parse(
            "function sort(a, n) { return a; }
             const swap = (a, i, j) => { [a[i], a[j]] = [a[j], a[i]]; };
             const double = x => x * 2;",
        );
        let StmtKind::Function(func) = &prog.body[0].kind else {
            panic!("expected function");
        };
        assert_eq!(func.name.as_deref(), Some("sort"));
        assert_eq!(func.params, vec!["a", "n"]);

        let StmtKind::VarDecl(decl) = &prog.body[1].kind else {
            panic!("expected declaration");
        };
        let init = decl.declarators[0].init.as_ref().unwrap();
        let ExprKind::Function(arrow) = &init.kind else {
            panic!("expected arrow");
        };
        assert!(arrow.is_arrow);
        assert_eq!(arrow.params.len(), 3);

        let StmtKind::VarDecl(decl) = &prog.body[2].kind else {
            panic!("expected declaration");
        };
        let init = decl.declarators[0].init.as_ref().unwrap();
        assert!(matches!(&init.kind, ExprKind::Function(f) if matches!(f.body, FunctionBody::Expr(_))));
    }

    #[test]
    fn test_calls_members_and_templates() {
        let prog = parse("console.log(`sorted: ${arr}`, arr.slice(0, 2))");
        let ExprKind::Call(callee, args) = &expr_of(&prog.body[0]).kind else {
            panic!("expected call");
        };
        assert_eq!(callee.to_string(), "console.log");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_conditional_expression() {
        let prog = parse("m = a < b ? a : b");
        assert_eq!(expr_of(&prog.body[0]).to_string(), "m = a < b ? a : b");
    }

    #[test]
    fn test_parenthesized_expression_is_not_arrow() {
        let prog = parse("(a + b) * 2");
        assert_eq!(expr_of(&prog.body[0]).to_string(), "(a + b) * 2");
    }

    #[test]
    fn test_missing_paren_is_parse_error() {
        let err = parse_err("if (a < b { }");
        assert!(matches!(err, SyntaxError::Parse { .. }));
        assert!(err.to_string().contains("expected ')'"));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse_err("1 = 2");
        assert!(err.to_string().contains("invalid assignment target"));
    }

    #[test]
    fn test_unclosed_block_errors() {
        let err = parse_err("for (;;) {");
        assert!(err.to_string().contains("end of input"));
    }
}
