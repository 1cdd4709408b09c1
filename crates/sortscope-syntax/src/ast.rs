//! Abstract syntax tree for the accepted JavaScript subset.
//!
//! Every node carries a [`Span`]. Expressions print back to canonical
//! source text through [`fmt::Display`]; two expressions that print the
//! same are the same expression as far as pattern matching is concerned.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

// ═══════════════════════════════════════════════════════════════
//  Program and statements
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StmtKind {
    VarDecl(VarDecl),
    Function(Function),
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    Loop(Loop),
    Block(Vec<Stmt>),
    Return(Option<Expr>),
    Break,
    Continue,
    Empty,
    Expr(Expr),
}

impl Stmt {
    /// The statements a block stands for: its children for a block, the
    /// statement itself otherwise (a braceless `if`/loop body).
    pub fn as_block(&self) -> &[Stmt] {
        match &self.kind {
            StmtKind::Block(stmts) => stmts,
            _ => std::slice::from_ref(self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    Let,
    Const,
    Var,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub kind: DeclKind,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Function declaration, function expression, or arrow function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: FunctionBody,
    pub is_arrow: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// Arrow function with an expression body.
    Expr(Box<Expr>),
}

// ═══════════════════════════════════════════════════════════════
//  Loops
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loop {
    pub kind: LoopKind,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoopKind {
    /// `for (init; test; update)`
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
    },
    /// `for (x of xs)` when `of` is true, `for (x in xs)` otherwise.
    ForEach {
        decl: Option<DeclKind>,
        binding: String,
        iterable: Expr,
        of: bool,
    },
    While {
        test: Expr,
    },
    DoWhile {
        test: Expr,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ForInit {
    VarDecl(VarDecl),
    Expr(Expr),
}

impl Loop {
    /// The loop's continuation condition, if it has one.
    pub fn test(&self) -> Option<&Expr> {
        match &self.kind {
            LoopKind::For { test, .. } => test.as_ref(),
            LoopKind::While { test } | LoopKind::DoWhile { test } => Some(test),
            LoopKind::ForEach { .. } => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Expressions
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExprKind {
    Number(f64),
    Str(String),
    Template(String),
    Bool(bool),
    Null,
    Ident(String),
    Array(Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Expr>,
    },
    Binary(Box<Expr>, BinOp, Box<Expr>),
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Call(Box<Expr>, Vec<Expr>),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Function(Box<Function>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    Typeof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    StrictEq,
    NotEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::StrictEq => "===",
            BinOp::NotEq => "!=",
            BinOp::StrictNotEq => "!==",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    /// Relational or equality operator.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq
                | BinOp::StrictEq
                | BinOp::NotEq
                | BinOp::StrictNotEq
                | BinOp::Lt
                | BinOp::Gt
                | BinOp::LtEq
                | BinOp::GtEq
        )
    }

    /// Precedence level, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::StrictEq | BinOp::NotEq | BinOp::StrictNotEq => 3,
            BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => 4,
            BinOp::Add | BinOp::Sub => 5,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
        }
    }
}

impl Expr {
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Numeric value of a number literal, including a negated one (`-3`).
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            ExprKind::Unary(UnaryOp::Neg, inner) => match &inner.kind {
                ExprKind::Number(n) => Some(-*n),
                _ => None,
            },
            ExprKind::Unary(UnaryOp::Plus, inner) => match &inner.kind {
                ExprKind::Number(n) => Some(*n),
                _ => None,
            },
            _ => None,
        }
    }

    /// `object[index]` parts of an index expression.
    pub fn as_index(&self) -> Option<(&Expr, &Expr)> {
        match &self.kind {
            ExprKind::Index(object, index) => Some((object, index)),
            _ => None,
        }
    }

    /// True if identifier `name` occurs anywhere in this expression.
    pub fn mentions(&self, name: &str) -> bool {
        match &self.kind {
            ExprKind::Ident(id) => id == name,
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Template(_)
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::Function(_) => false,
            ExprKind::Array(items) => items.iter().any(|e| e.mentions(name)),
            ExprKind::Unary(_, inner) => inner.mentions(name),
            ExprKind::Update { target, .. } => target.mentions(name),
            ExprKind::Binary(lhs, _, rhs) => lhs.mentions(name) || rhs.mentions(name),
            ExprKind::Assign { target, value, .. } => {
                target.mentions(name) || value.mentions(name)
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => test.mentions(name) || consequent.mentions(name) || alternate.mentions(name),
            ExprKind::Call(callee, args) => {
                callee.mentions(name) || args.iter().any(|a| a.mentions(name))
            }
            ExprKind::Member(object, _) => object.mentions(name),
            ExprKind::Index(object, index) => object.mentions(name) || index.mentions(name),
        }
    }

    /// Binding strength used when printing; atoms bind tightest.
    fn print_precedence(&self) -> u8 {
        match &self.kind {
            ExprKind::Assign { .. } | ExprKind::Function(_) => 0,
            ExprKind::Conditional { .. } => 0,
            ExprKind::Binary(_, op, _) => op.precedence(),
            ExprKind::Unary(..) | ExprKind::Update { prefix: true, .. } => 7,
            _ => 8,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Printing
// ═══════════════════════════════════════════════════════════════

struct Operand<'a>(&'a Expr, u8);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.print_precedence() < self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write_number(f, *n),
            ExprKind::Str(s) => write!(f, "{:?}", s),
            ExprKind::Template(s) => write!(f, "`{}`", s),
            ExprKind::Bool(b) => write!(f, "{}", b),
            ExprKind::Null => f.write_str("null"),
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            ExprKind::Unary(op, inner) => {
                let symbol = match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Plus => "+",
                    UnaryOp::Not => "!",
                    UnaryOp::Typeof => "typeof ",
                };
                write!(f, "{}{}", symbol, Operand(inner, 7))
            }
            ExprKind::Update { op, prefix, target } => {
                let symbol = match op {
                    UpdateOp::Increment => "++",
                    UpdateOp::Decrement => "--",
                };
                if *prefix {
                    write!(f, "{}{}", symbol, Operand(target, 8))
                } else {
                    write!(f, "{}{}", Operand(target, 8), symbol)
                }
            }
            ExprKind::Binary(lhs, op, rhs) => {
                let prec = op.precedence();
                // Left-associative: a right operand of equal precedence needs parens
                write!(
                    f,
                    "{} {} {}",
                    Operand(lhs, prec),
                    op.symbol(),
                    Operand(rhs, prec + 1)
                )
            }
            ExprKind::Assign { op, target, value } => {
                write!(f, "{} {} {}", target, op.symbol(), value)
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => write!(
                f,
                "{} ? {} : {}",
                Operand(test, 1),
                consequent,
                alternate
            ),
            ExprKind::Call(callee, args) => {
                write!(f, "{}(", Operand(callee, 8))?;
                write_list(f, args)?;
                f.write_str(")")
            }
            ExprKind::Member(object, property) => {
                write!(f, "{}.{}", Operand(object, 8), property)
            }
            ExprKind::Index(object, index) => {
                write!(f, "{}[{}]", Operand(object, 8), index)
            }
            ExprKind::Function(func) => {
                if func.is_arrow {
                    write!(f, "({}) => {{...}}", func.params.join(", "))
                } else {
                    write!(
                        f,
                        "function {}({}) {{...}}",
                        func.name.as_deref().unwrap_or(""),
                        func.params.join(", ")
                    )
                }
            }
        }
    }
}
