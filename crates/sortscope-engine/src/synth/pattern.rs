//! Classifiers for the fixed set of array-affecting shapes.
//!
//! Everything is relative to the discovered array identifier. A node either
//! matches one of the shapes below or is [`Pattern::Unrecognized`]; the
//! classifier never evaluates general expressions.
//!
//! | shape        | example                                  |
//! |--------------|------------------------------------------|
//! | access       | `arr[j]`                                 |
//! | swap         | `[arr[0], arr[1]] = [arr[1], arr[0]]`    |
//! | set          | `arr[2] = 7`                             |
//! | comparison   | `arr[j] > arr[j + 1]`                    |
//!
//! Extraction failures inside a matched shape are local: they are logged
//! and the node becomes `Unrecognized`.

use sortscope_core::CmpOp;
use sortscope_syntax::ast::{AssignOp, Expr, ExprKind, Stmt, StmtKind};
use tracing::debug;

use crate::config::IndexPolicy;
use crate::synth::discovery::literal_to_int;

/// Result of classifying one expression or statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// `name[index]`; `index` is `None` when not a numeric literal.
    Access { index: Option<usize> },
    Swap { indices: [usize; 2] },
    Set { index: usize, value: i64 },
    Comparison { op: CmpOp, indices: [usize; 2] },
    Unrecognized,
}

/// Why a node that looked like a known shape could not be turned into one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub(crate) enum ExtractionError {
    #[error("index '{0}' is not a non-negative integer literal")]
    NonLiteralIndex(String),

    #[error("'{0}' is not an access on the tracked array")]
    NotArrayAccess(String),

    #[error("destructuring has {found} elements, expected 2")]
    Arity { found: usize },

    #[error("right side '{0}' is not the reversed left side")]
    NotReversed(String),

    #[error("assigned value '{0}' is not a numeric literal")]
    NonLiteralValue(String),

    #[error("no shape matches")]
    NoMatch,
}

/// Classifiers bound to one array name and index policy.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    name: &'a str,
    policy: IndexPolicy,
}

impl<'a> Classifier<'a> {
    pub fn new(name: &'a str, policy: IndexPolicy) -> Self {
        Classifier { name, policy }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// True iff `expr` indexes the tracked array.
    pub fn is_array_access(&self, expr: &Expr) -> bool {
        self.access_index_expr(expr).is_some()
    }

    /// True iff `expr` is a relational or equality expression with an access
    /// on the tracked array on at least one side.
    pub fn is_comparison(&self, expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::Binary(lhs, op, rhs) => {
                op.is_comparison() && (self.is_array_access(lhs) || self.is_array_access(rhs))
            }
            _ => false,
        }
    }

    /// Classifies a statement. Only expression statements can match.
    pub fn classify_stmt(&self, stmt: &Stmt) -> Pattern {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.classify(expr),
            _ => Pattern::Unrecognized,
        }
    }

    /// Classifies an expression.
    pub fn classify(&self, expr: &Expr) -> Pattern {
        match self.extract(expr) {
            Ok(pattern) => pattern,
            Err(ExtractionError::NoMatch) => Pattern::Unrecognized,
            Err(err) => {
                debug!(expr = %expr, %err, "unrecognized pattern");
                Pattern::Unrecognized
            }
        }
    }

    fn extract(&self, expr: &Expr) -> Result<Pattern, ExtractionError> {
        match &expr.kind {
            ExprKind::Index(..) if self.is_array_access(expr) => Ok(Pattern::Access {
                index: self.literal_index(expr).ok(),
            }),
            ExprKind::Assign {
                op: AssignOp::Assign,
                target,
                value,
            } => match &target.kind {
                ExprKind::Array(_) if self.is_swap_shape(expr) => self.extract_swap(target, value),
                ExprKind::Index(..) if self.is_array_access(target) => {
                    self.extract_set(target, value)
                }
                _ => Err(ExtractionError::NoMatch),
            },
            ExprKind::Binary(lhs, op, rhs) if self.is_comparison(expr) => {
                let op = CmpOp::from_symbol(op.symbol()).ok_or(ExtractionError::NoMatch)?;
                let left = self.comparison_index(lhs, 0)?;
                let right = self.comparison_index(rhs, 1)?;
                Ok(Pattern::Comparison {
                    op,
                    indices: [left, right],
                })
            }
            _ => Err(ExtractionError::NoMatch),
        }
    }

    fn extract_swap(&self, target: &Expr, value: &Expr) -> Result<Pattern, ExtractionError> {
        let (ExprKind::Array(lhs), ExprKind::Array(rhs)) = (&target.kind, &value.kind) else {
            return Err(ExtractionError::NoMatch);
        };
        if lhs.len() != 2 {
            return Err(ExtractionError::Arity { found: lhs.len() });
        }
        if rhs.len() != 2 {
            return Err(ExtractionError::Arity { found: rhs.len() });
        }
        let a = self.literal_index(&lhs[0])?;
        let b = self.literal_index(&lhs[1])?;
        if !same_expr(&rhs[0], &lhs[1]) || !same_expr(&rhs[1], &lhs[0]) {
            return Err(ExtractionError::NotReversed(value.to_string()));
        }
        Ok(Pattern::Swap { indices: [a, b] })
    }

    fn extract_set(&self, target: &Expr, value: &Expr) -> Result<Pattern, ExtractionError> {
        let index = self.literal_index(target)?;
        let value = value
            .as_number()
            .map(literal_to_int)
            .ok_or_else(|| ExtractionError::NonLiteralValue(value.to_string()))?;
        Ok(Pattern::Set { index, value })
    }

    /// Index of one comparison operand. `placeholder` is used for operands
    /// whose index cannot be read as a literal, unless the policy is strict.
    fn comparison_index(&self, operand: &Expr, placeholder: usize) -> Result<usize, ExtractionError> {
        match self.literal_index(operand) {
            Ok(index) => Ok(index),
            Err(err) => match self.policy {
                IndexPolicy::Placeholder => Ok(placeholder),
                IndexPolicy::Strict => Err(err),
            },
        }
    }

    /// The literal index of `name[<literal>]`.
    fn literal_index(&self, expr: &Expr) -> Result<usize, ExtractionError> {
        let index = self
            .access_index_expr(expr)
            .ok_or_else(|| ExtractionError::NotArrayAccess(expr.to_string()))?;
        match index.as_number() {
            Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(n as usize),
            _ => Err(ExtractionError::NonLiteralIndex(index.to_string())),
        }
    }

    fn access_index_expr<'e>(&self, expr: &'e Expr) -> Option<&'e Expr> {
        let (object, index) = expr.as_index()?;
        (object.as_ident() == Some(self.name)).then_some(index)
    }

    /// A two-element destructuring exchange on the tracked array, with any
    /// index expressions: `[arr[j], arr[k]] = [arr[k], arr[j]]`.
    pub fn is_swap_shape(&self, expr: &Expr) -> bool {
        let ExprKind::Assign {
            op: AssignOp::Assign,
            target,
            value,
        } = &expr.kind
        else {
            return false;
        };
        let (ExprKind::Array(lhs), ExprKind::Array(rhs)) = (&target.kind, &value.kind) else {
            return false;
        };
        lhs.len() == 2
            && rhs.len() == 2
            && lhs.iter().all(|e| self.is_array_access(e))
            && same_expr(&rhs[0], &lhs[1])
            && same_expr(&rhs[1], &lhs[0])
    }

    /// True if `stmts` holds an exchange of two elements of the tracked
    /// array: either a destructuring swap, or the three-statement form
    /// `t = arr[x]; arr[x] = arr[y]; arr[y] = t`.
    pub fn contains_swap(&self, stmts: &[Stmt]) -> bool {
        (0..stmts.len()).any(|i| self.swap_at(stmts, i))
    }

    /// True if an exchange starts at `stmts[i]`.
    pub fn swap_at(&self, stmts: &[Stmt], i: usize) -> bool {
        let destructuring = match &stmts[i].kind {
            StmtKind::Expr(expr) => self.is_swap_shape(expr),
            _ => false,
        };
        destructuring
            || matches!(stmts.get(i..i + 3), Some([save, shift, restore]) if self.is_temp_swap(save, shift, restore))
    }

    fn is_temp_swap(&self, save: &Stmt, shift: &Stmt, restore: &Stmt) -> bool {
        let Some((temp, saved)) = temp_binding(save) else {
            return false;
        };
        let Some((dst, src)) = plain_assign(shift) else {
            return false;
        };
        let Some((last, restored)) = plain_assign(restore) else {
            return false;
        };
        self.is_array_access(saved)
            && same_expr(dst, saved)
            && self.is_array_access(src)
            && same_expr(last, src)
            && restored.as_ident() == Some(temp)
    }
}

/// `let t = e` / `t = e` with a single identifier target.
fn temp_binding(stmt: &Stmt) -> Option<(&str, &Expr)> {
    match &stmt.kind {
        StmtKind::VarDecl(decl) if decl.declarators.len() == 1 => {
            let d = &decl.declarators[0];
            Some((d.name.as_str(), d.init.as_ref()?))
        }
        _ => {
            let (target, value) = plain_assign(stmt)?;
            Some((target.as_ident()?, value))
        }
    }
}

fn plain_assign(stmt: &Stmt) -> Option<(&Expr, &Expr)> {
    match &stmt.kind {
        StmtKind::Expr(Expr {
            kind:
                ExprKind::Assign {
                    op: AssignOp::Assign,
                    target,
                    value,
                },
            ..
        }) => Some((&**target, &**value)),
        _ => None,
    }
}

/// Structural equality through the canonical printed form.
fn same_expr(a: &Expr, b: &Expr) -> bool {
    a.to_string() == b.to_string()
}
