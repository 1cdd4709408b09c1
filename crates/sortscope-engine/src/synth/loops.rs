//! Loop structure analysis.
//!
//! Loops outside function bodies are collected in pre-order and the
//! program is classified by how many there are. Bounds are concrete
//! integers computed once from literals and the array length, so every
//! replay terminates.

use sortscope_core::CmpOp;
use sortscope_syntax::ast::{
    Expr, ExprKind, ForInit, Function, Loop, LoopKind, Stmt, StmtKind,
};
use sortscope_syntax::visit::{walk_loop, Visit};
use sortscope_syntax::Program;

use crate::synth::discovery::literal_to_int;
use crate::synth::pattern::Classifier;

/// Half-open iteration range `[start, end)` of one loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopBounds {
    /// The loop variable, when one could be identified.
    pub var: Option<String>,
    pub start: i64,
    pub end: i64,
}

/// Upper bound of the inner loop of a nested pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerEnd {
    /// `len - 1 - i` for outer index `i`.
    ShrinksWithOuter,
    /// `len - 1` on every outer iteration.
    Fixed,
}

impl InnerEnd {
    /// The inner end for outer index `outer`, or `None` when it does not
    /// fit in an `i64`.
    pub fn resolve(self, len: i64, outer: i64) -> Option<i64> {
        let last = len.checked_sub(1)?;
        match self {
            InnerEnd::ShrinksWithOuter => last.checked_sub(outer),
            InnerEnd::Fixed => Some(last),
        }
    }
}

/// What decides whether the pair `(j, j + 1)` is exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapGuard {
    /// Swap when `shadow[j] op shadow[j + 1]` holds.
    Conditional(CmpOp),
    /// Swap on every inner iteration.
    Always,
    /// No swap was found; only compares are emitted.
    Absent,
}

impl SwapGuard {
    pub fn should_swap(self, lhs: i64, rhs: i64) -> bool {
        match self {
            SwapGuard::Conditional(op) => op.evaluate(lhs, rhs),
            SwapGuard::Always => true,
            SwapGuard::Absent => false,
        }
    }

    pub fn is_conditional(self) -> bool {
        matches!(self, SwapGuard::Conditional(_))
    }
}

/// Classified loop structure of a program.
#[derive(Debug)]
pub enum LoopShape<'ast> {
    None,
    Single {
        lp: &'ast Loop,
        bounds: LoopBounds,
    },
    Nested {
        outer_loop: &'ast Loop,
        inner_loop: &'ast Loop,
        outer: LoopBounds,
        inner: LoopBounds,
        inner_end: InnerEnd,
        guard: SwapGuard,
    },
}

/// Loops in `program` outside any function body, in pre-order.
pub fn collect_loops(program: &Program) -> Vec<&Loop> {
    let mut collector = LoopCollector { loops: Vec::new() };
    collector.visit_program(program);
    collector.loops
}

/// First loop inside `stmt`, by pre-order search.
pub fn first_loop_in(stmt: &Stmt) -> Option<&Loop> {
    let mut collector = LoopCollector { loops: Vec::new() };
    collector.visit_stmt(stmt);
    collector.loops.into_iter().next()
}

struct LoopCollector<'ast> {
    loops: Vec<&'ast Loop>,
}

impl<'ast> Visit<'ast> for LoopCollector<'ast> {
    fn visit_function(&mut self, _: &'ast Function) {}

    fn visit_loop(&mut self, lp: &'ast Loop) {
        self.loops.push(lp);
        walk_loop(self, lp);
    }
}

/// Classifies the loop structure of `program` against the tracked array.
pub fn analyze<'ast>(
    program: &'ast Program,
    classifier: &Classifier<'_>,
    len: usize,
) -> LoopShape<'ast> {
    let loops = collect_loops(program);
    let len = len as i64;

    let Some(&first) = loops.first() else {
        return LoopShape::None;
    };
    let outer = bounds(first, len);

    let inner = if loops.len() >= 2 {
        first_loop_in(&first.body)
    } else {
        None
    };
    let Some(inner) = inner else {
        return LoopShape::Single {
            lp: first,
            bounds: outer,
        };
    };

    let inner_bounds = bounds(inner, len);
    let depends_on_outer = match (&outer.var, test_rhs(inner)) {
        (Some(var), Some(rhs)) => rhs.mentions(var),
        _ => false,
    };
    let inner_end = if depends_on_outer {
        InnerEnd::ShrinksWithOuter
    } else {
        InnerEnd::Fixed
    };

    LoopShape::Nested {
        outer_loop: first,
        inner_loop: inner,
        outer,
        inner: inner_bounds,
        inner_end,
        guard: find_guard(inner.body.as_block(), classifier),
    }
}

/// Reads `[start, end)` from a loop header.
///
/// `start` is the numeric literal the loop variable is initialized with
/// (default 0). `end` is read from the right operand of the test: a numeric
/// literal is used as is, `x.length` is the array length, any other binary
/// expression is `len - 1`, and anything else is `len`. The comparison
/// operator of the test is not consulted.
pub fn bounds(lp: &Loop, len: i64) -> LoopBounds {
    if let LoopKind::ForEach { binding, .. } = &lp.kind {
        return LoopBounds {
            var: Some(binding.clone()),
            start: 0,
            end: len,
        };
    }

    let (init_var, start) = match &lp.kind {
        LoopKind::For {
            init: Some(init), ..
        } => loop_init(init),
        _ => (None, None),
    };
    let end = match test_rhs(lp) {
        Some(rhs) => end_bound(rhs, len),
        None => len,
    };
    let var = init_var.or_else(|| test_lhs_ident(lp).map(str::to_string));

    LoopBounds {
        var,
        start: start.unwrap_or(0),
        end,
    }
}

fn loop_init(init: &ForInit) -> (Option<String>, Option<i64>) {
    match init {
        ForInit::VarDecl(decl) => match decl.declarators.first() {
            Some(d) => (
                Some(d.name.clone()),
                d.init.as_ref().and_then(Expr::as_number).map(literal_to_int),
            ),
            None => (None, None),
        },
        ForInit::Expr(Expr {
            kind: ExprKind::Assign { target, value, .. },
            ..
        }) => (
            target.as_ident().map(str::to_string),
            value.as_number().map(literal_to_int),
        ),
        ForInit::Expr(_) => (None, None),
    }
}

fn end_bound(rhs: &Expr, len: i64) -> i64 {
    if let Some(n) = rhs.as_number() {
        return literal_to_int(n);
    }
    match &rhs.kind {
        ExprKind::Member(_, property) if property == "length" => len,
        ExprKind::Binary(..) => len - 1,
        _ => len,
    }
}

fn test_rhs(lp: &Loop) -> Option<&Expr> {
    match &lp.test()?.kind {
        ExprKind::Binary(_, _, rhs) => Some(&**rhs),
        _ => None,
    }
}

fn test_lhs_ident(lp: &Loop) -> Option<&str> {
    match &lp.test()?.kind {
        ExprKind::Binary(lhs, _, _) => lhs.as_ident(),
        _ => None,
    }
}

/// Searches an inner loop body for what guards the exchange of a pair.
///
/// Statements are searched in source order, descending into blocks, `if`
/// branches and loops but not functions. An `if` whose test compares
/// array elements and whose consequent swaps two elements yields its
/// operator. A swap reached first any other way yields
/// [`SwapGuard::Always`].
pub fn find_guard(stmts: &[Stmt], classifier: &Classifier<'_>) -> SwapGuard {
    search_guard(stmts, classifier).unwrap_or(SwapGuard::Absent)
}

fn search_guard(stmts: &[Stmt], classifier: &Classifier<'_>) -> Option<SwapGuard> {
    for (i, stmt) in stmts.iter().enumerate() {
        if classifier.swap_at(stmts, i) {
            return Some(SwapGuard::Always);
        }
        let found = match &stmt.kind {
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => match guard_op(test, classifier) {
                Some(op) if classifier.contains_swap(consequent.as_block()) => {
                    Some(SwapGuard::Conditional(op))
                }
                _ => search_guard(consequent.as_block(), classifier).or_else(|| {
                    alternate
                        .as_ref()
                        .and_then(|alt| search_guard(alt.as_block(), classifier))
                }),
            },
            StmtKind::Block(inner) => search_guard(inner, classifier),
            StmtKind::Loop(lp) => search_guard(lp.body.as_block(), classifier),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn guard_op(test: &Expr, classifier: &Classifier<'_>) -> Option<CmpOp> {
    match &test.kind {
        ExprKind::Binary(_, op, _) if classifier.is_comparison(test) => {
            CmpOp::from_symbol(op.symbol())
        }
        _ => None,
    }
}
