//! Shadow execution: replays a classified program against the recorder.
//!
//! A single forward pass. Loop bounds are fixed before the pass starts and
//! never re-evaluated, and every replayed iteration is counted against
//! [`SynthConfig::max_steps`]. Sets outside the replayed loops are applied
//! once, before or after them in source order.

use sortscope_core::TraceRecorder;
use sortscope_syntax::ast::{Expr, Function, Loop, Stmt};
use sortscope_syntax::visit::{walk_expr, walk_loop, Visit};
use sortscope_syntax::Program;
use tracing::{debug, trace};

use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::synth::loops::{InnerEnd, LoopBounds, LoopShape, SwapGuard};
use crate::synth::pattern::{Classifier, Pattern};

pub(crate) struct ShadowEngine<'a> {
    classifier: Classifier<'a>,
    recorder: TraceRecorder,
    config: &'a SynthConfig,
    steps: usize,
}

impl<'a> ShadowEngine<'a> {
    pub(crate) fn new(
        classifier: Classifier<'a>,
        recorder: TraceRecorder,
        config: &'a SynthConfig,
    ) -> Self {
        ShadowEngine {
            classifier,
            recorder,
            config,
            steps: 0,
        }
    }

    pub(crate) fn run(
        mut self,
        program: &Program,
        shape: &LoopShape<'_>,
    ) -> Result<TraceRecorder, SynthError> {
        match shape {
            LoopShape::None => self.scan_program(program),
            LoopShape::Single { lp, bounds } => {
                let sets = SetSplitter::split(&self.classifier, *lp, |s| s.visit_program(program));
                self.apply_all(&sets.before);
                self.replay_single(lp, bounds)?;
                self.apply_all(&sets.after);
            }
            LoopShape::Nested {
                outer_loop,
                inner_loop,
                outer,
                inner,
                inner_end,
                guard,
            } => {
                let sets =
                    SetSplitter::split(&self.classifier, *outer_loop, |s| s.visit_program(program));
                self.apply_all(&sets.before);
                self.replay_nested(outer_loop, inner_loop, outer, inner, *inner_end, *guard)?;
                self.apply_all(&sets.after);
            }
        }
        Ok(self.recorder)
    }

    fn tick(&mut self) -> Result<(), SynthError> {
        self.steps += 1;
        if self.steps > self.config.max_steps {
            return Err(SynthError::StepLimitExceeded {
                limit: self.config.max_steps,
            });
        }
        Ok(())
    }

    /// Applies a swap or set pattern. Anything else is ignored.
    fn apply(&mut self, pattern: Pattern) {
        match pattern {
            Pattern::Swap { indices: [a, b] } => {
                self.recorder.swap(a, b);
            }
            Pattern::Set { index, value } => {
                self.recorder.set(index, value);
            }
            _ => {}
        }
    }

    fn apply_all(&mut self, patterns: &[Pattern]) {
        for &pattern in patterns {
            self.apply(pattern);
        }
    }

    /// Replays the swaps and sets sitting directly in `stmts`.
    fn apply_direct(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            let pattern = self.classifier.classify_stmt(stmt);
            self.apply(pattern);
        }
    }

    fn enter_loop(&mut self, label: &str, bounds: &LoopBounds) {
        if self.config.loop_comments {
            let var = bounds.var.as_deref().unwrap_or("?");
            self.recorder.comment(format!(
                "{} loop: {} from {} to {}",
                label, var, bounds.start, bounds.end
            ));
        }
    }

    // ── No loops ─────────────────────────────────────────────

    /// Replays every comparison, swap and set in source order, ignoring the
    /// control flow around them.
    fn scan_program(&mut self, program: &Program) {
        let mut scanner = Scanner { engine: self };
        scanner.visit_program(program);
    }

    // ── One loop ─────────────────────────────────────────────

    fn replay_single(&mut self, lp: &Loop, bounds: &LoopBounds) -> Result<(), SynthError> {
        self.enter_loop("single", bounds);
        let body = lp.body.as_block();
        for index in bounds.start..bounds.end {
            self.tick()?;
            trace!(index, "single loop iteration");
            self.apply_direct(body);
        }
        Ok(())
    }

    // ── Nested pair ──────────────────────────────────────────

    fn replay_nested(
        &mut self,
        outer_loop: &Loop,
        inner_loop: &Loop,
        outer: &LoopBounds,
        inner: &LoopBounds,
        inner_end: InnerEnd,
        guard: SwapGuard,
    ) -> Result<(), SynthError> {
        let len = self.recorder.array_len() as i64;
        let body = inner_loop.body.as_block();
        let around =
            SetSplitter::split(&self.classifier, inner_loop, |s| s.visit_stmt(&outer_loop.body));
        self.enter_loop("outer", outer);

        for i in outer.start..outer.end {
            self.tick()?;
            self.apply_all(&around.before);
            if let Some(end) = inner_end.resolve(len, i) {
                self.replay_inner(i, end, inner, guard, body)?;
                if inner_end == InnerEnd::ShrinksWithOuter && guard.is_conditional() {
                    if let Ok(done) = usize::try_from(end) {
                        self.recorder.sorted(&[done]);
                    }
                }
            } else {
                debug!(i, "inner bound out of range; skipping inner loop");
            }
            self.apply_all(&around.after);
        }
        Ok(())
    }

    fn replay_inner(
        &mut self,
        i: i64,
        end: i64,
        inner: &LoopBounds,
        guard: SwapGuard,
        body: &[Stmt],
    ) -> Result<(), SynthError> {
        self.enter_loop(
            "inner",
            &LoopBounds {
                var: inner.var.clone(),
                start: inner.start,
                end,
            },
        );
        for j in inner.start..end {
            self.tick()?;
            trace!(i, j, "nested loop iteration");
            self.replay_pair(j, guard);
            self.apply_direct(body);
        }
        Ok(())
    }

    /// Compares `(j, j + 1)` and exchanges them if the guard holds.
    fn replay_pair(&mut self, j: i64, guard: SwapGuard) {
        let Ok(a) = usize::try_from(j) else {
            debug!(j, "skipping negative inner index");
            return;
        };
        let b = a + 1;
        if let Some((lhs, rhs)) = self.recorder.compare(a, b) {
            if guard.should_swap(lhs, rhs) {
                self.recorder.swap(a, b);
            }
        }
    }
}

/// Source-order walk for programs without loops. Function bodies are not
/// entered.
struct Scanner<'e, 'a> {
    engine: &'e mut ShadowEngine<'a>,
}

impl<'ast> Visit<'ast> for Scanner<'_, '_> {
    fn visit_function(&mut self, _: &'ast Function) {}

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match self.engine.classifier.classify(expr) {
            Pattern::Comparison {
                indices: [a, b], ..
            } => {
                self.engine.recorder.compare(a, b);
            }
            pattern @ (Pattern::Swap { .. } | Pattern::Set { .. }) => self.engine.apply(pattern),
            Pattern::Access { .. } | Pattern::Unrecognized => walk_expr(self, expr),
        }
    }
}

/// Sets found outside one loop, split by whether they come before or after
/// it in source order.
struct SetSplitter<'c, 'a, 'ast> {
    classifier: &'c Classifier<'a>,
    skip: &'ast Loop,
    passed: bool,
    before: Vec<Pattern>,
    after: Vec<Pattern>,
}

struct SplitSets {
    before: Vec<Pattern>,
    after: Vec<Pattern>,
}

impl<'c, 'a, 'ast> SetSplitter<'c, 'a, 'ast> {
    fn split(
        classifier: &'c Classifier<'a>,
        skip: &'ast Loop,
        walk: impl FnOnce(&mut Self),
    ) -> SplitSets {
        let mut splitter = SetSplitter {
            classifier,
            skip,
            passed: false,
            before: Vec::new(),
            after: Vec::new(),
        };
        walk(&mut splitter);
        SplitSets {
            before: splitter.before,
            after: splitter.after,
        }
    }
}

impl<'ast> Visit<'ast> for SetSplitter<'_, '_, 'ast> {
    fn visit_function(&mut self, _: &'ast Function) {}

    fn visit_loop(&mut self, lp: &'ast Loop) {
        if std::ptr::eq(lp, self.skip) {
            self.passed = true;
        } else {
            walk_loop(self, lp);
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match self.classifier.classify(expr) {
            pattern @ Pattern::Set { .. } => {
                if self.passed {
                    self.after.push(pattern);
                } else {
                    self.before.push(pattern);
                }
            }
            _ => walk_expr(self, expr),
        }
    }
}
