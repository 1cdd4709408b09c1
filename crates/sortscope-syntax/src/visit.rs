//! Read-only traversal over the AST.
//!
//! Implement [`Visit`] and override the callbacks you care about. Each
//! default method delegates to the matching `walk_*` function, which
//! visits children in source order; an override that still wants the
//! children calls the `walk_*` function itself.

use crate::ast::*;

pub trait Visit<'ast> {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_var_decl(&mut self, decl: &'ast VarDecl) {
        walk_var_decl(self, decl);
    }

    fn visit_function(&mut self, function: &'ast Function) {
        walk_function(self, function);
    }

    fn visit_loop(&mut self, lp: &'ast Loop) {
        walk_loop(self, lp);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_program<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, program: &'ast Program) {
    for stmt in &program.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::VarDecl(decl) => v.visit_var_decl(decl),
        StmtKind::Function(function) => v.visit_function(function),
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_stmt(consequent);
            if let Some(alt) = alternate {
                v.visit_stmt(alt);
            }
        }
        StmtKind::Loop(lp) => v.visit_loop(lp),
        StmtKind::Block(stmts) => {
            for s in stmts {
                v.visit_stmt(s);
            }
        }
        StmtKind::Return(value) => {
            if let Some(e) = value {
                v.visit_expr(e);
            }
        }
        StmtKind::Expr(e) => v.visit_expr(e),
        StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
    }
}

pub fn walk_var_decl<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, decl: &'ast VarDecl) {
    for declarator in &decl.declarators {
        if let Some(init) = &declarator.init {
            v.visit_expr(init);
        }
    }
}

pub fn walk_function<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, function: &'ast Function) {
    match &function.body {
        FunctionBody::Block(stmts) => {
            for s in stmts {
                v.visit_stmt(s);
            }
        }
        FunctionBody::Expr(e) => v.visit_expr(e),
    }
}

pub fn walk_loop<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, lp: &'ast Loop) {
    match &lp.kind {
        LoopKind::For { init, test, update } => {
            match init {
                Some(ForInit::VarDecl(decl)) => v.visit_var_decl(decl),
                Some(ForInit::Expr(e)) => v.visit_expr(e),
                None => {}
            }
            if let Some(t) = test {
                v.visit_expr(t);
            }
            if let Some(u) = update {
                v.visit_expr(u);
            }
            v.visit_stmt(&lp.body);
        }
        LoopKind::ForEach { iterable, .. } => {
            v.visit_expr(iterable);
            v.visit_stmt(&lp.body);
        }
        LoopKind::While { test } => {
            v.visit_expr(test);
            v.visit_stmt(&lp.body);
        }
        LoopKind::DoWhile { test } => {
            v.visit_stmt(&lp.body);
            v.visit_expr(test);
        }
    }
}

pub fn walk_expr<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Number(_)
        | ExprKind::Str(_)
        | ExprKind::Template(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::Ident(_) => {}
        ExprKind::Array(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
        ExprKind::Unary(_, inner) => v.visit_expr(inner),
        ExprKind::Update { target, .. } => v.visit_expr(target),
        ExprKind::Binary(lhs, _, rhs) => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        ExprKind::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_expr(consequent);
            v.visit_expr(alternate);
        }
        ExprKind::Call(callee, args) => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::Member(object, _) => v.visit_expr(object),
        ExprKind::Index(object, index) => {
            v.visit_expr(object);
            v.visit_expr(index);
        }
        ExprKind::Function(function) => v.visit_function(function),
    }
}
