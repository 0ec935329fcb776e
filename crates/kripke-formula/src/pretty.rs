//! Pretty printer for formula trees.
//!
//! The formatting mode is an explicit parameter; there is no ambient
//! formatting state.

use crate::ast::{ExprArena, ExprId, ExprKind};

/// How to render a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// Constructor dump, e.g. `And {Label {"p"}, Literal {true}}`.
    Ast,
    /// Unicode math notation, e.g. `(p∧⊤)`.
    Math,
    /// LaTeX math-mode source.
    Latex,
}

/// Render the subtree rooted at `id` to a string.
pub fn format_expr(arena: &ExprArena, id: ExprId, mode: FormatMode) -> String {
    let mut printer = Printer {
        arena,
        mode,
        output: String::new(),
    };
    printer.print(id);
    printer.output
}

struct Printer<'a> {
    arena: &'a ExprArena,
    mode: FormatMode,
    output: String,
}

impl Printer<'_> {
    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn print(&mut self, id: ExprId) {
        match self.mode {
            FormatMode::Ast => self.print_ast(id),
            FormatMode::Math => self.print_math(id),
            FormatMode::Latex => self.print_latex(id),
        }
    }

    fn print_ast(&mut self, id: ExprId) {
        let kind = self.arena.kind(id).clone();
        match kind {
            ExprKind::Literal(v) => {
                self.write(if v { "Literal {true}" } else { "Literal {false}" });
            }
            ExprKind::Label(name) => {
                self.write("Label {\"");
                self.write(&name);
                self.write("\"}");
            }
            other => {
                self.write(other.name());
                self.write(" {");
                let (left, right) = other.children();
                if let Some(l) = left {
                    self.print_ast(l);
                }
                if let Some(r) = right {
                    self.write(", ");
                    self.print_ast(r);
                }
                self.write("}");
            }
        }
    }

    fn print_math(&mut self, id: ExprId) {
        match self.arena.kind(id).clone() {
            ExprKind::Literal(v) => self.write(if v { "⊤" } else { "⊥" }),
            ExprKind::Label(name) => self.write(&name),
            ExprKind::Negation(e) => {
                self.write("¬");
                self.print_math(e);
            }
            ExprKind::And(l, r) => self.math_infix(l, "∧", r),
            ExprKind::Or(l, r) => self.math_infix(l, "∨", r),
            ExprKind::Implication(l, r) => self.math_infix(l, "→", r),
            ExprKind::ExistNext(e) => self.math_prefix("(∃X", e),
            ExprKind::ExistAlways(e) => self.math_prefix("(∃⬜", e),
            ExprKind::AllNext(e) => self.math_prefix("(∀X", e),
            ExprKind::AllAlways(e) => self.math_prefix("(∀⬜", e),
            ExprKind::Next(e) => self.math_prefix("(X", e),
            ExprKind::ExistUntil(l, r) => self.math_until("∃(", l, r),
            ExprKind::AllUntil(l, r) => self.math_until("∀(", l, r),
            ExprKind::Until(l, r) => self.math_until("(", l, r),
        }
    }

    fn math_infix(&mut self, l: ExprId, op: &str, r: ExprId) {
        self.write("(");
        self.print_math(l);
        self.write(op);
        self.print_math(r);
        self.write(")");
    }

    fn math_prefix(&mut self, open: &str, e: ExprId) {
        self.write(open);
        self.print_math(e);
        self.write(")");
    }

    fn math_until(&mut self, open: &str, l: ExprId, r: ExprId) {
        self.write(open);
        self.print_math(l);
        self.write(" U ");
        self.print_math(r);
        self.write(")");
    }

    fn print_latex(&mut self, id: ExprId) {
        match self.arena.kind(id).clone() {
            ExprKind::Literal(v) => self.write(if v { "\\top" } else { "\\bot" }),
            ExprKind::Label(name) => {
                self.write("{ ");
                self.write(&name);
                self.write(" }");
            }
            ExprKind::Negation(e) => {
                self.write("\\neg ");
                self.print_latex(e);
            }
            ExprKind::And(l, r) => self.latex_infix(l, "\\land ", r),
            ExprKind::Or(l, r) => self.latex_infix(l, "\\lor ", r),
            ExprKind::Implication(l, r) => self.latex_infix(l, "\\to ", r),
            ExprKind::ExistNext(e) => self.latex_prefix("\\exists \\mathrm{X} ", e),
            ExprKind::ExistAlways(e) => self.latex_prefix("\\exists \\Box ", e),
            ExprKind::AllNext(e) => self.latex_prefix("\\forall \\mathrm{X} ", e),
            ExprKind::AllAlways(e) => self.latex_prefix("\\forall \\Box ", e),
            ExprKind::Next(e) => self.latex_prefix("\\mathrm{X} ", e),
            ExprKind::ExistUntil(l, r) => self.latex_until("\\exists ", l, r),
            ExprKind::AllUntil(l, r) => self.latex_until("\\forall ", l, r),
            ExprKind::Until(l, r) => self.latex_until("", l, r),
        }
    }

    fn latex_infix(&mut self, l: ExprId, op: &str, r: ExprId) {
        self.write("\\left(");
        self.print_latex(l);
        self.write(op);
        self.print_latex(r);
        self.write("\\right)");
    }

    fn latex_prefix(&mut self, open: &str, e: ExprId) {
        self.write("\\left(");
        self.write(open);
        self.print_latex(e);
        self.write("\\right)");
    }

    fn latex_until(&mut self, quant: &str, l: ExprId, r: ExprId) {
        self.write(quant);
        self.write("\\left(");
        self.print_latex(l);
        self.write("\\mathrm{U} ");
        self.print_latex(r);
        self.write("\\right)");
    }
}
