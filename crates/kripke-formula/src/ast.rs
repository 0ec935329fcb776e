//! Arena-allocated AST for CTL/LTL formulas.
//!
//! Formula trees are built once (by an external parser or by the builder
//! methods on [`ExprArena`]) and are read-only afterwards. Nodes are
//! identified by [`ExprId`]; id equality is *identity* equality, which is
//! what the engines key their closure and atom sets on — two structurally
//! equal subtrees occurring at different positions are distinct ids. Use
//! [`ExprArena::structural_eq`] for value comparison.

/// A byte range into the formula source text.
///
/// Spans are diagnostic-only: proof reports slice the source line with them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a dummy span for synthesized nodes.
    pub fn dummy() -> Self {
        Self::default()
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The source text this span covers. Empty if out of range.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// Index of an expression node in an [`ExprArena`].
///
/// Equality and hashing are by identity, not by structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An expression node: its kind plus the source span it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of a formula node.
///
/// `Literal` through `Implication` are shared by both logics; the
/// `Exist*`/`All*` operators are CTL-only and `Next`/`Until` are LTL-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// Boolean constant.
    Literal(bool),
    /// Atomic proposition, resolved against the transition system by name.
    Label(String),
    /// `¬e`
    Negation(ExprId),
    /// `e1 ∧ e2`
    And(ExprId, ExprId),
    /// `e1 ∨ e2`
    Or(ExprId, ExprId),
    /// `e1 → e2`
    Implication(ExprId, ExprId),
    /// `∃X e` — some successor satisfies `e`.
    ExistNext(ExprId),
    /// `∃(e1 U e2)`
    ExistUntil(ExprId, ExprId),
    /// `∃⬜ e`
    ExistAlways(ExprId),
    /// `∀X e` — every successor satisfies `e`.
    AllNext(ExprId),
    /// `∀(e1 U e2)`
    AllUntil(ExprId, ExprId),
    /// `∀⬜ e`
    AllAlways(ExprId),
    /// `X e` (LTL)
    Next(ExprId),
    /// `e1 U e2` (LTL)
    Until(ExprId, ExprId),
}

impl ExprKind {
    /// Constructor name, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Literal(_) => "Literal",
            ExprKind::Label(_) => "Label",
            ExprKind::Negation(_) => "Negation",
            ExprKind::And(..) => "And",
            ExprKind::Or(..) => "Or",
            ExprKind::Implication(..) => "Implication",
            ExprKind::ExistNext(_) => "ExistNext",
            ExprKind::ExistUntil(..) => "ExistUntil",
            ExprKind::ExistAlways(_) => "ExistAlways",
            ExprKind::AllNext(_) => "AllNext",
            ExprKind::AllUntil(..) => "AllUntil",
            ExprKind::AllAlways(_) => "AllAlways",
            ExprKind::Next(_) => "Next",
            ExprKind::Until(..) => "Until",
        }
    }

    /// Whether this node kind is legal in a CTL formula.
    pub fn is_ctl(&self) -> bool {
        !matches!(self, ExprKind::Next(_) | ExprKind::Until(..))
    }

    /// Whether this node kind is legal in an LTL formula.
    pub fn is_ltl(&self) -> bool {
        matches!(
            self,
            ExprKind::Literal(_)
                | ExprKind::Label(_)
                | ExprKind::Negation(_)
                | ExprKind::And(..)
                | ExprKind::Or(..)
                | ExprKind::Implication(..)
                | ExprKind::Next(_)
                | ExprKind::Until(..)
        )
    }

    /// Child ids in left-to-right order.
    pub fn children(&self) -> (Option<ExprId>, Option<ExprId>) {
        match *self {
            ExprKind::Literal(_) | ExprKind::Label(_) => (None, None),
            ExprKind::Negation(e)
            | ExprKind::ExistNext(e)
            | ExprKind::ExistAlways(e)
            | ExprKind::AllNext(e)
            | ExprKind::AllAlways(e)
            | ExprKind::Next(e) => (Some(e), None),
            ExprKind::And(l, r)
            | ExprKind::Or(l, r)
            | ExprKind::Implication(l, r)
            | ExprKind::ExistUntil(l, r)
            | ExprKind::AllUntil(l, r)
            | ExprKind::Until(l, r) => (Some(l), Some(r)),
        }
    }
}

/// Owns every node of one or more formula trees.
///
/// Appending is the only mutation; ids stay valid for the arena's lifetime.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
    nodes: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and return its id.
    pub fn push(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(u32::try_from(self.nodes.len()).expect("arena overflow"));
        self.nodes.push(Expr { kind, span });
        id
    }

    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.nodes[id.index()].kind
    }

    pub fn span(&self, id: ExprId) -> Span {
        self.nodes[id.index()].span
    }

    /// Value equality of two subtrees: same variant tags and recursively
    /// equal children. Ids themselves compare by identity; this is the
    /// structural comparison clients use.
    pub fn structural_eq(&self, a: ExprId, b: ExprId) -> bool {
        if a == b {
            return true;
        }
        match (self.kind(a), self.kind(b)) {
            (ExprKind::Literal(x), ExprKind::Literal(y)) => x == y,
            (ExprKind::Label(x), ExprKind::Label(y)) => x == y,
            (ka, kb) if ka.name() == kb.name() => {
                let (al, ar) = ka.children();
                let (bl, br) = kb.children();
                let left = match (al, bl) {
                    (Some(x), Some(y)) => self.structural_eq(x, y),
                    (None, None) => true,
                    _ => false,
                };
                let right = match (ar, br) {
                    (Some(x), Some(y)) => self.structural_eq(x, y),
                    (None, None) => true,
                    _ => false,
                };
                left && right
            }
            _ => false,
        }
    }

    // Builder methods, mostly for tests and embedding drivers. All use
    // dummy spans; parsers should call `push` with real spans instead.

    pub fn literal(&mut self, value: bool) -> ExprId {
        self.push(ExprKind::Literal(value), Span::dummy())
    }

    pub fn label(&mut self, name: impl Into<String>) -> ExprId {
        self.push(ExprKind::Label(name.into()), Span::dummy())
    }

    pub fn negation(&mut self, e: ExprId) -> ExprId {
        self.push(ExprKind::Negation(e), Span::dummy())
    }

    pub fn and(&mut self, l: ExprId, r: ExprId) -> ExprId {
        self.push(ExprKind::And(l, r), Span::dummy())
    }

    pub fn or(&mut self, l: ExprId, r: ExprId) -> ExprId {
        self.push(ExprKind::Or(l, r), Span::dummy())
    }

    pub fn implication(&mut self, l: ExprId, r: ExprId) -> ExprId {
        self.push(ExprKind::Implication(l, r), Span::dummy())
    }

    pub fn exist_next(&mut self, e: ExprId) -> ExprId {
        self.push(ExprKind::ExistNext(e), Span::dummy())
    }

    pub fn exist_until(&mut self, l: ExprId, r: ExprId) -> ExprId {
        self.push(ExprKind::ExistUntil(l, r), Span::dummy())
    }

    pub fn exist_always(&mut self, e: ExprId) -> ExprId {
        self.push(ExprKind::ExistAlways(e), Span::dummy())
    }

    pub fn all_next(&mut self, e: ExprId) -> ExprId {
        self.push(ExprKind::AllNext(e), Span::dummy())
    }

    pub fn all_until(&mut self, l: ExprId, r: ExprId) -> ExprId {
        self.push(ExprKind::AllUntil(l, r), Span::dummy())
    }

    pub fn all_always(&mut self, e: ExprId) -> ExprId {
        self.push(ExprKind::AllAlways(e), Span::dummy())
    }

    pub fn next(&mut self, e: ExprId) -> ExprId {
        self.push(ExprKind::Next(e), Span::dummy())
    }

    pub fn until(&mut self, l: ExprId, r: ExprId) -> ExprId {
        self.push(ExprKind::Until(l, r), Span::dummy())
    }
}
