//! LTL closure/tableau engine.
//!
//! Three steps, all in [`Tableau::build`]:
//!
//! 1. **Closure**: collect every subformula of the input (negations
//!    contribute only their child), and for each `Until` additionally a
//!    synthesized `Next(Until)` node representing its one-step unfolding.
//! 2. **Atom enumeration**: every non-empty subset of the closure is a
//!    candidate truth assignment; a candidate that is logically consistent
//!    at some state is retained, and each consistent `(state, subset)`
//!    pair becomes an [`Atom`]. Candidates are tested directly on the
//!    enumeration bitmask, so the exponential candidate space allocates
//!    nothing beyond the retained pool.
//! 3. **Edges**: an atom at a state connects to an atom at a successor
//!    state iff for every `Next(e)` closure element, `Next(e)` holding in
//!    the source subset agrees exactly with `e` holding in the target
//!    subset.
//!
//! The result is read-only and consumed by an external renderer.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use kripke_formula::{ExprArena, ExprId, ExprKind};
use kripke_ts::{StateId, TranSys};
use tracing::debug;

use crate::error::{CheckError, CheckResult};

/// Largest closure the `u64` candidate enumeration can index.
pub const MAX_CLOSURE: usize = 63;

/// A set of closure elements, keyed by node identity.
pub type ExpSet = BTreeSet<ExprId>;

/// One maximal consistent subset of the closure, validated at one state.
///
/// `expressions` indexes the shared pool in [`Tableau::atom_expressions`];
/// several states may share the same underlying subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub state: StateId,
    /// Index into [`Tableau::atom_expressions`].
    pub expressions: usize,
    /// Display name, `"<state>_<poolIndex>"`.
    pub name: String,
}

/// A tableau transition between two entries of [`Tableau::atoms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableauEdge {
    pub start: usize,
    pub end: usize,
}

/// The complete tableau for one `(formula, transition system)` pair.
#[derive(Debug)]
pub struct Tableau {
    /// The input formula.
    pub formula: ExprId,
    /// Closure elements in insertion order.
    pub closure: Vec<ExprId>,
    /// Synthesized `Next(Until)` nodes, allocated into the arena so their
    /// ids are as stable as any parsed node's.
    pub aux: Vec<ExprId>,
    /// The retained pool of consistent closure subsets.
    pub atom_expressions: Vec<ExpSet>,
    /// All atoms, grouped by candidate subset then state.
    pub atoms: Vec<Atom>,
    /// State → indices into `atoms`.
    pub atom_map: BTreeMap<StateId, Vec<usize>>,
    pub edges: Vec<TableauEdge>,

    /// Bit position of each closure element in the enumeration masks.
    index: HashMap<ExprId, usize>,
    /// Enumeration mask of each retained pool entry.
    masks: Vec<u64>,
    /// `Until` element → its synthesized `Next(Until)` element.
    until_next: HashMap<ExprId, ExprId>,
}

impl Tableau {
    /// Run the closure/atom/edge construction.
    ///
    /// The arena is borrowed mutably only to append the synthesized
    /// `Next(Until)` nodes; existing nodes are never touched.
    pub fn build(arena: &mut ExprArena, formula: ExprId, ts: &TranSys) -> CheckResult<Tableau> {
        let mut tableau = Tableau {
            formula,
            closure: Vec::new(),
            aux: Vec::new(),
            atom_expressions: Vec::new(),
            atoms: Vec::new(),
            atom_map: BTreeMap::new(),
            edges: Vec::new(),
            index: HashMap::new(),
            masks: Vec::new(),
            until_next: HashMap::new(),
        };
        tableau.closure_of(arena, formula)?;

        let n = tableau.closure.len();
        if n > MAX_CLOSURE {
            return Err(CheckError::ClosureTooLarge {
                size: n,
                max: MAX_CLOSURE,
            });
        }

        tableau.enumerate_atoms(arena, ts)?;
        tableau.connect_atoms(arena, ts);
        debug!(
            closure = n,
            pool = tableau.atom_expressions.len(),
            atoms = tableau.atoms.len(),
            edges = tableau.edges.len(),
            "tableau constructed"
        );
        Ok(tableau)
    }

    /// Step 1: closure computation.
    fn closure_of(&mut self, arena: &mut ExprArena, id: ExprId) -> CheckResult<()> {
        match arena.kind(id).clone() {
            ExprKind::Literal(_) | ExprKind::Label(_) => {
                self.insert_closure(id);
            }
            // Negation itself is not closure-representable; only its
            // argument enters.
            ExprKind::Negation(e) => {
                self.closure_of(arena, e)?;
            }
            ExprKind::And(l, r) | ExprKind::Or(l, r) | ExprKind::Implication(l, r) => {
                self.insert_closure(id);
                self.closure_of(arena, l)?;
                self.closure_of(arena, r)?;
            }
            ExprKind::Next(e) => {
                self.insert_closure(id);
                self.closure_of(arena, e)?;
            }
            ExprKind::Until(l, r) => {
                self.insert_closure(id);
                // One-step unfolding: X(l U r), needed by the expansion law
                // and by the edge constraints.
                let next = arena.push(ExprKind::Next(id), arena.span(id));
                self.aux.push(next);
                self.until_next.insert(id, next);
                self.insert_closure(next);
                self.closure_of(arena, l)?;
                self.closure_of(arena, r)?;
            }
            kind => {
                return Err(CheckError::IllegalNode {
                    kind: kind.name(),
                    span: arena.span(id),
                })
            }
        }
        Ok(())
    }

    fn insert_closure(&mut self, id: ExprId) {
        let prev = self.index.insert(id, self.closure.len());
        // Ids must be per-occurrence: a reused id would alias two bit
        // positions and desynchronize the masks from the pool subsets.
        debug_assert!(prev.is_none(), "closure element inserted twice");
        self.closure.push(id);
    }

    /// Step 2: enumerate candidate subsets and keep the consistent ones.
    fn enumerate_atoms(&mut self, arena: &ExprArena, ts: &TranSys) -> CheckResult<()> {
        let max: u64 = (1u64 << self.closure.len()) - 1;
        for mask in 1..=max {
            let mut pool_idx = None;
            for &state in &ts.states_set {
                if !self.candidate_consistent(arena, ts, mask, state)? {
                    continue;
                }
                let idx = match pool_idx {
                    Some(idx) => idx,
                    None => {
                        // First state to accept this candidate: materialize
                        // it into the pool.
                        self.atom_expressions.push(self.subset_of(mask));
                        self.masks.push(mask);
                        let idx = self.atom_expressions.len() - 1;
                        pool_idx = Some(idx);
                        idx
                    }
                };
                self.atoms.push(Atom {
                    state,
                    expressions: idx,
                    name: format!("{}_{}", ts.state(state).name, idx),
                });
                self.atom_map
                    .entry(state)
                    .or_default()
                    .push(self.atoms.len() - 1);
            }
        }
        Ok(())
    }

    /// Step 3: connect atoms along transitions, constrained by the `Next`
    /// closure elements.
    fn connect_atoms(&mut self, arena: &ExprArena, ts: &TranSys) {
        let mut edges = Vec::new();
        for (&state, start_atoms) in &self.atom_map {
            for &succ in &ts.state(state).successors {
                let Some(end_atoms) = self.atom_map.get(&succ) else {
                    continue;
                };
                for &ia in start_atoms {
                    let start_mask = self.masks[self.atoms[ia].expressions];
                    for &ib in end_atoms {
                        let end_mask = self.masks[self.atoms[ib].expressions];
                        if self.next_agrees(arena, start_mask, end_mask) {
                            edges.push(TableauEdge { start: ia, end: ib });
                        }
                    }
                }
            }
        }
        self.edges = edges;
    }

    /// Whether every `Next(e)` in the closure holds in the start subset
    /// exactly when `e` holds in the end subset.
    fn next_agrees(&self, arena: &ExprArena, start_mask: u64, end_mask: u64) -> bool {
        self.closure.iter().all(|&elem| match *arena.kind(elem) {
            ExprKind::Next(e) => self.in_mask(start_mask, elem) == self.in_mask(end_mask, e),
            _ => true,
        })
    }

    /// Whether a candidate subset is a consistent truth assignment at
    /// `state`. Short-circuits on the first inconsistent element.
    fn candidate_consistent(
        &self,
        arena: &ExprArena,
        ts: &TranSys,
        mask: u64,
        state: StateId,
    ) -> CheckResult<bool> {
        for &elem in &self.closure {
            if !self.element_consistent(arena, ts, mask, state, elem)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn element_consistent(
        &self,
        arena: &ExprArena,
        ts: &TranSys,
        mask: u64,
        state: StateId,
        elem: ExprId,
    ) -> CheckResult<bool> {
        let in_atom = self.in_mask(mask, elem);
        match arena.kind(elem) {
            ExprKind::Label(name) => {
                let label = ts
                    .label_id(name)
                    .ok_or_else(|| CheckError::UnknownLabel { name: name.clone() })?;
                Ok(ts.state(state).props.contains(&label) == in_atom)
            }
            ExprKind::Literal(value) => Ok(in_atom == *value),
            ExprKind::Negation(_) => Err(CheckError::NegationInClosure {
                span: arena.span(elem),
            }),
            ExprKind::And(l, r) => {
                Ok((self.present(arena, mask, *l) && self.present(arena, mask, *r)) == in_atom)
            }
            ExprKind::Or(l, r) => {
                Ok((self.present(arena, mask, *l) || self.present(arena, mask, *r)) == in_atom)
            }
            ExprKind::Implication(l, r) => {
                Ok((!self.present(arena, mask, *l) || self.present(arena, mask, *r)) == in_atom)
            }
            // Expansion law: l U r ⇔ r ∨ (l ∧ X(l U r)).
            ExprKind::Until(l, r) => {
                let next = self.until_next[&elem];
                Ok(in_atom
                    == (self.present(arena, mask, *r)
                        || (self.present(arena, mask, *l) && self.in_mask(mask, next))))
            }
            // Next is locally unconstrained; its content is enforced by the
            // tableau edges.
            ExprKind::Next(_) => Ok(true),
            kind => Err(CheckError::IllegalNode {
                kind: kind.name(),
                span: arena.span(elem),
            }),
        }
    }

    /// Presence of an operand in the candidate: a plain operand is present
    /// when its element is in the subset; a negated operand is present when
    /// its child is *absent*.
    fn present(&self, arena: &ExprArena, mask: u64, id: ExprId) -> bool {
        match *arena.kind(id) {
            ExprKind::Negation(inner) => !self.in_mask(mask, inner),
            _ => self.in_mask(mask, id),
        }
    }

    fn in_mask(&self, mask: u64, id: ExprId) -> bool {
        self.index.get(&id).is_some_and(|&i| mask >> i & 1 == 1)
    }

    /// Re-validate a retained atom against its state — the round-trip check
    /// of the consistency rules.
    pub fn check_atom(&self, arena: &ExprArena, ts: &TranSys, atom: usize) -> CheckResult<bool> {
        let a = &self.atoms[atom];
        let mask = self.masks[a.expressions];
        self.candidate_consistent(arena, ts, mask, a.state)
    }

    fn subset_of(&self, mask: u64) -> ExpSet {
        self.closure
            .iter()
            .enumerate()
            .filter(|(i, _)| mask >> i & 1 == 1)
            .map(|(_, &e)| e)
            .collect()
    }
}
