//! CTL satisfaction engine.
//!
//! Walks the formula bottom-up, computing for every subtree the exact set
//! of states satisfying it and wrapping the results into a proof tree of
//! matching shape. The temporal operators are standard backward fixed
//! points over the finite lattice of state subsets: least fixed points for
//! the until operators (seeded from the right operand), greatest fixed
//! points for the always operators (seeded from the operand and shrunk).
//! Every loop works on a snapshot or worklist, never on the set it is
//! mutating, and terminates within `|states|` rounds.

use std::collections::{BTreeSet, VecDeque};

use kripke_formula::{ExprArena, ExprId, ExprKind, Span};
use kripke_ts::{StateId, TranSys};
use tracing::{debug, trace};

use crate::error::{CheckError, CheckResult};
use crate::sets;

/// The satisfaction set of one formula subtree.
pub type SatSet = BTreeSet<StateId>;

/// One node of the proof tree, mirroring the formula's shape.
///
/// Built bottom-up, one node per formula subtree, never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct SatProof {
    /// The formula subtree this node explains.
    pub expr: ExprId,
    /// Source span of that subtree, for diagnostic printing.
    pub span: Span,
    /// States satisfying the subtree.
    pub sat: SatSet,
    pub children: ProofChildren,
}

/// Child proof nodes, matching the arity of the formula node.
#[derive(Debug, Clone)]
pub enum ProofChildren {
    Nullary,
    Unary(Box<SatProof>),
    Binary(Box<SatProof>, Box<SatProof>),
}

/// Decide a CTL formula against a transition system.
///
/// Returns the verdict (`init ⊆ sat(formula)`) together with the full
/// proof tree.
pub fn compute_sat(
    arena: &ExprArena,
    formula: ExprId,
    ts: &TranSys,
) -> CheckResult<(bool, SatProof)> {
    let proof = sat_node(arena, formula, ts)?;
    let satisfied = sets::subset(&ts.init, &proof.sat);
    debug!(
        states = ts.num_states(),
        sat = proof.sat.len(),
        satisfied,
        "computed satisfaction"
    );
    Ok((satisfied, proof))
}

fn sat_node(arena: &ExprArena, id: ExprId, ts: &TranSys) -> CheckResult<SatProof> {
    let span = arena.span(id);
    match arena.kind(id).clone() {
        ExprKind::Literal(value) => {
            let sat = if value {
                ts.states_set.clone()
            } else {
                SatSet::new()
            };
            Ok(nullary(id, span, sat))
        }
        ExprKind::Label(name) => {
            let label = ts
                .label_id(&name)
                .ok_or(CheckError::UnknownLabel { name })?;
            let sat = ts
                .states()
                .filter(|(_, s)| s.props.contains(&label))
                .map(|(sid, _)| sid)
                .collect();
            Ok(nullary(id, span, sat))
        }
        ExprKind::Negation(e) => {
            let child = sat_node(arena, e, ts)?;
            let sat = sets::difference(&ts.states_set, &child.sat);
            Ok(unary(id, span, sat, child))
        }
        ExprKind::And(l, r) => {
            let left = sat_node(arena, l, ts)?;
            let right = sat_node(arena, r, ts)?;
            let sat = sets::intersect(&left.sat, &right.sat);
            Ok(binary(id, span, sat, left, right))
        }
        ExprKind::Or(l, r) => {
            let left = sat_node(arena, l, ts)?;
            let right = sat_node(arena, r, ts)?;
            let sat = sets::union(&left.sat, &right.sat);
            Ok(binary(id, span, sat, left, right))
        }
        ExprKind::Implication(l, r) => {
            let left = sat_node(arena, l, ts)?;
            let right = sat_node(arena, r, ts)?;
            let sat = sets::union(&sets::difference(&ts.states_set, &left.sat), &right.sat);
            Ok(binary(id, span, sat, left, right))
        }
        ExprKind::ExistNext(e) => {
            let child = sat_node(arena, e, ts)?;
            let sat = exist_next(ts, &child.sat);
            Ok(unary(id, span, sat, child))
        }
        ExprKind::ExistUntil(l, r) => {
            let left = sat_node(arena, l, ts)?;
            let right = sat_node(arena, r, ts)?;
            let sat = exist_until(ts, &left.sat, &right.sat);
            Ok(binary(id, span, sat, left, right))
        }
        ExprKind::ExistAlways(e) => {
            let child = sat_node(arena, e, ts)?;
            let sat = exist_always(ts, &child.sat);
            Ok(unary(id, span, sat, child))
        }
        ExprKind::AllNext(e) => {
            let child = sat_node(arena, e, ts)?;
            let sat = all_next(ts, &child.sat);
            Ok(unary(id, span, sat, child))
        }
        ExprKind::AllUntil(l, r) => {
            let left = sat_node(arena, l, ts)?;
            let right = sat_node(arena, r, ts)?;
            let sat = all_until(ts, &left.sat, &right.sat);
            Ok(binary(id, span, sat, left, right))
        }
        ExprKind::AllAlways(e) => {
            let child = sat_node(arena, e, ts)?;
            let sat = all_always(ts, &child.sat);
            Ok(unary(id, span, sat, child))
        }
        kind @ (ExprKind::Next(_) | ExprKind::Until(..)) => Err(CheckError::IllegalNode {
            kind: kind.name(),
            span,
        }),
    }
}

fn nullary(expr: ExprId, span: Span, sat: SatSet) -> SatProof {
    SatProof {
        expr,
        span,
        sat,
        children: ProofChildren::Nullary,
    }
}

fn unary(expr: ExprId, span: Span, sat: SatSet, child: SatProof) -> SatProof {
    SatProof {
        expr,
        span,
        sat,
        children: ProofChildren::Unary(Box::new(child)),
    }
}

fn binary(expr: ExprId, span: Span, sat: SatSet, left: SatProof, right: SatProof) -> SatProof {
    SatProof {
        expr,
        span,
        sat,
        children: ProofChildren::Binary(Box::new(left), Box::new(right)),
    }
}

/// `∃X e`: states with some successor in `sat_e` — the union of the
/// predecessors of every member.
fn exist_next(ts: &TranSys, sat_e: &SatSet) -> SatSet {
    let mut result = SatSet::new();
    for &s in sat_e {
        result.extend(ts.state(s).predecessors.iter().copied());
    }
    result
}

/// `∀X e`: predecessors whose *every* successor is in `sat_e`.
fn all_next(ts: &TranSys, sat_e: &SatSet) -> SatSet {
    let mut result = SatSet::new();
    for &s in sat_e {
        for &p in &ts.state(s).predecessors {
            if sets::subset(&ts.state(p).successors, sat_e) {
                result.insert(p);
            }
        }
    }
    result
}

/// `∃(l U r)`: least fixed point seeded from `sat_r`; a predecessor
/// satisfying `l` of any member joins the set.
fn exist_until(ts: &TranSys, sat_l: &SatSet, sat_r: &SatSet) -> SatSet {
    let mut t = sat_r.clone();
    let mut work: VecDeque<StateId> = t.iter().copied().collect();
    while let Some(s) = work.pop_front() {
        for &p in &ts.state(s).predecessors {
            if sat_l.contains(&p) && t.insert(p) {
                work.push_back(p);
            }
        }
    }
    trace!(members = t.len(), "EU saturation converged");
    t
}

/// `∀(l U r)`: least fixed point seeded from `sat_r`; a predecessor `p` of
/// a member joins only if `p` satisfies `l` and every successor of `p` is
/// already in the set (the all-paths obligation).
fn all_until(ts: &TranSys, sat_l: &SatSet, sat_r: &SatSet) -> SatSet {
    let mut t = sat_r.clone();
    let mut rounds = 0usize;
    loop {
        rounds += 1;
        let snapshot: Vec<StateId> = t.iter().copied().collect();
        let mut changed = false;
        for s in snapshot {
            for &p in &ts.state(s).predecessors {
                if sat_l.contains(&p)
                    && !t.contains(&p)
                    && sets::subset(&ts.state(p).successors, &t)
                {
                    t.insert(p);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    trace!(members = t.len(), rounds, "AU saturation converged");
    t
}

/// `∃⬜ e`: greatest fixed point from `sat_e`; a state survives only while
/// at least one of its successors survives.
fn exist_always(ts: &TranSys, sat_e: &SatSet) -> SatSet {
    let mut t = sat_e.clone();
    let mut rounds = 0usize;
    loop {
        rounds += 1;
        let snapshot: Vec<StateId> = t.iter().copied().collect();
        let mut changed = false;
        for s in snapshot {
            if !sets::intersects(&ts.state(s).successors, &t) {
                t.remove(&s);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    trace!(members = t.len(), rounds, "EG contraction converged");
    t
}

/// `∀⬜ e`: greatest fixed point from `sat_e`; a state survives only while
/// all of its successors survive.
fn all_always(ts: &TranSys, sat_e: &SatSet) -> SatSet {
    let mut t = sat_e.clone();
    let mut rounds = 0usize;
    loop {
        rounds += 1;
        let snapshot: Vec<StateId> = t.iter().copied().collect();
        let mut changed = false;
        for s in snapshot {
            if !sets::subset(&ts.state(s).successors, &t) {
                t.remove(&s);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    trace!(members = t.len(), rounds, "AG contraction converged");
    t
}

/// Render a satisfaction set as `{name, name, ...}` in id order.
pub fn format_sat_set(sat: &SatSet, ts: &TranSys) -> String {
    let mut out = String::from("{");
    for (i, &s) in sat.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&ts.state(s).name);
    }
    out.push('}');
    out
}

/// Render the proof tree as the driver-facing report: one
/// `Sat (<source slice>) = {states}` line per node, indented by depth.
pub fn render_report(proof: &SatProof, source: &str, ts: &TranSys) -> String {
    let mut out = String::new();
    write_node(proof, source, ts, 0, &mut out);
    out
}

fn write_node(proof: &SatProof, source: &str, ts: &TranSys, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push('\t');
    }
    out.push_str("Sat (");
    out.push_str(proof.span.slice(source));
    out.push_str(") = ");
    out.push_str(&format_sat_set(&proof.sat, ts));
    out.push('\n');
    match &proof.children {
        ProofChildren::Nullary => {}
        ProofChildren::Unary(child) => write_node(child, source, ts, depth + 1, out),
        ProofChildren::Binary(left, right) => {
            write_node(left, source, ts, depth + 1, out);
            write_node(right, source, ts, depth + 1, out);
        }
    }
}
