//! Properties of the LTL tableau construction on random small systems.
//!
//! Every retained atom must re-validate against its state, every edge must
//! follow a transition of the underlying system, and along every edge each
//! `Next(e)` closure element in the source subset must agree exactly with
//! `e` in the target subset.

use proptest::prelude::*;

use kripke_formula::{ExprArena, ExprId, ExprKind};
use kripke_mc::{CheckError, Tableau};
use kripke_ts::{GraphDesc, NodeAttr, TranSys};

const LABELS: [&str; 2] = ["p", "q"];

#[derive(Debug, Clone)]
enum Fm {
    Lit(bool),
    Lab(usize),
    Not(Box<Fm>),
    And(Box<Fm>, Box<Fm>),
    Or(Box<Fm>, Box<Fm>),
    Imp(Box<Fm>, Box<Fm>),
    Next(Box<Fm>),
    Until(Box<Fm>, Box<Fm>),
}

fn build(fm: &Fm, arena: &mut ExprArena) -> ExprId {
    match fm {
        Fm::Lit(v) => arena.literal(*v),
        Fm::Lab(i) => arena.label(LABELS[*i]),
        Fm::Not(e) => {
            let e = build(e, arena);
            arena.negation(e)
        }
        Fm::And(l, r) => {
            let (l, r) = (build(l, arena), build(r, arena));
            arena.and(l, r)
        }
        Fm::Or(l, r) => {
            let (l, r) = (build(l, arena), build(r, arena));
            arena.or(l, r)
        }
        Fm::Imp(l, r) => {
            let (l, r) = (build(l, arena), build(r, arena));
            arena.implication(l, r)
        }
        Fm::Next(e) => {
            let e = build(e, arena);
            arena.next(e)
        }
        Fm::Until(l, r) => {
            let (l, r) = (build(l, arena), build(r, arena));
            arena.until(l, r)
        }
    }
}

// Depth is kept small: each level can double the closure and the atom
// enumeration is exponential in closure size.
fn fm_strategy() -> impl Strategy<Value = Fm> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Fm::Lit),
        (0..LABELS.len()).prop_map(Fm::Lab),
    ];
    leaf.prop_recursive(2, 8, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| Fm::Not(Box::new(e))),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Fm::And(Box::new(l), Box::new(r))),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Fm::Or(Box::new(l), Box::new(r))),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Fm::Imp(Box::new(l), Box::new(r))),
            inner.clone().prop_map(|e| Fm::Next(Box::new(e))),
            (inner.clone(), inner).prop_map(|(l, r)| Fm::Until(Box::new(l), Box::new(r))),
        ]
    })
}

fn graph_strategy() -> impl Strategy<Value = GraphDesc> {
    (1usize..=3).prop_flat_map(|n| {
        (
            proptest::collection::vec(any::<bool>(), n * n),
            proptest::collection::vec(0u8..4, n),
        )
            .prop_map(move |(edges, props)| {
                let mut desc = GraphDesc::default();
                for i in 0..n {
                    for j in 0..n {
                        if edges[i * n + j] {
                            desc = desc.transition(format!("s{i}"), format!("s{j}"));
                        }
                    }
                }
                for i in 0..n {
                    let mut labels = Vec::new();
                    for (bit, name) in LABELS.iter().enumerate() {
                        if props[i] >> bit & 1 == 1 {
                            labels.push(name.to_string());
                        }
                    }
                    let attrs = if labels.is_empty() {
                        Vec::new()
                    } else {
                        vec![NodeAttr::Labels { labels }]
                    };
                    desc = desc.node(format!("s{i}"), attrs);
                }
                desc
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn tableau_invariants(desc in graph_strategy(), fm in fm_strategy()) {
        let ts = TranSys::new(&desc);
        let mut arena = ExprArena::new();
        let formula = build(&fm, &mut arena);
        let tableau = match Tableau::build(&mut arena, formula, &ts) {
            Ok(t) => t,
            // A referenced label may not occur in this particular system;
            // the fault path has its own unit tests.
            Err(CheckError::UnknownLabel { .. }) => return Ok(()),
            Err(other) => panic!("unexpected fault: {other}"),
        };

        // No bare negation ever enters the closure.
        for &elem in &tableau.closure {
            prop_assert!(!matches!(arena.kind(elem), ExprKind::Negation(_)));
        }

        // Every retained atom independently re-validates at its state.
        for i in 0..tableau.atoms.len() {
            prop_assert!(tableau.check_atom(&arena, &ts, i).unwrap());
            let atom = &tableau.atoms[i];
            let expected = format!("{}_{}", ts.state(atom.state).name, atom.expressions);
            prop_assert_eq!(&atom.name, &expected);
        }

        // The atom map is exactly the atom list grouped by state.
        let mapped: usize = tableau.atom_map.values().map(Vec::len).sum();
        prop_assert_eq!(mapped, tableau.atoms.len());
        for (&state, indices) in &tableau.atom_map {
            for &i in indices {
                prop_assert_eq!(tableau.atoms[i].state, state);
            }
        }

        // Edge symmetry with the closure, and edges follow transitions.
        for edge in &tableau.edges {
            let a = &tableau.atoms[edge.start];
            let b = &tableau.atoms[edge.end];
            prop_assert!(ts.state(a.state).successors.contains(&b.state));

            let start = &tableau.atom_expressions[a.expressions];
            let end = &tableau.atom_expressions[b.expressions];
            for &elem in &tableau.closure {
                if let ExprKind::Next(e) = *arena.kind(elem) {
                    prop_assert_eq!(start.contains(&elem), end.contains(&e));
                }
            }
        }
    }

    #[test]
    fn construction_is_deterministic(desc in graph_strategy(), fm in fm_strategy()) {
        let ts = TranSys::new(&desc);

        let mut arena_a = ExprArena::new();
        let fa = build(&fm, &mut arena_a);
        let a = Tableau::build(&mut arena_a, fa, &ts);

        let mut arena_b = ExprArena::new();
        let fb = build(&fm, &mut arena_b);
        let b = Tableau::build(&mut arena_b, fb, &ts);

        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.closure.len(), b.closure.len());
                prop_assert_eq!(a.atom_expressions.len(), b.atom_expressions.len());
                prop_assert_eq!(a.atoms.len(), b.atoms.len());
                prop_assert_eq!(a.edges.len(), b.edges.len());
            }
            (Err(ea), Err(eb)) => prop_assert_eq!(ea, eb),
            _ => prop_assert!(false, "one run faulted, the other didn't"),
        }
    }
}
