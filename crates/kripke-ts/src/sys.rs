//! The resolved transition system.
//!
//! Built once from a [`GraphDesc`] in two passes: first every state and
//! label mentioned anywhere is created, then adjacency, atomic
//! propositions, and the initial-state set are wired up. Immutable after
//! construction; states and labels live exactly as long as the [`TranSys`].

use std::collections::{BTreeSet, HashMap};

use crate::graph::{GraphDesc, GraphStmt, NodeAttr};

/// Shape attribute value that marks a node as an initial state.
const INIT_SHAPE: &str = "box";

/// Index of a label in a [`TranSys`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(u32);

impl LabelId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a state in a [`TranSys`].
///
/// Ids are assigned in order of first mention in the graph description, so
/// iteration over id-ordered sets is deterministic for a given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An atomic proposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

/// A named graph node with its labeling and adjacency.
///
/// Invariant: `b ∈ a.successors` iff `a ∈ b.predecessors`, for any two
/// states `a`, `b` of the same system.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub name: String,
    /// Atomic propositions holding in this state.
    pub props: BTreeSet<LabelId>,
    pub successors: BTreeSet<StateId>,
    pub predecessors: BTreeSet<StateId>,
}

/// A finite labeled transition system.
#[derive(Debug, Clone)]
pub struct TranSys {
    labels: Vec<Label>,
    label_ids: HashMap<String, LabelId>,
    states: Vec<State>,
    state_ids: HashMap<String, StateId>,
    /// All states.
    pub states_set: BTreeSet<StateId>,
    /// Designated initial states.
    pub init: BTreeSet<StateId>,
}

impl TranSys {
    /// Resolve a graph description into a transition system.
    pub fn new(desc: &GraphDesc) -> Self {
        let mut sys = Self {
            labels: Vec::new(),
            label_ids: HashMap::new(),
            states: Vec::new(),
            state_ids: HashMap::new(),
            states_set: BTreeSet::new(),
            init: BTreeSet::new(),
        };

        // First pass: create every mentioned state and label.
        for stmt in &desc.statements {
            match stmt {
                GraphStmt::Transition { from, to } => {
                    sys.intern_state(from);
                    sys.intern_state(to);
                }
                GraphStmt::Node { name, attrs } => {
                    sys.intern_state(name);
                    for attr in attrs {
                        if let NodeAttr::Labels { labels } = attr {
                            for ap in labels {
                                sys.intern_label(ap);
                            }
                        }
                    }
                }
            }
        }
        sys.states_set = (0..sys.states.len() as u32).map(StateId).collect();

        // Second pass: adjacency, propositions, initial set.
        for stmt in &desc.statements {
            match stmt {
                GraphStmt::Transition { from, to } => {
                    let from = sys.state_ids[from.as_str()];
                    let to = sys.state_ids[to.as_str()];
                    sys.states[from.index()].successors.insert(to);
                    sys.states[to.index()].predecessors.insert(from);
                }
                GraphStmt::Node { name, attrs } => {
                    let state = sys.state_ids[name.as_str()];
                    for attr in attrs {
                        match attr {
                            NodeAttr::Shape { shape } => {
                                if shape == INIT_SHAPE {
                                    sys.init.insert(state);
                                }
                            }
                            NodeAttr::Labels { labels } => {
                                for ap in labels {
                                    let label = sys.label_ids[ap.as_str()];
                                    sys.states[state.index()].props.insert(label);
                                }
                            }
                        }
                    }
                }
            }
        }

        sys
    }

    fn intern_state(&mut self, name: &str) -> StateId {
        if let Some(&id) = self.state_ids.get(name) {
            return id;
        }
        let id = StateId(self.states.len() as u32);
        self.states.push(State {
            name: name.to_string(),
            ..State::default()
        });
        self.state_ids.insert(name.to_string(), id);
        id
    }

    fn intern_label(&mut self, name: &str) -> LabelId {
        if let Some(&id) = self.label_ids.get(name) {
            return id;
        }
        let id = LabelId(self.labels.len() as u32);
        self.labels.push(Label {
            name: name.to_string(),
        });
        self.label_ids.insert(name.to_string(), id);
        id
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    pub fn label(&self, id: LabelId) -> &Label {
        &self.labels[id.index()]
    }

    /// Look up a state by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.state_ids.get(name).copied()
    }

    /// Look up a label by name.
    pub fn label_id(&self, name: &str) -> Option<LabelId> {
        self.label_ids.get(name).copied()
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// All states in id order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId(i as u32), s))
    }
}
