//! Transition system model — graph description interchange types plus the
//! resolved [`TranSys`] the engines check against.

pub mod graph;
pub mod sys;

pub use graph::{GraphDesc, GraphStmt, NodeAttr};
pub use sys::{Label, LabelId, State, StateId, TranSys};
