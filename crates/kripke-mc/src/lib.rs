//! Model checking engines for finite labeled transition systems.
//!
//! Two independent engines over an already-built formula arena and
//! [`kripke_ts::TranSys`]:
//!
//! - [`ctl::compute_sat`] decides a branching-time formula and returns the
//!   verdict with a per-subformula proof tree.
//! - [`ltl::Tableau::build`] constructs the Fischer-Ladner closure, the
//!   consistent atoms per state, and the tableau edges for a linear-time
//!   formula.
//!
//! Both run to completion or fail with a [`CheckError`]; invocations are
//! independent and share no mutable state.

pub mod ctl;
pub mod error;
pub mod ltl;
pub mod sets;

pub use ctl::{compute_sat, render_report, ProofChildren, SatProof, SatSet};
pub use error::{CheckError, CheckResult};
pub use ltl::{Atom, ExpSet, Tableau, TableauEdge, MAX_CLOSURE};
