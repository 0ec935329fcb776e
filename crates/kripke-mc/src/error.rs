//! Fault taxonomy for the checking engines.
//!
//! Every fault aborts the current formula's evaluation; a driver checking a
//! batch of formulas catches per formula and moves on. There are no
//! partial results.

use kripke_formula::Span;
use thiserror::Error;

/// An engine fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// A `Label` node names a proposition the transition system doesn't have.
    #[error("unknown label \"{name}\" in formula")]
    UnknownLabel { name: String },

    /// A node of the wrong logic family reached an engine (e.g. a CTL
    /// `ExistUntil` inside the LTL closure computation).
    #[error("illegal node in AST: {kind}")]
    IllegalNode { kind: &'static str, span: Span },

    /// A bare `Negation` ended up as a closure element; only its negated
    /// child may appear there.
    #[error("negation in closure")]
    NegationInClosure { span: Span },

    /// The closure has more elements than the atom-enumeration bit width
    /// can index. Inherent cap of the exponential tableau construction.
    #[error("too many closure elements: {size} (limit {max})")]
    ClosureTooLarge { size: usize, max: usize },
}

/// Result type for engine operations.
pub type CheckResult<T> = Result<T, CheckError>;
