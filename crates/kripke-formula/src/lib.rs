//! Formula AST for the kripke model checker.
//!
//! Parsers build formula trees into an [`ExprArena`] and hand root
//! [`ExprId`]s to the engines in `kripke-mc`; this crate carries no
//! parsing or checking logic itself.

pub mod ast;
pub mod pretty;

pub use ast::{Expr, ExprArena, ExprId, ExprKind, Span};
pub use pretty::{format_expr, FormatMode};
