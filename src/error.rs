//! Engine error taxonomy
//!
//! Only logic errors and configuration errors surface here. Bounded-retry
//! exhaustion (seeding, particle placement) is best-effort and never an error.

use thiserror::Error;

use crate::sim::cell::CellKind;

/// Errors raised by the simulation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Neither participant was alive, or the pairing has no merge rule.
    #[error("cannot merge {lhs} with {rhs}: at least one alive cell and a dormant or alive partner required")]
    InvalidMerge { lhs: CellKind, rhs: CellKind },
    /// A stochastic stage was configured but no random source was supplied.
    #[error("hazard spawning is configured but no random source was supplied")]
    MissingRng,
}
