//! Weight algebra shared by every weighted automaton in the `wfsa` family.
//!
//! This crate contains no automata. It defines the algebraic contract that
//! automaton weights satisfy and the conditions shortest-distance solvers use
//! to decide when an estimate has stopped changing.
//!
//! # Architecture
//!
//! - [`semiring`] -- `Semiring`, `Semifield` and `OrderedSemiring` contracts
//! - [`semirings`] -- Boolean, real, tropical and log semirings
//! - [`convergence`] -- Convergence conditions (exact, tolerance, closures)

pub mod convergence;
pub mod semiring;
pub mod semirings;

pub use convergence::{ConvergenceCondition, ExactConvergence, ToleranceConvergence};
pub use semiring::{OrderedSemiring, Semifield, Semiring};
pub use semirings::{BooleanSemiring, LogSemiring, RealSemiring, TropicalSemiring};

/// Error type for semiring operations that are undefined for their argument.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemiringError {
    #[error("the additive identity has no multiplicative inverse")]
    ZeroInverse,
    #[error("weight {0} has no multiplicative inverse")]
    NotInvertible(String),
}
