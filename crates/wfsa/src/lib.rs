//! Weighted finite-state automata over arbitrary semirings.
//!
//! Automata are exposed only through the [`Automaton`] capability trait, so
//! primitive automata and lazily computed operation views are used the same
//! way. Views never copy their operands: every state and transition of a
//! union, intersection, determinization or reversal is synthesized when it is
//! enumerated.
//!
//! # Architecture
//!
//! - [`automaton`] -- The `Automaton` and `ReverselyAccessible` contracts
//! - [`primitive`] -- Single-string and single-transition automata
//! - [`explicit`] -- Arena-backed automata and their builder
//! - [`queue`] -- Frontier strategies (FIFO, topological, best-first)
//! - [`shortest_distance`] -- Generalized single-source shortest distance
//! - [`operations`] -- Lazy operation views
//! - [`automata`] -- Traversal and the shortest-distance / k-best queries
//! - [`description`] -- Serde description format (feature `serde`)

pub mod automata;
pub mod automaton;
#[cfg(feature = "serde")]
pub mod description;
pub mod explicit;
pub mod operations;
pub mod primitive;
pub mod queue;
pub mod shortest_distance;

pub use automata::Path;
pub use automaton::{Automaton, ReverselyAccessible, StateOrder, Weight};
pub use explicit::{AutomatonBuilder, ExplicitAutomaton, StateId, TransitionId};
pub use shortest_distance::ShortestDistances;
pub use wfsa_core::{self as algebra, SemiringError};

/// Error type for automaton construction and operation setup.
#[derive(Debug, thiserror::Error)]
pub enum WfsaError {
    #[error(transparent)]
    Semiring(#[from] SemiringError),
    #[error("a union needs at least one operand")]
    EmptyUnion,
    #[error("unknown state {state}: the automaton has {states} states")]
    UnknownState { state: usize, states: usize },
    #[error("invalid automaton description: {0}")]
    Description(String),
}
