// Lazy operation views over automata.
//
// Every view wraps its operands and synthesizes states and transitions on
// demand. Operands are never mutated; wrap a reference (`&A` is itself an
// automaton) to keep using the operand afterwards.

pub mod determinize;
pub mod k_tropical;
pub mod product;
pub mod reverse;
pub mod single_initial;
pub mod union;

pub use determinize::{Determinization, DeterminizedState, DeterminizedTransition};
pub use k_tropical::{KBest, KTropical, KTropicalSemiring, PathList, PathSemiring, PathWeight};
pub use product::{
    AcceptorPairing, Composition, EpsilonFilter, Intersection, LabelPairing, PairState,
    PairTransition, Product, Step, Tape, TransducerPairing,
};
pub use reverse::{Reversal, reverse};
pub use single_initial::{SingleInitialState, SisState, SisTransition};
pub use union::{Union, UnionState, UnionTransition};
