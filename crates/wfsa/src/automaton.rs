// The automaton capability contract shared by primitive automata and views.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use wfsa_core::Semiring;

/// Weight type of an automaton.
pub type Weight<A> = <<A as Automaton>::Semiring as Semiring>::Weight;

/// A total order over states, consistent with every transition
/// (`from(t)` precedes `to(t)`).
pub type StateOrder<'a, S> = Box<dyn Fn(&S, &S) -> Ordering + 'a>;

/// A weighted automaton (acceptor or transducer), possibly infinite, exposed
/// through lazy enumeration.
///
/// A state is initial if and only if its initial weight is not `zero`, and
/// final if and only if its final weight is not `zero`. There is no separate
/// flag that could disagree with the weights.
///
/// All queries must be referentially transparent: asking twice returns equal
/// answers, even when states and transitions are synthesized on demand.
/// Transitions are values; an implementation may return a fresh (equal)
/// value on every enumeration.
pub trait Automaton {
    /// Transition label. Epsilon transitions have no label.
    type Label: Clone + Eq + Hash + Debug;
    /// State identity; equality and hashing must be structural.
    type State: Clone + Eq + Hash + Debug;
    type Transition: Clone + PartialEq + Debug;
    type Semiring: Semiring;

    /// All states with a non-zero initial weight.
    fn initial_states(&self) -> Vec<Self::State>;

    /// Outgoing transitions of `state`, possibly empty.
    fn transitions_out(&self, state: &Self::State) -> Vec<Self::Transition>;

    /// Initial weight of `state`, `zero` if it is not initial.
    fn initial_weight(&self, state: &Self::State) -> <Self::Semiring as Semiring>::Weight;

    /// Final weight of `state`, `zero` if it is not final.
    fn final_weight(&self, state: &Self::State) -> <Self::Semiring as Semiring>::Weight;

    fn from(&self, transition: &Self::Transition) -> Self::State;

    fn to(&self, transition: &Self::Transition) -> Self::State;

    /// Label of `transition`; `None` for an epsilon transition.
    fn label(&self, transition: &Self::Transition) -> Option<Self::Label>;

    fn transition_weight(
        &self,
        transition: &Self::Transition,
    ) -> <Self::Semiring as Semiring>::Weight;

    /// The semiring this automaton is defined over.
    fn semiring(&self) -> &Self::Semiring;

    /// A topological order over the states, if one is known.
    ///
    /// Shortest-distance computation over an automaton with a known order
    /// relaxes every state exactly once.
    fn topological_order(&self) -> Option<StateOrder<'_, Self::State>> {
        None
    }
}

/// An automaton that can also be traversed backwards.
///
/// Reversal requires this: every state must be reachable backwards from
/// some final state. Automata violating that reverse into automata with
/// unreachable components; nothing reports it.
pub trait ReverselyAccessible: Automaton {
    /// All states with a non-zero final weight.
    fn final_states(&self) -> Vec<Self::State>;

    /// Incoming transitions of `state`, possibly empty.
    fn transitions_in(&self, state: &Self::State) -> Vec<Self::Transition>;
}

impl<A: Automaton> Automaton for &A {
    type Label = A::Label;
    type State = A::State;
    type Transition = A::Transition;
    type Semiring = A::Semiring;

    fn initial_states(&self) -> Vec<A::State> {
        (**self).initial_states()
    }

    fn transitions_out(&self, state: &A::State) -> Vec<A::Transition> {
        (**self).transitions_out(state)
    }

    fn initial_weight(&self, state: &A::State) -> Weight<A> {
        (**self).initial_weight(state)
    }

    fn final_weight(&self, state: &A::State) -> Weight<A> {
        (**self).final_weight(state)
    }

    fn from(&self, transition: &A::Transition) -> A::State {
        (**self).from(transition)
    }

    fn to(&self, transition: &A::Transition) -> A::State {
        (**self).to(transition)
    }

    fn label(&self, transition: &A::Transition) -> Option<A::Label> {
        (**self).label(transition)
    }

    fn transition_weight(&self, transition: &A::Transition) -> Weight<A> {
        (**self).transition_weight(transition)
    }

    fn semiring(&self) -> &A::Semiring {
        (**self).semiring()
    }

    fn topological_order(&self) -> Option<StateOrder<'_, A::State>> {
        (**self).topological_order()
    }
}

impl<A: ReverselyAccessible> ReverselyAccessible for &A {
    fn final_states(&self) -> Vec<A::State> {
        (**self).final_states()
    }

    fn transitions_in(&self, state: &A::State) -> Vec<A::Transition> {
        (**self).transitions_in(state)
    }
}
