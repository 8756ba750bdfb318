// Single-initial-state normalization.

use std::cmp::Ordering;

use wfsa_core::Semiring;

use crate::automaton::{Automaton, StateOrder, Weight};

/// State of a [`SingleInitialState`] view: an operand state, or the
/// synthetic initial state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SisState<S> {
    operand: Option<S>,
}

impl<S> SisState<S> {
    fn synthetic() -> Self {
        Self { operand: None }
    }

    /// The wrapped operand state; `None` for the synthetic initial state.
    pub fn operand(&self) -> Option<&S> {
        self.operand.as_ref()
    }

    pub fn into_operand(self) -> Option<S> {
        self.operand
    }

    pub fn is_synthetic(&self) -> bool {
        self.operand.is_none()
    }
}

/// Transition of a [`SingleInitialState`] view.
///
/// A fused transition is an outgoing transition of an operand initial state
/// re-rooted at the synthetic state, with the initial weight folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct SisTransition<T> {
    fused: bool,
    transition: T,
}

impl<T> SisTransition<T> {
    pub fn operand(&self) -> &T {
        &self.transition
    }

    pub fn is_fused(&self) -> bool {
        self.fused
    }
}

/// View with exactly one initial state, of weight `one`.
///
/// The synthetic initial state has the outgoing transitions of every operand
/// initial state `q`, each scaled by `initial_weight(q)`, and the final
/// weight `⊕ initial_weight(q) ⊗ final_weight(q)`. It accepts the same
/// weighted language as the operand.
#[derive(Debug, Clone)]
pub struct SingleInitialState<A> {
    operand: A,
}

impl<A: Automaton> SingleInitialState<A> {
    pub fn new(operand: A) -> Self {
        Self { operand }
    }

    pub fn operand(&self) -> &A {
        &self.operand
    }

    /// The synthetic initial state.
    pub fn initial_state(&self) -> SisState<A::State> {
        SisState::synthetic()
    }
}

impl<A: Automaton> Automaton for SingleInitialState<A> {
    type Label = A::Label;
    type State = SisState<A::State>;
    type Transition = SisTransition<A::Transition>;
    type Semiring = A::Semiring;

    fn initial_states(&self) -> Vec<Self::State> {
        vec![SisState::synthetic()]
    }

    fn transitions_out(&self, state: &Self::State) -> Vec<Self::Transition> {
        match &state.operand {
            Some(s) => self
                .operand
                .transitions_out(s)
                .into_iter()
                .map(|transition| SisTransition {
                    fused: false,
                    transition,
                })
                .collect(),
            None => self
                .operand
                .initial_states()
                .iter()
                .flat_map(|s| self.operand.transitions_out(s))
                .map(|transition| SisTransition {
                    fused: true,
                    transition,
                })
                .collect(),
        }
    }

    fn initial_weight(&self, state: &Self::State) -> Weight<A> {
        let semiring = self.operand.semiring();
        if state.is_synthetic() {
            semiring.one()
        } else {
            semiring.zero()
        }
    }

    fn final_weight(&self, state: &Self::State) -> Weight<A> {
        let semiring = self.operand.semiring();
        match &state.operand {
            Some(s) => self.operand.final_weight(s),
            None => self
                .operand
                .initial_states()
                .iter()
                .fold(semiring.zero(), |acc, s| {
                    let w = semiring.multiply(
                        &self.operand.initial_weight(s),
                        &self.operand.final_weight(s),
                    );
                    semiring.add(&acc, &w)
                }),
        }
    }

    fn from(&self, transition: &Self::Transition) -> Self::State {
        if transition.fused {
            SisState::synthetic()
        } else {
            SisState {
                operand: Some(self.operand.from(&transition.transition)),
            }
        }
    }

    fn to(&self, transition: &Self::Transition) -> Self::State {
        SisState {
            operand: Some(self.operand.to(&transition.transition)),
        }
    }

    fn label(&self, transition: &Self::Transition) -> Option<A::Label> {
        self.operand.label(&transition.transition)
    }

    fn transition_weight(&self, transition: &Self::Transition) -> Weight<A> {
        let weight = self.operand.transition_weight(&transition.transition);
        if transition.fused {
            let origin = self.operand.from(&transition.transition);
            self.operand
                .semiring()
                .multiply(&self.operand.initial_weight(&origin), &weight)
        } else {
            weight
        }
    }

    fn semiring(&self) -> &A::Semiring {
        self.operand.semiring()
    }

    fn topological_order(&self) -> Option<StateOrder<'_, Self::State>> {
        let order = self.operand.topological_order()?;
        Some(Box::new(
            move |a: &SisState<A::State>, b: &SisState<A::State>| match (&a.operand, &b.operand) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => order(x, y),
            },
        ))
    }
}
