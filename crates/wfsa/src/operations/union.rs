// Union: the tagged disjoint sum of several automata.

use std::cmp::Ordering;

use crate::WfsaError;
use crate::automaton::{Automaton, ReverselyAccessible, StateOrder, Weight};

/// State of a [`Union`]: an operand state tagged with its operand index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnionState<S> {
    pub operand: usize,
    pub state: S,
}

/// Transition of a [`Union`]: an operand transition tagged with its operand
/// index.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionTransition<T> {
    pub operand: usize,
    pub transition: T,
}

/// Union of automata over the same semiring.
///
/// The weight of a string is the sum of its weights in the operands. States
/// of different operands are never merged. The first operand's semiring
/// value is used for all weight arithmetic.
#[derive(Debug, Clone)]
pub struct Union<A> {
    operands: Vec<A>,
}

impl<A: Automaton> Union<A> {
    /// Fails with [`WfsaError::EmptyUnion`] when `operands` is empty.
    pub fn new(operands: Vec<A>) -> Result<Self, WfsaError> {
        if operands.is_empty() {
            return Err(WfsaError::EmptyUnion);
        }
        Ok(Self { operands })
    }

    pub fn operands(&self) -> &[A] {
        &self.operands
    }

    fn tag_states(&self, operand: usize, states: Vec<A::State>) -> Vec<UnionState<A::State>> {
        states
            .into_iter()
            .map(|state| UnionState { operand, state })
            .collect()
    }

    fn tag_transitions(
        &self,
        operand: usize,
        transitions: Vec<A::Transition>,
    ) -> Vec<UnionTransition<A::Transition>> {
        transitions
            .into_iter()
            .map(|transition| UnionTransition {
                operand,
                transition,
            })
            .collect()
    }
}

impl<A: Automaton> Automaton for Union<A> {
    type Label = A::Label;
    type State = UnionState<A::State>;
    type Transition = UnionTransition<A::Transition>;
    type Semiring = A::Semiring;

    fn initial_states(&self) -> Vec<Self::State> {
        self.operands
            .iter()
            .enumerate()
            .flat_map(|(i, a)| self.tag_states(i, a.initial_states()))
            .collect()
    }

    fn transitions_out(&self, state: &Self::State) -> Vec<Self::Transition> {
        let a = &self.operands[state.operand];
        self.tag_transitions(state.operand, a.transitions_out(&state.state))
    }

    fn initial_weight(&self, state: &Self::State) -> Weight<A> {
        self.operands[state.operand].initial_weight(&state.state)
    }

    fn final_weight(&self, state: &Self::State) -> Weight<A> {
        self.operands[state.operand].final_weight(&state.state)
    }

    fn from(&self, transition: &Self::Transition) -> Self::State {
        UnionState {
            operand: transition.operand,
            state: self.operands[transition.operand].from(&transition.transition),
        }
    }

    fn to(&self, transition: &Self::Transition) -> Self::State {
        UnionState {
            operand: transition.operand,
            state: self.operands[transition.operand].to(&transition.transition),
        }
    }

    fn label(&self, transition: &Self::Transition) -> Option<A::Label> {
        self.operands[transition.operand].label(&transition.transition)
    }

    fn transition_weight(&self, transition: &Self::Transition) -> Weight<A> {
        self.operands[transition.operand].transition_weight(&transition.transition)
    }

    fn semiring(&self) -> &A::Semiring {
        self.operands[0].semiring()
    }

    /// Operand by operand, each in its own order. Known only when every
    /// operand knows its order.
    fn topological_order(&self) -> Option<StateOrder<'_, Self::State>> {
        let orders = self
            .operands
            .iter()
            .map(|a| a.topological_order())
            .collect::<Option<Vec<_>>>()?;
        Some(Box::new(
            move |a: &UnionState<A::State>, b: &UnionState<A::State>| match a
                .operand
                .cmp(&b.operand)
            {
                Ordering::Equal => orders[a.operand](&a.state, &b.state),
                other => other,
            },
        ))
    }
}

impl<A: ReverselyAccessible> ReverselyAccessible for Union<A> {
    fn final_states(&self) -> Vec<Self::State> {
        self.operands
            .iter()
            .enumerate()
            .flat_map(|(i, a)| self.tag_states(i, a.final_states()))
            .collect()
    }

    fn transitions_in(&self, state: &Self::State) -> Vec<Self::Transition> {
        let a = &self.operands[state.operand];
        self.tag_transitions(state.operand, a.transitions_in(&state.state))
    }
}
