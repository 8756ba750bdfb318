// Reversal of reversely accessible automata.

use crate::automaton::{Automaton, ReverselyAccessible, StateOrder, Weight};

/// The operand with every transition turned around and the roles of
/// initial and final weights swapped.
///
/// The reversal is itself reversely accessible, so reversing twice gives
/// back the operand's language and weights.
#[derive(Debug, Clone)]
pub struct Reversal<A> {
    operand: A,
}

impl<A: ReverselyAccessible> Reversal<A> {
    pub fn new(operand: A) -> Self {
        Self { operand }
    }

    pub fn operand(&self) -> &A {
        &self.operand
    }

    pub fn into_operand(self) -> A {
        self.operand
    }
}

/// Shorthand for [`Reversal::new`].
pub fn reverse<A: ReverselyAccessible>(operand: A) -> Reversal<A> {
    Reversal::new(operand)
}

impl<A: ReverselyAccessible> Automaton for Reversal<A> {
    type Label = A::Label;
    type State = A::State;
    type Transition = A::Transition;
    type Semiring = A::Semiring;

    fn initial_states(&self) -> Vec<A::State> {
        self.operand.final_states()
    }

    fn transitions_out(&self, state: &A::State) -> Vec<A::Transition> {
        self.operand.transitions_in(state)
    }

    fn initial_weight(&self, state: &A::State) -> Weight<A> {
        self.operand.final_weight(state)
    }

    fn final_weight(&self, state: &A::State) -> Weight<A> {
        self.operand.initial_weight(state)
    }

    fn from(&self, transition: &A::Transition) -> A::State {
        self.operand.to(transition)
    }

    fn to(&self, transition: &A::Transition) -> A::State {
        self.operand.from(transition)
    }

    fn label(&self, transition: &A::Transition) -> Option<A::Label> {
        self.operand.label(transition)
    }

    fn transition_weight(&self, transition: &A::Transition) -> Weight<A> {
        self.operand.transition_weight(transition)
    }

    fn semiring(&self) -> &A::Semiring {
        self.operand.semiring()
    }

    fn topological_order(&self) -> Option<StateOrder<'_, A::State>> {
        let order = self.operand.topological_order()?;
        Some(Box::new(move |a: &A::State, b: &A::State| order(b, a)))
    }
}

impl<A: ReverselyAccessible> ReverselyAccessible for Reversal<A> {
    fn final_states(&self) -> Vec<A::State> {
        self.operand.initial_states()
    }

    fn transitions_in(&self, state: &A::State) -> Vec<A::Transition> {
        self.operand.transitions_out(state)
    }
}
