// Primitive automata: a single string and a single transition.

use std::fmt::Debug;
use std::hash::Hash;

use wfsa_core::Semiring;

use crate::automaton::{Automaton, ReverselyAccessible, StateOrder};

/// Acceptor of exactly one string, with weight `one`.
///
/// States are the positions `0..=len` in the string; transition `i` reads
/// `string[i]` and moves from position `i` to `i + 1`. Position order is a
/// topological order.
#[derive(Debug, Clone)]
pub struct SingleStringAutomaton<L, S> {
    semiring: S,
    string: Vec<L>,
}

impl<L, S> SingleStringAutomaton<L, S> {
    pub fn new(semiring: S, string: Vec<L>) -> Self {
        Self { semiring, string }
    }

    /// The accepted string.
    pub fn string(&self) -> &[L] {
        &self.string
    }
}

impl<L, S> Automaton for SingleStringAutomaton<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Semiring,
{
    type Label = L;
    type State = usize;
    type Transition = usize;
    type Semiring = S;

    fn initial_states(&self) -> Vec<usize> {
        vec![0]
    }

    fn transitions_out(&self, state: &usize) -> Vec<usize> {
        if *state < self.string.len() {
            vec![*state]
        } else {
            Vec::new()
        }
    }

    fn initial_weight(&self, state: &usize) -> S::Weight {
        if *state == 0 {
            self.semiring.one()
        } else {
            self.semiring.zero()
        }
    }

    fn final_weight(&self, state: &usize) -> S::Weight {
        if *state == self.string.len() {
            self.semiring.one()
        } else {
            self.semiring.zero()
        }
    }

    fn from(&self, transition: &usize) -> usize {
        *transition
    }

    fn to(&self, transition: &usize) -> usize {
        transition + 1
    }

    fn label(&self, transition: &usize) -> Option<L> {
        self.string.get(*transition).cloned()
    }

    fn transition_weight(&self, _transition: &usize) -> S::Weight {
        self.semiring.one()
    }

    fn semiring(&self) -> &S {
        &self.semiring
    }

    fn topological_order(&self) -> Option<StateOrder<'_, usize>> {
        Some(Box::new(|a: &usize, b: &usize| a.cmp(b)))
    }
}

impl<L, S> ReverselyAccessible for SingleStringAutomaton<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Semiring,
{
    fn final_states(&self) -> Vec<usize> {
        vec![self.string.len()]
    }

    fn transitions_in(&self, state: &usize) -> Vec<usize> {
        if *state > 0 && *state <= self.string.len() {
            vec![state - 1]
        } else {
            Vec::new()
        }
    }
}

/// The only transition of a [`SingleTransitionAutomaton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SingleTransition;

/// Two states joined by one weighted transition: state `0` is initial,
/// state `1` is final, both with weight `one`.
///
/// A `None` label makes it an epsilon transition.
#[derive(Debug, Clone)]
pub struct SingleTransitionAutomaton<L, S: Semiring> {
    semiring: S,
    label: Option<L>,
    weight: S::Weight,
}

impl<L, S: Semiring> SingleTransitionAutomaton<L, S> {
    pub fn new(semiring: S, label: Option<L>, weight: S::Weight) -> Self {
        Self {
            semiring,
            label,
            weight,
        }
    }
}

impl<L, S> Automaton for SingleTransitionAutomaton<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Semiring,
{
    type Label = L;
    type State = u8;
    type Transition = SingleTransition;
    type Semiring = S;

    fn initial_states(&self) -> Vec<u8> {
        vec![0]
    }

    fn transitions_out(&self, state: &u8) -> Vec<SingleTransition> {
        if *state == 0 {
            vec![SingleTransition]
        } else {
            Vec::new()
        }
    }

    fn initial_weight(&self, state: &u8) -> S::Weight {
        if *state == 0 {
            self.semiring.one()
        } else {
            self.semiring.zero()
        }
    }

    fn final_weight(&self, state: &u8) -> S::Weight {
        if *state == 1 {
            self.semiring.one()
        } else {
            self.semiring.zero()
        }
    }

    fn from(&self, _transition: &SingleTransition) -> u8 {
        0
    }

    fn to(&self, _transition: &SingleTransition) -> u8 {
        1
    }

    fn label(&self, _transition: &SingleTransition) -> Option<L> {
        self.label.clone()
    }

    fn transition_weight(&self, _transition: &SingleTransition) -> S::Weight {
        self.weight.clone()
    }

    fn semiring(&self) -> &S {
        &self.semiring
    }

    fn topological_order(&self) -> Option<StateOrder<'_, u8>> {
        Some(Box::new(|a: &u8, b: &u8| a.cmp(b)))
    }
}

impl<L, S> ReverselyAccessible for SingleTransitionAutomaton<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Semiring,
{
    fn final_states(&self) -> Vec<u8> {
        vec![1]
    }

    fn transitions_in(&self, state: &u8) -> Vec<SingleTransition> {
        if *state == 1 {
            vec![SingleTransition]
        } else {
            Vec::new()
        }
    }
}
