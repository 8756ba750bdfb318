// Arena-backed automata: every state and transition is stored explicitly.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use hashbrown::HashMap;
use wfsa_core::Semiring;

use crate::WfsaError;
use crate::automata;
use crate::automaton::{Automaton, ReverselyAccessible, StateOrder, Weight};

/// Index of a state in an [`ExplicitAutomaton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// Stands for the endpoints of a transition the automaton does not have.
    /// No automaton has this state.
    const ABSENT: StateId = StateId(u32::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a transition in an [`ExplicitAutomaton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u32);

impl TransitionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct StateEntry<W> {
    initial_weight: W,
    final_weight: W,
    outgoing: Vec<TransitionId>,
    incoming: Vec<TransitionId>,
}

#[derive(Debug, Clone)]
struct TransitionEntry<L, W> {
    from: StateId,
    to: StateId,
    label: Option<L>,
    weight: W,
}

/// Incrementally assembles an [`ExplicitAutomaton`].
///
/// States start with zero initial and final weight. The built automaton is
/// immutable.
#[derive(Debug, Clone)]
pub struct AutomatonBuilder<L, S: Semiring> {
    semiring: S,
    states: Vec<StateEntry<S::Weight>>,
    transitions: Vec<TransitionEntry<L, S::Weight>>,
}

impl<L, S: Semiring> AutomatonBuilder<L, S> {
    pub fn new(semiring: S) -> Self {
        Self {
            semiring,
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn add_state(&mut self) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(StateEntry {
            initial_weight: self.semiring.zero(),
            final_weight: self.semiring.zero(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        id
    }

    /// Add `count` states, returned in creation order.
    pub fn add_states(&mut self, count: usize) -> Vec<StateId> {
        (0..count).map(|_| self.add_state()).collect()
    }

    pub fn set_initial_weight(&mut self, state: StateId, weight: S::Weight) -> Result<(), WfsaError> {
        self.entry_mut(state)?.initial_weight = weight;
        Ok(())
    }

    pub fn set_final_weight(&mut self, state: StateId, weight: S::Weight) -> Result<(), WfsaError> {
        self.entry_mut(state)?.final_weight = weight;
        Ok(())
    }

    /// Add a transition; a `None` label makes it an epsilon transition.
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        label: Option<L>,
        weight: S::Weight,
    ) -> Result<TransitionId, WfsaError> {
        self.entry_mut(to)?;
        let id = TransitionId(self.transitions.len() as u32);
        self.entry_mut(from)?.outgoing.push(id);
        self.entry_mut(to)?.incoming.push(id);
        self.transitions.push(TransitionEntry {
            from,
            to,
            label,
            weight,
        });
        Ok(id)
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn build(self) -> ExplicitAutomaton<L, S> {
        let initial_states = self.states_where(|e| &e.initial_weight);
        let final_states = self.states_where(|e| &e.final_weight);
        let ranks = topological_ranks(&self.states, &self.transitions);
        ExplicitAutomaton {
            semiring: self.semiring,
            states: self.states,
            transitions: self.transitions,
            initial_states,
            final_states,
            ranks,
        }
    }

    fn entry_mut(&mut self, state: StateId) -> Result<&mut StateEntry<S::Weight>, WfsaError> {
        let states = self.states.len();
        self.states
            .get_mut(state.index())
            .ok_or(WfsaError::UnknownState {
                state: state.index(),
                states,
            })
    }

    fn states_where<F>(&self, weight: F) -> Vec<StateId>
    where
        F: Fn(&StateEntry<S::Weight>) -> &S::Weight,
    {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, e)| !self.semiring.is_zero(weight(e)))
            .map(|(i, _)| StateId(i as u32))
            .collect()
    }
}

/// Position of every state in a topological order (Kahn's algorithm), or
/// `None` if the graph has a cycle.
fn topological_ranks<L, W>(
    states: &[StateEntry<W>],
    transitions: &[TransitionEntry<L, W>],
) -> Option<Vec<u32>> {
    let mut in_degree: Vec<usize> = states.iter().map(|e| e.incoming.len()).collect();
    let mut ready: VecDeque<usize> = (0..states.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut ranks = vec![0u32; states.len()];
    let mut next_rank = 0u32;

    while let Some(state) = ready.pop_front() {
        ranks[state] = next_rank;
        next_rank += 1;
        for t in &states[state].outgoing {
            let to = transitions[t.index()].to.index();
            in_degree[to] -= 1;
            if in_degree[to] == 0 {
                ready.push_back(to);
            }
        }
    }

    (next_rank as usize == states.len()).then_some(ranks)
}

/// An immutable automaton whose states and transitions live in arenas.
///
/// This is the materialized counterpart of the lazy views: build it with
/// [`AutomatonBuilder`], or copy the reachable part of any finite automaton
/// with [`materialize`]. Acyclic automata expose a topological order.
#[derive(Debug, Clone)]
pub struct ExplicitAutomaton<L, S: Semiring> {
    semiring: S,
    states: Vec<StateEntry<S::Weight>>,
    transitions: Vec<TransitionEntry<L, S::Weight>>,
    initial_states: Vec<StateId>,
    final_states: Vec<StateId>,
    ranks: Option<Vec<u32>>,
}

impl<L, S: Semiring> ExplicitAutomaton<L, S> {
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// All states in creation order, reachable or not.
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + use<L, S> {
        (0..self.states.len() as u32).map(StateId)
    }

    /// All transitions in creation order.
    pub fn transition_ids(&self) -> impl Iterator<Item = TransitionId> + use<L, S> {
        (0..self.transitions.len() as u32).map(TransitionId)
    }

    pub fn is_acyclic(&self) -> bool {
        self.ranks.is_some()
    }
}

impl<L, S> Automaton for ExplicitAutomaton<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Semiring,
{
    type Label = L;
    type State = StateId;
    type Transition = TransitionId;
    type Semiring = S;

    fn initial_states(&self) -> Vec<StateId> {
        self.initial_states.clone()
    }

    fn transitions_out(&self, state: &StateId) -> Vec<TransitionId> {
        self.states
            .get(state.index())
            .map(|e| e.outgoing.clone())
            .unwrap_or_default()
    }

    fn initial_weight(&self, state: &StateId) -> S::Weight {
        self.states
            .get(state.index())
            .map_or_else(|| self.semiring.zero(), |e| e.initial_weight.clone())
    }

    fn final_weight(&self, state: &StateId) -> S::Weight {
        self.states
            .get(state.index())
            .map_or_else(|| self.semiring.zero(), |e| e.final_weight.clone())
    }

    fn from(&self, transition: &TransitionId) -> StateId {
        self.transitions
            .get(transition.index())
            .map_or(StateId::ABSENT, |t| t.from)
    }

    fn to(&self, transition: &TransitionId) -> StateId {
        self.transitions
            .get(transition.index())
            .map_or(StateId::ABSENT, |t| t.to)
    }

    fn label(&self, transition: &TransitionId) -> Option<L> {
        self.transitions
            .get(transition.index())
            .and_then(|t| t.label.clone())
    }

    fn transition_weight(&self, transition: &TransitionId) -> S::Weight {
        self.transitions
            .get(transition.index())
            .map_or_else(|| self.semiring.zero(), |t| t.weight.clone())
    }

    fn semiring(&self) -> &S {
        &self.semiring
    }

    fn topological_order(&self) -> Option<StateOrder<'_, StateId>> {
        let ranks = self.ranks.as_ref()?;
        Some(Box::new(move |a: &StateId, b: &StateId| {
            ranks.get(a.index()).cmp(&ranks.get(b.index()))
        }))
    }
}

impl<L, S> ReverselyAccessible for ExplicitAutomaton<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Semiring,
{
    fn final_states(&self) -> Vec<StateId> {
        self.final_states.clone()
    }

    fn transitions_in(&self, state: &StateId) -> Vec<TransitionId> {
        self.states
            .get(state.index())
            .map(|e| e.incoming.clone())
            .unwrap_or_default()
    }
}

/// Copy the part of `automaton` reachable from its initial states into an
/// [`ExplicitAutomaton`].
///
/// States are numbered in traversal order. Only terminates for automata
/// with finitely many reachable states.
pub fn materialize<A>(
    automaton: &A,
) -> Result<ExplicitAutomaton<A::Label, A::Semiring>, WfsaError>
where
    A: Automaton,
    A::Semiring: Clone,
{
    let mut builder = AutomatonBuilder::new(automaton.semiring().clone());
    let states = automata::states(automaton);
    let mut ids: HashMap<A::State, StateId> = HashMap::with_capacity(states.len());
    for state in &states {
        let id = builder.add_state();
        builder.set_initial_weight(id, automaton.initial_weight(state))?;
        builder.set_final_weight(id, automaton.final_weight(state))?;
        ids.insert(state.clone(), id);
    }

    for (index, state) in states.iter().enumerate() {
        let from = StateId(index as u32);
        for transition in automaton.transitions_out(state) {
            let to = *ids
                .entry(automaton.to(&transition))
                .or_insert_with(|| builder.add_state());
            let weight: Weight<A> = automaton.transition_weight(&transition);
            builder.add_transition(from, to, automaton.label(&transition), weight)?;
        }
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::SingleStringAutomaton;
    use wfsa_core::TropicalSemiring;

    fn chain() -> ExplicitAutomaton<char, TropicalSemiring> {
        let mut b = AutomatonBuilder::new(TropicalSemiring);
        let s = b.add_states(3);
        b.set_initial_weight(s[0], 0.0).unwrap();
        b.set_final_weight(s[2], 0.5).unwrap();
        b.add_transition(s[0], s[1], Some('a'), 1.0).unwrap();
        b.add_transition(s[1], s[2], Some('b'), 2.0).unwrap();
        b.build()
    }

    #[test]
    fn initial_and_final_states_follow_weights() {
        let a = chain();
        assert_eq!(a.initial_states(), vec![StateId(0)]);
        assert_eq!(a.final_states(), vec![StateId(2)]);
        assert_eq!(a.initial_weight(&StateId(1)), f64::INFINITY);
    }

    #[test]
    fn transitions_both_ways() {
        let a = chain();
        let out = a.transitions_out(&StateId(1));
        assert_eq!(out.len(), 1);
        assert_eq!(a.to(&out[0]), StateId(2));
        assert_eq!(a.label(&out[0]), Some('b'));
        assert_eq!(a.transitions_in(&StateId(1)), vec![TransitionId(0)]);
    }

    #[test]
    fn acyclic_automaton_has_order() {
        let a = chain();
        assert!(a.is_acyclic());
        let order = a.topological_order().unwrap();
        assert_eq!(order(&StateId(0), &StateId(2)), std::cmp::Ordering::Less);
    }

    #[test]
    fn cycle_removes_order() {
        let mut b = AutomatonBuilder::new(TropicalSemiring);
        let s = b.add_state();
        b.set_initial_weight(s, 0.0).unwrap();
        b.add_transition(s, s, Some('a'), 1.0).unwrap();
        let a = b.build();
        assert!(!a.is_acyclic());
        assert!(a.topological_order().is_none());
    }

    #[test]
    fn unknown_state_is_rejected() {
        let mut b: AutomatonBuilder<char, _> = AutomatonBuilder::new(TropicalSemiring);
        let s = b.add_state();
        let err = b
            .add_transition(s, StateId(7), None, 0.0)
            .unwrap_err();
        assert!(matches!(err, WfsaError::UnknownState { state: 7, states: 1 }));
        assert_eq!(b.build().num_transitions(), 0);
    }

    #[test]
    fn materialize_copies_reachable_part() {
        let source = SingleStringAutomaton::new(TropicalSemiring, vec!['x', 'y']);
        let copy = materialize(&source).unwrap();
        assert_eq!(copy.num_states(), 3);
        assert_eq!(copy.num_transitions(), 2);
        assert_eq!(copy.initial_states().len(), 1);
        assert_eq!(copy.final_states().len(), 1);
        assert!(copy.is_acyclic());
    }

    #[test]
    fn materialize_keeps_weights_and_labels() {
        let mut b = AutomatonBuilder::new(TropicalSemiring);
        let s = b.add_states(3);
        b.set_initial_weight(s[0], 0.25).unwrap();
        b.set_final_weight(s[0], 3.0).unwrap();
        b.set_final_weight(s[2], 1.0).unwrap();
        b.add_transition(s[0], s[1], Some('a'), 1.0).unwrap();
        b.add_transition(s[1], s[1], None, 0.5).unwrap();
        b.add_transition(s[1], s[2], Some('b'), 2.0).unwrap();
        let source = b.build();

        let copy = materialize(&source).unwrap();
        assert_eq!(copy.num_states(), 3);
        assert_eq!(copy.num_transitions(), 3);
        assert!(!copy.is_acyclic());
        assert_eq!(copy.initial_weight(&StateId(0)), 0.25);
        assert_eq!(copy.final_weight(&StateId(0)), 3.0);
        for word in ["", "ab", "a", "b"] {
            let word: Vec<char> = word.chars().collect();
            assert_eq!(
                automata::string_weight(&copy, &word),
                automata::string_weight(&source, &word)
            );
        }
    }

    #[test]
    fn foreign_transition_has_absent_endpoints() {
        let a = chain();
        let foreign = TransitionId(9);
        let from = a.from(&foreign);
        assert_eq!(a.to(&foreign), from);
        assert!(from.index() >= a.num_states());
        assert!(a.transitions_out(&from).is_empty());
        assert_eq!(a.initial_weight(&from), f64::INFINITY);
        assert_eq!(a.label(&foreign), None);
        assert_eq!(a.transition_weight(&foreign), f64::INFINITY);
        let order = a.topological_order().unwrap();
        assert_eq!(order(&StateId(2), &from), std::cmp::Ordering::Greater);
    }
}
