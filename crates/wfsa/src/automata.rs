// Traversal, shortest-distance queries and k-best extraction over any
// automaton, plus constructors for common acceptors.

use std::fmt::Debug;
use std::hash::Hash;

use hashbrown::{HashMap, HashSet};
use wfsa_core::{ConvergenceCondition, OrderedSemiring, Semifield, Semiring};

use crate::WfsaError;
use crate::automaton::{Automaton, ReverselyAccessible, Weight};
use crate::operations::{
    Determinization, DeterminizedState, DeterminizedTransition, Intersection, KBest, KTropical,
    KTropicalSemiring, PathList, PathSemiring, Reversal, SingleInitialState, Union,
};
use crate::primitive::SingleStringAutomaton;
use crate::queue::{DefaultQueue, QueueStrategy};
use crate::shortest_distance::ShortestDistances;

/// A complete path: transitions from an initial state to a final state.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<S, T, L, W> {
    /// The initial state the path starts from.
    pub origin: S,
    pub transitions: Vec<T>,
    /// Labels along the path, epsilon transitions skipped.
    pub label: Vec<L>,
    /// Initial weight, transition weights and final weight multiplied in
    /// order.
    pub weight: W,
}

// ---------------------------------------------------------------------------
// Traversal

/// Visit every state reachable from the initial states once, in
/// topological order when the automaton knows one, breadth-first otherwise.
fn explore<A, F>(automaton: &A, mut visit: F)
where
    A: Automaton,
    F: FnMut(A::State, Vec<A::Transition>),
{
    let zero = automaton.semiring().zero();
    let mut frontier = QueueStrategy::<A::Semiring>::frontier(&DefaultQueue, automaton);
    let mut seen = HashSet::new();
    for state in automaton.initial_states() {
        if seen.insert(state.clone()) {
            frontier.insert(state, &zero);
        }
    }
    while let Some(state) = frontier.pop() {
        let out = automaton.transitions_out(&state);
        for t in &out {
            let next = automaton.to(t);
            if seen.insert(next.clone()) {
                frontier.insert(next, &zero);
            }
        }
        visit(state, out);
    }
}

/// All states reachable from the initial states, each once.
///
/// Does not terminate for automata with infinitely many reachable states.
pub fn states<A: Automaton>(automaton: &A) -> Vec<A::State> {
    let mut states = Vec::new();
    explore(automaton, |state, _| states.push(state));
    states
}

/// All transitions leaving a reachable state, each once.
pub fn transitions<A: Automaton>(automaton: &A) -> Vec<A::Transition> {
    let mut transitions = Vec::new();
    explore(automaton, |_, out| transitions.extend(out));
    transitions
}

pub fn is_initial_state<A: Automaton>(automaton: &A, state: &A::State) -> bool {
    !automaton
        .semiring()
        .is_zero(&automaton.initial_weight(state))
}

pub fn is_final_state<A: Automaton>(automaton: &A, state: &A::State) -> bool {
    !automaton.semiring().is_zero(&automaton.final_weight(state))
}

/// Labels of a sequence of transitions, skipping epsilon transitions.
pub fn path_label<A: Automaton>(automaton: &A, transitions: &[A::Transition]) -> Vec<A::Label> {
    transitions
        .iter()
        .filter_map(|t| automaton.label(t))
        .collect()
}

// ---------------------------------------------------------------------------
// Shortest distances

/// For every reachable state `q`, the sum over all paths from an initial
/// state `p` to `q` of `initial_weight(p)` times the path weight. An initial
/// state's own initial weight counts as the empty path.
pub fn shortest_distances_from_initial_states<A: Automaton>(
    automaton: &A,
) -> HashMap<A::State, Weight<A>> {
    let solver: ShortestDistances = ShortestDistances::default();
    shortest_distances_from_initial_states_with(automaton, &solver)
}

pub fn shortest_distances_from_initial_states_with<A, Q, C>(
    automaton: &A,
    solver: &ShortestDistances<Q, C>,
) -> HashMap<A::State, Weight<A>>
where
    A: Automaton,
    Q: QueueStrategy<A::Semiring>,
    C: ConvergenceCondition<Weight<A>>,
{
    let sis = SingleInitialState::new(automaton);
    let distances = solver.compute(&sis, &sis.initial_state());
    let semiring = automaton.semiring();

    let mut projected: HashMap<A::State, Weight<A>> = distances
        .into_iter()
        .filter_map(|(state, d)| Some((state.into_operand()?, d)))
        .collect();
    for state in automaton.initial_states() {
        let initial = automaton.initial_weight(&state);
        let entry = projected.entry(state).or_insert_with(|| semiring.zero());
        let sum = semiring.add(entry, &initial);
        *entry = sum;
    }
    projected
}

/// For every state `q` that reaches a final state, the sum over all paths
/// from `q` to a final state `f` of the path weight times `final_weight(f)`.
pub fn shortest_distances_to_final_states<A: ReverselyAccessible>(
    automaton: &A,
) -> HashMap<A::State, Weight<A>> {
    let solver: ShortestDistances = ShortestDistances::default();
    shortest_distances_to_final_states_with(automaton, &solver)
}

pub fn shortest_distances_to_final_states_with<A, Q, C>(
    automaton: &A,
    solver: &ShortestDistances<Q, C>,
) -> HashMap<A::State, Weight<A>>
where
    A: ReverselyAccessible,
    Q: QueueStrategy<A::Semiring>,
    C: ConvergenceCondition<Weight<A>>,
{
    shortest_distances_from_initial_states_with(&Reversal::new(automaton), solver)
}

/// Sum of the weights of all complete paths.
pub fn shortest_complete_distance<A: Automaton>(automaton: &A) -> Weight<A> {
    let solver: ShortestDistances = ShortestDistances::default();
    shortest_complete_distance_with(automaton, &solver)
}

pub fn shortest_complete_distance_with<A, Q, C>(
    automaton: &A,
    solver: &ShortestDistances<Q, C>,
) -> Weight<A>
where
    A: Automaton,
    Q: QueueStrategy<A::Semiring>,
    C: ConvergenceCondition<Weight<A>>,
{
    let semiring = automaton.semiring();
    let distances = shortest_distances_from_initial_states_with(automaton, solver);
    // Sum in traversal order so ties resolve the same way on every run.
    states(automaton)
        .iter()
        .fold(semiring.zero(), |total, state| {
            let Some(d) = distances.get(state) else {
                return total;
            };
            let f = automaton.final_weight(state);
            if semiring.is_zero(&f) {
                return total;
            }
            semiring.add(&total, &semiring.multiply(d, &f))
        })
}

/// Weight of `string`: the sum of the weights of all complete paths
/// labeled `string`. `zero` if the string is not accepted.
pub fn string_weight<A>(automaton: &A, string: &[A::Label]) -> Weight<A>
where
    A: Automaton,
    A::Semiring: Clone,
{
    let solver: ShortestDistances = ShortestDistances::default();
    string_weight_with(automaton, string, &solver)
}

pub fn string_weight_with<A, Q, C>(
    automaton: &A,
    string: &[A::Label],
    solver: &ShortestDistances<Q, C>,
) -> Weight<A>
where
    A: Automaton,
    A::Semiring: Clone,
    Q: QueueStrategy<A::Semiring>,
    C: ConvergenceCondition<Weight<A>>,
{
    let acceptor = SingleStringAutomaton::new(automaton.semiring().clone(), string.to_vec());
    shortest_complete_distance_with(&Intersection::new(automaton, acceptor), solver)
}

// ---------------------------------------------------------------------------
// K-best

/// The `count` best complete paths, best first. Paths with weight `zero` are
/// left out, so fewer than `count` paths may come back.
pub fn shortest_paths<A>(automaton: &A, count: usize) -> Vec<CompletePath<A>>
where
    A: Automaton,
    A::Semiring: OrderedSemiring + Clone,
{
    shortest_paths_with(automaton, count, &ShortestDistances::k_best())
}

pub fn shortest_paths_with<A, Q, C>(
    automaton: &A,
    count: usize,
    solver: &ShortestDistances<Q, C>,
) -> Vec<CompletePath<A>>
where
    A: Automaton,
    A::Semiring: OrderedSemiring + Clone,
    Q: QueueStrategy<PathSemiring<A>>,
    C: ConvergenceCondition<PathList<A>>,
{
    if count == 0 {
        return Vec::new();
    }
    let lifted = KTropical::new(automaton, count);
    let best = shortest_complete_distance_with(&lifted, solver);
    let semiring = automaton.semiring();
    best.into_iter()
        .filter(|p| !semiring.is_zero(&p.weight))
        .filter_map(|p| {
            let origin = p.origin()?.clone();
            let transitions = p.transitions();
            Some(Path {
                origin,
                label: path_label(automaton, &transitions),
                transitions,
                weight: p.weight,
            })
        })
        .collect()
}

/// A complete path of `A`, as returned by [`shortest_paths`].
pub type CompletePath<A> = Path<
    <A as Automaton>::State,
    <A as Automaton>::Transition,
    <A as Automaton>::Label,
    Weight<A>,
>;

/// A path through the determinization of `A`, as returned by
/// [`best_strings`].
pub type BestString<A> = Path<
    DeterminizedState,
    DeterminizedTransition<<A as Automaton>::Label, Weight<A>>,
    <A as Automaton>::Label,
    Weight<A>,
>;

/// The `count` best distinct strings, best first, with the weight of each
/// string summed over all its paths.
///
/// Determinizes the automaton first, so every string has exactly one path.
pub fn best_strings<A>(automaton: &A, count: usize) -> Vec<BestString<A>>
where
    A: Automaton,
    A::Semiring: Semifield + OrderedSemiring + Clone,
{
    best_strings_with(automaton, count, &ShortestDistances::k_best())
}

pub fn best_strings_with<A, Q, C>(
    automaton: &A,
    count: usize,
    solver: &ShortestDistances<Q, C>,
) -> Vec<BestString<A>>
where
    A: Automaton,
    A::Semiring: Semifield + OrderedSemiring + Clone,
    Q: QueueStrategy<
        KTropicalSemiring<
            A::Semiring,
            DeterminizedState,
            DeterminizedTransition<A::Label, Weight<A>>,
        >,
    >,
    C: ConvergenceCondition<
        KBest<
            DeterminizedState,
            DeterminizedTransition<A::Label, Weight<A>>,
            Weight<A>,
        >,
    >,
{
    let determinized = Determinization::new(automaton);
    shortest_paths_with(&determinized, count, solver)
}

// ---------------------------------------------------------------------------
// Construction

/// The characters of `s` as a label sequence.
pub fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

/// Concatenate character labels back into a string.
pub fn labels_to_string(labels: &[char]) -> String {
    labels.iter().collect()
}

/// Acceptor of the empty string only.
pub fn empty_string_automaton<L, S>(semiring: S) -> SingleStringAutomaton<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Semiring,
{
    SingleStringAutomaton::new(semiring, Vec::new())
}

/// Acceptor of exactly `string`, with weight `one`.
pub fn single_string_automaton<L, S>(semiring: S, string: Vec<L>) -> SingleStringAutomaton<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Semiring,
{
    SingleStringAutomaton::new(semiring, string)
}

/// Deterministic acceptor of every string in `strings`, each with weight
/// `one` (repeated strings add up).
///
/// Fails with [`WfsaError::EmptyUnion`] when `strings` is empty.
pub fn multiple_strings_automaton<L, S>(
    semiring: S,
    strings: Vec<Vec<L>>,
) -> Result<Determinization<Union<SingleStringAutomaton<L, S>>>, WfsaError>
where
    L: Clone + Eq + Hash + Debug,
    S: Semifield + Clone,
{
    let operands = strings
        .into_iter()
        .map(|s| SingleStringAutomaton::new(semiring.clone(), s))
        .collect();
    Ok(Determinization::new(Union::new(operands)?))
}
