// Generalized single-source shortest distance.
//
// Relaxation with residual weights over an arbitrary semiring, after the
// generic algorithm of Mohri. The queue strategy and convergence condition
// are chosen per solver; the automaton only has to enumerate transitions.

use hashbrown::HashMap;
use wfsa_core::{ConvergenceCondition, ExactConvergence, Semiring};

use crate::automaton::{Automaton, Weight};
use crate::queue::{DefaultQueue, KTropicalQueue, QueueStrategy};

/// Shortest-distance solver configured with a queue strategy and a
/// convergence condition.
///
/// ```
/// use wfsa::algebra::TropicalSemiring;
/// use wfsa::primitive::SingleStringAutomaton;
/// use wfsa::ShortestDistances;
///
/// let a = SingleStringAutomaton::new(TropicalSemiring, vec!['a', 'b']);
/// let solver: ShortestDistances = ShortestDistances::default();
/// let d = solver.compute(&a, &0);
/// assert_eq!(d[&2], 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestDistances<Q = DefaultQueue, C = ExactConvergence> {
    queue: Q,
    convergence: C,
}

impl<Q, C> ShortestDistances<Q, C> {
    pub fn new(queue: Q, convergence: C) -> Self {
        Self { queue, convergence }
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn convergence(&self) -> &C {
        &self.convergence
    }

    /// Distance from `source` to every state reachable from it.
    ///
    /// The distance of a state is the sum over all paths from `source` of
    /// the source's initial weight times the path's transition weights.
    /// Unreachable states are absent, which means `zero`. A source whose
    /// initial weight is `zero` yields an empty map.
    ///
    /// Terminates when the semiring and convergence condition guarantee it
    /// (acyclic automata, idempotent semirings with non-negative cycles, a
    /// tolerance condition on convergent sums). Otherwise it may not.
    pub fn compute<A>(&self, automaton: &A, source: &A::State) -> HashMap<A::State, Weight<A>>
    where
        A: Automaton,
        Q: QueueStrategy<A::Semiring>,
        C: ConvergenceCondition<Weight<A>>,
    {
        let semiring = automaton.semiring();
        let mut distances = HashMap::new();
        let initial = automaton.initial_weight(source);
        if semiring.is_zero(&initial) {
            return distances;
        }

        let mut residuals = HashMap::new();
        distances.insert(source.clone(), initial.clone());
        residuals.insert(source.clone(), initial.clone());
        let mut frontier = self.queue.frontier(automaton);
        frontier.insert(source.clone(), &initial);

        while let Some(state) = frontier.pop() {
            let Some(residual) = residuals.insert(state.clone(), semiring.zero()) else {
                continue;
            };
            if semiring.is_zero(&residual) {
                continue;
            }
            for transition in automaton.transitions_out(&state) {
                let delta = semiring.multiply(&residual, &automaton.transition_weight(&transition));
                if semiring.is_zero(&delta) {
                    continue;
                }
                let next = automaton.to(&transition);
                let previous = distances
                    .get(&next)
                    .cloned()
                    .unwrap_or_else(|| semiring.zero());
                let updated = semiring.add(&previous, &delta);
                if self.convergence.converged(&previous, &updated) {
                    continue;
                }
                distances.insert(next.clone(), updated.clone());
                let pending = residuals
                    .entry(next.clone())
                    .or_insert_with(|| semiring.zero());
                let sum = semiring.add(pending, &delta);
                *pending = sum;
                frontier.insert(next, &updated);
            }
        }
        distances
    }
}

impl ShortestDistances<KTropicalQueue, ExactConvergence> {
    /// Best-first solver with exact convergence, for k-tropical weights.
    pub fn k_best() -> Self {
        Self::new(KTropicalQueue, ExactConvergence)
    }
}
