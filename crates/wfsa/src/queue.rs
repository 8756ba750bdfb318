// Frontier strategies for the shortest-distance solver.
//
// A frontier is the solver's work-list of pending states. It is created for
// one solver run and owns nothing but its entries.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::hash::Hash;
use std::rc::Rc;

use hashbrown::{HashMap, HashSet};
use wfsa_core::{OrderedSemiring, Semiring};

use crate::automaton::{Automaton, StateOrder};

/// Work-list of states whose residual weight still has to be relaxed.
pub trait Frontier<S, W> {
    /// Schedule `state`, whose tentative distance is now `distance`.
    ///
    /// A state that is already pending is not added twice.
    fn insert(&mut self, state: S, distance: &W);

    /// Remove and return the next state to relax.
    fn pop(&mut self) -> Option<S>;

    fn is_empty(&self) -> bool;
}

/// Creates a fresh [`Frontier`] for each solver run on an automaton over
/// the semiring `R`.
///
/// Strategies are keyed by semiring rather than automaton type, so one
/// strategy serves an automaton and every view built on top of it.
pub trait QueueStrategy<R: Semiring> {
    fn frontier<'a, A>(&self, automaton: &'a A) -> Box<dyn Frontier<A::State, R::Weight> + 'a>
    where
        A: Automaton<Semiring = R>,
        R: 'a;
}

// ---------------------------------------------------------------------------
// Frontiers

/// First-in first-out frontier. States may be relaxed many times, which
/// gives Bellman-Ford behavior on cyclic automata.
#[derive(Debug)]
pub struct FifoFrontier<S> {
    queue: VecDeque<S>,
    pending: HashSet<S>,
}

impl<S: Clone + Eq + Hash> FifoFrontier<S> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            pending: HashSet::new(),
        }
    }
}

impl<S: Clone + Eq + Hash> Default for FifoFrontier<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Eq + Hash, W> Frontier<S, W> for FifoFrontier<S> {
    fn insert(&mut self, state: S, _distance: &W) {
        if self.pending.insert(state.clone()) {
            self.queue.push_back(state);
        }
    }

    fn pop(&mut self) -> Option<S> {
        let state = self.queue.pop_front()?;
        self.pending.remove(&state);
        Some(state)
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Frontier that always yields the pending state that comes first in a
/// topological order. On an acyclic automaton every state is relaxed once.
pub struct OrderedFrontier<'a, S> {
    order: SharedOrder<'a, S>,
    heap: BinaryHeap<Ranked<'a, S>>,
    pending: HashSet<S>,
    next_seq: u64,
}

type SharedOrder<'a, S> = Rc<dyn Fn(&S, &S) -> Ordering + 'a>;

/// Heap entry ordered so the state first in the order is on top. Ties go
/// to the earlier insertion.
struct Ranked<'a, S> {
    state: S,
    seq: u64,
    order: SharedOrder<'a, S>,
}

impl<S> Ord for Ranked<'_, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.order)(&other.state, &self.state).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<S> PartialOrd for Ranked<'_, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for Ranked<'_, S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for Ranked<'_, S> {}

impl<'a, S: Clone + Eq + Hash> OrderedFrontier<'a, S> {
    pub fn new(order: StateOrder<'a, S>) -> Self {
        Self {
            order: Rc::from(order),
            heap: BinaryHeap::new(),
            pending: HashSet::new(),
            next_seq: 0,
        }
    }
}

impl<S: Clone + Eq + Hash, W> Frontier<S, W> for OrderedFrontier<'_, S> {
    fn insert(&mut self, state: S, _distance: &W) {
        if !self.pending.insert(state.clone()) {
            return;
        }
        self.heap.push(Ranked {
            state,
            seq: self.next_seq,
            order: Rc::clone(&self.order),
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<S> {
        let Ranked { state, .. } = self.heap.pop()?;
        self.pending.remove(&state);
        Some(state)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Best-first frontier: yields the pending state with the best tentative
/// distance under the semiring's natural order.
///
/// Re-inserting a pending state updates its priority. The superseded heap
/// entry stays behind and is skipped when it surfaces.
pub struct PriorityFrontier<'a, S, R: OrderedSemiring> {
    semiring: &'a R,
    heap: BinaryHeap<Prioritized<'a, S, R>>,
    // Sequence number of each pending state's live entry.
    live: HashMap<S, u64>,
    next_seq: u64,
}

/// Heap entry ordered so the best distance is on top. Ties go to the
/// earlier insertion.
struct Prioritized<'a, S, R: OrderedSemiring> {
    state: S,
    distance: R::Weight,
    seq: u64,
    semiring: &'a R,
}

impl<S, R: OrderedSemiring> Ord for Prioritized<'_, S, R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semiring
            .compare(&other.distance, &self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<S, R: OrderedSemiring> PartialOrd for Prioritized<'_, S, R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S, R: OrderedSemiring> PartialEq for Prioritized<'_, S, R> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S, R: OrderedSemiring> Eq for Prioritized<'_, S, R> {}

impl<'a, S: Clone + Eq + Hash, R: OrderedSemiring> PriorityFrontier<'a, S, R> {
    pub fn new(semiring: &'a R) -> Self {
        Self {
            semiring,
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<S, R> Frontier<S, R::Weight> for PriorityFrontier<'_, S, R>
where
    S: Clone + Eq + Hash,
    R: OrderedSemiring,
{
    fn insert(&mut self, state: S, distance: &R::Weight) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(state.clone(), seq);
        self.heap.push(Prioritized {
            state,
            distance: distance.clone(),
            seq,
            semiring: self.semiring,
        });
    }

    fn pop(&mut self) -> Option<S> {
        while let Some(entry) = self.heap.pop() {
            if self.live.get(&entry.state) == Some(&entry.seq) {
                self.live.remove(&entry.state);
                return Some(entry.state);
            }
        }
        None
    }

    fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Strategies

/// Topological frontier when the automaton knows its order, FIFO otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQueue;

impl<R: Semiring> QueueStrategy<R> for DefaultQueue {
    fn frontier<'a, A>(&self, automaton: &'a A) -> Box<dyn Frontier<A::State, R::Weight> + 'a>
    where
        A: Automaton<Semiring = R>,
        R: 'a,
    {
        match automaton.topological_order() {
            Some(order) => Box::new(OrderedFrontier::new(order)),
            None => Box::new(FifoFrontier::new()),
        }
    }
}

/// Always FIFO, ignoring any topological order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoQueue;

impl<R: Semiring> QueueStrategy<R> for FifoQueue {
    fn frontier<'a, A>(&self, _automaton: &'a A) -> Box<dyn Frontier<A::State, R::Weight> + 'a>
    where
        A: Automaton<Semiring = R>,
        R: 'a,
    {
        Box::new(FifoFrontier::new())
    }
}

/// Best-first frontier for automata over an ordered semiring, used for
/// k-best extraction over k-tropical weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct KTropicalQueue;

impl<R: OrderedSemiring> QueueStrategy<R> for KTropicalQueue {
    fn frontier<'a, A>(&self, automaton: &'a A) -> Box<dyn Frontier<A::State, R::Weight> + 'a>
    where
        A: Automaton<Semiring = R>,
        R: 'a,
    {
        Box::new(PriorityFrontier::new(automaton.semiring()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfsa_core::TropicalSemiring;

    #[test]
    fn fifo_skips_pending_states() {
        let mut f = FifoFrontier::new();
        Frontier::<u32, ()>::insert(&mut f, 1, &());
        Frontier::<u32, ()>::insert(&mut f, 2, &());
        Frontier::<u32, ()>::insert(&mut f, 1, &());
        assert_eq!(Frontier::<u32, ()>::pop(&mut f), Some(1));
        Frontier::<u32, ()>::insert(&mut f, 1, &());
        assert_eq!(Frontier::<u32, ()>::pop(&mut f), Some(2));
        assert_eq!(Frontier::<u32, ()>::pop(&mut f), Some(1));
        assert!(Frontier::<u32, ()>::is_empty(&f));
    }

    #[test]
    fn ordered_pops_in_order() {
        let order: StateOrder<'_, u32> = Box::new(|a: &u32, b: &u32| b.cmp(a));
        let mut f = OrderedFrontier::new(order);
        for s in [3, 9, 1, 9, 5] {
            Frontier::<u32, ()>::insert(&mut f, s, &());
        }
        let mut popped = Vec::new();
        while let Some(s) = Frontier::<u32, ()>::pop(&mut f) {
            popped.push(s);
        }
        assert_eq!(popped, vec![9, 5, 3, 1]);
    }

    #[test]
    fn priority_pops_best_first() {
        let mut f = PriorityFrontier::new(&TropicalSemiring);
        f.insert('a', &4.0);
        f.insert('b', &1.0);
        f.insert('c', &2.0);
        f.insert('a', &0.5);
        assert_eq!(f.pop(), Some('a'));
        assert_eq!(f.pop(), Some('b'));
        assert_eq!(f.pop(), Some('c'));
        assert!(f.is_empty());
    }

    #[test]
    fn priority_skips_superseded_entries() {
        let mut f = PriorityFrontier::new(&TropicalSemiring);
        f.insert('a', &1.0);
        f.insert('b', &2.0);
        f.insert('a', &3.0);
        assert_eq!(f.pop(), Some('b'));
        assert!(!f.is_empty());
        assert_eq!(f.pop(), Some('a'));
        assert_eq!(f.pop(), None);
        assert!(f.is_empty());
    }

    #[test]
    fn priority_ties_pop_in_insertion_order() {
        let mut f = PriorityFrontier::new(&TropicalSemiring);
        for s in ['x', 'y', 'z'] {
            f.insert(s, &1.0);
        }
        f.insert('w', &0.0);
        assert_eq!(f.pop(), Some('w'));
        assert_eq!(f.pop(), Some('x'));
        assert_eq!(f.pop(), Some('y'));
        assert_eq!(f.pop(), Some('z'));
    }

    #[test]
    fn ordered_handles_many_states() {
        let order: StateOrder<'_, u32> = Box::new(|a: &u32, b: &u32| a.cmp(b));
        let mut f = OrderedFrontier::new(order);
        for s in (0..10_000u32).rev() {
            Frontier::<u32, ()>::insert(&mut f, s, &());
            Frontier::<u32, ()>::insert(&mut f, s, &());
        }
        let mut popped = Vec::new();
        while let Some(s) = Frontier::<u32, ()>::pop(&mut f) {
            popped.push(s);
        }
        assert_eq!(popped, (0..10_000).collect::<Vec<_>>());
    }
}
