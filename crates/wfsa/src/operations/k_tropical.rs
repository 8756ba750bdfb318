// K-tropical lifting: weights become lists of the k best path weights, each
// remembering the state it starts from and the transitions it took.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::rc::Rc;

use wfsa_core::{OrderedSemiring, Semiring};

use crate::automaton::{Automaton, StateOrder, Weight};

/// Back-pointer chain of a path: the last transition and the trail before
/// it. Trails share their prefixes.
#[derive(Debug)]
struct Trail<T> {
    transition: T,
    previous: Option<Rc<Trail<T>>>,
}

impl<T> Drop for Trail<T> {
    // Unlink iteratively so long paths do not recurse on drop.
    fn drop(&mut self) {
        let mut next = self.previous.take();
        while let Some(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(mut trail) => next = trail.previous.take(),
                Err(_) => break,
            }
        }
    }
}

fn same_trail<T: PartialEq>(mut a: &Option<Rc<Trail<T>>>, mut b: &Option<Rc<Trail<T>>>) -> bool {
    loop {
        match (a, b) {
            (None, None) => return true,
            (Some(x), Some(y)) => {
                if Rc::ptr_eq(x, y) {
                    return true;
                }
                if x.transition != y.transition {
                    return false;
                }
                a = &x.previous;
                b = &y.previous;
            }
            _ => return false,
        }
    }
}

/// One candidate path: its weight in the base semiring, the state it
/// starts from and the transitions it took.
///
/// The origin tells apart paths without transitions: two initial states that
/// are also final each have their own empty path.
#[derive(Debug, Clone)]
pub struct PathWeight<S, T, W> {
    pub weight: W,
    origin: Option<S>,
    trail: Option<Rc<Trail<T>>>,
}

impl<S: Clone, T: Clone, W> PathWeight<S, T, W> {
    /// A path without transitions or origin.
    pub fn new(weight: W) -> Self {
        Self {
            weight,
            origin: None,
            trail: None,
        }
    }

    /// The empty path at `origin`.
    pub fn starting_at(weight: W, origin: S) -> Self {
        Self {
            weight,
            origin: Some(origin),
            trail: None,
        }
    }

    fn single(weight: W, transition: T) -> Self {
        Self {
            weight,
            origin: None,
            trail: Some(Rc::new(Trail {
                transition,
                previous: None,
            })),
        }
    }

    /// The state the path starts from, if it was lifted from an initial
    /// weight.
    pub fn origin(&self) -> Option<&S> {
        self.origin.as_ref()
    }

    /// The transitions of the path, first to last.
    pub fn transitions(&self) -> Vec<T> {
        let mut out = Vec::new();
        let mut cursor = &self.trail;
        while let Some(trail) = cursor {
            out.push(trail.transition.clone());
            cursor = &trail.previous;
        }
        out.reverse();
        out
    }

    /// This path followed by `suffix`, with the given weight. The origin is
    /// this path's, or the suffix's if this path has none.
    fn extend(&self, suffix: &Self, weight: W) -> Self {
        let mut trail = self.trail.clone();
        if suffix.trail.is_some() {
            for transition in suffix.transitions() {
                trail = Some(Rc::new(Trail {
                    transition,
                    previous: trail,
                }));
            }
        }
        let origin = self.origin.clone().or_else(|| suffix.origin.clone());
        Self {
            weight,
            origin,
            trail,
        }
    }
}

impl<S: PartialEq, T: PartialEq, W: PartialEq> PartialEq for PathWeight<S, T, W> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
            && self.origin == other.origin
            && same_trail(&self.trail, &other.trail)
    }
}

/// Up to k path weights, best first, without duplicates.
///
/// The empty list is the k-tropical `zero`.
#[derive(Debug, Clone, PartialEq)]
pub struct KBest<S, T, W>(Vec<PathWeight<S, T, W>>);

impl<S, T, W> KBest<S, T, W> {
    pub fn iter(&self) -> std::slice::Iter<'_, PathWeight<S, T, W>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn best(&self) -> Option<&PathWeight<S, T, W>> {
        self.0.first()
    }

    pub fn into_vec(self) -> Vec<PathWeight<S, T, W>> {
        self.0
    }
}

impl<S, T, W> IntoIterator for KBest<S, T, W> {
    type Item = PathWeight<S, T, W>;
    type IntoIter = std::vec::IntoIter<PathWeight<S, T, W>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Semiring of k-best lists over an ordered base semiring `R`, for paths
/// through states `S` along transitions `T`.
///
/// `add` merges two lists and keeps the k best distinct entries. `multiply`
/// combines every pair of entries, multiplying weights and concatenating
/// paths, then keeps the k best. Entries whose weight is the base `zero`
/// are dropped.
#[derive(Debug)]
pub struct KTropicalSemiring<R, S, T> {
    base: R,
    k: usize,
    _path: PhantomData<fn() -> (S, T)>,
}

impl<R: Clone, S, T> Clone for KTropicalSemiring<R, S, T> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            k: self.k,
            _path: PhantomData,
        }
    }
}

impl<R: OrderedSemiring, S, T> KTropicalSemiring<R, S, T> {
    pub fn new(base: R, k: usize) -> Self {
        Self {
            base,
            k,
            _path: PhantomData,
        }
    }

    pub fn base(&self) -> &R {
        &self.base
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Lift a base weight into a one-entry list with an empty path.
    pub fn lift(&self, weight: R::Weight) -> KBest<S, T, R::Weight>
    where
        S: Clone,
        T: Clone,
    {
        if self.base.is_zero(&weight) {
            KBest(Vec::new())
        } else {
            KBest(vec![PathWeight::new(weight)])
        }
    }

    /// Lift the initial weight of `origin` into a one-entry list holding the
    /// empty path at `origin`.
    pub fn lift_initial(&self, weight: R::Weight, origin: S) -> KBest<S, T, R::Weight>
    where
        S: Clone,
        T: Clone,
    {
        if self.base.is_zero(&weight) {
            KBest(Vec::new())
        } else {
            KBest(vec![PathWeight::starting_at(weight, origin)])
        }
    }

    fn normalize(&self, mut entries: Vec<PathWeight<S, T, R::Weight>>) -> KBest<S, T, R::Weight>
    where
        S: PartialEq,
        T: PartialEq,
    {
        entries.retain(|e| !self.base.is_zero(&e.weight));
        entries.sort_by(|a, b| self.base.compare(&a.weight, &b.weight));
        let mut kept: Vec<PathWeight<S, T, R::Weight>> =
            Vec::with_capacity(self.k.min(entries.len()));
        for entry in entries {
            if kept.len() == self.k {
                break;
            }
            if !kept.contains(&entry) {
                kept.push(entry);
            }
        }
        KBest(kept)
    }
}

impl<R, S, T> Semiring for KTropicalSemiring<R, S, T>
where
    R: OrderedSemiring,
    S: Clone + PartialEq + Debug,
    T: Clone + PartialEq + Debug,
{
    type Weight = KBest<S, T, R::Weight>;

    fn zero(&self) -> Self::Weight {
        KBest(Vec::new())
    }

    fn one(&self) -> Self::Weight {
        KBest(vec![PathWeight::new(self.base.one())])
    }

    fn add(&self, a: &Self::Weight, b: &Self::Weight) -> Self::Weight {
        let merged = a.0.iter().chain(b.0.iter()).cloned().collect();
        self.normalize(merged)
    }

    fn multiply(&self, a: &Self::Weight, b: &Self::Weight) -> Self::Weight {
        let mut products = Vec::with_capacity(a.len() * b.len());
        for x in &a.0 {
            for y in &b.0 {
                let weight = self.base.multiply(&x.weight, &y.weight);
                products.push(x.extend(y, weight));
            }
        }
        self.normalize(products)
    }

    fn is_zero(&self, weight: &Self::Weight) -> bool {
        weight.is_empty()
    }
}

impl<R, S, T> OrderedSemiring for KTropicalSemiring<R, S, T>
where
    R: OrderedSemiring,
    S: Clone + PartialEq + Debug,
    T: Clone + PartialEq + Debug,
{
    /// Lexicographic over the entry weights, best entry first. A list that
    /// runs out of entries is the worse one.
    fn compare(&self, a: &Self::Weight, b: &Self::Weight) -> Ordering {
        for i in 0..a.len().max(b.len()) {
            match (a.0.get(i), b.0.get(i)) {
                (Some(x), Some(y)) => match self.base.compare(&x.weight, &y.weight) {
                    Ordering::Equal => {}
                    other => return other,
                },
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => break,
            }
        }
        Ordering::Equal
    }
}

/// The k-tropical semiring of an automaton's paths.
pub type PathSemiring<A> = KTropicalSemiring<
    <A as Automaton>::Semiring,
    <A as Automaton>::State,
    <A as Automaton>::Transition,
>;

/// The k-best lists of an automaton's paths.
pub type PathList<A> = KBest<<A as Automaton>::State, <A as Automaton>::Transition, Weight<A>>;

/// View of an automaton with every weight lifted into the k-tropical
/// semiring. Each transition weight remembers its transition and each
/// initial weight its state, so the shortest distance of a state carries the
/// k best paths reaching it.
pub struct KTropical<A: Automaton> {
    operand: A,
    semiring: PathSemiring<A>,
}

impl<A: Automaton + std::fmt::Debug> std::fmt::Debug for KTropical<A>
where
    A::Semiring: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KTropical")
            .field("operand", &self.operand)
            .field("semiring", &self.semiring)
            .finish()
    }
}

impl<A: Automaton + Clone> Clone for KTropical<A>
where
    A::Semiring: Clone,
{
    fn clone(&self) -> Self {
        Self {
            operand: self.operand.clone(),
            semiring: self.semiring.clone(),
        }
    }
}

impl<A> KTropical<A>
where
    A: Automaton,
    A::Semiring: OrderedSemiring + Clone,
{
    pub fn new(operand: A, k: usize) -> Self {
        let semiring = KTropicalSemiring::new(operand.semiring().clone(), k);
        Self { operand, semiring }
    }

    pub fn operand(&self) -> &A {
        &self.operand
    }
}

impl<A> Automaton for KTropical<A>
where
    A: Automaton,
    A::Semiring: OrderedSemiring,
{
    type Label = A::Label;
    type State = A::State;
    type Transition = A::Transition;
    type Semiring = PathSemiring<A>;

    fn initial_states(&self) -> Vec<A::State> {
        self.operand.initial_states()
    }

    fn transitions_out(&self, state: &A::State) -> Vec<A::Transition> {
        self.operand.transitions_out(state)
    }

    fn initial_weight(&self, state: &A::State) -> PathList<A> {
        self.semiring
            .lift_initial(self.operand.initial_weight(state), state.clone())
    }

    fn final_weight(&self, state: &A::State) -> PathList<A> {
        self.semiring.lift(self.operand.final_weight(state))
    }

    fn from(&self, transition: &A::Transition) -> A::State {
        self.operand.from(transition)
    }

    fn to(&self, transition: &A::Transition) -> A::State {
        self.operand.to(transition)
    }

    fn label(&self, transition: &A::Transition) -> Option<A::Label> {
        self.operand.label(transition)
    }

    fn transition_weight(&self, transition: &A::Transition) -> PathList<A> {
        let weight = self.operand.transition_weight(transition);
        if self.semiring.base().is_zero(&weight) {
            return KBest(Vec::new());
        }
        KBest(vec![PathWeight::single(weight, transition.clone())])
    }

    fn semiring(&self) -> &Self::Semiring {
        &self.semiring
    }

    fn topological_order(&self) -> Option<StateOrder<'_, A::State>> {
        self.operand.topological_order()
    }
}
