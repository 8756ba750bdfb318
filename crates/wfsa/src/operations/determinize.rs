// Weighted determinization with epsilon removal.
//
// Subset construction over weighted subsets: a determinized state is a set of
// operand states, each with a residual weight. The weight common to a subset
// is factored out onto the incoming transition with the semifield inverse.
// Subsets are interned in an arena owned by the view, so a state is a small
// index and revisiting a subset finds the existing state.

use std::cell::{OnceCell, RefCell};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;

use hashbrown::HashMap;
use wfsa_core::{Semifield, Semiring, SemiringError};

use crate::automata;
use crate::automaton::{Automaton, StateOrder, Weight};

/// State of a [`Determinization`]: a handle to an interned weighted subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeterminizedState(u32);

impl DeterminizedState {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Transition of a [`Determinization`]. Determinized transitions are always
/// labeled.
#[derive(Debug, Clone, PartialEq)]
pub struct DeterminizedTransition<L, W> {
    pub from: DeterminizedState,
    pub to: DeterminizedState,
    pub label: L,
    pub weight: W,
}

/// Operand states with residual weights. Equality ignores entry order.
#[derive(Debug, Clone)]
struct WeightedSubset<S, W> {
    entries: Vec<(S, W)>,
}

impl<S: Hash, W> Hash for WeightedSubset<S, W> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent: combine per-entry hashes commutatively.
        let mut sum = 0u64;
        for (s, _) in &self.entries {
            let mut hasher = DefaultHasher::new();
            s.hash(&mut hasher);
            sum = sum.wrapping_add(hasher.finish());
        }
        state.write_usize(self.entries.len());
        state.write_u64(sum);
    }
}

impl<S: PartialEq, W: PartialEq> PartialEq for WeightedSubset<S, W> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(s, w)| other.entries.iter().any(|(t, v)| s == t && w == v))
    }
}

impl<S: Eq, W: PartialEq> Eq for WeightedSubset<S, W> {}

struct SubsetArena<S, W> {
    subsets: Vec<Rc<WeightedSubset<S, W>>>,
    index: HashMap<Rc<WeightedSubset<S, W>>, DeterminizedState>,
}

impl<S: Eq + Hash, W: PartialEq> SubsetArena<S, W> {
    fn new() -> Self {
        Self {
            subsets: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn intern(&mut self, subset: WeightedSubset<S, W>) -> DeterminizedState {
        if let Some(&id) = self.index.get(&subset) {
            return id;
        }
        let id = DeterminizedState(self.subsets.len() as u32);
        let subset = Rc::new(subset);
        self.subsets.push(Rc::clone(&subset));
        self.index.insert(subset, id);
        id
    }

    fn get(&self, id: DeterminizedState) -> Option<Rc<WeightedSubset<S, W>>> {
        self.subsets.get(id.index()).cloned()
    }
}

/// The operand restricted to its epsilon transitions, started from a
/// weighted set of seed states. Its shortest distances are the epsilon
/// closure of the seeds.
struct EpsilonRestriction<'a, A: Automaton> {
    operand: &'a A,
    seeds: Vec<(A::State, Weight<A>)>,
    index: HashMap<A::State, usize>,
}

impl<'a, A: Automaton> EpsilonRestriction<'a, A> {
    /// Seeds naming the same state are summed.
    fn new(operand: &'a A, raw: Vec<(A::State, Weight<A>)>) -> Self {
        let semiring = operand.semiring();
        let mut seeds: Vec<(A::State, Weight<A>)> = Vec::new();
        let mut index = HashMap::new();
        for (state, weight) in raw {
            match index.get(&state) {
                Some(&i) => {
                    let (_, existing) = &mut seeds[i];
                    let sum = semiring.add(existing, &weight);
                    *existing = sum;
                }
                None => {
                    index.insert(state.clone(), seeds.len());
                    seeds.push((state, weight));
                }
            }
        }
        Self {
            operand,
            seeds,
            index,
        }
    }
}

impl<A: Automaton> Automaton for EpsilonRestriction<'_, A> {
    type Label = A::Label;
    type State = A::State;
    type Transition = A::Transition;
    type Semiring = A::Semiring;

    fn initial_states(&self) -> Vec<A::State> {
        self.seeds
            .iter()
            .filter(|(_, w)| !self.operand.semiring().is_zero(w))
            .map(|(s, _)| s.clone())
            .collect()
    }

    fn transitions_out(&self, state: &A::State) -> Vec<A::Transition> {
        self.operand
            .transitions_out(state)
            .into_iter()
            .filter(|t| self.operand.label(t).is_none())
            .collect()
    }

    fn initial_weight(&self, state: &A::State) -> Weight<A> {
        match self.index.get(state) {
            Some(&i) => self.seeds[i].1.clone(),
            None => self.operand.semiring().zero(),
        }
    }

    fn final_weight(&self, state: &A::State) -> Weight<A> {
        self.operand.final_weight(state)
    }

    fn from(&self, transition: &A::Transition) -> A::State {
        self.operand.from(transition)
    }

    fn to(&self, transition: &A::Transition) -> A::State {
        self.operand.to(transition)
    }

    fn label(&self, _transition: &A::Transition) -> Option<A::Label> {
        None
    }

    fn transition_weight(&self, transition: &A::Transition) -> Weight<A> {
        self.operand.transition_weight(transition)
    }

    fn semiring(&self) -> &A::Semiring {
        self.operand.semiring()
    }

    fn topological_order(&self) -> Option<StateOrder<'_, A::State>> {
        self.operand.topological_order()
    }
}

type Transitions<A> = Vec<DeterminizedTransition<<A as Automaton>::Label, Weight<A>>>;

/// Lazy weighted determinization of an automaton over a semifield, with
/// epsilon transitions removed.
///
/// Every determinized state has at most one outgoing transition per label and
/// no epsilon transitions, and every string keeps its weight. States and
/// transitions are constructed the first time they are asked for and
/// memoized inside this view.
///
/// Construction terminates only for determinizable operands (e.g. acyclic
/// ones, or ones with the twins property). Weights are compared exactly, so
/// floating-point noise can split subsets that are equal in theory.
///
/// A subset whose total weight has no inverse (an infinite real weight, a
/// tropical `-inf`) cannot be normalized. It is left out: its label gets no
/// transition, or the view gets no initial state. The first such failure is
/// kept and reported by [`Determinization::error`].
pub struct Determinization<A: Automaton> {
    operand: A,
    arena: RefCell<SubsetArena<A::State, Weight<A>>>,
    transitions: RefCell<HashMap<DeterminizedState, Transitions<A>>>,
    initial: OnceCell<Option<(DeterminizedState, Weight<A>)>>,
    error: RefCell<Option<SemiringError>>,
}

impl<A> Determinization<A>
where
    A: Automaton,
    A::Semiring: Semifield,
{
    pub fn new(operand: A) -> Self {
        Self {
            operand,
            arena: RefCell::new(SubsetArena::new()),
            transitions: RefCell::new(HashMap::new()),
            initial: OnceCell::new(),
            error: RefCell::new(None),
        }
    }

    pub fn operand(&self) -> &A {
        &self.operand
    }

    /// The first subset normalization that failed so far, if any. Only
    /// covers the part of the view constructed so far.
    pub fn error(&self) -> Option<SemiringError> {
        self.error.borrow().clone()
    }

    /// Number of determinized states constructed so far.
    pub fn num_constructed(&self) -> usize {
        self.arena.borrow().subsets.len()
    }

    /// The operand states of `state` with their residual weights.
    pub fn subset(&self, state: &DeterminizedState) -> Vec<(A::State, Weight<A>)> {
        self.arena
            .borrow()
            .get(*state)
            .map(|s| s.entries.clone())
            .unwrap_or_default()
    }

    fn closure(&self, seeds: Vec<(A::State, Weight<A>)>) -> Vec<(A::State, Weight<A>)> {
        let restriction = EpsilonRestriction::new(&self.operand, seeds);
        let distances = automata::shortest_distances_from_initial_states(&restriction);
        let semiring = self.operand.semiring();
        automata::states(&restriction)
            .into_iter()
            .filter_map(|s| {
                let w = distances.get(&s)?;
                (!semiring.is_zero(w)).then(|| (s, w.clone()))
            })
            .collect()
    }

    /// Close `seeds`, factor out their total weight and intern the result.
    fn settle(&self, seeds: Vec<(A::State, Weight<A>)>) -> Option<(DeterminizedState, Weight<A>)> {
        let closed = self.closure(seeds);
        let semiring = self.operand.semiring();
        let total = semiring.sum(closed.iter().map(|(_, w)| w));
        if semiring.is_zero(&total) {
            return None;
        }
        let inverse = match semiring.inverse(&total) {
            Ok(inverse) => inverse,
            Err(e) => {
                self.error.borrow_mut().get_or_insert(e);
                return None;
            }
        };
        let entries = closed
            .into_iter()
            .map(|(s, w)| (s, semiring.multiply(&inverse, &w)))
            .collect();
        let id = self.arena.borrow_mut().intern(WeightedSubset { entries });
        Some((id, total))
    }

    fn initial(&self) -> Option<&(DeterminizedState, Weight<A>)> {
        self.initial
            .get_or_init(|| {
                let seeds = self
                    .operand
                    .initial_states()
                    .into_iter()
                    .map(|s| {
                        let w = self.operand.initial_weight(&s);
                        (s, w)
                    })
                    .collect();
                self.settle(seeds)
            })
            .as_ref()
    }

    fn expand(&self, state: DeterminizedState) -> Transitions<A> {
        let Some(subset) = self.arena.borrow().get(state) else {
            return Vec::new();
        };
        let semiring = self.operand.semiring();

        // Seeds per label, labels in first-seen order.
        let mut groups: Vec<(A::Label, Vec<(A::State, Weight<A>)>)> = Vec::new();
        let mut group_of: HashMap<A::Label, usize> = HashMap::new();
        for (q, residual) in &subset.entries {
            for t in self.operand.transitions_out(q) {
                let Some(label) = self.operand.label(&t) else {
                    continue;
                };
                let w = semiring.multiply(residual, &self.operand.transition_weight(&t));
                if semiring.is_zero(&w) {
                    continue;
                }
                let g = *group_of.entry(label.clone()).or_insert_with(|| {
                    groups.push((label, Vec::new()));
                    groups.len() - 1
                });
                groups[g].1.push((self.operand.to(&t), w));
            }
        }

        groups
            .into_iter()
            .filter_map(|(label, seeds)| {
                let (to, weight) = self.settle(seeds)?;
                Some(DeterminizedTransition {
                    from: state,
                    to,
                    label,
                    weight,
                })
            })
            .collect()
    }
}

impl<A> Automaton for Determinization<A>
where
    A: Automaton,
    A::Semiring: Semifield,
{
    type Label = A::Label;
    type State = DeterminizedState;
    type Transition = DeterminizedTransition<A::Label, Weight<A>>;
    type Semiring = A::Semiring;

    fn initial_states(&self) -> Vec<DeterminizedState> {
        self.initial().map(|(s, _)| *s).into_iter().collect()
    }

    fn transitions_out(&self, state: &DeterminizedState) -> Vec<Self::Transition> {
        if let Some(cached) = self.transitions.borrow().get(state) {
            return cached.clone();
        }
        let computed = self.expand(*state);
        self.transitions
            .borrow_mut()
            .insert(*state, computed.clone());
        computed
    }

    fn initial_weight(&self, state: &DeterminizedState) -> Weight<A> {
        match self.initial() {
            Some((s, w)) if s == state => w.clone(),
            _ => self.operand.semiring().zero(),
        }
    }

    fn final_weight(&self, state: &DeterminizedState) -> Weight<A> {
        let semiring = self.operand.semiring();
        let Some(subset) = self.arena.borrow().get(*state) else {
            return semiring.zero();
        };
        subset.entries.iter().fold(semiring.zero(), |acc, (q, v)| {
            let w = semiring.multiply(v, &self.operand.final_weight(q));
            semiring.add(&acc, &w)
        })
    }

    fn from(&self, transition: &Self::Transition) -> DeterminizedState {
        transition.from
    }

    fn to(&self, transition: &Self::Transition) -> DeterminizedState {
        transition.to
    }

    fn label(&self, transition: &Self::Transition) -> Option<A::Label> {
        Some(transition.label.clone())
    }

    fn transition_weight(&self, transition: &Self::Transition) -> Weight<A> {
        transition.weight.clone()
    }

    fn semiring(&self) -> &A::Semiring {
        self.operand.semiring()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automata::{chars, string_weight, transitions};
    use crate::explicit::{AutomatonBuilder, ExplicitAutomaton};
    use wfsa_core::{RealSemiring, TropicalSemiring};

    // "ab" via two branches (weights 1 and 3), "ac" via the second branch,
    // and an epsilon detour from the start with weight 0.5.
    fn branching() -> ExplicitAutomaton<char, TropicalSemiring> {
        let mut b = AutomatonBuilder::new(TropicalSemiring);
        let s = b.add_states(5);
        b.set_initial_weight(s[0], 0.0).unwrap();
        b.set_final_weight(s[3], 0.0).unwrap();
        b.add_transition(s[0], s[1], Some('a'), 1.0).unwrap();
        b.add_transition(s[0], s[4], None, 0.5).unwrap();
        b.add_transition(s[4], s[2], Some('a'), 0.5).unwrap();
        b.add_transition(s[1], s[3], Some('b'), 0.0).unwrap();
        b.add_transition(s[2], s[3], Some('b'), 2.0).unwrap();
        b.add_transition(s[2], s[3], Some('c'), 0.0).unwrap();
        b.build()
    }

    #[test]
    fn one_transition_per_label() {
        let det = Determinization::new(branching());
        for t in transitions(&det) {
            let from = det.from(&t);
            let same: Vec<_> = det
                .transitions_out(&from)
                .into_iter()
                .filter(|u| u.label == t.label)
                .collect();
            assert_eq!(same.len(), 1);
        }
    }

    #[test]
    fn no_epsilon_transitions() {
        let det = Determinization::new(branching());
        assert!(transitions(&det).iter().all(|t| det.label(t).is_some()));
    }

    #[test]
    fn string_weights_are_preserved() {
        let a = branching();
        let det = Determinization::new(&a);
        for word in ["ab", "ac", "a", "b", ""] {
            assert_eq!(
                string_weight(&det, &chars(word)),
                string_weight(&a, &chars(word)),
                "{word:?}"
            );
        }
    }

    #[test]
    fn residuals_are_factored_out() {
        let det = Determinization::new(branching());
        let start = det.initial_states()[0];
        let out = det.transitions_out(&start);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].weight, 1.0);
        let mut residuals: Vec<f64> = det.subset(&out[0].to).into_iter().map(|(_, w)| w).collect();
        residuals.sort_by(f64::total_cmp);
        assert_eq!(residuals, vec![0.0, 0.0]);
    }

    #[test]
    fn memoized_expansion() {
        let det = Determinization::new(branching());
        let start = det.initial_states()[0];
        let first = det.transitions_out(&start);
        let constructed = det.num_constructed();
        assert_eq!(det.transitions_out(&start), first);
        assert_eq!(det.num_constructed(), constructed);
    }

    #[test]
    fn empty_operand_has_no_initial_state() {
        let b = AutomatonBuilder::<char, _>::new(TropicalSemiring);
        let det = Determinization::new(b.build());
        assert!(det.initial_states().is_empty());
    }

    #[test]
    fn uninvertible_subset_is_reported() {
        let mut b = AutomatonBuilder::new(RealSemiring);
        let s = b.add_states(3);
        b.set_initial_weight(s[0], 1.0).unwrap();
        b.set_final_weight(s[1], 1.0).unwrap();
        b.set_final_weight(s[2], 1.0).unwrap();
        b.add_transition(s[0], s[1], Some('a'), f64::INFINITY).unwrap();
        b.add_transition(s[0], s[2], Some('b'), 0.5).unwrap();
        let a = b.build();

        let d = Determinization::new(&a);
        assert_eq!(d.error(), None);
        let start = d.initial_states();
        let out = d.transitions_out(&start[0]);
        let labels: Vec<char> = out.iter().filter_map(|t| d.label(t)).collect();
        assert_eq!(labels, vec!['b']);
        assert_eq!(d.error(), Some(SemiringError::NotInvertible("inf".to_string())));
        assert_eq!(string_weight(&d, &chars("b")), 0.5);
    }
}
