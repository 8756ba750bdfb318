// Product constructions: acceptor intersection and transducer composition.
//
// Both walk pairs of operand states and differ only in how a pair of labels
// combines, which is what `LabelPairing` captures.

use std::fmt::Debug;
use std::hash::Hash;

use wfsa_core::Semiring;

use crate::automaton::{Automaton, StateOrder, Weight};

/// Outcome of pairing labels for one product move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<L> {
    /// The move is not allowed.
    Blocked,
    /// The move is allowed and carries this label (`None` = epsilon).
    Emit(Option<L>),
}

/// How the labels of two operands combine in a product.
///
/// A product state can move the left operand alone, the right operand alone,
/// or both at once. Each method decides whether a move is possible and which
/// label the product transition gets.
pub trait LabelPairing<L1, L2> {
    type Label: Clone + Eq + Hash + Debug;

    /// Move the left operand on a transition labeled `left`.
    fn left_alone(&self, left: Option<&L1>) -> Step<Self::Label>;

    /// Move the right operand on a transition labeled `right`.
    fn right_alone(&self, right: Option<&L2>) -> Step<Self::Label>;

    /// Move both operands together.
    fn synchronize(&self, left: Option<&L1>, right: Option<&L2>) -> Step<Self::Label>;
}

/// Intersection of acceptors: equal labels move together, epsilon
/// transitions move alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptorPairing;

impl<L: Clone + Eq + Hash + Debug> LabelPairing<L, L> for AcceptorPairing {
    type Label = L;

    fn left_alone(&self, left: Option<&L>) -> Step<L> {
        match left {
            None => Step::Emit(None),
            Some(_) => Step::Blocked,
        }
    }

    fn right_alone(&self, right: Option<&L>) -> Step<L> {
        match right {
            None => Step::Emit(None),
            Some(_) => Step::Blocked,
        }
    }

    fn synchronize(&self, left: Option<&L>, right: Option<&L>) -> Step<L> {
        match (left, right) {
            (Some(a), Some(b)) if a == b => Step::Emit(Some(a.clone())),
            _ => Step::Blocked,
        }
    }
}

/// Transducer label: an optional input symbol and an optional output
/// symbol. An unlabeled transducer transition has neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tape<I, O> {
    pub input: Option<I>,
    pub output: Option<O>,
}

impl<I, O> Tape<I, O> {
    pub fn new(input: Option<I>, output: Option<O>) -> Self {
        Self { input, output }
    }

    /// The label for a transition with these tapes: `None` when both are
    /// empty.
    pub fn into_label(self) -> Option<Self> {
        if self.input.is_none() && self.output.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

impl<X: Clone> Tape<X, X> {
    /// Same symbol on both tapes.
    pub fn identity(symbol: X) -> Self {
        Self {
            input: Some(symbol.clone()),
            output: Some(symbol),
        }
    }
}

/// Composition of transducers: the left output tape is matched against the
/// right input tape.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransducerPairing;

impl<I, M, O> LabelPairing<Tape<I, M>, Tape<M, O>> for TransducerPairing
where
    I: Clone + Eq + Hash + Debug,
    M: Eq,
    O: Clone + Eq + Hash + Debug,
{
    type Label = Tape<I, O>;

    fn left_alone(&self, left: Option<&Tape<I, M>>) -> Step<Tape<I, O>> {
        match left {
            None => Step::Emit(None),
            Some(tape) if tape.output.is_none() => {
                Step::Emit(Tape::new(tape.input.clone(), None).into_label())
            }
            Some(_) => Step::Blocked,
        }
    }

    fn right_alone(&self, right: Option<&Tape<M, O>>) -> Step<Tape<I, O>> {
        match right {
            None => Step::Emit(None),
            Some(tape) if tape.input.is_none() => {
                Step::Emit(Tape::new(None, tape.output.clone()).into_label())
            }
            Some(_) => Step::Blocked,
        }
    }

    fn synchronize(
        &self,
        left: Option<&Tape<I, M>>,
        right: Option<&Tape<M, O>>,
    ) -> Step<Tape<I, O>> {
        let (Some(l), Some(r)) = (left, right) else {
            return Step::Blocked;
        };
        match (&l.output, &r.input) {
            (Some(a), Some(b)) if a == b => {
                Step::Emit(Tape::new(l.input.clone(), r.output.clone()).into_label())
            }
            _ => Step::Blocked,
        }
    }
}

/// Epsilon-sequencing filter state of a product state.
///
/// Between two synchronized moves, all left-alone moves must come before all
/// right-alone moves, so each pair of operand paths yields exactly one
/// product path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EpsilonFilter {
    /// Any move is allowed.
    Open,
    /// A right-alone move happened; left-alone moves are blocked until the
    /// next synchronized move.
    RightOnly,
}

/// State of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairState<S1, S2> {
    pub left: S1,
    pub right: S2,
    pub filter: EpsilonFilter,
}

/// Transition of a [`Product`]. A side that does not move has no operand
/// transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PairTransition<S1, S2, T1, T2, L> {
    pub from: PairState<S1, S2>,
    pub to: PairState<S1, S2>,
    pub left: Option<T1>,
    pub right: Option<T2>,
    pub label: Option<L>,
}

/// Lazy product of two automata over the same semiring.
///
/// Weights multiply left then right. The left operand's semiring value is
/// used for all weight arithmetic.
#[derive(Debug, Clone)]
pub struct Product<A, B, P> {
    left: A,
    right: B,
    pairing: P,
}

/// Intersection of two acceptors: the weight of a string is the product of
/// its weights in both operands.
pub type Intersection<A, B> = Product<A, B, AcceptorPairing>;

/// Composition of two transducers over [`Tape`] labels.
pub type Composition<A, B> = Product<A, B, TransducerPairing>;

impl<A, B, P> Product<A, B, P> {
    pub fn with_pairing(left: A, right: B, pairing: P) -> Self {
        Self {
            left,
            right,
            pairing,
        }
    }

    pub fn left(&self) -> &A {
        &self.left
    }

    pub fn right(&self) -> &B {
        &self.right
    }
}

impl<A, B> Product<A, B, AcceptorPairing> {
    pub fn new(left: A, right: B) -> Self {
        Self::with_pairing(left, right, AcceptorPairing)
    }
}

impl<A, B> Product<A, B, TransducerPairing> {
    pub fn new(left: A, right: B) -> Self {
        Self::with_pairing(left, right, TransducerPairing)
    }
}

type ProductState<A, B> = PairState<<A as Automaton>::State, <B as Automaton>::State>;

type ProductTransition<A, B, P> = PairTransition<
    <A as Automaton>::State,
    <B as Automaton>::State,
    <A as Automaton>::Transition,
    <B as Automaton>::Transition,
    <P as LabelPairing<<A as Automaton>::Label, <B as Automaton>::Label>>::Label,
>;

impl<A, B, P> Product<A, B, P>
where
    A: Automaton,
    B: Automaton<Semiring = A::Semiring>,
    P: LabelPairing<A::Label, B::Label>,
{
    fn weight_of(&self, transition: &ProductTransition<A, B, P>) -> Weight<A> {
        let semiring = self.left.semiring();
        let left = transition
            .left
            .as_ref()
            .map_or_else(|| semiring.one(), |t| self.left.transition_weight(t));
        let right = transition
            .right
            .as_ref()
            .map_or_else(|| semiring.one(), |t| self.right.transition_weight(t));
        semiring.multiply(&left, &right)
    }
}

impl<A, B, P> Automaton for Product<A, B, P>
where
    A: Automaton,
    B: Automaton<Semiring = A::Semiring>,
    P: LabelPairing<A::Label, B::Label>,
{
    type Label = P::Label;
    type State = ProductState<A, B>;
    type Transition = ProductTransition<A, B, P>;
    type Semiring = A::Semiring;

    fn initial_states(&self) -> Vec<Self::State> {
        let semiring = self.left.semiring();
        let rights = self.right.initial_states();
        let mut states = Vec::new();
        for left in self.left.initial_states() {
            let lw = self.left.initial_weight(&left);
            for right in &rights {
                let w = semiring.multiply(&lw, &self.right.initial_weight(right));
                if !semiring.is_zero(&w) {
                    states.push(PairState {
                        left: left.clone(),
                        right: right.clone(),
                        filter: EpsilonFilter::Open,
                    });
                }
            }
        }
        states
    }

    fn transitions_out(&self, state: &Self::State) -> Vec<Self::Transition> {
        let lefts = self.left.transitions_out(&state.left);
        let rights = self.right.transitions_out(&state.right);
        let left_labels: Vec<_> = lefts.iter().map(|t| self.left.label(t)).collect();
        let right_labels: Vec<_> = rights.iter().map(|t| self.right.label(t)).collect();
        let mut out = Vec::new();

        if state.filter == EpsilonFilter::Open {
            for (t, label) in lefts.iter().zip(&left_labels) {
                if let Step::Emit(label) = self.pairing.left_alone(label.as_ref()) {
                    out.push(PairTransition {
                        from: state.clone(),
                        to: PairState {
                            left: self.left.to(t),
                            right: state.right.clone(),
                            filter: EpsilonFilter::Open,
                        },
                        left: Some(t.clone()),
                        right: None,
                        label,
                    });
                }
            }
        }

        for (t, label) in rights.iter().zip(&right_labels) {
            if let Step::Emit(label) = self.pairing.right_alone(label.as_ref()) {
                out.push(PairTransition {
                    from: state.clone(),
                    to: PairState {
                        left: state.left.clone(),
                        right: self.right.to(t),
                        filter: EpsilonFilter::RightOnly,
                    },
                    left: None,
                    right: Some(t.clone()),
                    label,
                });
            }
        }

        for (t1, l1) in lefts.iter().zip(&left_labels) {
            for (t2, l2) in rights.iter().zip(&right_labels) {
                if let Step::Emit(label) = self.pairing.synchronize(l1.as_ref(), l2.as_ref()) {
                    out.push(PairTransition {
                        from: state.clone(),
                        to: PairState {
                            left: self.left.to(t1),
                            right: self.right.to(t2),
                            filter: EpsilonFilter::Open,
                        },
                        left: Some(t1.clone()),
                        right: Some(t2.clone()),
                        label,
                    });
                }
            }
        }
        out
    }

    fn initial_weight(&self, state: &Self::State) -> Weight<A> {
        let semiring = self.left.semiring();
        if state.filter != EpsilonFilter::Open {
            return semiring.zero();
        }
        semiring.multiply(
            &self.left.initial_weight(&state.left),
            &self.right.initial_weight(&state.right),
        )
    }

    fn final_weight(&self, state: &Self::State) -> Weight<A> {
        self.left.semiring().multiply(
            &self.left.final_weight(&state.left),
            &self.right.final_weight(&state.right),
        )
    }

    fn from(&self, transition: &Self::Transition) -> Self::State {
        transition.from.clone()
    }

    fn to(&self, transition: &Self::Transition) -> Self::State {
        transition.to.clone()
    }

    fn label(&self, transition: &Self::Transition) -> Option<P::Label> {
        transition.label.clone()
    }

    fn transition_weight(&self, transition: &Self::Transition) -> Weight<A> {
        self.weight_of(transition)
    }

    fn semiring(&self) -> &A::Semiring {
        self.left.semiring()
    }

    /// Lexicographic over (left, right, filter) when both operands know
    /// their order.
    fn topological_order(&self) -> Option<StateOrder<'_, Self::State>> {
        let left = self.left.topological_order()?;
        let right = self.right.topological_order()?;
        Some(Box::new(
            move |a: &ProductState<A, B>, b: &ProductState<A, B>| {
                left(&a.left, &b.left)
                    .then_with(|| right(&a.right, &b.right))
                    .then_with(|| a.filter.cmp(&b.filter))
            },
        ))
    }
}
