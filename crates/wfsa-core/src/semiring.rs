// Semiring contracts: the algebra every automaton weight type satisfies.

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::SemiringError;

/// A semiring over [`Semiring::Weight`].
///
/// A semiring is a value (not just a type) so that parameterized algebras,
/// such as the k-best lifting of another semiring, can carry their parameters.
///
/// Implementations must satisfy the semiring laws for all weights `a`, `b`, `c`:
///
/// - `add` is associative and commutative, with `zero` as identity
/// - `multiply` is associative, with `one` as identity
/// - `multiply` distributes over `add` from both sides
/// - `zero` is absorbing: `multiply(zero, a) = multiply(a, zero) = zero`
///
/// The laws are preconditions. Nothing checks them at runtime; algorithms
/// given a lawless semiring return algebraically meaningless results.
pub trait Semiring {
    /// The carrier set.
    type Weight: Clone + PartialEq + Debug;

    /// Additive identity. Marks absent states, transitions and paths.
    fn zero(&self) -> Self::Weight;

    /// Multiplicative identity.
    fn one(&self) -> Self::Weight;

    fn add(&self, a: &Self::Weight, b: &Self::Weight) -> Self::Weight;

    fn multiply(&self, a: &Self::Weight, b: &Self::Weight) -> Self::Weight;

    /// Whether `weight` equals the additive identity.
    fn is_zero(&self, weight: &Self::Weight) -> bool {
        *weight == self.zero()
    }

    /// Whether `weight` equals the multiplicative identity.
    fn is_one(&self, weight: &Self::Weight) -> bool {
        *weight == self.one()
    }

    /// Sum of all weights, `zero` for an empty sequence.
    fn sum<'w, I>(&self, weights: I) -> Self::Weight
    where
        I: IntoIterator<Item = &'w Self::Weight>,
        Self::Weight: 'w,
    {
        weights
            .into_iter()
            .fold(self.zero(), |acc, w| self.add(&acc, w))
    }

    /// Product of all weights in order, `one` for an empty sequence.
    fn product<'w, I>(&self, weights: I) -> Self::Weight
    where
        I: IntoIterator<Item = &'w Self::Weight>,
        Self::Weight: 'w,
    {
        weights
            .into_iter()
            .fold(self.one(), |acc, w| self.multiply(&acc, w))
    }
}

/// A semiring in which every non-zero weight has a multiplicative inverse.
///
/// Required by determinization, which factors the accumulated weight out of
/// each subset state.
pub trait Semifield: Semiring {
    /// The weight `y` with `multiply(x, y) = one`.
    ///
    /// Returns [`SemiringError::ZeroInverse`] for `zero`.
    fn inverse(&self, x: &Self::Weight) -> Result<Self::Weight, SemiringError>;

    /// `multiply(inverse(b), a)`: removes the factor `b` from the left of `a`.
    fn divide(&self, a: &Self::Weight, b: &Self::Weight) -> Result<Self::Weight, SemiringError> {
        Ok(self.multiply(&self.inverse(b)?, a))
    }
}

/// A semiring with a natural total order over weights, used to rank paths.
pub trait OrderedSemiring: Semiring {
    /// Compares two weights; `Ordering::Less` means `a` is the better weight.
    ///
    /// Must be a total order in which `zero` is never better than another weight.
    fn compare(&self, a: &Self::Weight, b: &Self::Weight) -> Ordering;
}
