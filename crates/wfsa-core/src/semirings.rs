// Concrete semirings: Boolean, real (probability), tropical and log.

use std::cmp::Ordering;

use crate::SemiringError;
use crate::semiring::{OrderedSemiring, Semifield, Semiring};

// ---------------------------------------------------------------------------
// Boolean
// ---------------------------------------------------------------------------

/// The Boolean semiring `({false, true}, or, and, false, true)`.
///
/// Automata over this semiring are unweighted acceptors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BooleanSemiring;

impl Semiring for BooleanSemiring {
    type Weight = bool;

    fn zero(&self) -> bool {
        false
    }

    fn one(&self) -> bool {
        true
    }

    fn add(&self, a: &bool, b: &bool) -> bool {
        *a || *b
    }

    fn multiply(&self, a: &bool, b: &bool) -> bool {
        *a && *b
    }
}

impl Semifield for BooleanSemiring {
    fn inverse(&self, x: &bool) -> Result<bool, SemiringError> {
        if *x {
            Ok(true)
        } else {
            Err(SemiringError::ZeroInverse)
        }
    }
}

impl OrderedSemiring for BooleanSemiring {
    /// Accepted (`true`) before rejected.
    fn compare(&self, a: &bool, b: &bool) -> Ordering {
        b.cmp(a)
    }
}

// ---------------------------------------------------------------------------
// Real
// ---------------------------------------------------------------------------

/// The real semiring `(R+, +, *, 0, 1)`, typically carrying probabilities.
///
/// Weights are expected to be non-negative; larger weights rank first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RealSemiring;

impl Semiring for RealSemiring {
    type Weight = f64;

    fn zero(&self) -> f64 {
        0.0
    }

    fn one(&self) -> f64 {
        1.0
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    fn multiply(&self, a: &f64, b: &f64) -> f64 {
        a * b
    }
}

impl Semifield for RealSemiring {
    fn inverse(&self, x: &f64) -> Result<f64, SemiringError> {
        if *x == 0.0 {
            return Err(SemiringError::ZeroInverse);
        }
        if !x.is_finite() {
            return Err(SemiringError::NotInvertible(x.to_string()));
        }
        Ok(1.0 / x)
    }
}

impl OrderedSemiring for RealSemiring {
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        b.total_cmp(a)
    }
}

// ---------------------------------------------------------------------------
// Tropical
// ---------------------------------------------------------------------------

/// The tropical semiring `(R ∪ {+inf}, min, +, +inf, 0)`.
///
/// Shortest distance over this semiring is the classical shortest path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TropicalSemiring;

impl Semiring for TropicalSemiring {
    type Weight = f64;

    fn zero(&self) -> f64 {
        f64::INFINITY
    }

    fn one(&self) -> f64 {
        0.0
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a.min(*b)
    }

    fn multiply(&self, a: &f64, b: &f64) -> f64 {
        if *a == f64::INFINITY || *b == f64::INFINITY {
            return f64::INFINITY;
        }
        a + b
    }
}

impl Semifield for TropicalSemiring {
    fn inverse(&self, x: &f64) -> Result<f64, SemiringError> {
        tropical_inverse(*x)
    }
}

impl OrderedSemiring for TropicalSemiring {
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }
}

fn tropical_inverse(x: f64) -> Result<f64, SemiringError> {
    if x == f64::INFINITY {
        return Err(SemiringError::ZeroInverse);
    }
    if !x.is_finite() {
        return Err(SemiringError::NotInvertible(x.to_string()));
    }
    Ok(-x)
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// The log semiring over negative log weights:
/// `add(a, b) = -ln(e^-a + e^-b)`, `multiply = +`, `zero = +inf`, `one = 0`.
///
/// The real semiring in log space; numerically stable for long paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LogSemiring;

impl Semiring for LogSemiring {
    type Weight = f64;

    fn zero(&self) -> f64 {
        f64::INFINITY
    }

    fn one(&self) -> f64 {
        0.0
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        if *a == f64::INFINITY {
            return *b;
        }
        if *b == f64::INFINITY {
            return *a;
        }
        let (low, high) = if a <= b { (*a, *b) } else { (*b, *a) };
        low - (-(high - low)).exp().ln_1p()
    }

    fn multiply(&self, a: &f64, b: &f64) -> f64 {
        if *a == f64::INFINITY || *b == f64::INFINITY {
            return f64::INFINITY;
        }
        a + b
    }
}

impl Semifield for LogSemiring {
    fn inverse(&self, x: &f64) -> Result<f64, SemiringError> {
        tropical_inverse(*x)
    }
}

impl OrderedSemiring for LogSemiring {
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }
}
