// Weight convergence conditions for iterative shortest-distance computation.

/// Decides whether two successive estimates of a weight are close enough for
/// a shortest-distance solver to stop relaxing.
///
/// Conditions are stateless. Any `Fn(&W, &W) -> bool` closure is one.
pub trait ConvergenceCondition<W> {
    /// `true` if `current` is no material change over `previous`.
    fn converged(&self, previous: &W, current: &W) -> bool;
}

/// Converged if and only if both estimates are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactConvergence;

impl<W: PartialEq> ConvergenceCondition<W> for ExactConvergence {
    fn converged(&self, previous: &W, current: &W) -> bool {
        previous == current
    }
}

/// Converged when two floating point estimates differ by at most `tolerance`.
///
/// Infinite estimates only converge to an equal infinity, so a state first
/// reached from `+inf` (tropical zero) is always recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceConvergence {
    pub tolerance: f64,
}

impl ToleranceConvergence {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl ConvergenceCondition<f64> for ToleranceConvergence {
    fn converged(&self, previous: &f64, current: &f64) -> bool {
        if previous == current {
            return true;
        }
        if !previous.is_finite() || !current.is_finite() {
            return false;
        }
        (previous - current).abs() <= self.tolerance
    }
}

impl<W, F> ConvergenceCondition<W> for F
where
    F: Fn(&W, &W) -> bool,
{
    fn converged(&self, previous: &W, current: &W) -> bool {
        self(previous, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_equality() {
        assert!(ExactConvergence.converged(&1.0, &1.0));
        assert!(!ExactConvergence.converged(&1.0, &1.0000001));
        assert!(ExactConvergence.converged(&true, &true));
    }

    #[test]
    fn tolerance_accepts_small_differences() {
        let c = ToleranceConvergence::new(1e-6);
        assert!(c.converged(&0.5, &0.5000001));
        assert!(!c.converged(&0.5, &0.51));
    }

    #[test]
    fn tolerance_never_converges_from_infinity() {
        let c = ToleranceConvergence::new(f64::MAX);
        assert!(!c.converged(&f64::INFINITY, &3.0));
        assert!(c.converged(&f64::INFINITY, &f64::INFINITY));
    }

    #[test]
    fn closures_are_conditions() {
        let within_one = |a: &i64, b: &i64| (a - b).abs() <= 1;
        assert!(within_one.converged(&3, &4));
        assert!(!within_one.converged(&3, &5));
    }
}
