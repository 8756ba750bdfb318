//! Property-based tests for the semiring and semifield laws.
//!
//! Floating point semirings are checked with a relative tolerance: the
//! laws hold over the reals, not bit-for-bit over `f64`.

use proptest::prelude::*;

use wfsa_core::{
    BooleanSemiring, LogSemiring, RealSemiring, Semifield, Semiring, TropicalSemiring,
};

fn close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

fn check_laws<S>(s: &S, a: f64, b: f64, c: f64) -> Result<(), TestCaseError>
where
    S: Semiring<Weight = f64>,
{
    prop_assert!(close(s.add(&s.add(&a, &b), &c), s.add(&a, &s.add(&b, &c))));
    prop_assert!(close(s.add(&a, &b), s.add(&b, &a)));
    prop_assert!(close(
        s.multiply(&s.multiply(&a, &b), &c),
        s.multiply(&a, &s.multiply(&b, &c))
    ));
    prop_assert!(close(
        s.multiply(&a, &s.add(&b, &c)),
        s.add(&s.multiply(&a, &b), &s.multiply(&a, &c))
    ));
    prop_assert!(close(
        s.multiply(&s.add(&a, &b), &c),
        s.add(&s.multiply(&a, &c), &s.multiply(&b, &c))
    ));
    prop_assert!(close(s.add(&s.zero(), &a), a));
    prop_assert!(close(s.multiply(&s.one(), &a), a));
    prop_assert!(close(s.multiply(&a, &s.one()), a));
    prop_assert!(s.is_zero(&s.multiply(&s.zero(), &a)));
    prop_assert!(s.is_zero(&s.multiply(&a, &s.zero())));
    Ok(())
}

fn check_inverse<S>(s: &S, x: f64) -> Result<(), TestCaseError>
where
    S: Semifield<Weight = f64>,
{
    if !s.is_zero(&x) {
        let inverse = s.inverse(&x).unwrap();
        prop_assert!(close(s.multiply(&x, &inverse), s.one()));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn tropical_laws(a in -1e6f64..1e6, b in -1e6f64..1e6, c in -1e6f64..1e6) {
        check_laws(&TropicalSemiring, a, b, c)?;
        check_inverse(&TropicalSemiring, a)?;
    }

    #[test]
    fn log_laws(a in 0.0f64..50.0, b in 0.0f64..50.0, c in 0.0f64..50.0) {
        check_laws(&LogSemiring, a, b, c)?;
        check_inverse(&LogSemiring, a)?;
    }

    #[test]
    fn real_laws(a in 0.0f64..1e3, b in 0.0f64..1e3, c in 0.0f64..1e3) {
        check_laws(&RealSemiring, a, b, c)?;
        check_inverse(&RealSemiring, a)?;
    }

    #[test]
    fn boolean_laws(a in any::<bool>(), b in any::<bool>(), c in any::<bool>()) {
        let s = BooleanSemiring;
        prop_assert_eq!(s.add(&s.add(&a, &b), &c), s.add(&a, &s.add(&b, &c)));
        prop_assert_eq!(s.add(&a, &b), s.add(&b, &a));
        prop_assert_eq!(s.multiply(&a, &s.add(&b, &c)), s.add(&s.multiply(&a, &b), &s.multiply(&a, &c)));
        prop_assert_eq!(s.add(&s.zero(), &a), a);
        prop_assert_eq!(s.multiply(&s.one(), &a), a);
        prop_assert_eq!(s.multiply(&s.zero(), &a), s.zero());
        if a {
            prop_assert_eq!(s.multiply(&a, &s.inverse(&a).unwrap()), s.one());
        }
    }
}

#[test]
fn tropical_zero_stays_absorbing_for_negative_weights() {
    let s = TropicalSemiring;
    assert!(s.is_zero(&s.multiply(&s.zero(), &-1e300)));
}
