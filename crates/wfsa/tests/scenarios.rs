//! End-to-end scenarios over primitive automata and composed views.
//!
//! Run: cargo test -p wfsa --test scenarios

use wfsa::algebra::{BooleanSemiring, LogSemiring, RealSemiring, TropicalSemiring};
use wfsa::automata::{
    best_strings, chars, labels_to_string, multiple_strings_automaton, shortest_complete_distance,
    shortest_distances_from_initial_states, shortest_paths, single_string_automaton, states,
    string_weight,
};
use wfsa::operations::{Determinization, Intersection, Union, reverse};
use wfsa::primitive::SingleTransitionAutomaton;
use wfsa::{AutomatonBuilder, ExplicitAutomaton, ShortestDistances};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Tropical acceptor of single-letter words with the given weights.
fn weighted_letters(words: &[(char, f64)]) -> ExplicitAutomaton<char, TropicalSemiring> {
    let mut b = AutomatonBuilder::new(TropicalSemiring);
    let start = b.add_state();
    let end = b.add_state();
    b.set_initial_weight(start, 0.0).unwrap();
    b.set_final_weight(end, 0.0).unwrap();
    for &(c, w) in words {
        b.add_transition(start, end, Some(c), w).unwrap();
    }
    b.build()
}

fn strings_of<S, T, W>(paths: &[wfsa::Path<S, T, char, W>]) -> Vec<String> {
    paths.iter().map(|p| labels_to_string(&p.label)).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn tropical_chain_complete_distance() {
    let mut b = AutomatonBuilder::new(TropicalSemiring);
    let s = b.add_states(3);
    b.set_initial_weight(s[0], 0.0).unwrap();
    b.set_final_weight(s[2], 0.0).unwrap();
    b.add_transition(s[0], s[1], Some('x'), 1.0).unwrap();
    b.add_transition(s[1], s[2], Some('y'), 2.0).unwrap();
    let a = b.build();

    assert_eq!(shortest_complete_distance(&a), 3.0);
}

#[test]
fn boolean_union_of_cat_and_car() {
    let cat = single_string_automaton(BooleanSemiring, chars("cat"));
    let car = single_string_automaton(BooleanSemiring, chars("car"));
    let u = Union::new(vec![cat, car]).unwrap();

    assert!(string_weight(&u, &chars("cat")));
    assert!(string_weight(&u, &chars("car")));
    assert!(!string_weight(&u, &chars("cab")));
    assert!(!string_weight(&u, &chars("ca")));
}

#[test]
fn two_best_of_three_words() {
    let a = weighted_letters(&[('a', 1.0), ('b', 2.0), ('c', 5.0)]);
    let best = best_strings(&a, 2);
    assert_eq!(strings_of(&best), vec!["a", "b"]);
    assert_eq!(best[0].weight, 1.0);
    assert_eq!(best[1].weight, 2.0);
}

#[test]
fn single_string_weight_is_one_or_zero() {
    let a = single_string_automaton(TropicalSemiring, chars("abc"));
    assert_eq!(string_weight(&a, &chars("abc")), 0.0);
    assert_eq!(string_weight(&a, &chars("ab")), f64::INFINITY);

    let r = single_string_automaton(RealSemiring, chars("abc"));
    assert_eq!(string_weight(&r, &chars("abc")), 1.0);
    assert_eq!(string_weight(&r, &chars("abd")), 0.0);
}

#[test]
fn best_strings_merge_paths_of_one_string() {
    // "a" has two paths (1.0 and 1.5), "b" one path (1.2). Under the log
    // semiring the two paths of "a" add up to a better weight than either.
    let mut b = AutomatonBuilder::new(LogSemiring);
    let s = b.add_states(2);
    b.set_initial_weight(s[0], 0.0).unwrap();
    b.set_final_weight(s[1], 0.0).unwrap();
    b.add_transition(s[0], s[1], Some('a'), 1.0).unwrap();
    b.add_transition(s[0], s[1], Some('a'), 1.5).unwrap();
    b.add_transition(s[0], s[1], Some('b'), 1.2).unwrap();
    let a = b.build();

    let best = best_strings(&a, 5);
    assert_eq!(strings_of(&best), vec!["a", "b"]);
    assert!(best[0].weight < 1.0);

    let paths = shortest_paths(&a, 5);
    assert_eq!(strings_of(&paths), vec!["a", "b", "a"]);
}

#[test]
fn best_strings_first_weight_is_complete_distance() {
    let a = weighted_letters(&[('p', 4.0), ('q', 0.5), ('r', 2.0)]);
    let best = best_strings(&a, 3);
    assert_eq!(best.len(), 3);
    assert_eq!(best[0].weight, shortest_complete_distance(&a));
}

#[test]
fn fewer_paths_than_requested() {
    let a = weighted_letters(&[('a', 1.0)]);
    assert_eq!(best_strings(&a, 10).len(), 1);
    let empty = AutomatonBuilder::<char, _>::new(TropicalSemiring).build();
    assert!(shortest_paths(&empty, 3).is_empty());
}

#[test]
fn reversal_reads_backwards() {
    let a = single_string_automaton(BooleanSemiring, chars("stressed"));
    let r = reverse(&a);
    assert!(string_weight(&r, &chars("desserts")));
    assert!(!string_weight(&r, &chars("stressed")));
}

#[test]
fn double_reversal_preserves_weights() {
    let a = weighted_letters(&[('a', 1.0), ('b', 2.5)]);
    let rr = reverse(reverse(&a));
    for w in ["a", "b", "c", ""] {
        assert_eq!(string_weight(&rr, &chars(w)), string_weight(&a, &chars(w)));
    }
}

#[test]
fn intersection_of_languages() {
    let left = multiple_strings_automaton(BooleanSemiring, vec![chars("ab"), chars("ba")]).unwrap();
    let right =
        multiple_strings_automaton(BooleanSemiring, vec![chars("ba"), chars("bb")]).unwrap();
    let both = Intersection::new(&left, &right);
    assert!(string_weight(&both, &chars("ba")));
    assert!(!string_weight(&both, &chars("ab")));
    assert!(!string_weight(&both, &chars("bb")));
}

#[test]
fn repeated_strings_add_up() {
    let a = multiple_strings_automaton(RealSemiring, vec![chars("hi"), chars("hi"), chars("ho")])
        .unwrap();
    assert!((string_weight(&a, &chars("hi")) - 2.0).abs() < 1e-12);
    assert!((string_weight(&a, &chars("ho")) - 1.0).abs() < 1e-12);
    assert_eq!(string_weight(&a, &chars("h")), 0.0);
}

#[test]
fn determinization_of_single_transition() {
    let a = SingleTransitionAutomaton::new(TropicalSemiring, Some('z'), 3.0);
    let det = Determinization::new(&a);
    assert_eq!(states(&det).len(), 2);
    assert_eq!(string_weight(&det, &['z']), 3.0);
}

#[test]
fn solver_is_idempotent() {
    let a = weighted_letters(&[('a', 1.0), ('b', 2.0)]);
    let first = shortest_distances_from_initial_states(&a);
    let second = shortest_distances_from_initial_states(&a);
    assert_eq!(first, second);

    let solver: ShortestDistances = ShortestDistances::default();
    let all = states(&a);
    assert_eq!(solver.compute(&a, &all[0]), solver.compute(&a, &all[0]));
}
