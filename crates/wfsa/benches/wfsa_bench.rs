// Criterion benchmarks for the shortest-distance solver and k-best queries.
//
// Run:
//   cargo bench -p wfsa

use criterion::{Criterion, criterion_group, criterion_main};

use wfsa::algebra::{ExactConvergence, LogSemiring, Semiring, TropicalSemiring};
use wfsa::automata::{
    best_strings, chars, multiple_strings_automaton, shortest_complete_distance,
    shortest_complete_distance_with, shortest_distances_from_initial_states, shortest_paths,
    string_weight,
};
use wfsa::operations::Intersection;
use wfsa::queue::FifoQueue;
use wfsa::{AutomatonBuilder, ExplicitAutomaton, ShortestDistances};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A `side` x `side` grid with right (`r`) and down (`d`) moves. Acyclic, so
/// the default queue processes it in topological order.
fn grid<S>(semiring: S, side: usize) -> ExplicitAutomaton<char, S>
where
    S: Semiring<Weight = f64>,
{
    let mut b = AutomatonBuilder::new(semiring);
    let s = b.add_states(side * side);
    let at = |row: usize, col: usize| s[row * side + col];
    b.set_initial_weight(at(0, 0), 0.0).ok();
    b.set_final_weight(at(side - 1, side - 1), 0.0).ok();
    for row in 0..side {
        for col in 0..side {
            let w = ((row * 7 + col * 3) % 5) as f64;
            if col + 1 < side {
                b.add_transition(at(row, col), at(row, col + 1), Some('r'), w).ok();
            }
            if row + 1 < side {
                b.add_transition(at(row, col), at(row + 1, col), Some('d'), w + 1.0).ok();
            }
        }
    }
    b.build()
}

/// A ring of `len` states with shortcuts across it, so the solver
/// has to relax states more than once.
fn ring(len: usize) -> ExplicitAutomaton<char, TropicalSemiring> {
    let mut b = AutomatonBuilder::new(TropicalSemiring);
    let s = b.add_states(len);
    b.set_initial_weight(s[0], 0.0).ok();
    b.set_final_weight(s[len - 1], 0.0).ok();
    for i in 0..len {
        b.add_transition(s[i], s[(i + 1) % len], Some('a'), 1.0).ok();
        if i % 10 == 0 {
            b.add_transition(s[i], s[(i + len / 2) % len], Some('b'), 4.0).ok();
        }
    }
    b.build()
}

fn dictionary() -> Vec<Vec<char>> {
    [
        "kala", "kalat", "kalan", "kallio", "kanto", "kansa", "kassa", "katu", "kauha", "kaura",
        "talo", "talot", "talon", "tammi", "tanssi", "tasku", "tauko", "tavara",
    ]
    .iter()
    .map(|w| chars(w))
    .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_solver(c: &mut Criterion) {
    let g = grid(TropicalSemiring, 40);
    c.bench_function("sssd_grid_40x40_topological", |b| {
        b.iter(|| std::hint::black_box(shortest_distances_from_initial_states(&g)));
    });

    let fifo = ShortestDistances::new(FifoQueue, ExactConvergence);
    c.bench_function("sssd_grid_40x40_fifo", |b| {
        b.iter(|| std::hint::black_box(shortest_complete_distance_with(&g, &fifo)));
    });

    let r = ring(2_000);
    c.bench_function("sssd_ring_2000", |b| {
        b.iter(|| std::hint::black_box(shortest_complete_distance(&r)));
    });
}

fn bench_k_best(c: &mut Criterion) {
    let g = grid(TropicalSemiring, 8);
    c.bench_function("shortest_paths_grid_8x8_k10", |b| {
        b.iter(|| std::hint::black_box(shortest_paths(&g, 10)));
    });

    let log = grid(LogSemiring, 6);
    c.bench_function("best_strings_log_grid_6x6_k10", |b| {
        b.iter(|| std::hint::black_box(best_strings(&log, 10)));
    });
}

fn bench_views(c: &mut Criterion) {
    let words = dictionary();
    c.bench_function("multiple_strings_build_and_query", |b| {
        b.iter(|| {
            let dict = multiple_strings_automaton(TropicalSemiring, words.clone()).ok();
            std::hint::black_box(dict.map(|d| string_weight(&d, &chars("tanssi"))))
        });
    });

    let left = multiple_strings_automaton(TropicalSemiring, words.clone());
    let right = multiple_strings_automaton(TropicalSemiring, words[5..].to_vec());
    if let (Ok(left), Ok(right)) = (left, right) {
        c.bench_function("intersection_of_dictionaries", |b| {
            b.iter(|| std::hint::black_box(shortest_complete_distance(&Intersection::new(&left, &right))));
        });
    }
}

criterion_group!(benches, bench_solver, bench_k_best, bench_views);
criterion_main!(benches);
