use mcg_graph::CompatibilityGraph;
use mcg_morph::Middle;
use mcg_spec::{
    analyze, top_algebraic_eigenpairs, top_eigenpairs, EigenOptions, SpectralGap, SpectralOptions,
    Solver,
};
use proptest::prelude::*;

fn ring_with_chords(n: usize, stride: usize) -> CompatibilityGraph {
    let labels = (0..n).map(|i| Middle::Text(format!("m{i:03}"))).collect();
    let mut edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    edges.extend((0..n).step_by(stride).map(|i| (i, (i * 7 + 3) % n)));
    CompatibilityGraph::from_edges(labels, edges.into_iter().filter(|(a, b)| a != b)).unwrap()
}

fn star(leaves: usize) -> CompatibilityGraph {
    let labels = (0..=leaves).map(|i| Middle::Text(format!("m{i:03}"))).collect();
    CompatibilityGraph::from_edges(labels, (1..=leaves).map(|leaf| (0, leaf))).unwrap()
}

#[test]
fn iterative_and_dense_solvers_agree() {
    let graph = ring_with_chords(60, 4);
    let dense = top_algebraic_eigenpairs(&graph, 5, &EigenOptions::default()).unwrap();
    let iterative = top_algebraic_eigenpairs(
        &graph,
        5,
        &EigenOptions {
            dense_node_limit: 10,
            max_iterations: 5_000,
            tolerance: 1e-7,
        },
    )
    .unwrap();
    assert_eq!(dense.solver, Solver::Dense);
    assert_eq!(iterative.solver, Solver::Iterative);
    assert!(iterative.converged);
    for (a, b) in dense.values.iter().zip(&iterative.values) {
        assert!((a - b).abs() < 1e-6, "{a} vs {b}");
    }
}

#[test]
fn both_solvers_keep_the_negative_end_of_a_star() {
    let graph = star(9);
    let dense = top_eigenpairs(&graph, 2, &EigenOptions::default()).unwrap();
    let iterative = top_eigenpairs(
        &graph,
        2,
        &EigenOptions {
            dense_node_limit: 2,
            ..EigenOptions::default()
        },
    )
    .unwrap();
    assert_eq!(dense.solver, Solver::Dense);
    assert_eq!(iterative.solver, Solver::Iterative);
    assert!(iterative.converged);
    for pairs in [&dense, &iterative] {
        assert_eq!(pairs.values.len(), 2);
        assert!((pairs.values[0] - 3.0).abs() < 1e-9, "{:?}", pairs.values);
        assert!((pairs.values[1] + 3.0).abs() < 1e-9, "{:?}", pairs.values);
    }

    let algebraic = top_algebraic_eigenpairs(&graph, 2, &EigenOptions::default()).unwrap();
    assert!((algebraic.values[0] - 3.0).abs() < 1e-9);
    assert!(algebraic.values[1].abs() < 1e-9);
}

#[test]
fn star_profile_reports_undefined_gap() {
    let opts = SpectralOptions {
        top_k: 2,
        eigen: EigenOptions {
            dense_node_limit: 2,
            ..EigenOptions::default()
        },
        ..SpectralOptions::default()
    };
    let profile = analyze(&star(9), &opts).unwrap();
    assert_eq!(profile.eigenvalues, vec![3.0, -3.0]);
    assert_eq!(profile.spectral_gap, SpectralGap::Undefined);
    assert_eq!(profile.effective_rank, 1.0);
}

#[test]
fn iteration_cap_is_reported_as_a_note() {
    let graph = ring_with_chords(40, 3);
    let opts = SpectralOptions {
        top_k: 4,
        eigen: EigenOptions {
            dense_node_limit: 10,
            max_iterations: 1,
            tolerance: 1e-14,
        },
        ..SpectralOptions::default()
    };
    let profile = analyze(&graph, &opts).unwrap();
    assert!(!profile.converged);
    assert!(profile.notes.iter().any(|note| note.code == "solver-not-converged"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn analysis_is_deterministic(n in 6usize..40, stride in 2usize..6) {
        let graph = ring_with_chords(n, stride);
        let opts = SpectralOptions { top_k: 3, ..SpectralOptions::default() };
        let first = analyze(&graph, &opts).unwrap();
        let second = analyze(&graph, &opts).unwrap();
        prop_assert_eq!(first, second);
    }
}
