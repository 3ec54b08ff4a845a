use std::collections::BTreeSet;

use mcg_core::{McgError, RngHandle};
use mcg_graph::CompatibilityGraph;
use rand::seq::index;
use rand::Rng;

/// Node-pair counts at or below this are enumerated when drawing non-edges.
const ENUMERATE_PAIR_LIMIT: usize = 1 << 22;

/// Held-out pairs for one fold: true edges and true non-edges, equal in number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeldOut {
    pub edges: Vec<(usize, usize)>,
    pub non_edges: Vec<(usize, usize)>,
}

/// Largest balanced sample the graph supports for a requested size.
pub(crate) fn feasible_sample_size(graph: &CompatibilityGraph, requested: usize) -> usize {
    let n = graph.node_count();
    let pairs = n.saturating_mul(n.saturating_sub(1)) / 2;
    let edges = graph.edge_count();
    requested.min(edges).min(pairs - edges)
}

/// Draws a balanced held-out sample from the upper triangle.
pub(crate) fn sample_held_out(graph: &CompatibilityGraph, size: usize, rng: &mut RngHandle) -> HeldOut {
    let all_edges: Vec<(usize, usize)> = graph.edges().collect();
    let mut picked = index::sample(rng, all_edges.len(), size).into_vec();
    picked.sort_unstable();
    let edges = picked.into_iter().map(|idx| all_edges[idx]).collect();

    let n = graph.node_count();
    let pairs = n.saturating_mul(n.saturating_sub(1)) / 2;
    let non_edges = if pairs <= ENUMERATE_PAIR_LIMIT {
        let candidates: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| !graph.has_edge(i, j))
            .collect();
        let mut picked = index::sample(rng, candidates.len(), size).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|idx| candidates[idx]).collect()
    } else {
        // size never exceeds the non-edge count
        let mut chosen = BTreeSet::new();
        while chosen.len() < size {
            let i = rng.gen_range(0..n);
            let j = rng.gen_range(0..n);
            if i == j || graph.has_edge(i, j) {
                continue;
            }
            chosen.insert((i.min(j), i.max(j)));
        }
        chosen.into_iter().collect()
    };
    HeldOut { edges, non_edges }
}

/// Copy of the graph with the held-out edges removed; the input is untouched.
pub(crate) fn mask(graph: &CompatibilityGraph, held_out: &HeldOut) -> Result<CompatibilityGraph, McgError> {
    let removed: BTreeSet<(usize, usize)> = held_out.edges.iter().copied().collect();
    CompatibilityGraph::from_edges(
        graph.labels().to_vec(),
        graph.edges().filter(|edge| !removed.contains(edge)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcg_morph::Middle;

    fn path(n: usize) -> CompatibilityGraph {
        let labels = (0..n).map(|i| Middle::Text(format!("p{i}"))).collect();
        CompatibilityGraph::from_edges(labels, (1..n).map(|i| (i - 1, i))).unwrap()
    }

    #[test]
    fn sample_is_balanced_and_labelled_correctly() {
        let graph = path(10);
        let mut rng = RngHandle::from_seed(5);
        let held = sample_held_out(&graph, 4, &mut rng);
        assert_eq!(held.edges.len(), 4);
        assert_eq!(held.non_edges.len(), 4);
        assert!(held.edges.iter().all(|&(i, j)| i < j && graph.has_edge(i, j)));
        assert!(held.non_edges.iter().all(|&(i, j)| i < j && !graph.has_edge(i, j)));
    }

    #[test]
    fn masking_leaves_the_original_alone() {
        let graph = path(6);
        let mut rng = RngHandle::from_seed(1);
        let held = sample_held_out(&graph, 2, &mut rng);
        let masked = mask(&graph, &held).unwrap();
        assert_eq!(masked.edge_count(), 3);
        assert_eq!(graph.edge_count(), 5);
        assert!(held.edges.iter().all(|&(i, j)| !masked.has_edge(i, j)));
    }

    #[test]
    fn feasible_size_is_capped_by_both_classes() {
        let graph = path(4);
        assert_eq!(feasible_sample_size(&graph, 100), 3);
        let triangle = CompatibilityGraph::from_edges(
            (0..3).map(|i| Middle::Text(format!("t{i}"))).collect(),
            [(0, 1), (1, 2), (0, 2)],
        )
        .unwrap();
        assert_eq!(feasible_sample_size(&triangle, 10), 0);
    }
}
