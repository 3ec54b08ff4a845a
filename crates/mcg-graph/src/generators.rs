use std::collections::BTreeSet;

use mcg_core::{ErrorInfo, McgError, RngHandle};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::CompatibilityGraph;

fn default_swaps_per_edge() -> usize {
    10
}

fn default_max_attempt_factor() -> usize {
    100
}

/// Budget for the degree-preserving swap chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOptions {
    /// Successful swaps required per edge.
    #[serde(default = "default_swaps_per_edge")]
    pub swaps_per_edge: usize,
    /// Attempts allowed per required swap before the draw is abandoned.
    #[serde(default = "default_max_attempt_factor")]
    pub max_attempt_factor: usize,
}

impl Default for SwapOptions {
    fn default() -> Self {
        Self {
            swaps_per_edge: default_swaps_per_edge(),
            max_attempt_factor: default_max_attempt_factor(),
        }
    }
}

impl SwapOptions {
    /// Successful swaps required for a graph with `edge_count` edges.
    pub fn required_swaps(&self, edge_count: usize) -> usize {
        self.swaps_per_edge.saturating_mul(edge_count)
    }

    /// Attempt budget for a graph with `edge_count` edges.
    pub fn attempt_budget(&self, edge_count: usize) -> usize {
        self.required_swaps(edge_count)
            .saturating_mul(self.max_attempt_factor)
    }
}

/// Draws a graph with exactly the observed degree sequence.
///
/// Starts from the observed edges and applies double-edge swaps
/// `(a, b), (c, d) -> (a, d), (c, b)`; proposals that would create a self-loop
/// or a duplicate edge are rejected. Fails with an ensemble error when the
/// required number of successful swaps is not reached within the budget.
pub fn configuration_model(
    graph: &CompatibilityGraph,
    rng: &mut RngHandle,
    opts: &SwapOptions,
) -> Result<CompatibilityGraph, McgError> {
    let mut edges: Vec<(usize, usize)> = graph.edges().collect();
    if edges.len() < 2 {
        return Err(McgError::Ensemble(
            ErrorInfo::new("swap-infeasible", "double-edge swaps need at least two edges")
                .with_context("edges", edges.len().to_string()),
        ));
    }
    let mut adjacency: Vec<BTreeSet<usize>> = graph
        .adjacency_lists()
        .iter()
        .map(|list| list.iter().copied().collect())
        .collect();

    let required = opts.required_swaps(edges.len());
    let budget = opts.attempt_budget(edges.len());
    let mut accepted = 0usize;
    let mut attempts = 0usize;
    while accepted < required {
        if attempts >= budget {
            return Err(McgError::Ensemble(
                ErrorInfo::new(
                    "swap-budget-exhausted",
                    "degree-preserving swap chain did not reach the required swap count",
                )
                .with_context("accepted", accepted.to_string())
                .with_context("required", required.to_string())
                .with_context("attempts", attempts.to_string()),
            ));
        }
        attempts += 1;

        let first = rng.gen_range(0..edges.len());
        let second = rng.gen_range(0..edges.len());
        if first == second {
            continue;
        }
        let (a, b) = edges[first];
        let (mut c, mut d) = edges[second];
        if rng.gen::<bool>() {
            std::mem::swap(&mut c, &mut d);
        }
        if a == d || c == b || adjacency[a].contains(&d) || adjacency[c].contains(&b) {
            continue;
        }

        adjacency[a].remove(&b);
        adjacency[b].remove(&a);
        adjacency[c].remove(&d);
        adjacency[d].remove(&c);
        adjacency[a].insert(d);
        adjacency[d].insert(a);
        adjacency[c].insert(b);
        adjacency[b].insert(c);
        edges[first] = (a.min(d), a.max(d));
        edges[second] = (c.min(b), c.max(b));
        accepted += 1;
    }

    CompatibilityGraph::from_adjacency_sets(graph.labels().to_vec(), adjacency)
}

/// Draws a graph with the observed node and edge counts, edges placed uniformly
/// over all node pairs.
pub fn random_model(
    graph: &CompatibilityGraph,
    rng: &mut RngHandle,
) -> Result<CompatibilityGraph, McgError> {
    let n = graph.node_count();
    let m = graph.edge_count();
    let pairs = n.saturating_mul(n.saturating_sub(1)) / 2;
    if m > pairs {
        return Err(McgError::Ensemble(
            ErrorInfo::new("edge-count-exceeds-pairs", "more edges than node pairs")
                .with_context("edges", m.to_string())
                .with_context("pairs", pairs.to_string()),
        ));
    }
    let mut chosen = index::sample(rng, pairs, m).into_vec();
    chosen.sort_unstable();

    let mut edges = Vec::with_capacity(m);
    let mut row = 0usize;
    let mut row_start = 0usize;
    for pair in chosen {
        while pair >= row_start + (n - 1 - row) {
            row_start += n - 1 - row;
            row += 1;
        }
        edges.push((row, row + 1 + (pair - row_start)));
    }
    CompatibilityGraph::from_edges(graph.labels().to_vec(), edges)
}
