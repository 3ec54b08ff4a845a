use std::cmp::Ordering;

use mcg_core::{ErrorInfo, McgError, RngHandle};
use mcg_graph::CompatibilityGraph;
use nalgebra::{DMatrix, SymmetricEigen};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

fn default_dense_node_limit() -> usize {
    20_000
}

fn default_max_iterations() -> usize {
    1_000
}

fn default_tolerance() -> f64 {
    1e-8
}

const START_BLOCK_SEED: u64 = 0x6d63_6773_7065_6331;

/// Solver selection and convergence controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenOptions {
    /// Graphs with more nodes than this use the iterative solver.
    #[serde(default = "default_dense_node_limit")]
    pub dense_node_limit: usize,
    /// Iteration cap for the iterative solver.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Relative residual at which an iterative eigenpair counts as converged.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for EigenOptions {
    fn default() -> Self {
        Self {
            dense_node_limit: default_dense_node_limit(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

/// Which decomposition produced an eigen set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Solver {
    /// Full dense symmetric decomposition.
    Dense,
    /// Block subspace iteration over the sparse adjacency lists.
    Iterative,
}

/// Leading eigenpairs of a graph's adjacency matrix, eigenvalues descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenPairs {
    /// Eigenvalues, largest first.
    pub values: Vec<f64>,
    /// Unit eigenvectors matching `values`, gauge-fixed so the
    /// largest-magnitude component is positive.
    pub vectors: Vec<Vec<f64>>,
    /// Solver used.
    pub solver: Solver,
    /// False when the iterative solver hit its iteration cap.
    pub converged: bool,
    /// Iterations performed (zero for the dense solver).
    pub iterations: usize,
}

impl EigenPairs {
    fn empty(solver: Solver) -> Self {
        Self {
            values: Vec::new(),
            vectors: Vec::new(),
            solver,
            converged: true,
            iterations: 0,
        }
    }
}

/// Which end of the spectrum an eigen set is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    /// Largest `|λ|`, so strongly negative eigenvalues are kept.
    Magnitude,
    /// Largest `λ`.
    Algebraic,
}

/// Computes the `k` largest-magnitude eigenpairs of the adjacency matrix.
///
/// The selected pairs are returned in descending algebraic order, so negative
/// eigenvalues come last. Equal magnitudes prefer the positive eigenvalue.
/// `k` is capped at the node count. The graph is only read.
pub fn top_eigenpairs(
    graph: &CompatibilityGraph,
    k: usize,
    opts: &EigenOptions,
) -> Result<EigenPairs, McgError> {
    eigenpairs(graph, k, Selection::Magnitude, opts)
}

/// Computes the `k` algebraically largest eigenpairs of the adjacency matrix.
pub fn top_algebraic_eigenpairs(
    graph: &CompatibilityGraph,
    k: usize,
    opts: &EigenOptions,
) -> Result<EigenPairs, McgError> {
    eigenpairs(graph, k, Selection::Algebraic, opts)
}

fn eigenpairs(
    graph: &CompatibilityGraph,
    k: usize,
    selection: Selection,
    opts: &EigenOptions,
) -> Result<EigenPairs, McgError> {
    let n = graph.node_count();
    let k = k.min(n);
    if k == 0 {
        return Ok(EigenPairs::empty(Solver::Dense));
    }
    let mut pairs = if n <= opts.dense_node_limit {
        dense_top(graph, k, selection)
    } else {
        subspace_top(graph, k, selection, opts)
    };
    if pairs.values.iter().any(|value| !value.is_finite()) {
        return Err(McgError::Spectral(
            ErrorInfo::new("non-finite-spectrum", "eigen-solver produced a non-finite value")
                .with_context("nodes", n.to_string())
                .with_context("k", k.to_string()),
        ));
    }
    for vector in &mut pairs.vectors {
        gauge_fix(vector);
    }
    debug!(
        nodes = n,
        k,
        ?selection,
        solver = ?pairs.solver,
        iterations = pairs.iterations,
        "eigenpairs computed"
    );
    Ok(pairs)
}

fn descending(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}

/// Splits `k` picks between the two ends of a spectrum by magnitude.
///
/// `top` is descending, `bottom` ascending. Only non-negative entries of `top`
/// and negative entries of `bottom` are eligible, which keeps the two sides
/// disjoint. Magnitudes within `tie` of each other count as equal and go to
/// the positive side. Returns how many entries to take from each side.
fn magnitude_split(top: &[f64], bottom: &[f64], k: usize, tie: f64) -> (usize, usize) {
    let positives = top.iter().take_while(|value| **value >= 0.0).count();
    let negatives = bottom.iter().take_while(|value| **value < 0.0).count();
    let (mut from_top, mut from_bottom) = (0, 0);
    while from_top + from_bottom < k {
        let take_top = match (top.get(from_top), bottom.get(from_bottom)) {
            (Some(&high), Some(&low)) if from_top < positives && from_bottom < negatives => {
                high >= -low - tie * high.max(1.0)
            }
            _ if from_top < positives => true,
            _ if from_bottom < negatives => false,
            _ => break,
        };
        if take_top {
            from_top += 1;
        } else {
            from_bottom += 1;
        }
    }
    (from_top, from_bottom)
}

fn dense_top(graph: &CompatibilityGraph, k: usize, selection: Selection) -> EigenPairs {
    let n = graph.node_count();
    let mut adjacency = DMatrix::<f64>::zeros(n, n);
    for (i, j) in graph.edges() {
        adjacency[(i, j)] = 1.0;
        adjacency[(j, i)] = 1.0;
    }
    let eigen = SymmetricEigen::new(adjacency);
    let raw: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    let order = descending(&raw);
    let chosen: Vec<usize> = match selection {
        Selection::Algebraic => order.iter().take(k).copied().collect(),
        Selection::Magnitude => {
            let top: Vec<f64> = order.iter().map(|&col| raw[col]).collect();
            let bottom: Vec<f64> = top.iter().rev().copied().collect();
            let (from_top, from_bottom) = magnitude_split(&top, &bottom, k, DENSE_TIE);
            let mut chosen: Vec<usize> = order.iter().take(from_top).copied().collect();
            chosen.extend(order.iter().skip(n - from_bottom).copied());
            chosen
        }
    };
    EigenPairs {
        values: chosen.iter().map(|&col| raw[col]).collect(),
        vectors: chosen
            .iter()
            .map(|&col| eigen.eigenvectors.column(col).iter().copied().collect())
            .collect(),
        solver: Solver::Dense,
        converged: true,
        iterations: 0,
    }
}

const DENSE_TIE: f64 = 1e-9;

fn apply_adjacency(graph: &CompatibilityGraph, block: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = DMatrix::<f64>::zeros(block.nrows(), block.ncols());
    for col in 0..block.ncols() {
        for (row, neighbours) in graph.adjacency_lists().iter().enumerate() {
            out[(row, col)] = neighbours.iter().map(|&j| block[(j, col)]).sum();
        }
    }
    out
}

/// One end of the spectrum from subspace iteration, in the order found.
struct EndPairs {
    values: Vec<f64>,
    vectors: Vec<Vec<f64>>,
    converged: bool,
    iterations: usize,
}

fn subspace_top(
    graph: &CompatibilityGraph,
    k: usize,
    selection: Selection,
    opts: &EigenOptions,
) -> EigenPairs {
    let upper = subspace_end(graph, k, 1.0, opts);
    let (values, vectors, converged, iterations) = match selection {
        Selection::Algebraic => (upper.values, upper.vectors, upper.converged, upper.iterations),
        Selection::Magnitude => {
            let lower = subspace_end(graph, k, -1.0, opts);
            let tie = opts.tolerance.max(DENSE_TIE);
            let (from_top, from_bottom) = magnitude_split(&upper.values, &lower.values, k, tie);
            let mut values: Vec<f64> = upper.values[..from_top].to_vec();
            let mut vectors: Vec<Vec<f64>> = upper.vectors[..from_top].to_vec();
            values.extend(lower.values[..from_bottom].iter().rev());
            vectors.extend(lower.vectors[..from_bottom].iter().rev().cloned());
            (
                values,
                vectors,
                upper.converged && lower.converged,
                upper.iterations + lower.iterations,
            )
        }
    };
    EigenPairs {
        values,
        vectors,
        solver: Solver::Iterative,
        converged,
        iterations,
    }
}

/// Block subspace iteration on `sign·A + sI` with a Rayleigh–Ritz step per
/// sweep.
///
/// The shift `s` exceeds the largest degree, which bounds `|λ|` from above, so
/// the dominant eigenspace of the shifted operator is the top algebraic
/// eigenspace of `sign·A`. A sign of `-1` yields the most negative eigenvalues
/// of `A`, ascending. Values are reported for `A` itself.
fn subspace_end(graph: &CompatibilityGraph, k: usize, sign: f64, opts: &EigenOptions) -> EndPairs {
    let n = graph.node_count();
    let block = (2 * k).max(k + 8).min(n);
    let shift = graph.degrees().into_iter().max().unwrap_or(0) as f64 + 1.0;

    let mut rng = RngHandle::from_seed(START_BLOCK_SEED);
    let start = DMatrix::<f64>::from_fn(n, block, |_, _| rng.gen_range(-0.5..0.5));
    let mut basis = start.qr().q();

    let mut values: Vec<f64> = Vec::new();
    let mut ritz = DMatrix::<f64>::zeros(n, block);
    let mut converged = false;
    let mut iterations = 0;
    while iterations < opts.max_iterations.max(1) {
        iterations += 1;
        let product = apply_adjacency(graph, &basis) * sign;
        let projected = basis.transpose() * &product;
        let projected = (&projected + projected.transpose()) * 0.5;
        let eigen = SymmetricEigen::new(projected);
        let raw: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
        let order = descending(&raw);
        let rotation = DMatrix::<f64>::from_fn(block, block, |r, c| eigen.eigenvectors[(r, order[c])]);

        ritz = &basis * &rotation;
        let image = &product * &rotation;
        values = order.iter().map(|&col| raw[col]).collect();

        converged = (0..k).all(|c| {
            let mut residual = image.column(c).clone_owned();
            residual.axpy(-values[c], &ritz.column(c), 1.0);
            residual.norm() <= opts.tolerance * values[c].abs().max(1.0)
        });
        if converged {
            break;
        }

        let mut next = ritz.clone();
        next *= shift;
        next += &image;
        basis = next.qr().q();
    }
    if !converged {
        warn!(nodes = n, k, sign, iterations, "subspace iteration hit its iteration cap");
    }

    EndPairs {
        values: values.into_iter().take(k).map(|value| value * sign).collect(),
        vectors: (0..k)
            .map(|col| ritz.column(col).iter().copied().collect())
            .collect(),
        converged,
        iterations,
    }
}

/// Flips a vector so its largest-magnitude component is positive.
///
/// Near-ties resolve to the lowest index.
pub(crate) fn gauge_fix(vector: &mut [f64]) {
    let mut pivot = 0usize;
    let mut best = f64::NEG_INFINITY;
    for (idx, value) in vector.iter().enumerate() {
        if value.abs() > best + 1e-12 {
            best = value.abs();
            pivot = idx;
        }
    }
    if vector.get(pivot).is_some_and(|value| *value < 0.0) {
        for value in vector.iter_mut() {
            *value = -*value;
        }
    }
}
