use mcg_core::{round9, ErrorInfo, McgError};
use mcg_graph::CompatibilityGraph;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::eigen::{top_eigenpairs, EigenOptions, Solver};
use crate::metrics::{average_clustering, count_above, effective_rank, spectral_gap, SpectralGap};

fn default_top_k() -> usize {
    20
}

fn default_calibration_threshold() -> f64 {
    1.0
}

/// Options for [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralOptions {
    /// Requested number of eigenpairs.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Eigenvalues strictly above this value are counted.
    #[serde(default = "default_calibration_threshold")]
    pub calibration_threshold: f64,
    /// Solver controls.
    #[serde(flatten)]
    pub eigen: EigenOptions,
}

impl Default for SpectralOptions {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            calibration_threshold: default_calibration_threshold(),
            eigen: EigenOptions::default(),
        }
    }
}

impl SpectralOptions {
    /// Rejects option values that can never produce a spectrum.
    pub fn validate(&self) -> Result<(), McgError> {
        if self.top_k == 0 {
            return Err(McgError::config("invalid-top-k", "top_k must be at least 1"));
        }
        if !self.calibration_threshold.is_finite() {
            return Err(McgError::config(
                "invalid-calibration-threshold",
                "calibration_threshold must be finite",
            ));
        }
        if self.eigen.tolerance.is_nan() || self.eigen.tolerance <= 0.0 {
            return Err(McgError::config("invalid-tolerance", "tolerance must be positive"));
        }
        Ok(())
    }

    /// Number of eigenpairs computed for a graph with `node_count` nodes.
    ///
    /// Errors when `top_k` is zero or not below the node count; otherwise the
    /// request is clamped to `node_count - 2`.
    pub fn effective_k(&self, node_count: usize) -> Result<usize, McgError> {
        if self.top_k == 0 || self.top_k >= node_count {
            return Err(McgError::Config(
                ErrorInfo::new("invalid-top-k", "top_k must be positive and below the node count")
                    .with_context("top_k", self.top_k.to_string())
                    .with_context("node_count", node_count.to_string()),
            ));
        }
        Ok(self.top_k.min(node_count.saturating_sub(2)))
    }
}

/// Derived spectral descriptors of one compatibility graph.
///
/// Recomputed from the frozen graph on demand; never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralProfile {
    /// Leading adjacency eigenvalues, descending, rounded to nine decimals.
    pub eigenvalues: Vec<f64>,
    /// Gauge-fixed eigenvectors matching `eigenvalues`.
    pub eigenvectors: Vec<Vec<f64>>,
    /// `λ1 / λ2` or undefined.
    pub spectral_gap: SpectralGap,
    /// Eigenvalues strictly above the calibration threshold.
    pub count_above_threshold: usize,
    /// Threshold used for `count_above_threshold`.
    pub calibration_threshold: f64,
    /// Spectral-entropy effective rank over positive eigenvalues.
    pub effective_rank: f64,
    /// Mean local clustering coefficient.
    pub average_clustering: f64,
    /// Solver that produced the eigen set.
    pub solver: Solver,
    /// Whether the solver converged.
    pub converged: bool,
    /// Nodes in the analysed graph.
    pub node_count: usize,
    /// Edges in the analysed graph.
    pub edge_count: usize,
    /// Requested K.
    pub requested_k: usize,
    /// K actually computed.
    pub effective_k: usize,
    /// Degenerate-value notes.
    #[serde(default)]
    pub notes: Vec<ErrorInfo>,
}

impl SpectralProfile {
    /// Largest eigenvalue (spectral radius of the adjacency matrix); zero for an
    /// empty eigen set.
    pub fn spectral_radius(&self) -> f64 {
        self.eigenvalues.first().copied().unwrap_or(0.0)
    }

    /// Compact copy without eigenvectors, for reports.
    pub fn summary(&self) -> SpectralProfile {
        SpectralProfile {
            eigenvectors: Vec::new(),
            ..self.clone()
        }
    }
}

/// Computes the spectral profile of a graph.
///
/// Deterministic given the graph and options; the graph is never mutated.
pub fn analyze(graph: &CompatibilityGraph, opts: &SpectralOptions) -> Result<SpectralProfile, McgError> {
    opts.validate()?;
    let k = opts.effective_k(graph.node_count())?;
    let pairs = top_eigenpairs(graph, k, &opts.eigen)?;
    let eigenvalues: Vec<f64> = pairs.values.iter().copied().map(round9).collect();

    let mut notes = Vec::new();
    if eigenvalues.is_empty() {
        notes.push(
            ErrorInfo::new("empty-eigen-set", "graph too small for any eigenpair after clamping")
                .with_context("node_count", graph.node_count().to_string()),
        );
    }
    let gap = spectral_gap(&eigenvalues);
    if gap == SpectralGap::Undefined {
        notes.push(ErrorInfo::new(
            "undefined-spectral-gap",
            "second eigenvalue missing or not positive",
        ));
    }
    let rank = effective_rank(&eigenvalues);
    if rank == 0.0 {
        notes.push(ErrorInfo::new(
            "zero-effective-rank",
            "no strictly positive eigenvalue",
        ));
    }
    if !pairs.converged {
        notes.push(
            ErrorInfo::new("solver-not-converged", "iterative solver hit its iteration cap")
                .with_context("iterations", pairs.iterations.to_string()),
        );
    }

    let profile = SpectralProfile {
        count_above_threshold: count_above(&eigenvalues, opts.calibration_threshold),
        calibration_threshold: opts.calibration_threshold,
        effective_rank: round9(rank),
        average_clustering: round9(average_clustering(graph)),
        spectral_gap: match gap {
            SpectralGap::Finite(value) => SpectralGap::Finite(round9(value)),
            SpectralGap::Undefined => SpectralGap::Undefined,
        },
        eigenvectors: pairs.vectors,
        eigenvalues,
        solver: pairs.solver,
        converged: pairs.converged,
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        requested_k: opts.top_k,
        effective_k: k,
        notes,
    };
    debug!(
        nodes = profile.node_count,
        k = profile.effective_k,
        radius = profile.spectral_radius(),
        "spectral profile computed"
    );
    Ok(profile)
}
