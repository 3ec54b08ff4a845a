use mcg_core::{round9, ErrorInfo, McgError, RngHandle};
use mcg_graph::CompatibilityGraph;
use mcg_spec::{top_algebraic_eigenpairs, EigenOptions, EigenPairs};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::sampling::{feasible_sample_size, mask, sample_held_out};
use crate::select::{elbow_k, plateau_k};
use crate::stat::{auc, mean_std};

fn default_candidate_ks() -> Vec<usize> {
    vec![2, 4, 8, 12, 16, 24, 32]
}

fn default_folds() -> usize {
    5
}

fn default_test_sample_size() -> usize {
    1_000
}

fn default_plateau_epsilon() -> f64 {
    0.005
}

/// Sweep and cross-validation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionalityOptions {
    /// Embedding ranks to score.
    #[serde(default = "default_candidate_ks")]
    pub candidate_ks: Vec<usize>,
    /// Independent held-out draws per K.
    #[serde(default = "default_folds")]
    pub folds: usize,
    /// Requested edges (and as many non-edges) held out per fold.
    #[serde(default = "default_test_sample_size")]
    pub test_sample_size: usize,
    /// Gain in mean AUC below which the curve counts as flat.
    #[serde(default = "default_plateau_epsilon")]
    pub plateau_epsilon: f64,
}

impl Default for DimensionalityOptions {
    fn default() -> Self {
        Self {
            candidate_ks: default_candidate_ks(),
            folds: default_folds(),
            test_sample_size: default_test_sample_size(),
            plateau_epsilon: default_plateau_epsilon(),
        }
    }
}

impl DimensionalityOptions {
    /// Rejects sweeps that cannot produce any score.
    pub fn validate(&self) -> Result<(), McgError> {
        if self.candidate_ks.is_empty() {
            return Err(McgError::config(
                "empty-candidate-ks",
                "candidate_ks must list at least one K",
            ));
        }
        if self.candidate_ks.contains(&0) {
            return Err(McgError::config("invalid-candidate-k", "candidate Ks must be positive"));
        }
        if self.folds == 0 {
            return Err(McgError::config("invalid-folds", "folds must be at least 1"));
        }
        if self.test_sample_size == 0 {
            return Err(McgError::config(
                "invalid-test-sample-size",
                "test_sample_size must be at least 1",
            ));
        }
        if !self.plateau_epsilon.is_finite() || self.plateau_epsilon < 0.0 {
            return Err(McgError::config(
                "invalid-plateau-epsilon",
                "plateau_epsilon must be a finite non-negative number",
            ));
        }
        Ok(())
    }
}

/// Cross-validated AUC for one K.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KScore {
    /// Embedding rank.
    pub k: usize,
    /// Mean AUC over the successful folds.
    pub mean_auc: f64,
    /// Sample standard deviation of the fold AUCs.
    pub std_auc: f64,
    /// AUC of each successful fold, in fold order.
    pub fold_aucs: Vec<f64>,
}

/// A fold that produced no scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldFailure {
    /// Fold index.
    pub fold: usize,
    /// Cause.
    pub error: McgError,
}

/// Whether the estimate carries scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimateStatus {
    /// At least one fold scored every non-skipped K.
    Complete,
    /// No usable held-out sample or every fold failed.
    Inconclusive,
}

/// Outcome of [`estimate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionalityEstimate {
    /// Complete or inconclusive.
    pub status: EstimateStatus,
    /// Scores for the swept Ks, ascending.
    pub scores: Vec<KScore>,
    /// Knee of the AUC curve.
    pub elbow_k: Option<usize>,
    /// First K after which the curve flattens.
    pub plateau_k: Option<usize>,
    /// Candidates at or above the node count.
    pub skipped_ks: Vec<usize>,
    /// Folds requested.
    pub folds: usize,
    /// Held-out size per class requested.
    pub requested_sample_size: usize,
    /// Held-out size per class actually used.
    pub effective_sample_size: usize,
    /// Folds that failed.
    pub failed_folds: Vec<FoldFailure>,
    /// Fallbacks taken along the way.
    pub notes: Vec<ErrorInfo>,
}

impl DimensionalityEstimate {
    fn inconclusive(
        opts: &DimensionalityOptions,
        skipped_ks: Vec<usize>,
        effective_sample_size: usize,
        notes: Vec<ErrorInfo>,
    ) -> Self {
        Self {
            status: EstimateStatus::Inconclusive,
            scores: Vec::new(),
            elbow_k: None,
            plateau_k: None,
            skipped_ks,
            folds: opts.folds,
            requested_sample_size: opts.test_sample_size,
            effective_sample_size,
            failed_folds: Vec::new(),
            notes,
        }
    }

    /// Mean AUC for a K, if it was scored.
    pub fn mean_auc(&self, k: usize) -> Option<f64> {
        self.scores.iter().find(|score| score.k == k).map(|score| score.mean_auc)
    }
}

/// Sweeps candidate ranks and scores held-out link prediction for each.
///
/// Fold `f` draws its held-out pairs from a stream derived from `(seed, f)`
/// alone, so every K sees the same folds and the result does not depend on
/// `threads`.
pub fn estimate(
    graph: &CompatibilityGraph,
    opts: &DimensionalityOptions,
    eigen: &EigenOptions,
    seed: u64,
    threads: usize,
) -> Result<DimensionalityEstimate, McgError> {
    opts.validate()?;
    let n = graph.node_count();
    let mut ks = opts.candidate_ks.clone();
    ks.sort_unstable();
    ks.dedup();
    let (swept, skipped_ks): (Vec<usize>, Vec<usize>) = ks.into_iter().partition(|&k| k < n);

    let mut notes = Vec::new();
    if !skipped_ks.is_empty() {
        notes.push(
            ErrorInfo::new("skipped-ks", "candidate Ks at or above the node count were skipped")
                .with_context("node_count", n.to_string())
                .with_context("skipped", format!("{skipped_ks:?}")),
        );
    }
    let size = feasible_sample_size(graph, opts.test_sample_size);
    if size < opts.test_sample_size {
        warn!(requested = opts.test_sample_size, size, "held-out sample reduced");
        notes.push(
            ErrorInfo::new(
                "reduced-sample-size",
                "too few edges or non-edges for the requested balanced sample",
            )
            .with_context("requested", opts.test_sample_size.to_string())
            .with_context("effective", size.to_string()),
        );
    }
    if size == 0 || swept.is_empty() {
        notes.push(ErrorInfo::new(
            "inconclusive-estimate",
            "no balanced held-out sample or no K below the node count",
        ));
        return Ok(DimensionalityEstimate::inconclusive(opts, skipped_ks, size, notes));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|err| McgError::Estimate(ErrorInfo::new("thread-pool", err.to_string())))?;
    let mut outcomes: Vec<(usize, Result<Vec<f64>, McgError>)> = pool.install(|| {
        (0..opts.folds)
            .into_par_iter()
            .map(|fold| (fold, score_fold(graph, &swept, size, eigen, seed, fold)))
            .collect()
    });
    outcomes.sort_by_key(|(fold, _)| *fold);

    let mut per_k: Vec<Vec<f64>> = vec![Vec::new(); swept.len()];
    let mut failed_folds = Vec::new();
    for (fold, outcome) in outcomes {
        match outcome {
            Ok(aucs) => {
                for (slot, value) in per_k.iter_mut().zip(aucs) {
                    slot.push(value);
                }
            }
            Err(error) => {
                warn!(fold, %error, "fold failed");
                failed_folds.push(FoldFailure { fold, error });
            }
        }
    }
    if failed_folds.len() == opts.folds {
        notes.push(ErrorInfo::new("all-folds-failed", "no fold produced scores"));
        let mut estimate = DimensionalityEstimate::inconclusive(opts, skipped_ks, size, notes);
        estimate.failed_folds = failed_folds;
        return Ok(estimate);
    }

    let scores: Vec<KScore> = swept
        .iter()
        .zip(per_k)
        .map(|(&k, fold_aucs)| {
            let (mean, std) = mean_std(&fold_aucs);
            KScore {
                k,
                mean_auc: round9(mean),
                std_auc: round9(std),
                fold_aucs: fold_aucs.into_iter().map(round9).collect(),
            }
        })
        .collect();
    let curve: Vec<(usize, f64)> = scores.iter().map(|s| (s.k, s.mean_auc)).collect();
    let elbow = elbow_k(&curve);
    let plateau = plateau_k(&curve, opts.plateau_epsilon);
    info!(
        ks = curve.len(),
        folds = opts.folds,
        elbow = ?elbow,
        plateau = ?plateau,
        "dimensionality estimated"
    );
    Ok(DimensionalityEstimate {
        status: EstimateStatus::Complete,
        scores,
        elbow_k: elbow,
        plateau_k: plateau,
        skipped_ks,
        folds: opts.folds,
        requested_sample_size: opts.test_sample_size,
        effective_sample_size: size,
        failed_folds,
        notes,
    })
}

/// AUC of every swept K for one fold.
///
/// The masked graph is decomposed once at the largest K; smaller ranks use the
/// leading prefix of the same eigen set.
fn score_fold(
    graph: &CompatibilityGraph,
    swept: &[usize],
    size: usize,
    eigen: &EigenOptions,
    seed: u64,
    fold: usize,
) -> Result<Vec<f64>, McgError> {
    let mut rng = RngHandle::labelled(seed, "dimensionality-fold", fold as u64);
    let held_out = sample_held_out(graph, size, &mut rng);
    let masked = mask(graph, &held_out)?;
    let k_max = swept.iter().copied().max().unwrap_or(0);
    let pairs = top_algebraic_eigenpairs(&masked, k_max, eigen)?;
    if !pairs.converged {
        return Err(McgError::Spectral(
            ErrorInfo::new("solver-not-converged", "masked-graph eigensolve did not converge")
                .with_context("fold", fold.to_string()),
        ));
    }
    debug!(fold, k_max, held_out = size, "fold decomposed");
    swept
        .iter()
        .map(|&k| {
            let positive = score_pairs(&pairs, k, &held_out.edges);
            let negative = score_pairs(&pairs, k, &held_out.non_edges);
            auc(&positive, &negative).ok_or_else(|| {
                McgError::Estimate(ErrorInfo::new("empty-class", "held-out class is empty"))
            })
        })
        .collect()
}

/// Dot products of rank-`k` embeddings `v_c * sqrt(max(λ_c, 0))`.
fn score_pairs(pairs: &EigenPairs, k: usize, targets: &[(usize, usize)]) -> Vec<f64> {
    let weights: Vec<f64> = pairs.values.iter().take(k).map(|value| value.max(0.0)).collect();
    targets
        .iter()
        .map(|&(i, j)| {
            weights
                .iter()
                .zip(&pairs.vectors)
                .map(|(weight, vector)| weight * vector[i] * vector[j])
                .sum()
        })
        .collect()
}
