use std::fmt;

use mcg_core::{derive_labelled_seed, ErrorInfo, McgError, RngHandle};
use mcg_graph::{canonical_hash, configuration_model, random_model, CompatibilityGraph, SwapOptions};
use mcg_spec::{analyze, SpectralOptions};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::metrics::MetricSet;

/// Declared randomization model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NullModel {
    /// Exact degree sequence preserved.
    Configuration,
    /// Node and edge counts preserved, edges uniform over pairs.
    Random,
}

impl NullModel {
    /// Stable label, also mixed into per-trial seeds.
    pub fn as_str(&self) -> &'static str {
        match self {
            NullModel::Configuration => "CONFIGURATION",
            NullModel::Random => "RANDOM",
        }
    }

    /// Draws one randomized graph.
    pub fn draw(
        &self,
        graph: &CompatibilityGraph,
        rng: &mut RngHandle,
        swap: &SwapOptions,
    ) -> Result<CompatibilityGraph, McgError> {
        match self {
            NullModel::Configuration => configuration_model(graph, rng, swap),
            NullModel::Random => random_model(graph, rng),
        }
    }
}

impl fmt::Display for NullModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a trial needs besides its seed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSettings {
    /// Spectral options shared with the observed profile.
    pub spectral: SpectralOptions,
    /// Swap budget for the configuration model.
    pub swap: SwapOptions,
    /// Worker threads; results never depend on this.
    pub threads: usize,
}

impl Default for TrialSettings {
    fn default() -> Self {
        Self {
            spectral: SpectralOptions::default(),
            swap: SwapOptions::default(),
            threads: 1,
        }
    }
}

/// One completed draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullTrial {
    /// Trial index.
    pub index: usize,
    /// Canonical hash of the drawn graph.
    pub graph_hash: String,
    /// Tracked metrics of the drawn graph.
    pub metrics: MetricSet,
}

/// A draw that was abandoned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedTrial {
    /// Trial index.
    pub index: usize,
    /// Why the trial was dropped.
    pub reason: ErrorInfo,
}

/// Immutable set of trials drawn under one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullEnsemble {
    /// Model used.
    pub model: NullModel,
    /// Master seed.
    pub seed: u64,
    /// Trials asked for.
    pub requested_trials: usize,
    /// Trials that produced metrics.
    pub completed_trials: usize,
    /// Completed trials in index order.
    pub trials: Vec<NullTrial>,
    /// Dropped trials in index order.
    pub dropped: Vec<DroppedTrial>,
}

/// Seed of trial `index` under `model`.
pub fn trial_seed(seed: u64, model: NullModel, index: usize) -> u64 {
    derive_labelled_seed(seed, model.as_str(), index as u64)
}

/// Draws `n_trials` randomized graphs and computes their metric sets.
///
/// Trials are independent and seeded from `(seed, model, index)`, so the
/// ensemble is identical for any thread count. A trial whose draw or
/// spectrum fails is dropped and listed with its reason.
pub fn benchmark(
    graph: &CompatibilityGraph,
    model: NullModel,
    n_trials: usize,
    seed: u64,
    settings: &TrialSettings,
) -> Result<NullEnsemble, McgError> {
    if n_trials == 0 {
        return Err(McgError::config("invalid-n-trials", "n_trials must be at least 1"));
    }
    settings.spectral.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads.max(1))
        .build()
        .map_err(|err| McgError::Ensemble(ErrorInfo::new("thread-pool", err.to_string())))?;

    let mut outcomes: Vec<(usize, Result<NullTrial, McgError>)> = pool.install(|| {
        (0..n_trials)
            .into_par_iter()
            .map(|index| (index, run_trial(graph, model, seed, index, settings)))
            .collect()
    });
    outcomes.sort_by_key(|(index, _)| *index);

    let mut trials = Vec::with_capacity(n_trials);
    let mut dropped = Vec::new();
    for (index, outcome) in outcomes {
        match outcome {
            Ok(trial) => trials.push(trial),
            Err(err) => dropped.push(DroppedTrial {
                index,
                reason: err.info().clone(),
            }),
        }
    }
    if !dropped.is_empty() {
        warn!(model = %model, dropped = dropped.len(), "null trials dropped");
    }
    info!(
        model = %model,
        requested = n_trials,
        completed = trials.len(),
        "null ensemble generated"
    );
    Ok(NullEnsemble {
        model,
        seed,
        requested_trials: n_trials,
        completed_trials: trials.len(),
        trials,
        dropped,
    })
}

fn run_trial(
    graph: &CompatibilityGraph,
    model: NullModel,
    seed: u64,
    index: usize,
    settings: &TrialSettings,
) -> Result<NullTrial, McgError> {
    let mut rng = RngHandle::from_seed(trial_seed(seed, model, index));
    let drawn = model.draw(graph, &mut rng, &settings.swap)?;
    let profile = analyze(&drawn, &settings.spectral)?;
    Ok(NullTrial {
        index,
        graph_hash: canonical_hash(&drawn),
        metrics: MetricSet::from_profile(&profile),
    })
}
