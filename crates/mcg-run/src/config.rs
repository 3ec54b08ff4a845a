//! Analysis configuration: defaults, YAML/JSON loading and validation.

use std::fs;
use std::path::Path;

use mcg_core::{ErrorInfo, McgError};
use mcg_dim::DimensionalityOptions;
use mcg_graph::{BuildOptions, ScopePreset, SwapOptions};
use mcg_morph::{Decomposer, MorphConfig};
use mcg_null::NullModel;
use mcg_spec::SpectralOptions;
use serde::{Deserialize, Serialize};

use crate::corpus::CorpusOptions;
use crate::hash::stable_hash_string;
use crate::serde::from_yaml_slice;

fn default_seed() -> u64 {
    42
}

fn default_parallelism() -> usize {
    1
}

fn default_models() -> Vec<NullModel> {
    vec![NullModel::Configuration, NullModel::Random]
}

fn default_n_trials() -> usize {
    100
}

/// Null-model section of the analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullModelConfig {
    /// Models benchmarked, each against the same observed profile.
    #[serde(default = "default_models")]
    pub models: Vec<NullModel>,
    /// Trials drawn per model.
    #[serde(default = "default_n_trials")]
    pub n_trials: usize,
    /// Swap budget for the configuration model.
    #[serde(flatten)]
    pub swap: SwapOptions,
}

impl Default for NullModelConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            n_trials: default_n_trials(),
            swap: SwapOptions::default(),
        }
    }
}

/// Full analysis configuration loaded from YAML.
///
/// Only the affix tables under `morphology` are mandatory; every other field
/// falls back to its documented default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Affix tables and token guards.
    pub morphology: MorphConfig,
    /// Corpus row selection.
    #[serde(default)]
    pub corpus: CorpusOptions,
    /// Node admission threshold.
    #[serde(default)]
    pub vocabulary: BuildOptions,
    /// Co-occurrence scope.
    #[serde(default)]
    pub scope: ScopePreset,
    /// Spectral analysis options.
    #[serde(default)]
    pub spectral: SpectralOptions,
    /// Dimensionality sweep options.
    #[serde(default)]
    pub dimensionality: DimensionalityOptions,
    /// Null-model benchmarking options.
    #[serde(default)]
    pub null_models: NullModelConfig,
    /// Master seed for every randomized stage.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Worker threads for folds and trials.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Reuse completed stage artifacts from an earlier run.
    #[serde(default)]
    pub resume: bool,
}

impl AnalysisConfig {
    /// Creates a configuration with the given morphology and defaults elsewhere.
    pub fn new(morphology: MorphConfig) -> Self {
        Self {
            morphology,
            corpus: CorpusOptions::default(),
            vocabulary: BuildOptions::default(),
            scope: ScopePreset::default(),
            spectral: SpectralOptions::default(),
            dimensionality: DimensionalityOptions::default(),
            null_models: NullModelConfig::default(),
            seed: default_seed(),
            parallelism: default_parallelism(),
            resume: false,
        }
    }

    /// Loads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, McgError> {
        let bytes = fs::read(path).map_err(|err| {
            McgError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let config: Self = from_yaml_slice(&bytes).map_err(|err| {
            McgError::Config(
                err.info()
                    .clone()
                    .with_context("path", path.display().to_string()),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects every misuse detectable before touching the corpus.
    pub fn validate(&self) -> Result<(), McgError> {
        self.decomposer()?;
        if self.corpus.transcriber_track.trim().is_empty() {
            return Err(McgError::config(
                "empty-transcriber-track",
                "corpus.transcriber_track must name a track",
            ));
        }
        if self.vocabulary.min_frequency == 0 {
            return Err(McgError::config(
                "invalid-min-frequency",
                "vocabulary.min_frequency must be at least 1",
            ));
        }
        self.spectral.validate()?;
        self.dimensionality.validate()?;
        if self.null_models.n_trials == 0 {
            return Err(McgError::config("invalid-n-trials", "n_trials must be at least 1"));
        }
        if self.null_models.swap.swaps_per_edge == 0 || self.null_models.swap.max_attempt_factor == 0 {
            return Err(McgError::config(
                "invalid-swap-budget",
                "swaps_per_edge and max_attempt_factor must be at least 1",
            ));
        }
        if self.parallelism == 0 {
            return Err(McgError::config("invalid-parallelism", "parallelism must be at least 1"));
        }
        Ok(())
    }

    /// Decomposer described by the morphology section.
    pub fn decomposer(&self) -> Result<Decomposer, McgError> {
        Decomposer::from_config(&self.morphology)
    }

    /// Corpus options with the morphology's uncertainty markers applied.
    pub fn corpus_options(&self) -> CorpusOptions {
        let mut options = self.corpus.clone();
        if options.uncertainty_markers.is_empty() {
            options.uncertainty_markers = self.morphology.uncertainty_markers.clone();
        }
        options
    }

    /// Models to benchmark, deduplicated in declaration order.
    pub fn models(&self) -> Vec<NullModel> {
        let mut seen = Vec::new();
        for model in &self.null_models.models {
            if !seen.contains(model) {
                seen.push(*model);
            }
        }
        seen
    }

    /// Hash of the configuration; the `resume` flag does not contribute.
    pub fn config_hash(&self) -> Result<String, McgError> {
        let mut hashed = self.clone();
        hashed.resume = false;
        stable_hash_string(&hashed)
    }
}
