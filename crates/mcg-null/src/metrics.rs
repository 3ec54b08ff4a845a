use std::fmt;

use mcg_spec::SpectralProfile;
use serde::{Deserialize, Serialize};

/// The five descriptors tracked against null ensembles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Largest adjacency eigenvalue.
    SpectralRadius,
    /// `λ1 / λ2`.
    SpectralGap,
    /// Eigenvalues above the calibration threshold.
    CountAboveThreshold,
    /// Spectral-entropy effective rank.
    EffectiveRank,
    /// Mean local clustering coefficient.
    AverageClustering,
}

impl Metric {
    /// Every tracked metric in report order.
    pub const ALL: [Metric; 5] = [
        Metric::SpectralRadius,
        Metric::SpectralGap,
        Metric::CountAboveThreshold,
        Metric::EffectiveRank,
        Metric::AverageClustering,
    ];

    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::SpectralRadius => "spectral_radius",
            Metric::SpectralGap => "spectral_gap",
            Metric::CountAboveThreshold => "count_above_threshold",
            Metric::EffectiveRank => "effective_rank",
            Metric::AverageClustering => "average_clustering",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric values of one graph; `spectral_gap` is `None` when undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    /// λ1.
    pub spectral_radius: f64,
    /// λ1 / λ2, if defined.
    pub spectral_gap: Option<f64>,
    /// Eigenvalues above the calibration threshold.
    pub count_above_threshold: usize,
    /// Effective rank.
    pub effective_rank: f64,
    /// Average clustering.
    pub average_clustering: f64,
}

impl MetricSet {
    /// Extracts the tracked metrics from a profile.
    pub fn from_profile(profile: &SpectralProfile) -> Self {
        Self {
            spectral_radius: profile.spectral_radius(),
            spectral_gap: profile.spectral_gap.value(),
            count_above_threshold: profile.count_above_threshold,
            effective_rank: profile.effective_rank,
            average_clustering: profile.average_clustering,
        }
    }

    /// Value of one metric, `None` when undefined.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::SpectralRadius => Some(self.spectral_radius),
            Metric::SpectralGap => self.spectral_gap,
            Metric::CountAboveThreshold => Some(self.count_above_threshold as f64),
            Metric::EffectiveRank => Some(self.effective_rank),
            Metric::AverageClustering => Some(self.average_clustering),
        }
    }
}
