use std::fmt;

use mcg_core::{round9, ErrorInfo};
use mcg_spec::SpectralProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ensemble::{NullEnsemble, NullModel};
use crate::metrics::{Metric, MetricSet};

/// Percentile ranks above this are anomalous.
pub const UPPER_PERCENTILE: f64 = 95.0;
/// Percentile ranks below this are anomalous.
pub const LOWER_PERCENTILE: f64 = 5.0;

/// Rarity of the observed graph under the configuration model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Four or more metrics anomalous.
    Rare,
    /// Two or three metrics anomalous.
    PartiallyRare,
    /// At most one metric anomalous.
    NotRare,
}

impl Verdict {
    /// Verdict for a number of anomalous metrics.
    pub fn from_anomalous_count(count: usize) -> Self {
        match count {
            0 | 1 => Verdict::NotRare,
            2 | 3 => Verdict::PartiallyRare,
            _ => Verdict::Rare,
        }
    }

    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Rare => "RARE",
            Verdict::PartiallyRare => "PARTIALLY_RARE",
            Verdict::NotRare => "NOT_RARE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a metric comparison resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonStatus {
    /// Z-score and percentile computed normally.
    Compared,
    /// Trial values had zero spread; z-score set to zero.
    ZeroVariance,
    /// Observed value undefined or no defined trial value.
    Inconclusive,
}

/// Observed value against the ensemble distribution for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    /// Metric compared.
    pub metric: Metric,
    /// Observed value.
    pub observed: Option<f64>,
    /// Trials with a defined value.
    pub defined_trials: usize,
    /// Mean over defined trial values.
    pub trial_mean: Option<f64>,
    /// Population standard deviation over defined trial values.
    pub trial_std: Option<f64>,
    /// `(observed - mean) / std`.
    pub z_score: Option<f64>,
    /// Share of trial values below the observed one, ties counted half, in percent.
    pub percentile: Option<f64>,
    /// Percentile above 95 or below 5.
    pub anomalous: bool,
    /// Resolution.
    pub status: ComparisonStatus,
}

/// Per-metric comparison of an observed profile with one ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Model of the ensemble.
    pub model: NullModel,
    /// Trials asked for.
    pub requested_trials: usize,
    /// Trials that produced metrics.
    pub completed_trials: usize,
    /// One entry per tracked metric.
    pub metrics: Vec<MetricComparison>,
    /// Number of anomalous metrics.
    pub anomalous_count: usize,
    /// Rarity verdict; configuration-model comparisons only.
    pub verdict: Option<Verdict>,
    /// Degenerate-value and dropped-trial notes.
    pub notes: Vec<ErrorInfo>,
}

/// Compares an observed spectral profile against a null ensemble.
pub fn compare(observed: &SpectralProfile, ensemble: &NullEnsemble) -> ComparisonReport {
    let observed_metrics = MetricSet::from_profile(observed);
    let mut notes = Vec::new();
    if !ensemble.dropped.is_empty() {
        notes.push(
            ErrorInfo::new("dropped-trials", "some null trials were dropped")
                .with_context("model", ensemble.model.as_str())
                .with_context("dropped", ensemble.dropped.len().to_string())
                .with_context("requested", ensemble.requested_trials.to_string()),
        );
    }

    let metrics: Vec<MetricComparison> = Metric::ALL
        .iter()
        .map(|&metric| {
            let samples: Vec<f64> = ensemble
                .trials
                .iter()
                .filter_map(|trial| trial.metrics.get(metric))
                .collect();
            let comparison = compare_metric(metric, observed_metrics.get(metric), &samples);
            match comparison.status {
                ComparisonStatus::ZeroVariance => notes.push(
                    ErrorInfo::new("zero-variance", "trial values have zero spread; z-score set to 0")
                        .with_context("metric", metric.as_str()),
                ),
                ComparisonStatus::Inconclusive => notes.push(
                    ErrorInfo::new("inconclusive-metric", "observed or trial values undefined")
                        .with_context("metric", metric.as_str()),
                ),
                ComparisonStatus::Compared => {}
            }
            comparison
        })
        .collect();

    let anomalous_count = metrics.iter().filter(|m| m.anomalous).count();
    let verdict = rarity_verdict(ensemble.model, ensemble.completed_trials, &metrics);
    if ensemble.model == NullModel::Configuration && verdict.is_none() {
        notes.push(
            ErrorInfo::new("inconclusive-verdict", "no metric could be compared against the ensemble")
                .with_context("completed", ensemble.completed_trials.to_string()),
        );
    }
    debug!(model = %ensemble.model, anomalous_count, ?verdict, "ensemble compared");
    ComparisonReport {
        model: ensemble.model,
        requested_trials: ensemble.requested_trials,
        completed_trials: ensemble.completed_trials,
        metrics,
        anomalous_count,
        verdict,
        notes,
    }
}

/// Rarity verdict of a configuration-model comparison.
///
/// `None` for other models, for an ensemble with no completed trial, and when
/// every metric is inconclusive.
fn rarity_verdict(
    model: NullModel,
    completed_trials: usize,
    metrics: &[MetricComparison],
) -> Option<Verdict> {
    if model != NullModel::Configuration || completed_trials == 0 {
        return None;
    }
    if metrics.iter().all(|m| m.status == ComparisonStatus::Inconclusive) {
        return None;
    }
    let anomalous = metrics.iter().filter(|m| m.anomalous).count();
    Some(Verdict::from_anomalous_count(anomalous))
}

/// Compares one observed value with a sample of trial values.
pub fn compare_metric(metric: Metric, observed: Option<f64>, samples: &[f64]) -> MetricComparison {
    let observed = match observed {
        Some(value) if !samples.is_empty() => value,
        _ => {
            return MetricComparison {
                metric,
                observed,
                defined_trials: samples.len(),
                trial_mean: None,
                trial_std: None,
                z_score: None,
                percentile: None,
                anomalous: false,
                status: ComparisonStatus::Inconclusive,
            }
        }
    };
    let count = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / count;
    let std = (samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count).sqrt();
    let (z_score, status) = if std == 0.0 {
        (0.0, ComparisonStatus::ZeroVariance)
    } else {
        ((observed - mean) / std, ComparisonStatus::Compared)
    };
    let below = samples.iter().filter(|&&v| v < observed).count() as f64;
    let ties = samples.iter().filter(|&&v| v == observed).count() as f64;
    let percentile = (below + 0.5 * ties) / count * 100.0;
    MetricComparison {
        metric,
        observed: Some(observed),
        defined_trials: samples.len(),
        trial_mean: Some(round9(mean)),
        trial_std: Some(round9(std)),
        z_score: Some(round9(z_score)),
        percentile: Some(round9(percentile)),
        anomalous: !(LOWER_PERCENTILE..=UPPER_PERCENTILE).contains(&percentile),
        status,
    }
}
