#![deny(missing_docs)]

//! Null-model benchmarking: randomized ensembles, per-metric comparison and
//! the rarity verdict.

mod compare;
mod ensemble;
mod metrics;

pub use compare::{
    compare, compare_metric, ComparisonReport, ComparisonStatus, MetricComparison, Verdict,
    LOWER_PERCENTILE, UPPER_PERCENTILE,
};
pub use ensemble::{
    benchmark, trial_seed, DroppedTrial, NullEnsemble, NullModel, NullTrial, TrialSettings,
};
pub use metrics::{Metric, MetricSet};
