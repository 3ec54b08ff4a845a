//! Run report document and provenance.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use mcg_core::{round9, ErrorInfo, McgError, RunProvenance, SchemaVersion};
use mcg_dim::DimensionalityEstimate;
use mcg_graph::{CompatibilityGraph, ScopeStats, VocabularySummary};
use mcg_null::{ComparisonReport, NullModel};
use mcg_spec::SpectralProfile;
use serde::{Deserialize, Serialize};

use crate::checkpoint::{write_json, StageStatus};
use crate::config::AnalysisConfig;
use crate::corpus::CorpusStats;

/// Schema of `analysis_report.json`.
pub const REPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// File name of the report inside the output directory.
pub const REPORT_FILE: &str = "analysis_report.json";

/// Verdict string used when no configuration-model comparison completed.
pub const INCONCLUSIVE_VERDICT: &str = "INCONCLUSIVE";

/// Structural summary of the analysed graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Node count.
    pub nodes: usize,
    /// Edge count.
    pub edges: usize,
    /// Edges over node pairs.
    pub density: f64,
    /// Canonical graph hash.
    pub hash: String,
    /// Scope counts from the build.
    pub scopes: ScopeStats,
}

impl GraphSummary {
    /// Summarises a graph under its already computed hash.
    pub fn new(graph: &CompatibilityGraph, hash: impl Into<String>, scopes: ScopeStats) -> Self {
        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            density: round9(graph.density()),
            hash: hash.into(),
            scopes,
        }
    }
}

/// Machine-readable outcome of one analysis run.
///
/// Sections for stages that did not complete are absent; `stages` says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Report schema.
    pub schema: SchemaVersion,
    /// Hashes, seed, versions and timestamp.
    pub provenance: RunProvenance,
    /// Corpus row accounting.
    pub corpus: CorpusStats,
    /// Vocabulary frequency summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<VocabularySummary>,
    /// Graph summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphSummary>,
    /// Spectral profile without eigenvectors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectral: Option<SpectralProfile>,
    /// Per-K AUC table with elbow and plateau.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensionality: Option<DimensionalityEstimate>,
    /// One comparison per benchmarked model.
    pub comparisons: BTreeMap<NullModel, ComparisonReport>,
    /// Configuration-model verdict, or `INCONCLUSIVE`.
    pub verdict: String,
    /// Per-stage status keyed by stage name.
    pub stages: BTreeMap<String, StageStatus>,
    /// Degenerate values and fallbacks taken anywhere in the run.
    pub notes: Vec<ErrorInfo>,
}

impl AnalysisReport {
    /// Final verdict string derived from the configuration-model comparison.
    pub fn verdict_from(comparisons: &BTreeMap<NullModel, ComparisonReport>) -> String {
        comparisons
            .get(&NullModel::Configuration)
            .and_then(|report| report.verdict)
            .map(|verdict| verdict.as_str().to_string())
            .unwrap_or_else(|| INCONCLUSIVE_VERDICT.to_string())
    }

    /// Writes the report as canonical JSON to `out/analysis_report.json`.
    pub fn write(&self, out: &Path) -> Result<PathBuf, McgError> {
        let path = out.join(REPORT_FILE);
        write_json(&path, self)?;
        Ok(path)
    }
}

/// Provenance stamped with the current UTC time and this crate's version.
///
/// Track and scope come from the configuration; the hashes are empty when the
/// graph stage never produced them.
pub fn provenance(config: &AnalysisConfig, input_hash: String, graph_hash: String, config_hash: String) -> RunProvenance {
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert("mcg-run".to_string(), env!("CARGO_PKG_VERSION").to_string());
    RunProvenance {
        input_hash,
        transcriber_track: config.corpus.transcriber_track.clone(),
        scope: config.scope.as_str().to_string(),
        graph_hash,
        config_hash,
        seed: config.seed,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        tool_versions,
    }
}
