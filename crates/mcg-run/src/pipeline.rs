//! Stage orchestration from corpus to report.

use std::collections::BTreeMap;
use std::path::Path;

use mcg_core::{ErrorInfo, McgError, Token};
use mcg_dim::{estimate, DimensionalityOptions};
use mcg_graph::{build_with_scope, SwapOptions};
use mcg_null::{benchmark, compare, NullModel, TrialSettings};
use mcg_spec::{analyze, EigenOptions, SpectralOptions};
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{cache_key, ArtifactCache, GraphArtifact};
use crate::checkpoint::{StageCheckpoint, StageStatus};
use crate::config::AnalysisConfig;
use crate::corpus::{read_corpus, CorpusStats};
use crate::hash::{stable_hash_string, token_stream_digest};
use crate::report::{provenance, AnalysisReport, GraphSummary, REPORT_SCHEMA};

const VOCABULARY_TOP_N: usize = 20;

/// Stage names as they appear under `stages/` and in the report.
pub mod stage {
    /// Vocabulary and graph.
    pub const GRAPH: &str = "graph";
    /// Spectral profile.
    pub const SPECTRAL: &str = "spectral";
    /// Dimensionality sweep.
    pub const DIMENSIONALITY: &str = "dimensionality";

    /// Null-ensemble stage for a model.
    pub fn null(model: mcg_null::NullModel) -> String {
        format!("null-{}", model.as_str().to_ascii_lowercase())
    }
}

/// Where a run reads and writes.
#[derive(Debug, Clone, Copy)]
pub struct RunPaths<'a> {
    /// Tab-delimited corpus file.
    pub corpus: &'a Path,
    /// Output directory for stage artifacts and the report.
    pub out: &'a Path,
    /// Optional content-addressed graph cache.
    pub cache: Option<&'a ArtifactCache>,
}

/// Tokens and the graph artifact built from them.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedGraph {
    /// Tokens of the selected track.
    pub tokens: Vec<Token>,
    /// Corpus row accounting.
    pub corpus: CorpusStats,
    /// Vocabulary and graph.
    pub artifact: GraphArtifact,
    /// Artifact came from the cache or a checkpoint.
    pub reused: bool,
}

/// Reads the corpus and builds, reloads or resumes the graph artifact.
pub fn prepare_graph(config: &AnalysisConfig, paths: &RunPaths<'_>) -> Result<PreparedGraph, McgError> {
    let decomposer = config.decomposer()?;
    let (tokens, corpus) = read_corpus(paths.corpus, &config.corpus_options())?;
    let input_hash = token_stream_digest(&tokens)?;
    let key = cache_key(&input_hash, &config.morphology, config.scope, &config.vocabulary)?;
    let checkpoint = StageCheckpoint::new(paths.out, stage::GRAPH);

    if config.resume {
        if let Some(artifact) = checkpoint.resume::<GraphArtifact>(&key)? {
            artifact.verify()?;
            info!(graph_hash = %artifact.graph_hash, "graph stage resumed");
            return Ok(PreparedGraph { tokens, corpus, artifact, reused: true });
        }
    }
    if let Some(cache) = paths.cache {
        if let Some(artifact) = cache.load(&key)? {
            checkpoint.store(&key, &artifact)?;
            return Ok(PreparedGraph { tokens, corpus, artifact, reused: true });
        }
    }

    let build = build_with_scope(&tokens, &decomposer, config.scope, &config.vocabulary)?;
    let artifact = GraphArtifact::new(key.clone(), input_hash, build);
    if let Some(cache) = paths.cache {
        cache.store(&artifact)?;
    }
    checkpoint.store(&key, &artifact)?;
    info!(
        nodes = artifact.graph.node_count(),
        edges = artifact.graph.edge_count(),
        graph_hash = %artifact.graph_hash,
        "graph stage complete"
    );
    Ok(PreparedGraph { tokens, corpus, artifact, reused: false })
}

/// Runs every stage and writes `analysis_report.json`.
///
/// Configuration problems and an unreadable corpus abort before any stage
/// runs. After that, a failing stage is recorded and every stage that does
/// not depend on it still runs; the report is always written.
pub fn run_analysis(config: &AnalysisConfig, paths: &RunPaths<'_>) -> Result<AnalysisReport, McgError> {
    config.validate()?;
    let config_hash = config.config_hash()?;
    let mut stages: BTreeMap<String, StageStatus> = BTreeMap::new();
    let mut notes: Vec<ErrorInfo> = Vec::new();

    let prepared = match prepare_graph(config, paths) {
        Ok(prepared) => prepared,
        Err(err) if matches!(err, McgError::Config(_) | McgError::Corpus(_)) => return Err(err),
        Err(err) => {
            warn!(error = %err, "graph stage failed");
            let checkpoint = StageCheckpoint::new(paths.out, stage::GRAPH);
            let status = StageStatus::failed(None, err);
            checkpoint.record(&status)?;
            stages.insert(stage::GRAPH.to_string(), status);
            for name in downstream_stages(config) {
                stages.insert(name, StageStatus::skipped(stage::GRAPH));
            }
            let report = AnalysisReport {
                schema: REPORT_SCHEMA,
                provenance: provenance(config, String::new(), String::new(), config_hash),
                corpus: CorpusStats::default(),
                vocabulary: None,
                graph: None,
                spectral: None,
                dimensionality: None,
                comparisons: BTreeMap::new(),
                verdict: AnalysisReport::verdict_from(&BTreeMap::new()),
                stages,
                notes,
            };
            report.write(paths.out)?;
            return Ok(report);
        }
    };
    let PreparedGraph { corpus, artifact, reused, .. } = prepared;
    stages.insert(stage::GRAPH.to_string(), StageStatus::complete(artifact.key.clone(), reused));
    if corpus.rows_malformed > 0 {
        notes.push(
            ErrorInfo::new("malformed-rows", "corpus rows skipped as malformed")
                .with_context("count", corpus.rows_malformed.to_string()),
        );
    }
    let graph = &artifact.graph;
    let graph_hash = artifact.graph_hash.clone();

    let spectral = run_stage(
        config,
        paths.out,
        stage::SPECTRAL,
        &SpectralInput { graph_hash: &graph_hash, spectral: &config.spectral },
        &mut stages,
        || analyze(graph, &config.spectral),
    )?;
    if let Some(profile) = &spectral {
        notes.extend(profile.notes.iter().cloned().map(|note| tagged(note, stage::SPECTRAL)));
    }

    let dimensionality = run_stage(
        config,
        paths.out,
        stage::DIMENSIONALITY,
        &DimensionalityInput {
            graph_hash: &graph_hash,
            dimensionality: &config.dimensionality,
            eigen: &config.spectral.eigen,
            seed: config.seed,
        },
        &mut stages,
        || estimate(graph, &config.dimensionality, &config.spectral.eigen, config.seed, config.parallelism),
    )?;
    if let Some(estimate) = &dimensionality {
        notes.extend(estimate.notes.iter().cloned().map(|note| tagged(note, stage::DIMENSIONALITY)));
    }

    let settings = TrialSettings {
        spectral: config.spectral.clone(),
        swap: config.null_models.swap.clone(),
        threads: config.parallelism,
    };
    let mut comparisons = BTreeMap::new();
    for model in config.models() {
        let name = stage::null(model);
        let Some(observed) = &spectral else {
            let status = StageStatus::skipped(stage::SPECTRAL);
            StageCheckpoint::new(paths.out, name.as_str()).record(&status)?;
            stages.insert(name, status);
            continue;
        };
        let ensemble = run_stage(
            config,
            paths.out,
            &name,
            &NullInput {
                graph_hash: &graph_hash,
                model,
                n_trials: config.null_models.n_trials,
                swap: &config.null_models.swap,
                spectral: &config.spectral,
                seed: config.seed,
            },
            &mut stages,
            || benchmark(graph, model, config.null_models.n_trials, config.seed, &settings),
        )?;
        if let Some(ensemble) = ensemble {
            let report = compare(observed, &ensemble);
            notes.extend(report.notes.iter().cloned().map(|note| tagged(note, &name)));
            comparisons.insert(model, report);
        }
    }

    let verdict = AnalysisReport::verdict_from(&comparisons);
    let report = AnalysisReport {
        schema: REPORT_SCHEMA,
        provenance: provenance(config, artifact.input_hash.clone(), graph_hash.clone(), config_hash),
        corpus,
        vocabulary: Some(artifact.vocabulary.summary(config.vocabulary.min_frequency, VOCABULARY_TOP_N)),
        graph: Some(GraphSummary::new(graph, graph_hash, artifact.scopes.clone())),
        spectral: spectral.map(|profile| profile.summary()),
        dimensionality,
        comparisons,
        verdict,
        stages,
        notes,
    };
    let path = report.write(paths.out)?;
    info!(path = %path.display(), verdict = %report.verdict, "analysis report written");
    Ok(report)
}

/// Resumes or runs one stage, checkpointing its artifact and recording its status.
///
/// Only I/O on the checkpoint itself is propagated; a failure of `compute`
/// becomes a failed status.
fn run_stage<I, T, F>(
    config: &AnalysisConfig,
    out: &Path,
    name: &str,
    input: &I,
    stages: &mut BTreeMap<String, StageStatus>,
    compute: F,
) -> Result<Option<T>, McgError>
where
    I: Serialize,
    T: Serialize + serde::de::DeserializeOwned,
    F: FnOnce() -> Result<T, McgError>,
{
    let checkpoint = StageCheckpoint::new(out, name);
    let input_hash = stable_hash_string(input)?;
    if config.resume {
        if let Some(artifact) = checkpoint.resume::<T>(&input_hash)? {
            info!(stage = name, "stage resumed");
            stages.insert(name.to_string(), StageStatus::complete(input_hash, true));
            return Ok(Some(artifact));
        }
    }
    match compute() {
        Ok(artifact) => {
            let status = checkpoint.store(&input_hash, &artifact)?;
            info!(stage = name, "stage complete");
            stages.insert(name.to_string(), status);
            Ok(Some(artifact))
        }
        Err(err) => {
            warn!(stage = name, error = %err, "stage failed");
            let status = StageStatus::failed(Some(input_hash), err);
            checkpoint.record(&status)?;
            stages.insert(name.to_string(), status);
            Ok(None)
        }
    }
}

fn downstream_stages(config: &AnalysisConfig) -> Vec<String> {
    let mut names = vec![stage::SPECTRAL.to_string(), stage::DIMENSIONALITY.to_string()];
    names.extend(config.models().into_iter().map(stage::null));
    names
}

fn tagged(note: ErrorInfo, name: &str) -> ErrorInfo {
    note.with_context("stage", name)
}

#[derive(Serialize)]
struct SpectralInput<'a> {
    graph_hash: &'a str,
    spectral: &'a SpectralOptions,
}

#[derive(Serialize)]
struct DimensionalityInput<'a> {
    graph_hash: &'a str,
    dimensionality: &'a DimensionalityOptions,
    eigen: &'a EigenOptions,
    seed: u64,
}

#[derive(Serialize)]
struct NullInput<'a> {
    graph_hash: &'a str,
    model: NullModel,
    n_trials: usize,
    swap: &'a SwapOptions,
    spectral: &'a SpectralOptions,
    seed: u64,
}
