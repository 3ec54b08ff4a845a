mod support;

use std::fs;

use mcg_null::NullModel;
use mcg_run::{run_analysis, AnalysisReport, RunPaths, StageState, INCONCLUSIVE_VERDICT, REPORT_FILE};

fn stage_state(report: &AnalysisReport, name: &str) -> StageState {
    report.stages[name].state
}

#[test]
fn full_run_writes_report_and_stage_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = support::write_corpus(dir.path());
    let out = dir.path().join("out");
    let config = support::small_config();
    let report = run_analysis(&config, &RunPaths { corpus: &corpus, out: &out, cache: None }).unwrap();

    for name in ["graph", "spectral", "dimensionality", "null-configuration", "null-random"] {
        assert_eq!(stage_state(&report, name), StageState::Complete, "{name}");
        assert!(out.join("stages").join(name).join("artifact.json").exists(), "{name}");
    }
    let graph = report.graph.as_ref().unwrap();
    assert_eq!(graph.nodes, 12);
    assert!(graph.edges > 0);
    assert_eq!(report.provenance.graph_hash, graph.hash);
    assert_eq!(report.provenance.seed, 42);
    assert_eq!(report.provenance.transcriber_track, "H");
    assert_eq!(report.provenance.scope, "line");
    assert_eq!(report.corpus.rows_kept, 120);

    let spectral = report.spectral.as_ref().unwrap();
    assert_eq!(spectral.effective_k, 4);
    assert!(spectral.eigenvectors.is_empty());

    let configuration = &report.comparisons[&NullModel::Configuration];
    assert_eq!(configuration.requested_trials, 12);
    assert_eq!(configuration.metrics.len(), 5);
    assert_eq!(report.verdict, configuration.verdict.unwrap().as_str());
    assert!(report.comparisons[&NullModel::Random].verdict.is_none());

    let text = fs::read_to_string(out.join(REPORT_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["verdict"], serde_json::json!(report.verdict));
    assert!(value["comparisons"].get("CONFIGURATION").is_some());
    assert!(!text.contains("NaN"));
}

#[test]
fn results_do_not_depend_on_parallelism() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = support::write_corpus(dir.path());
    let mut config = support::small_config();
    let sequential = run_analysis(
        &config,
        &RunPaths { corpus: &corpus, out: &dir.path().join("seq"), cache: None },
    )
    .unwrap();
    config.parallelism = 4;
    let parallel = run_analysis(
        &config,
        &RunPaths { corpus: &corpus, out: &dir.path().join("par"), cache: None },
    )
    .unwrap();
    assert_eq!(sequential.comparisons, parallel.comparisons);
    assert_eq!(sequential.dimensionality, parallel.dimensionality);
    assert_ne!(sequential.provenance.config_hash, parallel.provenance.config_hash);
}

#[test]
fn resume_reuses_completed_stages() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = support::write_corpus(dir.path());
    let out = dir.path().join("out");
    let mut config = support::small_config();
    let first = run_analysis(&config, &RunPaths { corpus: &corpus, out: &out, cache: None }).unwrap();

    config.resume = true;
    let second = run_analysis(&config, &RunPaths { corpus: &corpus, out: &out, cache: None }).unwrap();
    assert!(second.stages.values().all(|status| status.resumed));
    assert_eq!(first.comparisons, second.comparisons);
    assert_eq!(first.spectral, second.spectral);
    assert_eq!(first.provenance.config_hash, second.provenance.config_hash);

    // a changed seed invalidates the randomized stages only
    config.seed = 7;
    let third = run_analysis(&config, &RunPaths { corpus: &corpus, out: &out, cache: None }).unwrap();
    assert!(third.stages["graph"].resumed);
    assert!(third.stages["spectral"].resumed);
    assert!(!third.stages["dimensionality"].resumed);
    assert!(!third.stages["null-configuration"].resumed);
}

#[test]
fn failed_stage_is_recorded_and_independent_stages_run() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = support::write_corpus(dir.path());
    let out = dir.path().join("out");
    let mut config = support::small_config();
    config.spectral.top_k = 50;
    let report = run_analysis(&config, &RunPaths { corpus: &corpus, out: &out, cache: None }).unwrap();

    assert_eq!(stage_state(&report, "spectral"), StageState::Failed);
    assert_eq!(
        report.stages["spectral"].error.as_ref().unwrap().info().code,
        "invalid-top-k"
    );
    assert_eq!(stage_state(&report, "dimensionality"), StageState::Complete);
    assert_eq!(stage_state(&report, "null-configuration"), StageState::Skipped);
    assert_eq!(report.stages["null-random"].upstream.as_deref(), Some("spectral"));
    assert!(report.spectral.is_none());
    assert!(report.comparisons.is_empty());
    assert_eq!(report.verdict, INCONCLUSIVE_VERDICT);
    assert!(out.join(REPORT_FILE).exists());
}

#[test]
fn single_edge_corpus_has_an_inconclusive_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let mut rows = vec![support::HEADER.to_string()];
    for line in 1..=2 {
        for middle in ["k", "ol"] {
            rows.push(format!("qo{middle}dy\tf1r\t{line}\tH\tP0\tA\tH"));
        }
    }
    for (offset, middle) in ["ar", "ed", "ai"].iter().enumerate() {
        for copy in 0..2 {
            let line = 3 + offset * 2 + copy;
            rows.push(format!("qo{middle}dy\tf1r\t{line}\tH\tP0\tA\tH"));
        }
    }
    let corpus = dir.path().join("corpus.tsv");
    fs::write(&corpus, rows.join("\n") + "\n").unwrap();

    let out = dir.path().join("out");
    let mut config = support::small_config();
    config.spectral.top_k = 2;
    config.dimensionality.candidate_ks = vec![2];
    config.null_models.n_trials = 10;
    let report = run_analysis(&config, &RunPaths { corpus: &corpus, out: &out, cache: None }).unwrap();

    let graph = report.graph.as_ref().unwrap();
    assert_eq!((graph.nodes, graph.edges), (5, 1));
    let configuration = &report.comparisons[&NullModel::Configuration];
    assert_eq!(configuration.completed_trials, 0);
    assert!(configuration.verdict.is_none());
    assert_eq!(report.verdict, INCONCLUSIVE_VERDICT);
    assert_eq!(report.verdict, "INCONCLUSIVE");
}

#[test]
fn configuration_errors_abort_before_any_stage() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = support::write_corpus(dir.path());
    let out = dir.path().join("out");
    let mut config = support::small_config();
    config.null_models.n_trials = 0;
    let err = run_analysis(&config, &RunPaths { corpus: &corpus, out: &out, cache: None }).unwrap_err();
    assert!(err.is_config());
    assert!(!out.exists());
}
