mod support;

use std::fs;

use mcg_run::{prepare_graph, ArtifactCache, RunPaths};

#[test]
fn second_build_is_served_from_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = support::write_corpus(dir.path());
    let cache = ArtifactCache::new(dir.path().join("cache"));
    let config = support::small_config();

    let first = prepare_graph(
        &config,
        &RunPaths { corpus: &corpus, out: &dir.path().join("a"), cache: Some(&cache) },
    )
    .unwrap();
    assert!(!first.reused);
    assert!(cache.path_for(&first.artifact.key).exists());

    let second = prepare_graph(
        &config,
        &RunPaths { corpus: &corpus, out: &dir.path().join("b"), cache: Some(&cache) },
    )
    .unwrap();
    assert!(second.reused);
    assert_eq!(second.artifact, first.artifact);
}

#[test]
fn key_follows_scope_and_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = support::write_corpus(dir.path());
    let mut config = support::small_config();
    let paths = RunPaths { corpus: &corpus, out: &dir.path().join("out"), cache: None };
    let line = prepare_graph(&config, &paths).unwrap();
    config.scope = mcg_graph::ScopePreset::Folio;
    let folio = prepare_graph(&config, &paths).unwrap();
    assert_ne!(line.artifact.key, folio.artifact.key);
    assert!(folio.artifact.graph.edge_count() >= line.artifact.graph.edge_count());
    assert_eq!(line.artifact.input_hash, folio.artifact.input_hash);
}

#[test]
fn tampered_artifact_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = support::write_corpus(dir.path());
    let cache = ArtifactCache::new(dir.path().join("cache"));
    let config = support::small_config();
    let built = prepare_graph(
        &config,
        &RunPaths { corpus: &corpus, out: &dir.path().join("a"), cache: Some(&cache) },
    )
    .unwrap();

    let path = cache.path_for(&built.artifact.key);
    let mut value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    value["graph_hash"] = serde_json::json!("0000");
    fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

    let err = cache.load(&built.artifact.key).unwrap_err();
    assert_eq!(err.info().code, "artifact-hash-mismatch");
}

#[test]
fn artifact_from_another_major_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = support::write_corpus(dir.path());
    let cache = ArtifactCache::new(dir.path().join("cache"));
    let config = support::small_config();
    let built = prepare_graph(
        &config,
        &RunPaths { corpus: &corpus, out: &dir.path().join("a"), cache: Some(&cache) },
    )
    .unwrap();

    let path = cache.path_for(&built.artifact.key);
    let mut value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    value["schema"]["major"] = serde_json::json!(2);
    fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

    let err = cache.load(&built.artifact.key).unwrap_err();
    assert_eq!(err.info().code, "artifact-schema-mismatch");
    assert_eq!(err.info().context["found"], "2.0.0");
}
