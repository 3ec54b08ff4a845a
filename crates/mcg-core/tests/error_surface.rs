use mcg_core::errors::{ErrorInfo, McgError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", "1")
        .with_context("reason", "example")
}

#[test]
fn config_error_surface() {
    let err = McgError::Config(sample_info("empty-prefix-table", "no prefixes"));
    assert_eq!(err.info().code, "empty-prefix-table");
    assert!(err.is_config());
    assert!(err.info().context.contains_key("id"));
}

#[test]
fn graph_error_surface() {
    let err = McgError::Graph(sample_info("self-loop", "edge joins a node to itself"));
    assert_eq!(err.info().code, "self-loop");
    assert!(!err.is_config());
}

#[test]
fn display_includes_context_and_hint() {
    let err = McgError::Ensemble(sample_info("zero-trials", "n_trials must be positive").with_hint("raise n_trials"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("ensemble error: n_trials must be positive (code: zero-trials)"));
    assert!(rendered.contains("id=1"));
    assert!(rendered.contains("hint: raise n_trials"));
}

#[test]
fn errors_round_trip_json() {
    let err = McgError::Spectral(sample_info("eigen-failed", "solver diverged"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Spectral\""));
    let decoded: McgError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
