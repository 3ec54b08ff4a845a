use mcg_core::{ErrorInfo, McgError};

use crate::graph::CompatibilityGraph;

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &CompatibilityGraph) -> Result<Vec<u8>, McgError> {
    bincode::serialize(graph)
        .map_err(|err| McgError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<CompatibilityGraph, McgError> {
    bincode::deserialize(bytes)
        .map_err(|err| McgError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &CompatibilityGraph) -> Result<String, McgError> {
    serde_json::to_string_pretty(graph)
        .map_err(|err| McgError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
pub fn graph_from_json(json: &str) -> Result<CompatibilityGraph, McgError> {
    serde_json::from_str(json)
        .map_err(|err| McgError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))
}
