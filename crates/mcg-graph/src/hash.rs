use mcg_morph::Middle;
use sha2::{Digest, Sha256};

use crate::graph::{CompatibilityGraph, GRAPH_SCHEMA};

/// Computes the canonical structural hash of a compatibility graph.
///
/// Labels are hashed in index order and edges as sorted `(i, j)` pairs with
/// `i < j`, so two graphs hash equal exactly when they are equal.
pub fn canonical_hash(graph: &CompatibilityGraph) -> String {
    let mut hasher = Sha256::new();
    hasher.update(GRAPH_SCHEMA.major.to_le_bytes());
    hasher.update((graph.node_count() as u64).to_le_bytes());
    for label in graph.labels() {
        encode_label(label, &mut hasher);
    }
    hasher.update((graph.edge_count() as u64).to_le_bytes());
    for (a, b) in graph.edges() {
        hasher.update((a as u64).to_le_bytes());
        hasher.update((b as u64).to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn encode_label(label: &Middle, hasher: &mut Sha256) {
    match label {
        Middle::Empty => hasher.update(b"empty"),
        Middle::Text(text) => {
            hasher.update(b"text");
            hasher.update((text.len() as u64).to_le_bytes());
            hasher.update(text.as_bytes());
        }
    }
}
