#![deny(missing_docs)]

//! Vocabulary folding and co-occurrence graph construction over middle morphemes,
//! plus the randomized null-graph generators used for benchmarking.

mod builder;
mod generators;
mod graph;
mod hash;
mod serialization;
mod vocabulary;

pub use builder::{
    build, build_with_scope, BuildOptions, GraphBuild, ScopeKey, ScopePreset, ScopeStats,
};
pub use generators::{configuration_model, random_model, SwapOptions};
pub use graph::{CompatibilityGraph, GRAPH_SCHEMA};
pub use hash::canonical_hash;
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
pub use vocabulary::{MiddleFrequency, VocabEntry, Vocabulary, VocabularySummary};
