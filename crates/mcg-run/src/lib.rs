#![deny(missing_docs)]

//! Runs a full compatibility-graph analysis from a YAML configuration and a
//! transcription file: corpus reading, graph building with a content-addressed
//! cache, checkpointed analysis stages and the canonical JSON report.

pub mod cache;
pub mod checkpoint;
pub mod config;
pub mod corpus;
pub mod hash;
pub mod pipeline;
pub mod report;
pub mod serde;

pub use cache::{cache_key, ArtifactCache, GraphArtifact};
pub use checkpoint::{StageCheckpoint, StageState, StageStatus};
pub use config::{AnalysisConfig, NullModelConfig};
pub use corpus::{read_corpus, CorpusOptions, CorpusStats};
pub use hash::{stable_hash_string, token_stream_digest};
pub use pipeline::{prepare_graph, run_analysis, PreparedGraph, RunPaths};
pub use report::{AnalysisReport, GraphSummary, INCONCLUSIVE_VERDICT, REPORT_FILE};
