//! Content-addressed cache of built graph artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use mcg_core::{ErrorInfo, McgError, SchemaVersion};
use mcg_graph::{canonical_hash, BuildOptions, CompatibilityGraph, GraphBuild, ScopePreset, ScopeStats, Vocabulary};
use mcg_morph::MorphConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::hash::stable_hash_string;
use crate::serde::{from_json_slice, to_canonical_json_bytes};

/// Schema of stored graph artifacts.
pub const ARTIFACT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

#[derive(Serialize)]
struct CacheKeyInput<'a> {
    token_digest: &'a str,
    morphology: &'a MorphConfig,
    scope: ScopePreset,
    min_frequency: u64,
}

/// Content address of the graph built from a token stream under a configuration.
pub fn cache_key(
    token_digest: &str,
    morphology: &MorphConfig,
    scope: ScopePreset,
    build: &BuildOptions,
) -> Result<String, McgError> {
    stable_hash_string(&CacheKeyInput {
        token_digest,
        morphology,
        scope,
        min_frequency: build.min_frequency,
    })
}

/// Vocabulary and graph frozen together with the key they were built under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphArtifact {
    /// Artifact schema.
    pub schema: SchemaVersion,
    /// Content address (see [`cache_key`]).
    pub key: String,
    /// Digest of the token stream.
    pub input_hash: String,
    /// Canonical hash of `graph`.
    pub graph_hash: String,
    /// Folded vocabulary.
    pub vocabulary: Vocabulary,
    /// Compatibility graph.
    pub graph: CompatibilityGraph,
    /// Scope counts from the build.
    pub scopes: ScopeStats,
}

impl GraphArtifact {
    /// Wraps a fresh build.
    pub fn new(key: String, input_hash: String, build: GraphBuild) -> Self {
        Self {
            schema: ARTIFACT_SCHEMA,
            key,
            input_hash,
            graph_hash: canonical_hash(&build.graph),
            vocabulary: build.vocabulary,
            graph: build.graph,
            scopes: build.scopes,
        }
    }

    /// Recomputes the graph hash and checks it against the stored one.
    pub fn verify(&self) -> Result<(), McgError> {
        let actual = canonical_hash(&self.graph);
        if actual != self.graph_hash {
            return Err(McgError::Serde(
                ErrorInfo::new("artifact-hash-mismatch", "stored graph does not match its hash")
                    .with_context("key", self.key.clone())
                    .with_context("expected", self.graph_hash.clone())
                    .with_context("actual", actual),
            ));
        }
        Ok(())
    }
}

/// Write-once, content-addressed store of graph artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCache {
    root: PathBuf,
}

impl ArtifactCache {
    /// Cache rooted at `root`; the directory is created on first store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the artifact for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Loads the artifact for `key`, verifying its graph hash on a hit.
    pub fn load(&self, key: &str) -> Result<Option<GraphArtifact>, McgError> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!(key, "artifact cache miss");
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|err| io_error("cache-read", err, &path))?;
        let artifact: GraphArtifact = from_json_slice(&bytes)
            .map_err(|err| McgError::Serde(err.info().clone().with_context("path", path.display().to_string())))?;
        if !ARTIFACT_SCHEMA.reads(&artifact.schema) {
            return Err(McgError::Serde(
                ErrorInfo::new("artifact-schema-mismatch", "cached artifact has an unreadable schema")
                    .with_context("path", path.display().to_string())
                    .with_context("found", artifact.schema.to_string())
                    .with_context("expected", ARTIFACT_SCHEMA.to_string()),
            ));
        }
        if artifact.key != key {
            return Err(McgError::Serde(
                ErrorInfo::new("cache-key-mismatch", "artifact was stored under another key")
                    .with_context("path", path.display().to_string()),
            ));
        }
        artifact.verify()?;
        info!(key, graph_hash = %artifact.graph_hash, "artifact cache hit");
        Ok(Some(artifact))
    }

    /// Stores an artifact unless one already exists under its key.
    pub fn store(&self, artifact: &GraphArtifact) -> Result<PathBuf, McgError> {
        let path = self.path_for(&artifact.key);
        if path.exists() {
            return Ok(path);
        }
        fs::create_dir_all(&self.root).map_err(|err| io_error("cache-mkdir", err, &self.root))?;
        let bytes = to_canonical_json_bytes(artifact)?;
        fs::write(&path, bytes).map_err(|err| io_error("cache-write", err, &path))?;
        debug!(key = %artifact.key, "artifact cached");
        Ok(path)
    }
}

fn io_error(code: &str, err: std::io::Error, path: &Path) -> McgError {
    McgError::Serde(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}
