//! Schema versions and run provenance stamped on every written artifact.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// `major.minor.patch` of a serialized document layout.
///
/// Readers accept any document with their own major version; minor bumps only
/// add fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Breaking layout changes.
    pub major: u32,
    /// Added fields.
    pub minor: u32,
    /// Fixes that leave the layout alone.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a schema version.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether a document written under `other` can be read by this version.
    pub fn reads(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Where a run's numbers came from: which transcription, which co-occurrence
/// scope, which graph and settings, and which seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Digest of the filtered token stream.
    pub input_hash: String,
    /// Transcriber track the corpus was filtered to.
    #[serde(default)]
    pub transcriber_track: String,
    /// Co-occurrence scope the graph was built over.
    #[serde(default)]
    pub scope: String,
    /// Canonical compatibility-graph hash; empty when no graph was built.
    pub graph_hash: String,
    /// Analysis configuration hash.
    pub config_hash: String,
    /// Master seed of every randomized stage.
    pub seed: u64,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
    /// Crate name to version.
    pub tool_versions: BTreeMap<String, String>,
}
