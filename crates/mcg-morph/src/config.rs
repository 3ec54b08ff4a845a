use serde::{Deserialize, Serialize};

use crate::decompose::{DEFAULT_MIN_TOKEN_LEN, DEFAULT_UNCERTAINTY_MARKERS};

fn default_markers() -> Vec<char> {
    DEFAULT_UNCERTAINTY_MARKERS.to_vec()
}

fn default_min_token_len() -> usize {
    DEFAULT_MIN_TOKEN_LEN
}

/// YAML-configurable morphology section.
///
/// Affix tables have no defaults: every analysis names its own tables so two
/// runs can never silently disagree about what a prefix is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphConfig {
    /// Recognised prefixes (any order; re-sorted longest first).
    pub prefixes: Vec<String>,
    /// Recognised suffixes (any order; re-sorted longest first).
    pub suffixes: Vec<String>,
    /// Optional leading articulators stripped before prefix matching.
    #[serde(default)]
    pub articulators: Vec<String>,
    /// Characters marking uncertain glyphs; tokens containing one are skipped.
    #[serde(default = "default_markers")]
    pub uncertainty_markers: Vec<char>,
    /// Minimum token length in characters.
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

impl MorphConfig {
    /// Creates a configuration with the given tables and default guards.
    pub fn new<P, S>(prefixes: P, suffixes: S) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            suffixes: suffixes.into_iter().map(Into::into).collect(),
            articulators: Vec::new(),
            uncertainty_markers: default_markers(),
            min_token_len: default_min_token_len(),
        }
    }
}
