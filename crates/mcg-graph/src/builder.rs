use std::collections::{BTreeMap, BTreeSet};

use mcg_core::{McgError, Token};
use mcg_morph::{Decomposer, Decomposition, Middle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::CompatibilityGraph;
use crate::vocabulary::Vocabulary;

fn default_min_frequency() -> u64 {
    2
}

/// Options controlling node admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Middles with a lower global frequency are counted but not made nodes.
    #[serde(default = "default_min_frequency")]
    pub min_frequency: u64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            min_frequency: default_min_frequency(),
        }
    }
}

/// Built-in co-occurrence scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScopePreset {
    /// A manuscript line, keyed by (folio, line).
    #[default]
    Line,
    /// A whole folio.
    Folio,
}

/// Key produced by a [`ScopePreset`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeKey {
    /// (folio, line).
    Line(String, u32),
    /// folio.
    Folio(String),
}

impl ScopePreset {
    /// Scope key of a token under this preset.
    pub fn key(&self, token: &Token) -> ScopeKey {
        match self {
            ScopePreset::Line => ScopeKey::Line(token.folio_id.clone(), token.line_number),
            ScopePreset::Folio => ScopeKey::Folio(token.folio_id.clone()),
        }
    }

    /// Stable label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopePreset::Line => "line",
            ScopePreset::Folio => "folio",
        }
    }
}

/// Scope bookkeeping produced alongside the graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeStats {
    /// Distinct scopes holding at least one decomposed token.
    pub scopes: usize,
    /// Scopes whose node middles numbered fewer than two.
    pub scopes_without_edges: usize,
}

/// Vocabulary, graph and scope bookkeeping from one corpus pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphBuild {
    /// Folded vocabulary over every decomposed token.
    pub vocabulary: Vocabulary,
    /// Compatibility graph over the admitted middles.
    pub graph: CompatibilityGraph,
    /// Scope counts.
    pub scopes: ScopeStats,
}

impl GraphBuild {
    /// Splits the build into the vocabulary and graph.
    pub fn into_parts(self) -> (Vocabulary, CompatibilityGraph) {
        (self.vocabulary, self.graph)
    }
}

/// Builds the vocabulary and compatibility graph using a caller-supplied scope key.
///
/// Tokens are grouped into ordered scope buckets holding *sets* of middles,
/// node indices follow middle order, and edges are set insertions; shuffling
/// the token stream therefore cannot change the result.
pub fn build<'a, I, K, F>(
    tokens: I,
    decomposer: &Decomposer,
    scope_key: F,
    opts: &BuildOptions,
) -> Result<GraphBuild, McgError>
where
    I: IntoIterator<Item = &'a Token>,
    K: Ord,
    F: Fn(&Token) -> K,
{
    let mut vocabulary = Vocabulary::new();
    let mut scopes: BTreeMap<K, BTreeSet<Middle>> = BTreeMap::new();

    for token in tokens {
        match decomposer.decompose(&token.raw_text) {
            Decomposition::Decomposed(set) => {
                vocabulary.record(set.middle.clone(), token.location());
                scopes.entry(scope_key(token)).or_default().insert(set.middle);
            }
            Decomposition::Undecomposable { reason } => vocabulary.record_skip(reason),
        }
    }

    let labels = vocabulary.middles_at_least(opts.min_frequency);
    let index: BTreeMap<&Middle, usize> = labels
        .iter()
        .enumerate()
        .map(|(idx, middle)| (middle, idx))
        .collect();

    let mut sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); labels.len()];
    let mut stats = ScopeStats {
        scopes: scopes.len(),
        scopes_without_edges: 0,
    };
    for middles in scopes.values() {
        let members: Vec<usize> = middles.iter().filter_map(|m| index.get(m).copied()).collect();
        if members.len() < 2 {
            stats.scopes_without_edges += 1;
            continue;
        }
        for (pos, &a) in members.iter().enumerate() {
            for &b in &members[pos + 1..] {
                sets[a].insert(b);
                sets[b].insert(a);
            }
        }
    }

    let graph = CompatibilityGraph::from_adjacency_sets(labels.clone(), sets)?;
    debug!(
        middles = vocabulary.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        scopes = stats.scopes,
        "compatibility graph built"
    );
    Ok(GraphBuild {
        vocabulary,
        graph,
        scopes: stats,
    })
}

/// [`build`] with one of the built-in scopes.
pub fn build_with_scope<'a, I>(
    tokens: I,
    decomposer: &Decomposer,
    scope: ScopePreset,
    opts: &BuildOptions,
) -> Result<GraphBuild, McgError>
where
    I: IntoIterator<Item = &'a Token>,
{
    build(tokens, decomposer, |token| scope.key(token), opts)
}
