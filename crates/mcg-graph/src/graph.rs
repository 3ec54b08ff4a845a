use std::collections::{BTreeMap, BTreeSet};

use mcg_core::{ErrorInfo, McgError, SchemaVersion};
use mcg_morph::Middle;
use serde::{Deserialize, Serialize};

/// Schema version written alongside serialized graphs.
pub const GRAPH_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

fn graph_error(code: &str, message: impl Into<String>) -> McgError {
    McgError::Graph(ErrorInfo::new(code, message))
}

/// Binary co-occurrence graph over middle morphemes.
///
/// Nodes carry stable integer indices; adjacency lists are sorted and
/// symmetric and never contain the node itself. The structure is frozen once
/// built: null models and masked copies always produce new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphRepr", into = "GraphRepr")]
pub struct CompatibilityGraph {
    labels: Vec<Middle>,
    adjacency: Vec<Vec<usize>>,
    index: BTreeMap<Middle, usize>,
    edge_count: usize,
}

impl CompatibilityGraph {
    /// Builds a graph from labels and an unordered edge list.
    ///
    /// Duplicate edges (in either orientation) collapse to one; self-loops,
    /// out-of-range endpoints and duplicate labels are rejected.
    pub fn from_edges<I>(labels: Vec<Middle>, edges: I) -> Result<Self, McgError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let node_count = labels.len();
        let mut sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); node_count];
        for (a, b) in edges {
            if a >= node_count || b >= node_count {
                return Err(McgError::Graph(
                    ErrorInfo::new("node-out-of-range", "edge endpoint is not a node")
                        .with_context("edge", format!("{a}-{b}"))
                        .with_context("node_count", node_count.to_string()),
                ));
            }
            if a == b {
                return Err(McgError::Graph(
                    ErrorInfo::new("self-loop", "compatibility edges join distinct middles")
                        .with_context("node", a.to_string()),
                ));
            }
            sets[a].insert(b);
            sets[b].insert(a);
        }
        Self::from_adjacency_sets(labels, sets)
    }

    pub(crate) fn from_adjacency_sets(
        labels: Vec<Middle>,
        sets: Vec<BTreeSet<usize>>,
    ) -> Result<Self, McgError> {
        let mut index = BTreeMap::new();
        for (idx, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), idx).is_some() {
                return Err(McgError::Graph(
                    ErrorInfo::new("duplicate-label", "node labels must be unique")
                        .with_context("label", label.to_string()),
                ));
            }
        }
        let adjacency: Vec<Vec<usize>> = sets.into_iter().map(|set| set.into_iter().collect()).collect();
        let endpoint_total: usize = adjacency.iter().map(Vec::len).sum();
        Ok(Self {
            labels,
            adjacency,
            index,
            edge_count: endpoint_total / 2,
        })
    }

    /// Graph with the same labels and no edges.
    pub fn empty(labels: Vec<Middle>) -> Result<Self, McgError> {
        let sets = vec![BTreeSet::new(); labels.len()];
        Self::from_adjacency_sets(labels, sets)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Node labels in index order.
    pub fn labels(&self) -> &[Middle] {
        &self.labels
    }

    /// Label of a node.
    pub fn label(&self, node: usize) -> Option<&Middle> {
        self.labels.get(node)
    }

    /// Index assigned to a middle, if it is a node.
    pub fn index_of(&self, middle: &Middle) -> Option<usize> {
        self.index.get(middle).copied()
    }

    /// Sorted neighbours of a node.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        match self.adjacency.get(node) {
            Some(neighbours) => neighbours,
            None => &[],
        }
    }

    /// Degree of a node.
    pub fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }

    /// Degree sequence in index order.
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    /// Sorted adjacency lists in index order.
    pub fn adjacency_lists(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Whether `a` and `b` are compatible.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Iterates every edge once as `(i, j)` with `i < j`, in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, neighbours)| {
            neighbours
                .iter()
                .copied()
                .filter(move |&j| j > i)
                .map(move |j| (i, j))
        })
    }

    /// Edge count over the number of node pairs; zero below two nodes.
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n < 2 {
            return 0.0;
        }
        let pairs = (n * (n - 1) / 2) as f64;
        self.edge_count as f64 / pairs
    }

    /// Checks the symmetric, loop-free adjacency invariant.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().enumerate().all(|(i, neighbours)| {
            neighbours
                .iter()
                .all(|&j| j != i && j < self.node_count() && self.has_edge(j, i))
        })
    }
}

#[derive(Serialize, Deserialize)]
struct GraphRepr {
    schema_version: SchemaVersion,
    labels: Vec<Middle>,
    edges: Vec<(usize, usize)>,
}

impl From<CompatibilityGraph> for GraphRepr {
    fn from(value: CompatibilityGraph) -> Self {
        let edges = value.edges().collect();
        Self {
            schema_version: GRAPH_SCHEMA,
            labels: value.labels,
            edges,
        }
    }
}

impl TryFrom<GraphRepr> for CompatibilityGraph {
    type Error = McgError;

    fn try_from(value: GraphRepr) -> Result<Self, Self::Error> {
        if value.schema_version.major != GRAPH_SCHEMA.major {
            return Err(graph_error(
                "schema-mismatch",
                format!(
                    "unsupported graph schema {}.{}.{}",
                    value.schema_version.major, value.schema_version.minor, value.schema_version.patch
                ),
            ));
        }
        CompatibilityGraph::from_edges(value.labels, value.edges)
    }
}
