use mcg_graph::CompatibilityGraph;
use serde::{Deserialize, Serialize};

/// Ratio of the two leading eigenvalues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectralGap {
    /// `λ1 / λ2` with `λ2 > 0`.
    Finite(f64),
    /// Fewer than two eigenvalues, or `λ2 <= 0`.
    Undefined,
}

impl SpectralGap {
    /// Finite value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            SpectralGap::Finite(value) => Some(*value),
            SpectralGap::Undefined => None,
        }
    }
}

/// Spectral gap of a descending eigenvalue list.
pub fn spectral_gap(eigenvalues: &[f64]) -> SpectralGap {
    match eigenvalues {
        [first, second, ..] if *second > 0.0 => SpectralGap::Finite(first / second),
        _ => SpectralGap::Undefined,
    }
}

/// Number of eigenvalues strictly above `threshold`.
pub fn count_above(eigenvalues: &[f64], threshold: f64) -> usize {
    eigenvalues.iter().filter(|&&value| value > threshold).count()
}

/// Spectral-entropy effective rank over the strictly positive eigenvalues.
///
/// Non-positive entries are left out of the entropy sum entirely; with no
/// positive eigenvalue the rank is zero.
pub fn effective_rank(eigenvalues: &[f64]) -> f64 {
    let total: f64 = eigenvalues.iter().filter(|&&value| value > 0.0).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let entropy: f64 = eigenvalues
        .iter()
        .filter(|&&value| value > 0.0)
        .map(|&value| {
            let p = value / total;
            -p * p.ln()
        })
        .sum();
    entropy.exp()
}

/// Local clustering coefficient of every node; degree below two gives zero.
pub fn local_clustering(graph: &CompatibilityGraph) -> Vec<f64> {
    let lists = graph.adjacency_lists();
    lists
        .iter()
        .map(|neighbours| {
            let degree = neighbours.len();
            if degree < 2 {
                return 0.0;
            }
            let mut links = 0usize;
            for &other in neighbours {
                links += sorted_intersection(neighbours, &lists[other]);
            }
            // every neighbour pair was seen from both ends
            let links = links / 2;
            let pairs = degree * (degree - 1) / 2;
            links as f64 / pairs as f64
        })
        .collect()
}

/// Mean local clustering coefficient over all nodes; zero for an empty graph.
pub fn average_clustering(graph: &CompatibilityGraph) -> f64 {
    let local = local_clustering(graph);
    if local.is_empty() {
        return 0.0;
    }
    local.iter().sum::<f64>() / local.len() as f64
}

fn sorted_intersection(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_requires_positive_second_eigenvalue() {
        assert_eq!(spectral_gap(&[2.0, 1.0]), SpectralGap::Finite(2.0));
        assert_eq!(spectral_gap(&[2.0, 0.0]), SpectralGap::Undefined);
        assert_eq!(spectral_gap(&[2.0, -1.0]), SpectralGap::Undefined);
        assert_eq!(spectral_gap(&[2.0]), SpectralGap::Undefined);
    }

    #[test]
    fn effective_rank_skips_non_positive_entries() {
        assert!((effective_rank(&[1.0, 1.0, -3.0, 0.0]) - 2.0).abs() < 1e-12);
        assert_eq!(effective_rank(&[-1.0, 0.0]), 0.0);
        assert_eq!(effective_rank(&[]), 0.0);
    }

    #[test]
    fn intersection_of_sorted_lists() {
        assert_eq!(sorted_intersection(&[1, 3, 5, 7], &[0, 3, 4, 7]), 2);
    }
}
