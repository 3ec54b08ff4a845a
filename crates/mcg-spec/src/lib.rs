#![deny(missing_docs)]

//! Adjacency spectra, spectral summaries and clustering for compatibility graphs.

mod eigen;
mod metrics;
mod profile;

pub use eigen::{top_algebraic_eigenpairs, top_eigenpairs, EigenOptions, EigenPairs, Solver};
pub use metrics::{
    average_clustering, count_above, effective_rank, local_clustering, spectral_gap, SpectralGap,
};
pub use profile::{analyze, SpectralOptions, SpectralProfile};
