#![deny(missing_docs)]

//! Estimates how many latent dimensions a compatibility graph carries by
//! sweeping embedding ranks and scoring held-out link prediction.

mod estimate;
mod sampling;
mod select;
mod stat;

pub use estimate::{
    estimate, DimensionalityEstimate, DimensionalityOptions, EstimateStatus, FoldFailure, KScore,
};
pub use select::{elbow_k, plateau_k};
