#![deny(missing_docs)]
#![doc = "Core records, error taxonomy and seeding policy shared by every MCG crate."]

pub mod errors;
pub mod provenance;
pub mod rng;
mod types;

pub use errors::{ErrorInfo, McgError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_labelled_seed, RngHandle};
pub use types::{LanguageTag, Location, Token};

/// Rounds a float to nine decimals so serialized metrics diff cleanly across platforms.
pub fn round9(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 1e9).round() / 1e9
}
