#![deny(missing_docs)]
#![doc = "Greedy longest-match decomposition of transcribed tokens into articulator, \
prefix, middle and suffix morphemes."]

mod affix;
mod config;
mod decompose;

pub use affix::AffixTable;
pub use config::MorphConfig;
pub use decompose::{
    decompose, Decomposer, Decomposition, Middle, MorphemeSet, RejectReason,
    DEFAULT_MIN_TOKEN_LEN, DEFAULT_UNCERTAINTY_MARKERS, EMPTY_MIDDLE_LABEL,
};
