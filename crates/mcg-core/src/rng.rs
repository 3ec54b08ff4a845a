//! Seeded randomness for null trials, cross-validation folds and solver starts.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

/// Seeded random source.
///
/// Every randomized unit of work (one null trial, one cross-validation fold)
/// draws from its own stream, keyed by the master seed, a stage label and the
/// unit's index. Results therefore never depend on worker count or scheduling.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Stream seeded directly with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stream of unit `index` within the stage `label`.
    pub fn labelled(master_seed: u64, label: &str, index: u64) -> Self {
        Self::from_seed(derive_labelled_seed(master_seed, label, index))
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// SipHash-1-3 (zero keys) of `(master_seed, label, index)`.
///
/// The label is length-prefixed so no two distinct labels share a stream.
pub fn derive_labelled_seed(master_seed: u64, label: &str, index: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_usize(label.len());
    hasher.write(label.as_bytes());
    hasher.write_u64(index);
    hasher.finish()
}
