//! Environment random number generator.
//!
//! The environment owns the RNG and lends it to the engine one frame at a
//! time. Its full state is part of a system snapshot.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::error::{AleError, Result};

/// Seeded PCG stream with a serializable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Random {
    rng: Pcg64Mcg,
}

impl Random {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Restart the stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg64Mcg::seed_from_u64(seed);
    }

    pub fn next_u32(&mut self) -> u32 {
        self.rng.random()
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.random()
    }

    /// Uniform in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: u32) -> u32 {
        self.rng.random_range(0..bound.max(1))
    }

    /// Serialized generator state.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serde::encode_to_vec(&self.rng, bincode::config::standard())
            .map_err(|e| AleError::CorruptState(format!("rng encode: {e}")))
    }

    /// Rebuild a generator from [`Random::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (rng, read): (Pcg64Mcg, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| AleError::CorruptState(format!("rng state: {e}")))?;
        if read != bytes.len() {
            return Err(AleError::CorruptState(format!(
                "rng state has {} trailing bytes",
                bytes.len() - read
            )));
        }
        Ok(Self { rng })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Random::new(0);
        let mut b = Random::new(0);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn state_bytes_resume_the_stream() {
        let mut rng = Random::new(7);
        rng.next_u32();
        let bytes = rng.to_bytes().expect("valid");
        let mut resumed = Random::from_bytes(&bytes).expect("valid");
        assert_eq!(resumed, rng);
        assert_eq!(resumed.next_u32(), rng.next_u32());
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = Random::new(1).to_bytes().expect("valid");
        bytes.push(0);
        assert!(matches!(
            Random::from_bytes(&bytes),
            Err(AleError::CorruptState(_))
        ));
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = Random::new(3);
        for _ in 0..100 {
            assert!(rng.below(10) < 10);
        }
    }
}
