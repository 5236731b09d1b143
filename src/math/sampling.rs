//! Uniform sampling of ring coefficients from a SHAKE-128 stream.

use digest::{ExtendableOutput, Update, XofReader};
use rand::RngCore;
use sha3::{Shake128, Shake128Reader};
use std::fmt;

use crate::error::{AlgebraError, Result};

const SEED_BYTES: usize = 32;

/// Largest accepted `bound` for [`UniformSampler::read_bounded`].
pub const MAX_SAMPLE_BOUND: u64 = 1 << 61;

/// Largest modulus a sampler accepts; rejection masks stay within 64 bits.
pub const MAX_SAMPLE_MODULUS: u64 = 1 << 63;

/// Deterministic coefficient sampler. The seed (or fresh entropy) is absorbed
/// into SHAKE-128 and the output is read as an endless stream; coefficients are
/// drawn from it by rejection sampling.
pub struct UniformSampler {
    degree: usize,
    modulus: u64,
    reader: Shake128Reader,
}

impl fmt::Debug for UniformSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformSampler")
            .field("degree", &self.degree)
            .field("modulus", &self.modulus)
            .finish_non_exhaustive()
    }
}

impl UniformSampler {
    /// The modulus must lie in [2, 2^63].
    pub fn new(degree: usize, modulus: u64, seed: Option<&[u8]>) -> Result<Self> {
        if !(2..=MAX_SAMPLE_MODULUS).contains(&modulus) {
            return Err(AlgebraError::InvalidArgument(format!(
                "sampling modulus {} outside [2, 2^63]",
                modulus
            )));
        }
        let mut hasher = Shake128::default();
        match seed {
            Some(seed) => hasher.update(seed),
            None => {
                let mut fresh = [0u8; SEED_BYTES];
                rand::thread_rng().fill_bytes(&mut fresh);
                hasher.update(&fresh);
            }
        }
        Ok(Self {
            degree,
            modulus,
            reader: hasher.finalize_xof(),
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    fn next_word(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.reader.read(&mut buf);
        u64::from_le_bytes(buf)
    }

    /// Next value uniform in [0, range) by rejection sampling. `range` is
    /// at least 1 and at most 2^63.
    fn next_below(&mut self, range: u64) -> u64 {
        let mask = range.next_power_of_two() - 1;
        loop {
            let w = self.next_word() & mask;
            if w < range {
                return w;
            }
        }
    }

    /// Reads `degree` coefficients uniform in [0, q).
    pub fn read_new(&mut self) -> Vec<u64> {
        let q = self.modulus;
        (0..self.degree).map(|_| self.next_below(q)).collect()
    }

    /// Reads `degree` signed coefficients uniform in [-bound, bound].
    pub fn read_bounded(&mut self, bound: u64) -> Result<Vec<i64>> {
        if bound > MAX_SAMPLE_BOUND {
            return Err(AlgebraError::InvalidArgument(format!(
                "sampling bound {} exceeds {}",
                bound, MAX_SAMPLE_BOUND
            )));
        }
        let range = 2 * bound + 1;
        Ok((0..self.degree)
            .map(|_| self.next_below(range) as i64 - bound as i64)
            .collect())
    }
}
