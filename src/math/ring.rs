//! The ring contract consumed by [`ModPolynomial`](super::poly_q::ModPolynomial),
//! and the NTT-backed implementation shipped with the crate.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::{
    fmt::Debug,
    sync::{Arc, Mutex},
};

use super::{
    ntt::NttTables,
    params::RingParams,
    prime::mul_mod,
    sampling::UniformSampler,
};
use crate::error::{AlgebraError, Result};

/// Arithmetic provider for Zq[X]/(X^N+1).
///
/// Coefficient buffers are plain `u64` slices of length N with entries in
/// [0, q). The transform functions work in place and callers only ever hand
/// them private copies.
pub trait RingContext: Debug + Send + Sync {
    fn degree(&self) -> usize;

    fn modulus(&self) -> u64;

    fn forward_transform(&self, x: &mut [u64]);

    fn inverse_transform(&self, x: &mut [u64]);

    /// acc += a * b, coefficient-wise in the transform domain
    fn multiply_accumulate(&self, a: &[u64], b: &[u64], acc: &mut [u64]);

    fn add(&self, a: &[u64], b: &[u64]) -> Vec<u64>;

    fn sub(&self, a: &[u64], b: &[u64]) -> Vec<u64>;

    fn negate(&self, a: &[u64]) -> Vec<u64>;

    /// `s` must already be reduced into [0, q).
    fn scalar_multiply(&self, a: &[u64], s: u64) -> Vec<u64>;

    /// Reduces arbitrary signed coefficients into [0, q), padding to N.
    fn load_big_coefficients(&self, coeffs: &[BigInt]) -> Result<Vec<u64>>;

    fn equal(&self, a: &[u64], b: &[u64]) -> bool;

    /// Fresh coefficients uniform in [0, q) from the ring's shared sampler.
    fn sample_uniform(&self) -> Vec<u64>;

    /// An independent sampler for this ring; seeded ones are reproducible.
    fn new_sampler(&self, seed: Option<&[u8]>) -> Result<UniformSampler> {
        UniformSampler::new(self.degree(), self.modulus(), seed)
    }
}

/// Shared handle to a ring, carried by every [`ModPolynomial`](super::poly_q::ModPolynomial).
pub type Ring = Arc<dyn RingContext>;

/// Two rings are interchangeable if they agree on degree and modulus.
pub(crate) fn same_ring(a: &Ring, b: &Ring) -> bool {
    Arc::ptr_eq(a, b) || (a.degree() == b.degree() && a.modulus() == b.modulus())
}

pub(crate) fn ring_label(ring: &Ring) -> String {
    format!("Zq[X]/(X^{}+1), q = {}", ring.degree(), ring.modulus())
}

#[derive(Debug)]
pub struct NttRing {
    params: RingParams,
    tables: NttTables,
    sampler: Mutex<UniformSampler>,
}

impl NttRing {
    pub fn new(params: RingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            tables: NttTables::new(params.degree, params.modulus),
            sampler: Mutex::new(UniformSampler::new(params.degree, params.modulus, None)?),
        })
    }

    /// Same ring, but the shared sampler is seeded deterministically.
    pub fn with_seed(params: RingParams, seed: &[u8]) -> Result<Self> {
        let mut ring = Self::new(params)?;
        ring.sampler = Mutex::new(UniformSampler::new(params.degree, params.modulus, Some(seed))?);
        Ok(ring)
    }

    pub fn params(&self) -> RingParams {
        self.params
    }
}

impl RingContext for NttRing {
    fn degree(&self) -> usize {
        self.params.degree
    }

    fn modulus(&self) -> u64 {
        self.params.modulus
    }

    fn forward_transform(&self, x: &mut [u64]) {
        self.tables.forward(x);
    }

    fn inverse_transform(&self, x: &mut [u64]) {
        self.tables.inverse(x);
    }

    fn multiply_accumulate(&self, a: &[u64], b: &[u64], acc: &mut [u64]) {
        let q = self.params.modulus;
        for ((c, &x), &y) in acc.iter_mut().zip(a.iter()).zip(b.iter()) {
            *c = ((*c as u128 + x as u128 * y as u128) % q as u128) as u64;
        }
    }

    fn add(&self, a: &[u64], b: &[u64]) -> Vec<u64> {
        let q = self.params.modulus;
        a.iter().zip(b.iter()).map(|(&x, &y)| (x + y) % q).collect()
    }

    fn sub(&self, a: &[u64], b: &[u64]) -> Vec<u64> {
        let q = self.params.modulus;
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| if x >= y { x - y } else { x + q - y })
            .collect()
    }

    fn negate(&self, a: &[u64]) -> Vec<u64> {
        let q = self.params.modulus;
        a.iter().map(|&x| if x == 0 { 0 } else { q - x }).collect()
    }

    fn scalar_multiply(&self, a: &[u64], s: u64) -> Vec<u64> {
        let q = self.params.modulus;
        a.iter().map(|&x| mul_mod(x, s, q)).collect()
    }

    fn load_big_coefficients(&self, coeffs: &[BigInt]) -> Result<Vec<u64>> {
        let n = self.params.degree;
        if coeffs.len() > n {
            return Err(AlgebraError::InvalidArgument(format!(
                "{} coefficients for a ring of degree {}",
                coeffs.len(),
                n
            )));
        }
        let q = BigInt::from(self.params.modulus);
        let mut res = vec![0u64; n];
        for (r, c) in res.iter_mut().zip(coeffs.iter()) {
            let mut c = c % &q;
            if c.is_negative() {
                c += &q;
            }
            if !c.is_zero() {
                *r = c.magnitude().iter_u64_digits().next().unwrap_or(0);
            }
        }
        Ok(res)
    }

    fn equal(&self, a: &[u64], b: &[u64]) -> bool {
        a == b
    }

    fn sample_uniform(&self) -> Vec<u64> {
        let mut sampler = self.sampler.lock().unwrap_or_else(|e| e.into_inner());
        sampler.read_new()
    }
}
