use num_bigint::BigInt;
use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

use super::{
    decompose::centered_mod,
    element::RingElement,
    poly::Polynomial,
    ring::{ring_label, same_ring, Ring},
    sampling::UniformSampler,
};
use crate::error::{AlgebraError, Result};

/// Polynomial in the ring Zq[X]/(X^N + 1), coefficients in [0, q).
///
/// Products go through the ring's transform on private copies; the stored
/// coefficients are always in the coefficient domain.
#[derive(Clone)]
pub struct ModPolynomial {
    ring: Ring,
    coefficients: Vec<u64>,
}

fn assert_same_ring(a: &ModPolynomial, b: &ModPolynomial) {
    if !same_ring(&a.ring, &b.ring) {
        panic!(
            "The two polynomials must be in the same ring: {} vs {}",
            ring_label(&a.ring),
            ring_label(&b.ring)
        );
    }
}

impl Add for ModPolynomial {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        assert_same_ring(&self, &rhs);
        let coefficients = self.ring.add(&self.coefficients, &rhs.coefficients);
        Self::from_reduced(self.ring, coefficients)
    }
}

impl Sub for ModPolynomial {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert_same_ring(&self, &rhs);
        let coefficients = self.ring.sub(&self.coefficients, &rhs.coefficients);
        Self::from_reduced(self.ring, coefficients)
    }
}

impl Neg for ModPolynomial {
    type Output = Self;

    fn neg(self) -> Self::Output {
        let coefficients = self.ring.negate(&self.coefficients);
        Self::from_reduced(self.ring, coefficients)
    }
}

impl Mul for ModPolynomial {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl Add<Polynomial> for ModPolynomial {
    type Output = Self;

    fn add(self, rhs: Polynomial) -> Self::Output {
        let rhs = self.promote_operand(&rhs);
        self + rhs
    }
}

impl Sub<Polynomial> for ModPolynomial {
    type Output = Self;

    fn sub(self, rhs: Polynomial) -> Self::Output {
        let rhs = self.promote_operand(&rhs);
        self - rhs
    }
}

impl Mul<Polynomial> for ModPolynomial {
    type Output = Self;

    fn mul(self, rhs: Polynomial) -> Self::Output {
        let rhs = self.promote_operand(&rhs);
        self * rhs
    }
}

impl PartialEq for ModPolynomial {
    fn eq(&self, other: &Self) -> bool {
        same_ring(&self.ring, &other.ring) && self.ring.equal(&self.coefficients, &other.coefficients)
    }
}

impl Eq for ModPolynomial {}

impl fmt::Debug for ModPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModPolynomial")
            .field("degree", &self.ring.degree())
            .field("modulus", &self.ring.modulus())
            .field("coefficients", &self.coefficients)
            .finish()
    }
}

impl fmt::Display for ModPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_polynomial())
    }
}

impl ModPolynomial {
    /// Wraps coefficients that are already reduced into [0, q).
    pub(crate) fn from_reduced(ring: Ring, coefficients: Vec<u64>) -> Self {
        debug_assert_eq!(coefficients.len(), ring.degree());
        Self { ring, coefficients }
    }

    /// Reduces arbitrary-precision coefficients into the ring.
    pub fn from_big_coefficients(ring: &Ring, coefficients: &[BigInt]) -> Result<Self> {
        let coefficients = ring.load_big_coefficients(coefficients)?;
        Ok(Self::from_reduced(ring.clone(), coefficients))
    }

    pub fn constant(ring: &Ring, c: i64) -> Self {
        Self::one(ring).scale_by_int(c)
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn modulus(&self) -> u64 {
        self.ring.modulus()
    }

    pub fn coefficients(&self) -> &[u64] {
        &self.coefficients
    }

    fn promote_operand(&self, p: &Polynomial) -> Self {
        p.promote(&self.ring).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Negacyclic product through the ring's transform. Both operands are
    /// copied before transforming, so neither is observably modified.
    pub fn multiply(&self, other: &Self) -> Self {
        assert_same_ring(self, other);
        let mut a = self.coefficients.clone();
        let mut b = other.coefficients.clone();
        self.ring.forward_transform(&mut a);
        self.ring.forward_transform(&mut b);
        let mut acc = vec![0u64; self.ring.degree()];
        self.ring.multiply_accumulate(&a, &b, &mut acc);
        self.ring.inverse_transform(&mut acc);
        Self::from_reduced(self.ring.clone(), acc)
    }

    pub fn pow(&self, e: i64) -> Result<Self> {
        if e < 0 {
            return Err(AlgebraError::InvalidArgument(format!("negative exponent {}", e)));
        }
        let mut e = e as u64;
        let mut base = self.clone();
        let mut res = Self::one(&self.ring);
        while e > 0 {
            if e & 1 == 1 {
                res = res.multiply(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.multiply(&base);
            }
        }
        Ok(res)
    }

    pub fn add_to_first_coefficient(&self, delta: i64) -> Self {
        let q = self.modulus();
        let delta = (delta as i128).rem_euclid(q as i128) as u64;
        let mut res = self.clone();
        if let Some(c) = res.coefficients.first_mut() {
            *c = (*c + delta) % q;
        }
        res
    }

    /// Representatives in [0, q).
    pub fn to_polynomial(&self) -> Polynomial {
        Polynomial::new(self.coefficients.iter().map(|&c| c as i64).collect())
    }

    /// Representatives in (-q/2, q/2].
    pub fn to_centered_polynomial(&self) -> Polynomial {
        let q = self.modulus() as i64;
        Polynomial::new(self.coefficients.iter().map(|&c| centered_mod(c as i64, q)).collect())
    }

    /// Uniform element drawn from the ring's shared sampler.
    pub fn random(ring: &Ring) -> Self {
        Self::from_reduced(ring.clone(), ring.sample_uniform())
    }

    /// Uniform element drawn from a caller-owned sampler.
    pub fn random_with(ring: &Ring, sampler: &mut UniformSampler) -> Result<Self> {
        if sampler.degree() != ring.degree() || sampler.modulus() != ring.modulus() {
            return Err(AlgebraError::RingMismatch {
                left: ring_label(ring),
                right: format!(
                    "sampler for Zq[X]/(X^{}+1), q = {}",
                    sampler.degree(),
                    sampler.modulus()
                ),
            });
        }
        Ok(Self::from_reduced(ring.clone(), sampler.read_new()))
    }

    /// Element with centered coefficients uniform in [-bound, bound]. A seed
    /// makes the draw reproducible.
    pub fn random_bounded(ring: &Ring, bound: u64, seed: Option<[u8; 32]>) -> Result<Self> {
        let q = ring.modulus();
        if bound > (q - 1) / 2 {
            return Err(AlgebraError::InvalidArgument(format!(
                "bound {} does not fit below q/2 for q = {}",
                bound, q
            )));
        }
        let mut sampler = ring.new_sampler(seed.as_ref().map(|s| &s[..]))?;
        let coefficients = sampler
            .read_bounded(bound)?
            .into_iter()
            .map(|c| (c as i128).rem_euclid(q as i128) as u64)
            .collect();
        Ok(Self::from_reduced(ring.clone(), coefficients))
    }
}

impl RingElement for ModPolynomial {
    type Context = Ring;

    fn context(&self) -> Ring {
        self.ring.clone()
    }

    fn zero(ring: &Ring) -> Self {
        Self::from_reduced(ring.clone(), vec![0; ring.degree()])
    }

    fn one(ring: &Ring) -> Self {
        let mut res = Self::zero(ring);
        if let Some(c) = res.coefficients.first_mut() {
            *c = 1;
        }
        res
    }

    fn from_coefficients(ring: &Ring, coefficients: &[i64]) -> Result<Self> {
        let big: Vec<BigInt> = coefficients.iter().map(|&c| BigInt::from(c)).collect();
        Self::from_big_coefficients(ring, &big)
    }

    fn degree(&self) -> usize {
        self.ring.degree()
    }

    fn is_compatible(&self, other: &Self) -> bool {
        same_ring(&self.ring, &other.ring)
    }

    fn ring_label(&self) -> String {
        ring_label(&self.ring)
    }

    /// `s` is reduced into [0, q) first.
    fn scale_by_int(&self, s: i64) -> Self {
        let q = self.modulus();
        let s = (s as i128).rem_euclid(q as i128) as u64;
        let coefficients = self.ring.scalar_multiply(&self.coefficients, s);
        Self::from_reduced(self.ring.clone(), coefficients)
    }

    fn listize(&self) -> Vec<i64> {
        self.coefficients.iter().map(|&c| c as i64).collect()
    }

    /// Largest centered coefficient in absolute value.
    fn infinite_norm(&self) -> u64 {
        let q = self.modulus();
        self.coefficients
            .iter()
            .map(|&c| if c > q / 2 { q - c } else { c })
            .max()
            .unwrap_or(0)
    }

    /// Every operand is transformed once; each output cell is one
    /// multiply-accumulate chain followed by a single inverse transform.
    fn matrix_product(
        lhs: &[Self],
        rhs: &[Self],
        rows: usize,
        inner: usize,
        cols: usize,
    ) -> Vec<Self> {
        let ring = lhs[0].ring.clone();
        let transform = |p: &Self| {
            let mut c = p.coefficients.clone();
            ring.forward_transform(&mut c);
            c
        };
        let lhs_hat: Vec<Vec<u64>> = lhs.iter().map(&transform).collect();
        let rhs_hat: Vec<Vec<u64>> = rhs.iter().map(&transform).collect();

        let mut out = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let mut acc = vec![0u64; ring.degree()];
                for k in 0..inner {
                    ring.multiply_accumulate(&lhs_hat[i * inner + k], &rhs_hat[k * cols + j], &mut acc);
                }
                ring.inverse_transform(&mut acc);
                out.push(Self::from_reduced(ring.clone(), acc));
            }
        }
        out
    }
}
