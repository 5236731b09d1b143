use num_bigint::BigInt;
use rand::Rng;
use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

use super::{element::RingElement, poly_q::ModPolynomial, ring::Ring};
use crate::error::{AlgebraError, Result};

/// Polynomial in the ring Z[X]/(X^N + 1), with no modular reduction.
///
/// Coefficient arithmetic wraps on `i64` overflow; results are exact as long
/// as the true values stay in range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Polynomial {
    coefficients: Vec<i64>,
}

fn assert_same_degree(a: &Polynomial, b: &Polynomial) {
    if a.degree() != b.degree() {
        panic!(
            "The two polynomials must have the same degree: {} vs {}",
            a.degree(),
            b.degree()
        );
    }
}

impl Add for Polynomial {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        assert_same_degree(&self, &rhs);
        let coefficients = self
            .coefficients
            .iter()
            .zip(rhs.coefficients.iter())
            .map(|(&a, &b)| a.wrapping_add(b))
            .collect();
        Self { coefficients }
    }
}

impl Neg for Polynomial {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            coefficients: self.coefficients.iter().map(|c| c.wrapping_neg()).collect(),
        }
    }
}

impl Sub for Polynomial {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for Polynomial {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl Add<ModPolynomial> for Polynomial {
    type Output = ModPolynomial;

    fn add(self, rhs: ModPolynomial) -> Self::Output {
        self.promote_or_panic(rhs.ring()) + rhs
    }
}

impl Sub<ModPolynomial> for Polynomial {
    type Output = ModPolynomial;

    fn sub(self, rhs: ModPolynomial) -> Self::Output {
        self.promote_or_panic(rhs.ring()) - rhs
    }
}

impl Mul<ModPolynomial> for Polynomial {
    type Output = ModPolynomial;

    fn mul(self, rhs: ModPolynomial) -> Self::Output {
        self.promote_or_panic(rhs.ring()) * rhs
    }
}

impl Polynomial {
    pub fn new(coefficients: Vec<i64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[i64] {
        &self.coefficients
    }

    pub fn into_coefficients(self) -> Vec<i64> {
        self.coefficients
    }

    /// Schoolbook negacyclic convolution.
    pub fn multiply(&self, other: &Self) -> Self {
        assert_same_degree(self, other);
        let n = self.degree();
        let mut coefficients = vec![0i64; n];

        for i in 0..n {
            for j in 0..n {
                let c = self.coefficients[i].wrapping_mul(other.coefficients[j]);
                let k = i + j;
                if k < n {
                    coefficients[k] = coefficients[k].wrapping_add(c);
                } else {
                    // X^n + 1 = 0
                    coefficients[k - n] = coefficients[k - n].wrapping_sub(c);
                }
            }
        }

        Self { coefficients }
    }

    pub fn pow(&self, e: i64) -> Result<Self> {
        if e < 0 {
            return Err(AlgebraError::InvalidArgument(format!("negative exponent {}", e)));
        }
        let mut e = e as u64;
        let mut base = self.clone();
        let mut res = Self::one(&self.degree());
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
        let mut res = self.clone();
        if let Some(c) = res.coefficients.first_mut() {
            *c = c.wrapping_add(delta);
        }
        res
    }

    /// Reduces every coefficient into the given ring.
    pub fn promote(&self, ring: &Ring) -> Result<ModPolynomial> {
        if self.degree() != ring.degree() {
            return Err(AlgebraError::RingMismatch {
                left: self.ring_label(),
                right: super::ring::ring_label(ring),
            });
        }
        let big: Vec<BigInt> = self.coefficients.iter().map(|&c| BigInt::from(c)).collect();
        let coefficients = ring.load_big_coefficients(&big)?;
        Ok(ModPolynomial::from_reduced(ring.clone(), coefficients))
    }

    fn promote_or_panic(self, ring: &Ring) -> ModPolynomial {
        self.promote(ring).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Coefficients drawn uniformly from [-|bound|, |bound|], with |i64::MIN|
    /// saturating to i64::MAX.
    pub fn random_bounded<R: Rng + ?Sized>(degree: usize, bound: i64, rng: &mut R) -> Self {
        let bound = bound.unsigned_abs().min(i64::MAX as u64) as i64;
        Self {
            coefficients: (0..degree).map(|_| rng.gen_range(-bound..=bound)).collect(),
        }
    }

    /// The raw coefficient list, e.g. `[3, 2, 0, 0]`.
    pub fn coeff_string(&self) -> String {
        format!("{:?}", self.coefficients)
    }
}

impl RingElement for Polynomial {
    type Context = usize;

    fn context(&self) -> usize {
        self.degree()
    }

    fn zero(degree: &usize) -> Self {
        Self {
            coefficients: vec![0; *degree],
        }
    }

    fn one(degree: &usize) -> Self {
        let mut res = Self::zero(degree);
        if let Some(c) = res.coefficients.first_mut() {
            *c = 1;
        }
        res
    }

    fn from_coefficients(degree: &usize, coefficients: &[i64]) -> Result<Self> {
        if coefficients.len() > *degree {
            return Err(AlgebraError::InvalidArgument(format!(
                "{} coefficients for a ring of degree {}",
                coefficients.len(),
                degree
            )));
        }
        let mut res = Self::zero(degree);
        res.coefficients[..coefficients.len()].copy_from_slice(coefficients);
        Ok(res)
    }

    fn degree(&self) -> usize {
        self.coefficients.len()
    }

    fn is_compatible(&self, other: &Self) -> bool {
        self.degree() == other.degree()
    }

    fn ring_label(&self) -> String {
        format!("Z[X]/(X^{}+1)", self.degree())
    }

    fn scale_by_int(&self, s: i64) -> Self {
        Self {
            coefficients: self.coefficients.iter().map(|c| c.wrapping_mul(s)).collect(),
        }
    }

    fn listize(&self) -> Vec<i64> {
        self.coefficients.clone()
    }

    fn infinite_norm(&self) -> u64 {
        self.coefficients
            .iter()
            .map(|c| c.unsigned_abs())
            .max()
            .unwrap_or(0)
    }
}

/// Prints as `3 + 2*x - x^5`; the zero polynomial prints as `0`.
impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (i, &c) in self.coefficients.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let magnitude = c.unsigned_abs();
            if first {
                if c < 0 {
                    write!(f, "-")?;
                }
            } else if c < 0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            first = false;
            match (i, magnitude) {
                (0, m) => write!(f, "{}", m)?,
                (1, 1) => write!(f, "x")?,
                (1, m) => write!(f, "{}*x", m)?,
                (i, 1) => write!(f, "x^{}", i)?,
                (i, m) => write!(f, "{}*x^{}", m, i)?,
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
