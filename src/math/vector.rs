use std::{
    fmt,
    ops::{Index, Neg},
    slice,
};

use super::{
    element::{check_compatible, unify_operands, RingElement, Unify},
    poly::Polynomial,
    poly_q::ModPolynomial,
    ring::Ring,
    sampling::UniformSampler,
};
use crate::error::{AlgebraError, Result};

/// Column of ring elements sharing one ring. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T: RingElement> {
    entries: Vec<T>,
}

impl<T: RingElement> Vector<T> {
    pub fn new(entries: Vec<T>) -> Result<Self> {
        check_compatible(&entries)?;
        Ok(Self { entries })
    }

    /// Caller guarantees a non-empty, single-ring list.
    pub(crate) fn from_entries(entries: Vec<T>) -> Self {
        debug_assert!(!entries.is_empty());
        Self { entries }
    }

    pub fn zero(ctx: &T::Context, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(AlgebraError::InvalidArgument("vector length must be >= 1".to_string()));
        }
        Ok(Self {
            entries: vec![T::zero(ctx); len],
        })
    }

    /// One coefficient list per entry.
    pub fn from_coefficients(ctx: &T::Context, coefficients: &[Vec<i64>]) -> Result<Self> {
        let entries = coefficients
            .iter()
            .map(|c| T::from_coefficients(ctx, c))
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn context(&self) -> T::Context {
        self.entries[0].context()
    }

    fn check_len(&self, operation: &'static str, other_len: usize) -> Result<()> {
        if self.len() != other_len {
            return Err(AlgebraError::shape(operation, self.len(), other_len));
        }
        Ok(())
    }

    pub fn add<R: RingElement>(&self, other: &Vector<R>) -> Result<Vector<T::Unified>>
    where
        T: Unify<R>,
    {
        self.check_len("add", other.len())?;
        let (l, r) = unify_operands(&self.entries, &other.entries)?;
        Ok(Vector::from_entries(
            l.iter().zip(r.iter()).map(|(a, b)| a.clone() + b.clone()).collect(),
        ))
    }

    pub fn sub<R: RingElement>(&self, other: &Vector<R>) -> Result<Vector<T::Unified>>
    where
        T: Unify<R>,
    {
        self.check_len("sub", other.len())?;
        let (l, r) = unify_operands(&self.entries, &other.entries)?;
        Ok(Vector::from_entries(
            l.iter().zip(r.iter()).map(|(a, b)| a.clone() - b.clone()).collect(),
        ))
    }

    pub fn concat<R: RingElement>(&self, other: &Vector<R>) -> Result<Vector<T::Unified>>
    where
        T: Unify<R>,
    {
        let (l, r) = unify_operands(&self.entries, &other.entries)?;
        let mut entries = l.into_owned();
        entries.extend_from_slice(&r);
        Ok(Vector::from_entries(entries))
    }

    pub fn scale_by_polynomial<R: RingElement>(&self, p: &R) -> Result<Vector<T::Unified>>
    where
        T: Unify<R>,
    {
        let (l, r) = unify_operands(&self.entries, slice::from_ref(p))?;
        let n = l.len();
        Ok(Vector::from_entries(T::Unified::matrix_product(&l, &r, n, 1, 1)))
    }

    pub fn scale_by_int(&self, s: i64) -> Self {
        Self::from_entries(self.entries.iter().map(|e| e.scale_by_int(s)).collect())
    }

    /// Sum of the entry-wise products, with a single transform per operand
    /// and one inverse transform for the result.
    pub fn dot_product<R: RingElement>(&self, other: &Vector<R>) -> Result<T::Unified>
    where
        T: Unify<R>,
    {
        self.check_len("dot_product", other.len())?;
        let (l, r) = unify_operands(&self.entries, &other.entries)?;
        let mut cell = T::Unified::matrix_product(&l, &r, 1, self.len(), 1);
        cell.pop()
            .ok_or_else(|| AlgebraError::InvalidArgument("empty dot product".to_string()))
    }

    /// All coefficients, entry after entry.
    pub fn listize(&self) -> Vec<i64> {
        self.entries.iter().flat_map(|e| e.listize()).collect()
    }

    pub fn infinite_norm(&self) -> u64 {
        self.entries.iter().map(|e| e.infinite_norm()).max().unwrap_or(0)
    }
}

impl Vector<Polynomial> {
    /// Sum of squared coefficients.
    pub fn norm_squared(&self) -> i128 {
        self.entries
            .iter()
            .flat_map(|e| e.coefficients().iter())
            .map(|&c| c as i128 * c as i128)
            .sum()
    }

    pub fn promote(&self, ring: &Ring) -> Result<Vector<ModPolynomial>> {
        let entries = self
            .entries
            .iter()
            .map(|e| e.promote(ring))
            .collect::<Result<Vec<_>>>()?;
        Ok(Vector::from_entries(entries))
    }
}

impl Vector<ModPolynomial> {
    /// Sum of squared centered coefficients.
    pub fn norm_squared(&self) -> i128 {
        self.to_centered_polynomial().norm_squared()
    }

    pub fn to_polynomial(&self) -> Vector<Polynomial> {
        Vector::from_entries(self.entries.iter().map(|e| e.to_polynomial()).collect())
    }

    pub fn to_centered_polynomial(&self) -> Vector<Polynomial> {
        Vector::from_entries(self.entries.iter().map(|e| e.to_centered_polynomial()).collect())
    }

    pub fn random(ring: &Ring, len: usize) -> Result<Self> {
        let mut res = Self::zero(ring, len)?;
        for e in res.entries.iter_mut() {
            *e = ModPolynomial::random(ring);
        }
        Ok(res)
    }

    pub fn random_with(ring: &Ring, len: usize, sampler: &mut UniformSampler) -> Result<Self> {
        let mut res = Self::zero(ring, len)?;
        for e in res.entries.iter_mut() {
            *e = ModPolynomial::random_with(ring, sampler)?;
        }
        Ok(res)
    }

    /// Entries with centered coefficients in [-bound, bound], all drawn from
    /// one stream so that a seed reproduces the whole vector.
    pub fn random_bounded(ring: &Ring, len: usize, bound: u64, seed: Option<[u8; 32]>) -> Result<Self> {
        let q = ring.modulus();
        if bound > (q - 1) / 2 {
            return Err(AlgebraError::InvalidArgument(format!(
                "bound {} does not fit below q/2 for q = {}",
                bound, q
            )));
        }
        let mut sampler = ring.new_sampler(seed.as_ref().map(|s| &s[..]))?;
        let mut res = Self::zero(ring, len)?;
        for e in res.entries.iter_mut() {
            let coefficients = sampler.read_bounded(bound)?;
            *e = ModPolynomial::from_coefficients(ring, &coefficients)?;
        }
        Ok(res)
    }
}

impl<T: RingElement> Neg for Vector<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::from_entries(self.entries.into_iter().map(|e| -e).collect())
    }
}

impl<T: RingElement> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a, T: RingElement> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// `[p0, p1, ...]`
impl<T: RingElement> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "]")
    }
}
