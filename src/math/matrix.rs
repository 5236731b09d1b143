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
    vector::Vector,
};
use crate::error::{AlgebraError, Result};

/// Rows x cols grid of ring elements sharing one ring, stored row-major.
/// Both dimensions are at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: RingElement> {
    rows: usize,
    cols: usize,
    entries: Vec<T>,
}

fn shape_label(rows: usize, cols: usize) -> String {
    format!("{}x{}", rows, cols)
}

impl<T: RingElement> Matrix<T> {
    pub fn new(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(AlgebraError::InvalidArgument(
                "matrix dimensions must be >= 1".to_string(),
            ));
        }
        if let Some(r) = rows.iter().find(|r| r.len() != cols) {
            return Err(AlgebraError::shape("new", cols, r.len()));
        }
        let n_rows = rows.len();
        let entries: Vec<T> = rows.into_iter().flatten().collect();
        check_compatible(&entries)?;
        Ok(Self {
            rows: n_rows,
            cols,
            entries,
        })
    }

    pub fn from_rows(rows: Vec<Vector<T>>) -> Result<Self> {
        Self::new(rows.into_iter().map(|r| r.into_entries()).collect())
    }

    pub(crate) fn from_entries(rows: usize, cols: usize, entries: Vec<T>) -> Self {
        debug_assert!(rows > 0 && cols > 0 && entries.len() == rows * cols);
        Self { rows, cols, entries }
    }

    pub fn zero(ctx: &T::Context, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(AlgebraError::InvalidArgument(
                "matrix dimensions must be >= 1".to_string(),
            ));
        }
        Ok(Self::from_entries(rows, cols, vec![T::zero(ctx); rows * cols]))
    }

    pub fn identity(ctx: &T::Context, n: usize) -> Result<Self> {
        let mut res = Self::zero(ctx, n, n)?;
        for i in 0..n {
            res.entries[i * n + i] = T::one(ctx);
        }
        Ok(res)
    }

    /// `coefficients[i][j]` holds the coefficient list of entry (i, j).
    pub fn from_coefficients(ctx: &T::Context, coefficients: &[Vec<Vec<i64>>]) -> Result<Self> {
        let rows = coefficients
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| T::from_coefficients(ctx, c))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.entries[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_vector(&self, i: usize) -> Vector<T> {
        Vector::from_entries(self.row(i).to_vec())
    }

    pub fn column_vector(&self, j: usize) -> Vector<T> {
        Vector::from_entries((0..self.rows).map(|i| self[(i, j)].clone()).collect())
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn context(&self) -> T::Context {
        self.entries[0].context()
    }

    fn check_shape(&self, operation: &'static str, other: (usize, usize)) -> Result<()> {
        if self.shape() != other {
            return Err(AlgebraError::shape(
                operation,
                shape_label(self.rows, self.cols),
                shape_label(other.0, other.1),
            ));
        }
        Ok(())
    }

    pub fn add<R: RingElement>(&self, other: &Matrix<R>) -> Result<Matrix<T::Unified>>
    where
        T: Unify<R>,
    {
        self.check_shape("add", other.shape())?;
        let (l, r) = unify_operands(&self.entries, &other.entries)?;
        let entries = l.iter().zip(r.iter()).map(|(a, b)| a.clone() + b.clone()).collect();
        Ok(Matrix::from_entries(self.rows, self.cols, entries))
    }

    pub fn sub<R: RingElement>(&self, other: &Matrix<R>) -> Result<Matrix<T::Unified>>
    where
        T: Unify<R>,
    {
        self.check_shape("sub", other.shape())?;
        let (l, r) = unify_operands(&self.entries, &other.entries)?;
        let entries = l.iter().zip(r.iter()).map(|(a, b)| a.clone() - b.clone()).collect();
        Ok(Matrix::from_entries(self.rows, self.cols, entries))
    }

    /// Side by side: row i of the result is row i of `self` followed by row i
    /// of `other`.
    pub fn concat<R: RingElement>(&self, other: &Matrix<R>) -> Result<Matrix<T::Unified>>
    where
        T: Unify<R>,
    {
        if self.rows != other.rows {
            return Err(AlgebraError::shape(
                "concat",
                shape_label(self.rows, self.cols),
                shape_label(other.rows, other.cols),
            ));
        }
        let (l, r) = unify_operands(&self.entries, &other.entries)?;
        let cols = self.cols + other.cols;
        let mut entries = Vec::with_capacity(self.rows * cols);
        for i in 0..self.rows {
            entries.extend_from_slice(&l[i * self.cols..(i + 1) * self.cols]);
            entries.extend_from_slice(&r[i * other.cols..(i + 1) * other.cols]);
        }
        Ok(Matrix::from_entries(self.rows, cols, entries))
    }

    /// Stacks the rows of `other` below the rows of `self`.
    pub fn block_combine<R: RingElement>(&self, other: &Matrix<R>) -> Result<Matrix<T::Unified>>
    where
        T: Unify<R>,
    {
        if self.cols != other.cols {
            return Err(AlgebraError::shape(
                "block_combine",
                shape_label(self.rows, self.cols),
                shape_label(other.rows, other.cols),
            ));
        }
        let (l, r) = unify_operands(&self.entries, &other.entries)?;
        let mut entries = l.into_owned();
        entries.extend_from_slice(&r);
        Ok(Matrix::from_entries(self.rows + other.rows, self.cols, entries))
    }

    pub fn transpose(&self) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                entries.push(self[(i, j)].clone());
            }
        }
        Self::from_entries(self.cols, self.rows, entries)
    }

    pub fn scale_by_polynomial<R: RingElement>(&self, p: &R) -> Result<Matrix<T::Unified>>
    where
        T: Unify<R>,
    {
        let (l, r) = unify_operands(&self.entries, slice::from_ref(p))?;
        let entries = T::Unified::matrix_product(&l, &r, l.len(), 1, 1);
        Ok(Matrix::from_entries(self.rows, self.cols, entries))
    }

    pub fn scale_by_int(&self, s: i64) -> Self {
        let entries = self.entries.iter().map(|e| e.scale_by_int(s)).collect();
        Self::from_entries(self.rows, self.cols, entries)
    }

    /// Cell (i, j) is the dot product of row i of `self` and column j of
    /// `other`. Each entry of both operands is transformed once.
    pub fn matrix_multiply<R: RingElement>(&self, other: &Matrix<R>) -> Result<Matrix<T::Unified>>
    where
        T: Unify<R>,
    {
        if self.cols != other.rows {
            return Err(AlgebraError::shape(
                "matrix_multiply",
                shape_label(self.rows, self.cols),
                shape_label(other.rows, other.cols),
            ));
        }
        let (l, r) = unify_operands(&self.entries, &other.entries)?;
        let entries = T::Unified::matrix_product(&l, &r, self.rows, self.cols, other.cols);
        Ok(Matrix::from_entries(self.rows, other.cols, entries))
    }

    pub fn vector_multiply<R: RingElement>(&self, v: &Vector<R>) -> Result<Vector<T::Unified>>
    where
        T: Unify<R>,
    {
        if self.cols != v.len() {
            return Err(AlgebraError::shape(
                "vector_multiply",
                shape_label(self.rows, self.cols),
                v.len(),
            ));
        }
        let (l, r) = unify_operands(&self.entries, v.entries())?;
        let entries = T::Unified::matrix_product(&l, &r, self.rows, self.cols, 1);
        Ok(Vector::from_entries(entries))
    }

    /// All coefficients, row-major, then coefficient order.
    pub fn listize(&self) -> Vec<i64> {
        self.entries.iter().flat_map(|e| e.listize()).collect()
    }

    pub fn infinite_norm(&self) -> u64 {
        self.entries.iter().map(|e| e.infinite_norm()).max().unwrap_or(0)
    }
}

impl Matrix<Polynomial> {
    pub fn promote(&self, ring: &Ring) -> Result<Matrix<ModPolynomial>> {
        let entries = self
            .entries
            .iter()
            .map(|e| e.promote(ring))
            .collect::<Result<Vec<_>>>()?;
        Ok(Matrix::from_entries(self.rows, self.cols, entries))
    }
}

impl Matrix<ModPolynomial> {
    pub fn to_polynomial(&self) -> Matrix<Polynomial> {
        let entries = self.entries.iter().map(|e| e.to_polynomial()).collect();
        Matrix::from_entries(self.rows, self.cols, entries)
    }

    pub fn to_centered_polynomial(&self) -> Matrix<Polynomial> {
        let entries = self.entries.iter().map(|e| e.to_centered_polynomial()).collect();
        Matrix::from_entries(self.rows, self.cols, entries)
    }

    pub fn random(ring: &Ring, rows: usize, cols: usize) -> Result<Self> {
        let mut res = Self::zero(ring, rows, cols)?;
        for e in res.entries.iter_mut() {
            *e = ModPolynomial::random(ring);
        }
        Ok(res)
    }

    pub fn random_with(
        ring: &Ring,
        rows: usize,
        cols: usize,
        sampler: &mut UniformSampler,
    ) -> Result<Self> {
        let mut res = Self::zero(ring, rows, cols)?;
        for e in res.entries.iter_mut() {
            *e = ModPolynomial::random_with(ring, sampler)?;
        }
        Ok(res)
    }
}

impl<T: RingElement> Neg for Matrix<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        let entries = self.entries.into_iter().map(|e| -e).collect();
        Self::from_entries(self.rows, self.cols, entries)
    }
}

impl<T: RingElement> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (i, j) = index;
        assert!(j < self.cols, "column {} out of range for {} columns", j, self.cols);
        &self.entries[i * self.cols + j]
    }
}

/// One bracketed row per line.
impl<T: RingElement> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.row_vector(i))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::utils::{small_coefficients, test_ring};
    use proptest::prelude::*;

    fn plain(rows: usize, cols: usize, seed: i64) -> Matrix<Polynomial> {
        let coefficients: Vec<Vec<Vec<i64>>> = (0..rows)
            .map(|i| {
                (0..cols)
                    .map(|j| vec![seed + (i * cols + j) as i64, 1 - (i as i64)])
                    .collect()
            })
            .collect();
        Matrix::from_coefficients(&16, &coefficients).unwrap()
    }

    #[test]
    fn test_add_shape_mismatch() {
        let a = plain(2, 3, 0);
        let b = plain(3, 2, 0);
        assert!(matches!(a.add(&b), Err(AlgebraError::ShapeMismatch { .. })));
        assert!(matches!(a.sub(&b), Err(AlgebraError::ShapeMismatch { .. })));
        assert!(matches!(a.concat(&b), Err(AlgebraError::ShapeMismatch { .. })));
        assert!(matches!(a.block_combine(&b), Err(AlgebraError::ShapeMismatch { .. })));
        assert!(matches!(a.matrix_multiply(&a), Err(AlgebraError::ShapeMismatch { .. })));
        assert!(a.matrix_multiply(&b).is_ok());

        let sum = a.add(&a).unwrap();
        assert_eq!(sum, a.scale_by_int(2));
    }

    #[test]
    fn test_constructors() {
        assert!(Matrix::<Polynomial>::new(vec![]).is_err());
        assert!(Matrix::<Polynomial>::new(vec![vec![]]).is_err());
        let ragged = vec![vec![Polynomial::zero(&4); 2], vec![Polynomial::zero(&4)]];
        assert!(matches!(
            Matrix::new(ragged),
            Err(AlgebraError::ShapeMismatch { .. })
        ));
        assert!(Matrix::<Polynomial>::zero(&4, 0, 2).is_err());

        let id = Matrix::<Polynomial>::identity(&4, 3).unwrap();
        assert_eq!(id[(1, 1)], Polynomial::one(&4));
        assert_eq!(id[(0, 2)], Polynomial::zero(&4));
        let a = plain(3, 2, 5);
        assert_eq!(id.matrix_multiply(&a).unwrap(), a);
    }

    #[test]
    fn test_concat_and_block_combine() {
        let a = plain(2, 3, 0);
        let b = plain(2, 1, 100);
        let c = a.concat(&b).unwrap();
        assert_eq!(c.shape(), (2, 4));
        assert_eq!(c[(1, 3)], b[(1, 0)]);
        assert_eq!(c[(1, 2)], a[(1, 2)]);

        let d = plain(4, 3, 50);
        let e = a.block_combine(&d).unwrap();
        assert_eq!(e.shape(), (6, 3));
        assert_eq!(e.row(5), d.row(3));
        assert_eq!(e.row(0), a.row(0));
    }

    #[test]
    fn test_multiply() {
        let ring = test_ring();
        // [[1, x], [0, 1]] * [[2], [x]] = [[2 + x^2], [x]]
        let m = Matrix::<Polynomial>::from_coefficients(
            &128,
            &[vec![vec![1], vec![0, 1]], vec![vec![0], vec![1]]],
        )
        .unwrap();
        let v = Vector::<Polynomial>::from_coefficients(&128, &[vec![2], vec![0, 1]]).unwrap();
        let res = m.vector_multiply(&v).unwrap();
        assert_eq!(res[0].coefficients()[..3], [2, 0, 1]);
        assert_eq!(res[1].coefficients()[..2], [0, 1]);

        let mq = m.promote(&ring).unwrap();
        let res_q = mq.vector_multiply(&v).unwrap();
        assert_eq!(res_q.to_polynomial(), res);

        let col = Matrix::from_rows(vec![
            Vector::new(vec![v[0].clone()]).unwrap(),
            Vector::new(vec![v[1].clone()]).unwrap(),
        ])
        .unwrap();
        let prod = mq.matrix_multiply(&col).unwrap();
        assert_eq!(prod.shape(), (2, 1));
        assert_eq!(prod.column_vector(0).to_polynomial(), res);

        let short = Vector::<Polynomial>::zero(&128, 3).unwrap();
        assert!(matches!(
            m.vector_multiply(&short),
            Err(AlgebraError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_matrix_multiply_agrees_across_kinds() {
        let ring = crate::math::params::RingParams::new(16, 97).build().unwrap();
        let a = plain(2, 3, 1);
        let b = plain(3, 2, -4);
        let exact = a.matrix_multiply(&b).unwrap();
        let fast = a.promote(&ring).unwrap().matrix_multiply(&b).unwrap();
        assert_eq!(fast, exact.promote(&ring).unwrap());
    }

    #[test]
    fn test_scale_and_norm() {
        let ring = test_ring();
        let m = Matrix::<ModPolynomial>::from_coefficients(
            &ring,
            &[vec![vec![1, -7]], vec![vec![3]]],
        )
        .unwrap();
        assert_eq!(m.infinite_norm(), 7);
        assert_eq!(m.listize().len(), 256);
        let x = Polynomial::from_coefficients(&128, &[0, 1]).unwrap();
        let shifted = m.scale_by_polynomial(&x).unwrap();
        assert_eq!(shifted.to_centered_polynomial()[(0, 0)].coefficients()[..3], [0, 1, -7]);
        assert_eq!((-m.clone()).scale_by_int(-1), m);
    }

    #[test]
    fn test_display() {
        let m = Matrix::<Polynomial>::from_coefficients(
            &4,
            &[vec![vec![1], vec![0, 1]], vec![vec![0], vec![2]]],
        )
        .unwrap();
        assert_eq!(m.to_string(), "[1, x]\n[0, 2]");
    }

    #[test]
    fn test_random() {
        let ring = test_ring();
        let m = Matrix::<ModPolynomial>::random(&ring, 2, 3).unwrap();
        assert_eq!(m.shape(), (2, 3));
        let mut s1 = ring.new_sampler(Some(&[4u8; 32][..])).unwrap();
        let mut s2 = ring.new_sampler(Some(&[4u8; 32][..])).unwrap();
        assert_eq!(
            Matrix::<ModPolynomial>::random_with(&ring, 2, 2, &mut s1).unwrap(),
            Matrix::<ModPolynomial>::random_with(&ring, 2, 2, &mut s2).unwrap()
        );
    }

    proptest! {
        #[test]
        fn test_transpose_involution(
            rows in 1usize..4,
            cols in 1usize..4,
            c in small_coefficients(4 * 4 * 8, 1000),
        ) {
            let coefficients: Vec<Vec<Vec<i64>>> = (0..rows)
                .map(|i| (0..cols).map(|j| c[(i * 4 + j) * 8..(i * 4 + j + 1) * 8].to_vec()).collect())
                .collect();
            let m = Matrix::<Polynomial>::from_coefficients(&8, &coefficients).unwrap();
            let t = m.transpose();
            prop_assert_eq!(t.shape(), (cols, rows));
            prop_assert_eq!(&t[(cols - 1, 0)], &m[(0, cols - 1)]);
            prop_assert_eq!(t.transpose(), m);
        }
    }
}
