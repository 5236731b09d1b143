//! Multiplication by a fixed ring element as an integer matrix.
//!
//! For f in Z[X]/(X^N+1) the negacyclic Toeplitz matrix F has
//! `F[i][j] = f[i-j]` on and below the diagonal and `-f[N+i-j]` above it, so
//! that `F * coeffs(g) = coeffs(f * g)`.

use super::{element::RingElement, matrix::Matrix};
use crate::error::{AlgebraError, Result};

#[inline]
fn negacyclic_entry(f: &[i64], i: usize, j: usize) -> i64 {
    if j > i {
        f[f.len() + i - j].wrapping_neg()
    } else {
        f[i - j]
    }
}

/// The N x N negacyclic Toeplitz matrix of `f`.
pub fn toeplitz<T: RingElement>(f: &T) -> Vec<Vec<i64>> {
    let coefficients = f.listize();
    let n = coefficients.len();
    (0..n)
        .map(|i| (0..n).map(|j| negacyclic_entry(&coefficients, i, j)).collect())
        .collect()
}

/// Plain integer matrix transpose.
pub fn transpose(m: &[Vec<i64>]) -> Vec<Vec<i64>> {
    let cols = m.first().map(|r| r.len()).unwrap_or(0);
    (0..cols)
        .map(|j| m.iter().map(|row| row[j]).collect())
        .collect()
}

/// The (m*N) x (n*N) embedding of the top-left m x n block of a ring matrix,
/// kept as per-block coefficient lists. Entries are computed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockToeplitz {
    block_rows: usize,
    block_cols: usize,
    degree: usize,
    blocks: Vec<Vec<i64>>,
}

impl BlockToeplitz {
    pub fn new<T: RingElement>(a: &Matrix<T>, m: usize, n: usize) -> Result<Self> {
        if m == 0 || n == 0 || m > a.rows() || n > a.cols() {
            return Err(AlgebraError::shape(
                "toeplitz",
                format!("{}x{}", a.rows(), a.cols()),
                format!("{}x{}", m, n),
            ));
        }
        let mut blocks = Vec::with_capacity(m * n);
        for i in 0..m {
            for j in 0..n {
                blocks.push(a[(i, j)].listize());
            }
        }
        Ok(Self {
            block_rows: m,
            block_cols: n,
            degree: a[(0, 0)].degree(),
            blocks,
        })
    }

    pub fn rows(&self) -> usize {
        self.block_rows * self.degree
    }

    pub fn cols(&self) -> usize {
        self.block_cols * self.degree
    }

    /// Row `r` belongs to ring row `r / N`, coefficient `r % N`; columns alike.
    pub fn entry(&self, r: usize, c: usize) -> i64 {
        let n = self.degree;
        let block = &self.blocks[(r / n) * self.block_cols + c / n];
        negacyclic_entry(block, r % n, c % n)
    }

    /// Matrix-vector product modulo q, without materialising the matrix.
    /// The result has entries in [0, q).
    pub fn apply(&self, v: &[i64], q: i64) -> Result<Vec<i64>> {
        if v.len() != self.cols() {
            return Err(AlgebraError::shape("toeplitz apply", self.cols(), v.len()));
        }
        if q < 1 {
            return Err(AlgebraError::InvalidArgument(format!("modulus {} must be positive", q)));
        }
        let n = self.degree;
        let q = q as i128;
        let mut out = Vec::with_capacity(self.rows());
        for bi in 0..self.block_rows {
            for i in 0..n {
                let mut acc = 0i128;
                for bj in 0..self.block_cols {
                    let block = &self.blocks[bi * self.block_cols + bj];
                    let segment = &v[bj * n..(bj + 1) * n];
                    for (j, &x) in segment.iter().enumerate() {
                        acc = (acc + negacyclic_entry(block, i, j) as i128 * x as i128) % q;
                    }
                }
                out.push(acc.rem_euclid(q) as i64);
            }
        }
        Ok(out)
    }

    pub fn to_dense(&self) -> Vec<Vec<i64>> {
        (0..self.rows())
            .map(|r| (0..self.cols()).map(|c| self.entry(r, c)).collect())
            .collect()
    }
}

/// Dense (m*N) x (n*N) embedding whose (I, J) block is `toeplitz(a[I][J])`.
pub fn big_toeplitz<T: RingElement>(a: &Matrix<T>, m: usize, n: usize) -> Result<Vec<Vec<i64>>> {
    Ok(BlockToeplitz::new(a, m, n)?.to_dense())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{
        decompose::positive_mod,
        params::RingParams,
        poly::Polynomial,
        poly_q::ModPolynomial,
        utils::small_coefficients,
        vector::Vector,
    };
    use proptest::prelude::*;

    fn mat_vec(m: &[Vec<i64>], v: &[i64]) -> Vec<i64> {
        m.iter()
            .map(|row| row.iter().zip(v.iter()).map(|(a, b)| a * b).sum())
            .collect()
    }

    #[test]
    fn test_toeplitz_layout() {
        let f = Polynomial::new(vec![1, 2, 3, 4]);
        let t = toeplitz(&f);
        assert_eq!(
            t,
            vec![
                vec![1, -4, -3, -2],
                vec![2, 1, -4, -3],
                vec![3, 2, 1, -4],
                vec![4, 3, 2, 1],
            ]
        );
        assert_eq!(transpose(&transpose(&t)), t);
        assert_eq!(transpose(&t)[0], vec![1, 2, 3, 4]);
        assert!(transpose(&[]).is_empty());
    }

    #[test]
    fn test_big_toeplitz() {
        let a = Matrix::<Polynomial>::from_coefficients(
            &4,
            &[
                vec![vec![1, 2], vec![0, 1], vec![9]],
                vec![vec![5], vec![1, 1, 1, 1], vec![9]],
            ],
        )
        .unwrap();
        let big = big_toeplitz(&a, 2, 2).unwrap();
        assert_eq!(big.len(), 8);
        assert_eq!(big[0].len(), 8);
        let t01 = toeplitz(&a[(0, 1)]);
        let t10 = toeplitz(&a[(1, 0)]);
        for i in 0..4 {
            assert_eq!(big[i][4..], t01[i][..]);
            assert_eq!(big[4 + i][..4], t10[i][..]);
        }

        // block products match ring products
        let v = Vector::<Polynomial>::from_coefficients(&4, &[vec![1, -1, 2], vec![0, 3]]).unwrap();
        let sub = Matrix::new(vec![a.row(0)[..2].to_vec(), a.row(1)[..2].to_vec()]).unwrap();
        let expected = sub.vector_multiply(&v).unwrap().listize();
        let lazy = BlockToeplitz::new(&a, 2, 2).unwrap();
        assert_eq!(mat_vec(&big, &v.listize()), expected);
        let q = 1_000_003;
        let reduced: Vec<i64> = expected.iter().map(|&x| positive_mod(x, q)).collect();
        assert_eq!(lazy.apply(&v.listize(), q).unwrap(), reduced);

        assert!(matches!(
            big_toeplitz(&a, 3, 1),
            Err(AlgebraError::ShapeMismatch { .. })
        ));
        assert!(lazy.apply(&[1, 2, 3], q).is_err());
    }

    proptest! {
        #[test]
        fn test_toeplitz_multiplies(
            f in small_coefficients(16, 96),
            g in small_coefficients(16, 96),
        ) {
            let ring = RingParams::new(16, 97).build().unwrap();
            let q = ring.modulus() as i64;
            let f = ModPolynomial::from_coefficients(&ring, &f).unwrap();
            let g = ModPolynomial::from_coefficients(&ring, &g).unwrap();
            let product = mat_vec(&toeplitz(&f), &g.listize());
            let reduced: Vec<i64> = product.iter().map(|&x| positive_mod(x, q)).collect();
            prop_assert_eq!(reduced, (f * g).listize());
        }
    }
}
