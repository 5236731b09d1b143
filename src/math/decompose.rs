//! Dilithium-style rounding: Power2Round, Decompose, HighBits/LowBits and the
//! rejection-sampling norm check, coefficient-wise and lifted to containers.

use super::{
    element::RingElement, matrix::Matrix, poly::Polynomial, poly_q::ModPolynomial, vector::Vector,
};
use crate::error::{AlgebraError, Result};

/// `x mod m` in [0, m). `m` must be positive.
pub fn positive_mod(x: i64, m: i64) -> i64 {
    x.rem_euclid(m)
}

/// `x mod m` in (-m/2, m/2]. `m` must be positive.
pub fn centered_mod(x: i64, m: i64) -> i64 {
    let r = positive_mod(x, m);
    if r > m / 2 {
        r - m
    } else {
        r
    }
}

/// Splits `r` into `(r1, r0)` with `r = r1 * alpha + r0 (mod q)` and `r0`
/// centered modulo `alpha`. When `r - r0 = q - 1` the high part wraps to 0
/// and the low part absorbs the carry.
pub fn decompose(r: i64, alpha: i64, q: i64) -> Result<(i64, i64)> {
    if alpha < 1 || q < 2 {
        return Err(AlgebraError::InvalidArgument(format!(
            "decompose needs alpha >= 1 and q >= 2, got alpha = {}, q = {}",
            alpha, q
        )));
    }
    let r = positive_mod(r, q);
    let r0 = centered_mod(r, alpha);
    let r1 = r - r0;
    if r1 == q - 1 {
        return Ok((0, r0 - 1));
    }
    if r1 % alpha != 0 {
        return Err(AlgebraError::InvalidArgument(format!(
            "{} is not a multiple of {}",
            r1, alpha
        )));
    }
    Ok((r1 / alpha, r0))
}

pub fn high_bits(r: i64, alpha: i64, q: i64) -> Result<i64> {
    Ok(decompose(r, alpha, q)?.0)
}

pub fn low_bits(r: i64, alpha: i64, q: i64) -> Result<i64> {
    Ok(decompose(r, alpha, q)?.1)
}

/// `(r1, r0)` with `x = r1 * 2^d + r0` exactly and `r0` in (-2^(d-1), 2^(d-1)].
pub fn power2round(x: i64, d: u32) -> Result<(i64, i64)> {
    if !(1..=62).contains(&d) {
        return Err(AlgebraError::InvalidArgument(format!(
            "power2round needs 1 <= d <= 62, got {}",
            d
        )));
    }
    let m = 1i64 << d;
    let r0 = centered_mod(x, m);
    let r1 = ((x as i128 - r0 as i128) >> d) as i64;
    Ok((r1, r0))
}

/// True iff the centered absolute value of `n mod q` is at least `bound`.
/// The absolute value is taken without branching on the sign.
pub fn check_norm_bound(n: i64, bound: i64, q: i64) -> bool {
    let half = (q - 1) / 2;
    let mut x = half - positive_mod(n, q);
    x ^= x >> 63;
    x = half - x;
    x >= bound
}

/// Rounding primitives applied to every coefficient, preserving shape.
/// Results are exact signed integers, so the output is always built from
/// [`Polynomial`]s.
pub trait Rounding: Sized {
    type Output;

    fn power2round(&self, d: u32) -> Result<(Self::Output, Self::Output)>;

    fn decompose(&self, alpha: i64, q: i64) -> Result<(Self::Output, Self::Output)>;

    fn high_bits(&self, alpha: i64, q: i64) -> Result<Self::Output> {
        Ok(self.decompose(alpha, q)?.0)
    }

    fn low_bits(&self, alpha: i64, q: i64) -> Result<Self::Output> {
        Ok(self.decompose(alpha, q)?.1)
    }

    /// True if any coefficient fails [`check_norm_bound`].
    fn exceeds_norm_bound(&self, bound: i64, q: i64) -> Result<bool>;
}

fn split_coefficients<F>(coefficients: &[i64], f: F) -> Result<(Polynomial, Polynomial)>
where
    F: Fn(i64) -> Result<(i64, i64)>,
{
    let (high, low): (Vec<i64>, Vec<i64>) = coefficients
        .iter()
        .map(|&c| f(c))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .unzip();
    Ok((Polynomial::new(high), Polynomial::new(low)))
}

impl Rounding for Polynomial {
    type Output = Polynomial;

    fn power2round(&self, d: u32) -> Result<(Polynomial, Polynomial)> {
        split_coefficients(self.coefficients(), |c| power2round(c, d))
    }

    fn decompose(&self, alpha: i64, q: i64) -> Result<(Polynomial, Polynomial)> {
        split_coefficients(self.coefficients(), |c| decompose(c, alpha, q))
    }

    fn exceeds_norm_bound(&self, bound: i64, q: i64) -> Result<bool> {
        Ok(self
            .coefficients()
            .iter()
            .any(|&c| check_norm_bound(c, bound, q)))
    }
}

/// Works on the representatives in [0, q) of the element's own ring.
impl Rounding for ModPolynomial {
    type Output = Polynomial;

    fn power2round(&self, d: u32) -> Result<(Polynomial, Polynomial)> {
        self.to_polynomial().power2round(d)
    }

    fn decompose(&self, alpha: i64, q: i64) -> Result<(Polynomial, Polynomial)> {
        check_ring_modulus(self, q)?;
        self.to_polynomial().decompose(alpha, q)
    }

    fn exceeds_norm_bound(&self, bound: i64, q: i64) -> Result<bool> {
        check_ring_modulus(self, q)?;
        self.to_polynomial().exceeds_norm_bound(bound, q)
    }
}

fn check_ring_modulus(p: &ModPolynomial, q: i64) -> Result<()> {
    if q < 0 || q as u64 != p.modulus() {
        return Err(AlgebraError::InvalidArgument(format!(
            "modulus {} differs from the ring modulus {}",
            q,
            p.modulus()
        )));
    }
    Ok(())
}

type Split<T> = (Vec<T>, Vec<T>);

fn any_exceeds<T: Rounding>(entries: &[T], bound: i64, q: i64) -> Result<bool> {
    for e in entries {
        if e.exceeds_norm_bound(bound, q)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn split_all<T, F>(entries: &[T], f: F) -> Result<Split<Polynomial>>
where
    F: Fn(&T) -> Result<(Polynomial, Polynomial)>,
{
    Ok(entries.iter().map(f).collect::<Result<Vec<_>>>()?.into_iter().unzip())
}

impl<T> Rounding for Vector<T>
where
    T: RingElement + Rounding<Output = Polynomial>,
{
    type Output = Vector<Polynomial>;

    fn power2round(&self, d: u32) -> Result<(Self::Output, Self::Output)> {
        let (high, low) = split_all(self.entries(), |e| e.power2round(d))?;
        Ok((Vector::from_entries(high), Vector::from_entries(low)))
    }

    fn decompose(&self, alpha: i64, q: i64) -> Result<(Self::Output, Self::Output)> {
        let (high, low) = split_all(self.entries(), |e| e.decompose(alpha, q))?;
        Ok((Vector::from_entries(high), Vector::from_entries(low)))
    }

    fn exceeds_norm_bound(&self, bound: i64, q: i64) -> Result<bool> {
        any_exceeds(self.entries(), bound, q)
    }
}

impl<T> Rounding for Matrix<T>
where
    T: RingElement + Rounding<Output = Polynomial>,
{
    type Output = Matrix<Polynomial>;

    fn power2round(&self, d: u32) -> Result<(Self::Output, Self::Output)> {
        let (rows, cols) = self.shape();
        let (high, low) = split_all(self.entries(), |e| e.power2round(d))?;
        Ok((
            Matrix::from_entries(rows, cols, high),
            Matrix::from_entries(rows, cols, low),
        ))
    }

    fn decompose(&self, alpha: i64, q: i64) -> Result<(Self::Output, Self::Output)> {
        let (rows, cols) = self.shape();
        let (high, low) = split_all(self.entries(), |e| e.decompose(alpha, q))?;
        Ok((
            Matrix::from_entries(rows, cols, high),
            Matrix::from_entries(rows, cols, low),
        ))
    }

    fn exceeds_norm_bound(&self, bound: i64, q: i64) -> Result<bool> {
        any_exceeds(self.entries(), bound, q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::params::{DILITHIUM, DILITHIUM_D, DILITHIUM_GAMMA2_32, DILITHIUM_GAMMA2_88};
    use proptest::prelude::*;

    const Q: i64 = 8380417;

    #[test]
    fn test_mods() {
        assert_eq!(positive_mod(-1, 17), 16);
        assert_eq!(positive_mod(35, 17), 1);
        assert_eq!(centered_mod(9, 17), -8);
        assert_eq!(centered_mod(8, 17), 8);
        assert_eq!(centered_mod(8, 16), 8);
        assert_eq!(centered_mod(9, 16), -7);
        assert_eq!(centered_mod(i64::MIN, 16), 0);
    }

    #[test]
    fn test_decompose_boundary() {
        let alpha = 2 * DILITHIUM_GAMMA2_88 as i64;
        // q - 1 is a multiple of alpha, so r0 = 0 and r1 = q - 1 wraps
        assert_eq!(decompose(Q - 1, alpha, Q).unwrap(), (0, -1));
        assert_eq!(high_bits(Q - 1, alpha, Q).unwrap(), 0);
        assert_eq!(low_bits(Q - 1, alpha, Q).unwrap(), -1);

        // the top bucket edge still rounds down, one past it wraps to 0
        assert_eq!(decompose(Q - 1 - alpha / 2, alpha, Q).unwrap(), (43, alpha / 2));
        assert_eq!(decompose(Q - alpha / 2, alpha, Q).unwrap(), (0, -alpha / 2));

        assert_eq!(decompose(alpha, alpha, Q).unwrap(), (1, 0));
        assert_eq!(decompose(alpha + 5, alpha, Q).unwrap(), (1, 5));
        assert_eq!(decompose(-1, alpha, Q).unwrap(), (0, -1));
        assert!(decompose(5, 0, Q).is_err());
        assert!(decompose(5, 4, 1).is_err());
    }

    #[test]
    fn test_power2round() {
        assert_eq!(power2round(0, 13).unwrap(), (0, 0));
        assert_eq!(power2round(4096, 13).unwrap(), (0, 4096));
        assert_eq!(power2round(4097, 13).unwrap(), (1, -4095));
        assert_eq!(power2round(-4096, 13).unwrap(), (-1, 4096));
        assert_eq!(power2round(i64::MAX, 1).unwrap(), ((1 << 62) - 1, 1));
        assert!(power2round(5, 0).is_err());
        assert!(power2round(5, 63).is_err());
    }

    #[test]
    fn test_check_norm_bound() {
        assert!(check_norm_bound(10, 10, Q));
        assert!(!check_norm_bound(9, 10, Q));
        assert!(check_norm_bound(-10, 10, Q));
        assert!(check_norm_bound(Q - 10, 10, Q));
        assert!(!check_norm_bound(Q - 9, 10, Q));
        assert!(check_norm_bound((Q - 1) / 2, (Q - 1) / 2, Q));
    }

    #[test]
    fn test_check_norm_bound_wide_modulus() {
        // centered values just above 2^31 in magnitude need the full 64-bit shift
        let q = (1i64 << 40) + 15;
        let v = (1i64 << 31) + 5;
        assert!(check_norm_bound(v, 1 << 31, q));
        assert!(check_norm_bound(v, v, q));
        assert!(!check_norm_bound(v, v + 1, q));
        assert!(check_norm_bound(q - v, v, q));
        assert!(!check_norm_bound(q - v, v + 1, q));
        assert!(check_norm_bound(-v, v, q));
        assert!(!check_norm_bound(1 << 30, 1 << 31, q));
    }

    #[test]
    fn test_lifted_rounding() {
        let ring = DILITHIUM.build().unwrap();
        let alpha = 2 * DILITHIUM_GAMMA2_32 as i64;
        let p = ModPolynomial::from_coefficients(&ring, &[Q - 1, alpha + 3, 8191, -1]).unwrap();

        let (high, low) = p.decompose(alpha, Q).unwrap();
        assert_eq!(high.coefficients()[..4], [0, 1, 0, 0]);
        assert_eq!(low.coefficients()[..4], [-1, 3, 8191, -1]);
        assert!(p.decompose(alpha, 17).is_err());

        let (r1, r0) = p.power2round(DILITHIUM_D).unwrap();
        for ((&c, &h), &l) in p.coefficients().iter().zip(r1.coefficients()).zip(r0.coefficients()) {
            assert_eq!(c as i64, (h << DILITHIUM_D) + l);
        }

        let v = Vector::new(vec![p.clone(), ModPolynomial::zero(&ring)]).unwrap();
        let (vh, vl) = v.decompose(alpha, Q).unwrap();
        assert_eq!(vh[0], high);
        assert_eq!(vl[1], Polynomial::zero(&256));
        assert_eq!(v.high_bits(alpha, Q).unwrap(), vh);
        assert_eq!(v.low_bits(alpha, Q).unwrap(), vl);
        assert!(v.exceeds_norm_bound(alpha + 3, Q).unwrap());
        assert!(!v.exceeds_norm_bound(alpha + 4, Q).unwrap());
        assert!(matches!(
            v.exceeds_norm_bound(alpha + 3, 17),
            Err(AlgebraError::InvalidArgument(_))
        ));
        assert!(p.exceeds_norm_bound(1, -Q).is_err());
        assert!(!p.to_centered_polynomial().exceeds_norm_bound(alpha + 4, Q).unwrap());

        let m = Matrix::new(vec![vec![p.clone()], vec![p]]).unwrap();
        let (mh, _) = m.power2round(DILITHIUM_D).unwrap();
        assert_eq!(mh.shape(), (2, 1));
        assert_eq!(mh[(1, 0)], r1);
    }

    proptest! {
        #[test]
        fn test_decomposition_law(r in 0..Q, k in prop::sample::select(vec![88i64, 32])) {
            let alpha = 2 * ((Q - 1) / k);
            let (r1, r0) = decompose(r, alpha, Q).unwrap();
            prop_assert_eq!(positive_mod(r1 * alpha + r0, Q), r);
            prop_assert!(r0 > -alpha / 2 - 1 && r0 <= alpha / 2);
            prop_assert!(r1 >= 0 && r1 < (Q - 1) / alpha);
        }

        #[test]
        fn test_power2round_exact(x in any::<i64>(), d in 1u32..=62) {
            let (r1, r0) = power2round(x, d).unwrap();
            let half = 1i128 << (d - 1);
            prop_assert_eq!(x as i128, ((r1 as i128) << d) + r0 as i128);
            prop_assert!((r0 as i128) > -half && (r0 as i128) <= half);
        }

        #[test]
        fn test_norm_bound_matches_centered(n in any::<i64>(), bound in 0i64..(1 << 40)) {
            let q = (1i64 << 41) + 21;
            let centered = centered_mod(n, q).abs();
            prop_assert_eq!(check_norm_bound(n, bound, q), centered >= bound);
        }
    }
}
