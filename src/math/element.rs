//! The operations shared by both polynomial kinds, and the compile-time rule
//! deciding which kind a mixed operation produces.

use std::{
    borrow::Cow,
    fmt::{Debug, Display},
    ops::{Add, Mul, Neg, Sub},
};

use super::{poly::Polynomial, poly_q::ModPolynomial};
use crate::error::{AlgebraError, Result};

/// An element of Z[X]/(X^N+1) or Zq[X]/(X^N+1).
///
/// The operator overloads panic when the operands live in different rings;
/// vectors and matrices check compatibility up front and report
/// [`AlgebraError::RingMismatch`] instead.
pub trait RingElement:
    Sized
    + Clone
    + Debug
    + Display
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<Output = Self>
{
    /// What is needed to build an element from scratch: the degree for
    /// [`Polynomial`], the ring handle for [`ModPolynomial`].
    type Context: Clone + Debug;

    fn context(&self) -> Self::Context;

    fn zero(ctx: &Self::Context) -> Self;

    fn one(ctx: &Self::Context) -> Self;

    /// Shorter lists are zero padded, longer ones are rejected.
    fn from_coefficients(ctx: &Self::Context, coefficients: &[i64]) -> Result<Self>;

    fn degree(&self) -> usize;

    fn is_compatible(&self, other: &Self) -> bool;

    fn ring_label(&self) -> String;

    fn scale_by_int(&self, s: i64) -> Self;

    fn listize(&self) -> Vec<i64>;

    fn infinite_norm(&self) -> u64;

    /// Row-major product of an `rows x inner` grid with an `inner x cols` grid.
    /// Callers guarantee non-empty, correctly sized, compatible inputs.
    fn matrix_product(
        lhs: &[Self],
        rhs: &[Self],
        rows: usize,
        inner: usize,
        cols: usize,
    ) -> Vec<Self> {
        let mut out = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let mut acc = Self::zero(&lhs[0].context());
                for k in 0..inner {
                    acc = acc + lhs[i * inner + k].clone() * rhs[k * cols + j].clone();
                }
                out.push(acc);
            }
        }
        out
    }
}

/// Operand promotion between the two kinds. Combining with a
/// [`ModPolynomial`] promotes the [`Polynomial`] side into the ring of the
/// modular operand, so the result is always a [`ModPolynomial`].
pub trait Unify<Rhs: RingElement>: RingElement {
    type Unified: RingElement + 'static;

    /// `witness` is the other operand; its first element supplies the ring.
    fn lift_left<'a>(lhs: &'a [Self], witness: &[Rhs]) -> Result<Cow<'a, [Self::Unified]>>;

    fn lift_right<'a>(rhs: &'a [Rhs], witness: &[Self]) -> Result<Cow<'a, [Self::Unified]>>;
}

fn promote_all<'a>(polys: &[Polynomial], witness: &[ModPolynomial]) -> Result<Cow<'a, [ModPolynomial]>> {
    let ring = witness
        .first()
        .ok_or_else(|| AlgebraError::InvalidArgument("no ring to promote into".to_string()))?
        .ring();
    let lifted = polys
        .iter()
        .map(|p| p.promote(ring))
        .collect::<Result<Vec<_>>>()?;
    Ok(Cow::Owned(lifted))
}

impl Unify<Polynomial> for Polynomial {
    type Unified = Polynomial;

    fn lift_left<'a>(lhs: &'a [Self], _witness: &[Polynomial]) -> Result<Cow<'a, [Polynomial]>> {
        Ok(Cow::Borrowed(lhs))
    }

    fn lift_right<'a>(rhs: &'a [Polynomial], _witness: &[Self]) -> Result<Cow<'a, [Polynomial]>> {
        Ok(Cow::Borrowed(rhs))
    }
}

impl Unify<ModPolynomial> for ModPolynomial {
    type Unified = ModPolynomial;

    fn lift_left<'a>(lhs: &'a [Self], _witness: &[ModPolynomial]) -> Result<Cow<'a, [ModPolynomial]>> {
        Ok(Cow::Borrowed(lhs))
    }

    fn lift_right<'a>(rhs: &'a [ModPolynomial], _witness: &[Self]) -> Result<Cow<'a, [ModPolynomial]>> {
        Ok(Cow::Borrowed(rhs))
    }
}

impl Unify<ModPolynomial> for Polynomial {
    type Unified = ModPolynomial;

    fn lift_left<'a>(lhs: &'a [Self], witness: &[ModPolynomial]) -> Result<Cow<'a, [ModPolynomial]>> {
        promote_all(lhs, witness)
    }

    fn lift_right<'a>(rhs: &'a [ModPolynomial], _witness: &[Self]) -> Result<Cow<'a, [ModPolynomial]>> {
        Ok(Cow::Borrowed(rhs))
    }
}

impl Unify<Polynomial> for ModPolynomial {
    type Unified = ModPolynomial;

    fn lift_left<'a>(lhs: &'a [Self], _witness: &[Polynomial]) -> Result<Cow<'a, [ModPolynomial]>> {
        Ok(Cow::Borrowed(lhs))
    }

    fn lift_right<'a>(rhs: &'a [Polynomial], witness: &[Self]) -> Result<Cow<'a, [ModPolynomial]>> {
        promote_all(rhs, witness)
    }
}

pub(crate) type UnifiedPair<'a, 'b, L, R> = (
    Cow<'a, [<L as Unify<R>>::Unified]>,
    Cow<'b, [<L as Unify<R>>::Unified]>,
);

/// Promotes both operand lists to a common kind and checks that they share a
/// ring.
pub(crate) fn unify_operands<'a, 'b, L, R>(lhs: &'a [L], rhs: &'b [R]) -> Result<UnifiedPair<'a, 'b, L, R>>
where
    L: Unify<R>,
    R: RingElement,
{
    let left = L::lift_left(lhs, rhs)?;
    let right = L::lift_right(rhs, lhs)?;
    if let (Some(l), Some(r)) = (left.first(), right.first()) {
        if !l.is_compatible(r) {
            return Err(AlgebraError::RingMismatch {
                left: l.ring_label(),
                right: r.ring_label(),
            });
        }
    }
    Ok((left, right))
}

/// Checks that every element of a non-empty list lives in the first one's ring.
pub(crate) fn check_compatible<T: RingElement>(entries: &[T]) -> Result<()> {
    let first = entries
        .first()
        .ok_or_else(|| AlgebraError::InvalidArgument("empty container".to_string()))?;
    match entries.iter().find(|e| !first.is_compatible(e)) {
        Some(e) => Err(AlgebraError::RingMismatch {
            left: first.ring_label(),
            right: e.ring_label(),
        }),
        None => Ok(()),
    }
}
