//! Polynomial-ring algebra for lattice-based post-quantum primitives.
//!
//! Ring elements come in two kinds: [`Polynomial`] keeps exact integer
//! coefficients in Z[X]/(X^N+1), [`ModPolynomial`] lives in Zq[X]/(X^N+1) and
//! multiplies through the number-theoretic transform of its [`Ring`].
//! Vectors and matrices accept either kind and promote mixed operands.

pub mod error;
pub mod math;

pub use error::{AlgebraError, Result};
pub use math::{
    decompose::Rounding,
    element::{RingElement, Unify},
    encode::{Decode, Encode},
    matrix::Matrix,
    params::{RingParams, DILITHIUM, TEST_RING},
    poly::Polynomial,
    poly_q::ModPolynomial,
    ring::{NttRing, Ring, RingContext},
    sampling::UniformSampler,
    toeplitz::{big_toeplitz, toeplitz, BlockToeplitz},
    vector::Vector,
};
