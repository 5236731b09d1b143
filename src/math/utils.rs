use proptest::prelude::*;

use super::{params::TEST_RING, ring::Ring};

/// The N = 128, q = 4294954753 ring used throughout the tests.
pub(crate) fn test_ring() -> Ring {
    TEST_RING.build().unwrap()
}

pub(crate) fn small_coefficients(len: usize, bound: i64) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-bound..=bound, len)
}
