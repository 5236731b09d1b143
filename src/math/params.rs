use std::sync::Arc;

use super::{
    ntt::is_power_of_two,
    prime::is_prime,
    ring::{NttRing, Ring},
};
use crate::error::{AlgebraError, Result};

/// Degree and modulus of a ring Zq[X]/(X^N+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingParams {
    pub degree: usize,
    pub modulus: u64,
}

/// Dilithium: N = 256, q = 2^23 - 2^13 + 1
pub const DILITHIUM: RingParams = RingParams::new(256, 8380417);

/// N = 128 with a 32-bit NTT-friendly prime
pub const TEST_RING: RingParams = RingParams::new(128, 4294954753);

/// Dropped bits in Dilithium's Power2Round.
pub const DILITHIUM_D: u32 = 13;
/// Low-order rounding range gamma2 = (q-1)/88 (Dilithium2).
pub const DILITHIUM_GAMMA2_88: u64 = (8380417 - 1) / 88;
/// Low-order rounding range gamma2 = (q-1)/32 (Dilithium3, Dilithium5).
pub const DILITHIUM_GAMMA2_32: u64 = (8380417 - 1) / 32;

const MAX_MODULUS: u64 = 1 << 62;

impl RingParams {
    pub const fn new(degree: usize, modulus: u64) -> Self {
        Self { degree, modulus }
    }

    pub fn validate(&self) -> Result<()> {
        let (n, q) = (self.degree, self.modulus);
        if n < 2 || !is_power_of_two(n) {
            return Err(AlgebraError::InvalidParameters(format!(
                "degree {} is not a power of two >= 2",
                n
            )));
        }
        if q <= 2 || q >= MAX_MODULUS {
            return Err(AlgebraError::InvalidParameters(format!(
                "modulus {} outside (2, 2^62)",
                q
            )));
        }
        if !is_prime(q) {
            return Err(AlgebraError::InvalidParameters(format!(
                "modulus {} is not prime",
                q
            )));
        }
        if (q - 1) % (2 * n as u64) != 0 {
            return Err(AlgebraError::InvalidParameters(format!(
                "modulus {} is not 1 mod 2N = {}",
                q,
                2 * n
            )));
        }
        Ok(())
    }

    /// Builds a shared ring handle backed by the negacyclic NTT.
    pub fn build(&self) -> Result<Ring> {
        Ok(Arc::new(NttRing::new(*self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_build() {
        let ring = DILITHIUM.build().unwrap();
        assert_eq!(ring.degree(), 256);
        assert_eq!(ring.modulus(), 8380417);

        let ring = TEST_RING.build().unwrap();
        assert_eq!(ring.degree(), 128);
        assert_eq!(ring.modulus(), 4294954753);

        assert_eq!(DILITHIUM_GAMMA2_88, 95232);
        assert_eq!(DILITHIUM_GAMMA2_32, 261888);
    }

    #[test]
    fn test_invalid_params() {
        for params in [
            RingParams::new(100, 8380417),
            RingParams::new(0, 8380417),
            RingParams::new(256, 8380419),
            RingParams::new(256, 2),
            // prime, but 3329 - 1 is not divisible by 512
            RingParams::new(256, 3329),
        ] {
            assert!(matches!(
                params.build(),
                Err(AlgebraError::InvalidParameters(_))
            ));
        }
        assert!(RingParams::new(8, 17).build().is_ok());
    }
}
