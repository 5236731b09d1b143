use super::prime::{inv_mod, mul_mod, root_of_unity};

pub(crate) fn is_power_of_two(n: usize) -> bool {
    n != 0 && 1 << (usize::BITS - 1 - n.leading_zeros()) == n
}

/// bit reversal
/// the length of x should be a power of two
pub(crate) fn bitrev<T: Copy>(x: &mut [T]) {
    let n = x.len();
    if !is_power_of_two(n) {
        panic!("The length n of x must be a power of two");
    }

    let mut rho = vec![0usize; n];
    let mut k = 2;

    while k <= n {
        // compute rho_k(0: k-1)
        for i in 0..k / 2 {
            rho[i + k / 2] = 2 * rho[i] + 1;
            rho[i] = 2 * rho[i];
        }
        k *= 2;
    }

    for i in 0..n {
        if i < rho[i] {
            x.swap(i, rho[i]);
        }
    }
}

/// Computes the cyclic number-theoretic transform of x in place modulo q,
/// where `pow_table[i] = w^i` for a primitive n-th root of unity w.
/// The length of x must be a power of 2.
pub(crate) fn ntt_radix2(x: &mut [u64], pow_table: &[u64], q: u64) {
    let n = x.len();
    if !is_power_of_two(n) {
        panic!("Length is not a power of 2");
    }

    bitrev(x);

    let mut k = 2;
    while k <= n {
        for r in 0..n / k {
            for j in 0..k / 2 {
                let tau = mul_mod(pow_table[n / k * j], x[r * k + j + k / 2], q);
                let u = x[r * k + j];
                x[r * k + j + k / 2] = if u >= tau { u - tau } else { u + q - tau };
                x[r * k + j] = (u + tau) % q;
            }
        }
        k *= 2;
    }
}

pub(crate) fn generate_power_table(root: u64, n: usize, q: u64) -> Vec<u64> {
    let mut pow_table = vec![0u64; n];
    let mut temp = 1 % q;
    for entry in pow_table.iter_mut() {
        *entry = temp;
        temp = mul_mod(temp, root, q);
    }
    pow_table
}

/// Precomputed tables for the negacyclic transform of Zq[X]/(X^n+1).
///
/// With psi a primitive 2n-th root of unity, twisting the input by psi^i turns
/// multiplication modulo X^n + 1 into a cyclic convolution, which the radix-2
/// transform with w = psi^2 diagonalises.
#[derive(Debug, Clone)]
pub(crate) struct NttTables {
    n: usize,
    q: u64,
    n_inv: u64,
    psi_pows: Vec<u64>,
    psi_inv_pows: Vec<u64>,
    omega_pows: Vec<u64>,
    omega_inv_pows: Vec<u64>,
}

impl NttTables {
    /// Requires n a power of two and q a prime with q = 1 mod 2n.
    pub(crate) fn new(n: usize, q: u64) -> Self {
        let psi = root_of_unity(2 * n as u64, q);
        let psi_inv = inv_mod(psi, q).unwrap_or(1);
        let omega = mul_mod(psi, psi, q);
        let omega_inv = mul_mod(psi_inv, psi_inv, q);
        Self {
            n,
            q,
            n_inv: inv_mod(n as u64 % q, q).unwrap_or(1),
            psi_pows: generate_power_table(psi, n, q),
            psi_inv_pows: generate_power_table(psi_inv, n, q),
            omega_pows: generate_power_table(omega, n / 2, q),
            omega_inv_pows: generate_power_table(omega_inv, n / 2, q),
        }
    }

    pub(crate) fn forward(&self, x: &mut [u64]) {
        debug_assert_eq!(x.len(), self.n);
        for (c, &t) in x.iter_mut().zip(self.psi_pows.iter()) {
            *c = mul_mod(*c, t, self.q);
        }
        ntt_radix2(x, &self.omega_pows, self.q);
    }

    pub(crate) fn inverse(&self, x: &mut [u64]) {
        debug_assert_eq!(x.len(), self.n);
        ntt_radix2(x, &self.omega_inv_pows, self.q);
        for (c, &t) in x.iter_mut().zip(self.psi_inv_pows.iter()) {
            *c = mul_mod(mul_mod(*c, self.n_inv, self.q), t, self.q);
        }
    }
}
