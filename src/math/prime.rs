use rand::Rng;

pub(crate) fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut res = vec![];
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            res.push(i);
            n /= i;
            while n % i == 0 {
                n /= i;
            }
        }
        i += 1;
    }
    if n > 1 {
        res.push(n);
    }
    res
}

pub(crate) fn gcd(mut n: u64, mut m: u64) -> u64 {
    assert!(n != 0 && m != 0);
    while m != 0 {
        if m < n {
            std::mem::swap(&mut m, &mut n);
        }
        m %= n;
    }
    n
}

#[inline]
pub(crate) fn mul_mod(a: u64, b: u64, p: u64) -> u64 {
    ((a as u128 * b as u128) % p as u128) as u64
}

pub(crate) fn modpow(mut a: u64, mut n: u64, p: u64) -> u64 {
    let mut res = 1 % p;
    a %= p;
    while n > 0 {
        if n % 2 == 1 {
            res = mul_mod(res, a, p);
        }
        a = mul_mod(a, a, p);
        n /= 2;
    }
    res
}

/// Inverse of `a` modulo the prime `p`, via Fermat's little theorem.
pub(crate) fn inv_mod(a: u64, p: u64) -> Option<u64> {
    if a % p == 0 {
        return None;
    }
    Some(modpow(a, p - 2, p))
}

/// miller rabin prime test
pub(crate) fn is_prime(n: u64) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n % 2 == 0 || n == 1 || n == 0 {
        return false;
    }

    // n-1 = 2^k * q, with q odd
    let (k, q) = {
        let mut k = 0;
        let mut q = n - 1;
        while q % 2 == 0 {
            k += 1;
            q /= 2;
        }
        (k, q)
    };

    let mut rng = rand::thread_rng();
    for _ in 0..64 {
        let mut a = rng.gen_range(2..n - 1);

        if gcd(a, n) != 1 {
            return false;
        }

        a = modpow(a, q, n);
        if a == 1 || a == n - 1 {
            continue;
        }

        let mut unbroken = true;
        for _ in 1..k {
            a = mul_mod(a, a, n);
            if a == n - 1 {
                unbroken = false;
                break;
            }
        }
        if unbroken {
            return false;
        }
    }

    true
}

/// The multiplicative group Zp^{*} is cyclic; returns its smallest generator.
pub(crate) fn primitive_root(p: u64) -> u64 {
    let factors = prime_factors(p - 1);
    (2..p)
        .find(|&g| factors.iter().all(|&f| modpow(g, (p - 1) / f, p) != 1))
        .unwrap_or(1)
}

/// Primitive `order`-th root of unity mod p. Requires `order | p - 1`.
pub(crate) fn root_of_unity(order: u64, p: u64) -> u64 {
    modpow(primitive_root(p), (p - 1) / order, p)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_prime_factors() {
        let mut n = 128;
        assert_eq!(prime_factors(n), vec![2]);

        n = 182;
        assert_eq!(prime_factors(n), vec![2, 7, 13]);

        n = 1;
        assert_eq!(prime_factors(n), vec![]);

        n = 8380416;
        assert_eq!(prime_factors(n), vec![2, 3, 11, 31]);
    }

    #[test]
    fn test_is_prime() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(is_prime(5));
        assert!(!is_prime(9));
        assert!(is_prime(17));
        assert!(is_prime(10001231));
        assert!(is_prime(100001029));
        assert!(is_prime(8380417));
        assert!(is_prime(4294954753));
        assert!(!is_prime(4294954755));
        // 2^32 + 1 = 641 * 6700417
        assert!(!is_prime(4294967297));
    }

    #[test]
    fn test_generator() {
        assert_eq!(primitive_root(17), 3);
        assert_eq!(primitive_root(97), 5);
        assert_eq!(primitive_root(8380417), 10);
        assert_eq!(primitive_root(4294954753), 5);
    }

    #[test]
    fn test_root_of_unity() {
        let q = 8380417;
        let psi = root_of_unity(512, q);
        assert_eq!(modpow(psi, 512, q), 1);
        assert_eq!(modpow(psi, 256, q), q - 1);
    }

    #[test]
    fn test_inv_mod() {
        assert_eq!(inv_mod(4, 11), Some(3));
        assert_eq!(inv_mod(0, 11), None);
        let q = 4294954753;
        let a = 123456789;
        assert_eq!(mul_mod(a, inv_mod(a, q).unwrap(), q), 1);
    }
}
