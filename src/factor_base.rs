//! Factor base construction (spec §4.1). Grounded on
//! `original_source/src/nsieve.c` (`era_sieve`, `extract`, `generate_fb`).

use rug::Integer;

use crate::mod_sqrt::mod_sqrt;

/// The ordered factor base FB, plus per-prime auxiliary data. Index 0 of
/// the implicit exponent-vector column space is reserved for the sign
/// (`-1`); `fb[i]` occupies column `i + 1`.
pub struct FactorBase {
    pub primes: Vec<u32>,
    /// `roots[i]^2 == N (mod primes[i])`. The other root is `primes[i] -
    /// roots[i]`.
    pub roots: Vec<u32>,
    /// `floor(log2(primes[i]))`, used for sieve scoring.
    pub logs: Vec<u8>,
}

fn fast_log2(p: u32) -> u8 {
    (31 - p.leading_zeros()) as u8
}

/// Sieve of Eratosthenes over `2..bound`, returning `true` at index `i` iff
/// `i + 2` is composite (mirrors `era_sieve`'s "0 is prime, 1 is composite"
/// convention, minus the bias of 2 since we index from 0 here).
fn sieve_composite(bound: u32) -> Vec<bool> {
    let bound = bound as usize;
    let mut composite = vec![false; bound.saturating_sub(2)];
    let mut skip = 2usize;
    while skip * skip < bound {
        if !composite[skip - 2] {
            let mut pos = 2 * skip;
            while pos < bound {
                composite[pos - 2] = true;
                pos += skip;
            }
        }
        skip += 1;
    }
    composite
}

impl FactorBase {
    /// Builds the factor base for N with primes up to `fb_bound`: 2 is
    /// unconditionally admitted (N is always a QR mod 2); every other prime
    /// p is retained iff the Kronecker symbol (N/p) = 1.
    pub fn build(n: &Integer, fb_bound: u32) -> FactorBase {
        let composite = sieve_composite(fb_bound);

        let mut primes = Vec::new();
        for (i, &is_composite) in composite.iter().enumerate() {
            if is_composite {
                continue;
            }
            let p = (i + 2) as u32;
            if p == 2 || n.kronecker(&Integer::from(p)) == 1 {
                primes.push(p);
            }
        }

        let mut roots = Vec::with_capacity(primes.len());
        let mut logs = Vec::with_capacity(primes.len());
        for &p in &primes {
            let root = if p == 2 {
                (n.mod_u(2) as u64) & 1
            } else {
                let a = n.mod_u(p as u32) as u64;
                mod_sqrt(a, p as u64)
            };
            roots.push(root as u32);
            logs.push(fast_log2(p));
        }

        log::info!(
            "built factor base of {} primes up to bound {fb_bound} (largest: {})",
            primes.len(),
            primes.last().copied().unwrap_or(0)
        );

        FactorBase { primes, roots, logs }
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_retained_prime_is_qr_or_two() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 2000);
        for &p in &fb.primes {
            if p != 2 {
                assert_eq!(n.clone().kronecker(&Integer::from(p)), 1);
            }
        }
    }

    #[test]
    fn roots_square_to_n_mod_p() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 2000);
        for i in 0..fb.len() {
            let p = fb.primes[i] as u64;
            let r = fb.roots[i] as u64;
            let n_mod_p = n.mod_u(p as u32) as u64;
            assert_eq!((r * r) % p, n_mod_p);
        }
    }

    #[test]
    fn two_is_always_admitted() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 10);
        assert_eq!(fb.primes[0], 2);
    }

    #[test]
    fn logs_are_floor_log2() {
        assert_eq!(fast_log2(2), 1);
        assert_eq!(fast_log2(3), 1);
        assert_eq!(fast_log2(4), 2);
        assert_eq!(fast_log2(127), 6);
        assert_eq!(fast_log2(128), 7);
    }
}
