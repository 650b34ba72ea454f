//! gpool selection: choosing k and the pool of candidate g-primes (spec
//! §4.3). Grounded on `original_source/src/poly.c` (`gpool_init`, `q[]`,
//! `pi`).

use rug::{ops::Pow, Integer};

use crate::error::FatalError;
use crate::factor_base::FactorBase;

/// Smallest q such that C(q, k) >= 10^6, for k = 1..=12 (`q[k-1]` holds the
/// value for that k). Beyond k = 12, q increases again, so 12 is the
/// largest k ever considered.
const Q: [u32; 12] = [1_000_000, 1414, 182, 71, 44, 33, 28, 25, 24, 23, 23, 23];

const C_NUM: u32 = 6;
const C_DEN: u32 = 10; // c = 0.6

/// Rough estimate of the prime-counting function pi(x) ~= x / ln(x).
fn pi(x: u32) -> u32 {
    if x < 2 {
        return 0;
    }
    (x as f64 / (x as f64).ln()) as u32
}

/// The pool of candidate g-primes from which each polygroup draws k
/// distinct values to multiply into A, plus the combinatorial cursor used
/// to advance across polygroups.
pub struct GPool {
    pub gvals: Vec<u32>,
    pub k: usize,
    /// 2^(k - 1): the number of B-values per polygroup.
    pub bvals: usize,
    /// Indices into `gvals` of the currently selected k-combination.
    frogs: Vec<usize>,
    exhausted: bool,
}

impl GPool {
    /// Selects k (the largest for which enough candidate g exist) and
    /// collects the pool of gvals, excluding any prime already in the
    /// factor base (see spec §9: A is not invertible mod such a prime).
    pub fn select(n: &Integer, m: u32, fb: &FactorBase) -> Result<GPool, FatalError> {
        let a_opt = (Integer::from(n * 2u32)).sqrt() / m;

        let mut k = 12usize;
        let (mut gmin, mut gmax) = (0u32, 0u32);
        loop {
            if k == 0 {
                return Err(FatalError::NoViableGpoolSize);
            }

            let lo = (Integer::from(&a_opt * C_NUM) / C_DEN).root(k as u32);
            let hi = (Integer::from(&a_opt * C_DEN) / C_NUM).root(k as u32);
            gmin = lo.to_u32().unwrap();
            gmax = hi.to_u32().unwrap();

            let approx_ng = pi(gmax).saturating_sub(pi(gmin)) / 2;
            if approx_ng >= Q[k - 1] {
                break;
            }
            k -= 1;
        }

        let ng = Q[k - 1] as usize;
        let center = a_opt.root(k as u32).to_u32().unwrap();
        log::info!(
            "gpool: k = {k}, center = {center}, range = [{gmin}, {gmax}], collecting {ng} primes"
        );

        let is_fb_member = |g: u32| fb.primes.binary_search(&g).is_ok();
        let admissible = |g: &Integer| -> bool {
            let gv = g.to_u32().unwrap();
            !is_fb_member(gv) && n.kronecker(g) == 1
        };

        let mut gvals = vec![0u32; ng];

        let mut g = Integer::from(center);
        let mut pos = ng / 2;
        while pos < ng {
            g = g.next_prime();
            if admissible(&g) {
                gvals[pos] = g.to_u32().unwrap();
                pos += 1;
            }
        }

        let mut g = Integer::from(center);
        let mut pos = ng / 2;
        loop {
            g = prev_prime(g);
            if admissible(&g) {
                pos -= 1;
                gvals[pos] = g.to_u32().unwrap();
                if pos == 0 {
                    break;
                }
            }
        }

        let bvals = 1usize << (k - 1);
        Ok(GPool { gvals, k, bvals, frogs: (0..k).collect(), exhausted: false })
    }

    /// The current k-combination of indices into `gvals`.
    pub fn current_frog(&self) -> &[usize] {
        &self.frogs
    }

    /// Advances to the next k-combination in lexicographic order, wrapping
    /// back to the first combination (with a warning) if the pool has been
    /// exhausted -- this never happens in practice, since `ng` is chosen so
    /// that `C(ng, k) >= 10^6`.
    pub fn advance(&mut self) {
        let (k, ng) = (self.k, self.gvals.len());
        let mut i = k;
        loop {
            if i == 0 {
                if !self.exhausted {
                    log::warn!("gpool combinations exhausted; restarting from the first frog");
                    self.exhausted = true;
                }
                self.frogs = (0..k).collect();
                return;
            }
            i -= 1;
            if self.frogs[i] != i + ng - k {
                self.frogs[i] += 1;
                for j in i + 1..k {
                    self.frogs[j] = self.frogs[j - 1] + 1;
                }
                return;
            }
        }
    }
}

/// Descends from `start` to the previous probable prime (GMP's
/// `rug::Integer` has no `prev_prime`, only `next_prime`).
fn prev_prime(mut x: Integer) -> Integer {
    x -= 1;
    while x.is_probably_prime(25) == rug::integer::IsPrime::No {
        x -= 1;
    }
    x
}
