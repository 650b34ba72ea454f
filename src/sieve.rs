//! The self-initializing line sieve: for one `Poly`, scores the window
//! `[-M, M]` by an approximate log-sum, then trial-divides the candidates
//! that cross threshold. This is the "external sieve" collaborator spec §6
//! describes the core as consuming (fb, roots, logs, ainverses, poly, M,
//! T) -- one of the four core subsystems it is not, but the crate needs a
//! working implementation of it to run end to end. Grounded on the
//! teacher's `src/nfs.rs` (`line_sieve`, the trial-division loop), adapted
//! from a two-variable (a, b) linear sieve to a single-polynomial MPQS
//! offset sieve.

use rug::Integer;

use crate::factor_base::FactorBase;
use crate::params::Params;
use crate::poly::Poly;
use crate::polygroup::PolyGroup;

/// A smooth candidate found by the sieve, not yet assigned an index into
/// the engine's relation arena.
pub struct Found {
    pub x: i64,
    pub negative: bool,
    pub factors: Vec<(u32, u8)>,
    /// 1 for a full relation; the surviving prime <= lp_bound for a partial.
    pub cofactor: u64,
}

/// Root positions of `Q(x) = 0 (mod p)` under self-initialization: `Ax + B
/// = +-root (mod p)`, so `x = A^-1 (+-root - B) (mod p)`. Returns `None`
/// when `p` is one of the polygroup's own g-primes (A not invertible mod
/// p; spec §4.4/§9).
fn poly_roots(poly: &Poly, p: u32, root: u32, ainverse: Option<u32>) -> Option<(i64, i64)> {
    let ainv = ainverse? as i64;
    let p = p as i64;
    let b_mod_p = poly.b.mod_u(p as u32) as i64;
    let r = root as i64;
    let x1 = ((ainv * (r - b_mod_p)) % p + p) % p;
    let x2 = ((ainv * (-r - b_mod_p)) % p + p) % p;
    Some((x1, x2))
}

/// Sieves one polynomial over the window of half-width `m`, returning
/// every smooth (full or one-large-prime partial) candidate found.
pub fn sieve_poly(poly: &Poly, pg: &PolyGroup, fb: &FactorBase, params: &Params) -> Vec<Found> {
    let len = 2 * params.m as usize + 1;
    debug_assert_eq!(poly.istart, -(params.m as i64));

    // log2|Q| at the window edge, the largest magnitude in the window by
    // construction; used as a representative bias for the whole window.
    let edge = poly.evaluate(2 * params.m as i64).abs();
    let bits = edge.significant_bits() as i32;
    // Required cumulative log to flag a position as a candidate: dividing
    // by T leaves slack for the large-prime variation (a true relation may
    // carry one factor, up to lp_bound, that never appears in the FB log
    // sum) as well as for log-rounding error.
    let required = (bits as f64 / params.t).round() as i32;

    let mut sieve_array = vec![-required; len];

    for i in 0..fb.len() {
        let p = fb.primes[i];
        if p < 3 {
            continue; // 2 contributes negligible weight; skip for sieve scoring.
        }
        let ainverse = pg.ainverses[i];
        let Some((x1, x2)) = poly_roots(poly, p, fb.roots[i], ainverse) else {
            continue;
        };
        let log_p = fb.logs[i] as i32;
        for root in [x1, x2] {
            let mut idx = root as usize;
            while idx < len {
                sieve_array[idx] += log_p;
                idx += p as usize;
            }
        }
    }

    let mut found = Vec::new();
    for (i, &score) in sieve_array.iter().enumerate() {
        if score < 0 {
            continue;
        }
        let delta = i as i64;
        let mut q = poly.evaluate(delta);
        let negative = q.cmp0() == std::cmp::Ordering::Less;
        if negative {
            q = -q;
        }
        if q == 0 {
            continue;
        }

        let mut factors = Vec::new();
        for (idx, &p) in fb.primes.iter().enumerate() {
            let e = q.remove_factor_mut(&Integer::from(p));
            if e > 0 {
                factors.push((idx as u32, e as u8));
            }
        }

        if q == 1 {
            found.push(Found { x: poly.x_at(delta), negative, factors, cofactor: 1 });
        } else if let Some(cofactor) = q.to_u32() {
            if cofactor > 1 && cofactor <= params.lp_bound && crate::nt::miller_rabin(cofactor) {
                found.push(Found {
                    x: poly.x_at(delta),
                    negative,
                    factors,
                    cofactor: cofactor as u64,
                });
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpool::GPool;
    use crate::params::Overrides;

    #[test]
    fn finds_at_least_one_relation_for_a_small_n() {
        let n = Integer::from(1_000_007u64);
        let params = Params::select(n.significant_bits(), Overrides::default());
        let fb = FactorBase::build(&n, params.fb_bound.min(2000));
        let gpool = GPool::select(&n, params.m, &fb).unwrap();
        let frog = gpool.current_frog().to_vec();
        let gvals: Vec<u32> = frog.iter().map(|&i| gpool.gvals[i]).collect();
        let pg = PolyGroup::generate(&n, &gvals, &fb);

        let mut total_found = 0;
        for b in &pg.bvals {
            let poly = Poly::generate(&pg.a, b.clone(), &n, -(params.m as i64), 0);
            total_found += sieve_poly(&poly, &pg, &fb, &params).len();
        }
        assert!(total_found > 0, "expected at least one smooth relation across the polygroup");
    }
}
