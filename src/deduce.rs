//! Factor deduction (spec §4.7): for each zero row surfaced by elimination,
//! reconstruct a congruence of squares and extract a factor by GCD.
//! Grounded on `original_source/src/matrix.c` (`solve_matrix`,
//! `multiply_in_lhs`, `add_factors_to_table`, `construct_rhs`).

use rug::{ops::Pow, Integer};

use crate::bigint::modulo;
use crate::factor_base::FactorBase;
use crate::matrix::HistoryMatrix;
use crate::poly::Poly;
use crate::polygroup::PolyGroup;
use crate::relation::{MatRel, Relation};

/// The canonical H-value for `rel`: `(p.a*v.x + p.b) * (q.a*r.x + q.b) *
/// p.a^-1 (mod n)`, where `q` is `rel`'s own polynomial and `p`/`v` are the
/// polynomial and victim relation of `rel`'s polygroup. Normalizes away the
/// A factor in the identity `A*Q(x) = (Ax+B)^2 - N`.
fn h_value(rel: &Relation, relations: &[Relation], polys: &[Poly], polygroups: &[PolyGroup], n: &Integer) -> Integer {
    let q = &polys[rel.poly];
    let pg = &polygroups[q.polygroup];
    let victim_idx = pg.victim.expect("a polygroup must have a victim before its relations can be deduced");
    let v = &relations[victim_idx];
    let p = &polys[v.poly];

    let h_v = Integer::from(&p.a * v.x) + &p.b;
    let h_r = Integer::from(&q.a * rel.x) + &q.b;
    let p_a_inv = p
        .a
        .clone()
        .invert(n)
        .expect("polygroup A must be invertible mod N (A and N share no factor)");

    modulo(h_v * h_r * p_a_inv, n)
}

fn add_factors(table: &mut [u16], rel: &Relation) {
    for &(idx, mult) in &rel.factors {
        table[idx as usize + 1] += mult as u16;
    }
}

/// Builds the RHS from the accumulated factor-count table, folding in the
/// sign (column 0) and any cofactor already multiplied in for combined
/// partials. Returns `None` if any count is odd -- a defective dependency
/// (spec §4.7 step 4 / §7 point 2), to be logged and skipped by the caller.
fn construct_rhs(table: &[u16], mut rhs: Integer, fb: &FactorBase, n: &Integer) -> Option<Integer> {
    if table[0] % 2 != 0 {
        log::debug!("construct_rhs: sign count {} is odd, skipping dependency", table[0]);
        return None;
    }
    if (table[0] / 2) % 2 == 1 {
        rhs = -rhs;
    }
    for (i, &count) in table.iter().enumerate().skip(1) {
        if count % 2 != 0 {
            log::debug!("construct_rhs: fb[{}] count {count} is odd, skipping dependency", i - 1);
            return None;
        }
        if count > 0 {
            let p = fb.primes[i - 1];
            rhs *= Integer::from(p).pow((count / 2) as u32);
            rhs = modulo(rhs, n);
        }
    }
    Some(modulo(rhs, n))
}

/// A discovered prime factor, tagged with whether it was confirmed prime or
/// is being reported as a (possibly composite) residual cofactor.
pub struct Factor {
    pub value: Integer,
    pub prime: bool,
}

/// Works through every zero exponent row, extracting congruences of
/// squares and dividing confirmed factors out of a running `N_remaining`
/// (starting from `n / multiplier`). Stops early once `N_remaining`
/// reaches 1. Returns the factors found, in discovery order.
pub fn deduce(
    n: &Integer,
    multiplier: u32,
    relations: &[Relation],
    polys: &[Poly],
    polygroups: &[PolyGroup],
    fb: &FactorBase,
    matrels: &[MatRel],
    history: &HistoryMatrix,
    zero_rows: &[usize],
) -> (Vec<Factor>, Integer) {
    let mut remaining = Integer::from(n / multiplier);
    let mut factors = Vec::new();

    for &row in zero_rows {
        if remaining == 1 {
            break;
        }

        let mut table = vec![0u16; fb.len() + 1];
        let mut lhs = Integer::from(1);
        let mut rhs = Integer::from(1);

        for relnum in history.selected(row) {
            let mr = &matrels[relnum];
            let r1 = &relations[mr.r1];
            lhs *= h_value(r1, relations, polys, polygroups, n);
            add_factors(&mut table, r1);
            if r1.negative {
                table[0] += 1;
            }

            if let Some(r2_idx) = mr.r2 {
                let r2 = &relations[r2_idx];
                if r1.cofactor != r2.cofactor {
                    log::warn!("combined partials disagree on cofactor ({} vs {})", r1.cofactor, r2.cofactor);
                }
                lhs *= h_value(r2, relations, polys, polygroups, n);
                add_factors(&mut table, r2);
                if r2.negative {
                    table[0] += 1;
                }
                rhs *= r1.cofactor;
            }
        }

        lhs = modulo(lhs, n);
        let Some(rhs) = construct_rhs(&table, rhs, fb, n) else {
            continue;
        };

        let lhs_sq = modulo(Integer::from(&lhs * &lhs), n);
        let rhs_sq = modulo(Integer::from(&rhs * &rhs), n);
        if lhs_sq != rhs_sq {
            log::debug!("row {row}: squares not congruent mod N, skipping dependency");
            continue;
        }

        let diff = modulo(Integer::from(&rhs - &lhs), n);
        let d = diff.gcd(&remaining);
        if d <= 1 || d >= remaining {
            continue; // trivial GCD (spec §7 point 3)
        }
        if !remaining.is_divisible(&d) {
            continue; // already-known factor (spec §7 point 4)
        }

        if d.is_probably_prime(25) == rug::integer::IsPrime::No {
            // Composite GCD hit: hold it aside rather than report it as
            // terminal, since a later dependency computed against the
            // un-reduced remainder may yet split it further.
            log::debug!("row {row}: GCD hit {d} is composite, not dividing it out yet");
            continue;
        }

        log::info!("deduced factor {d} (prp)");
        remaining = Integer::from(&remaining / &d);
        factors.push(Factor { value: d, prime: true });

        if remaining == 1 {
            break;
        }
        if remaining.is_probably_prime(25) != rug::integer::IsPrime::No {
            log::info!("remaining cofactor {remaining} is prime, done");
            factors.push(Factor { value: remaining.clone(), prime: true });
            remaining = Integer::from(1);
            break;
        }
    }

    (factors, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_rhs_rejects_odd_sign_count() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 50);
        let mut table = vec![0u16; fb.len() + 1];
        table[0] = 1;
        assert!(construct_rhs(&table, Integer::from(1), &fb, &n).is_none());
    }

    #[test]
    fn construct_rhs_rejects_odd_prime_count() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 50);
        let mut table = vec![0u16; fb.len() + 1];
        table[1] = 3;
        assert!(construct_rhs(&table, Integer::from(1), &fb, &n).is_none());
    }

    #[test]
    fn construct_rhs_computes_half_exponent_product() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 50);
        let mut table = vec![0u16; fb.len() + 1];
        table[1] = 4; // fb.primes[0]^2 contributes to the sqrt
        let rhs = construct_rhs(&table, Integer::from(1), &fb, &n).unwrap();
        let expect = modulo(Integer::from(fb.primes[0]).pow(2), &n);
        assert_eq!(rhs, expect);
    }

    #[test]
    fn h_value_self_pairs_to_q_of_x() {
        // When a relation is its own group's victim, H = (A*x+B)^2 * A^-1
        // (mod N), and since (A*x+B)^2 == A*Q(x) (mod N) by construction,
        // H collapses to Q(x) itself (mod N).
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 2000);
        let g = fb.primes[fb.primes.len() - 1];
        let mut pg = PolyGroup::generate(&n, &[g], &fb);
        let b = pg.bvals[0].clone();
        let poly = Poly::generate(&pg.a, b, &n, 0, 0);

        let victim = Relation { x: 3, poly: 0, factors: vec![], negative: false, cofactor: 1 };
        let relations = vec![victim];
        pg.victim = Some(0);
        let polygroups = vec![pg];
        let polys = vec![poly];

        let h = h_value(&relations[0], &relations, &polys, &polygroups, &n);
        let q_of_x = modulo(polys[0].evaluate(3), &n);
        assert_eq!(h, q_of_x);
    }
}
