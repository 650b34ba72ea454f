//! PolyGroup construction (spec §4.4): given k distinct g-primes, form A =
//! Πg_i and all 2^(k-1) B-values with B² ≡ N (mod A), |B| ≤ A/2. Grounded
//! on `original_source/src/poly.c` (`generate_polygroup`).

use rug::Integer;

use crate::bigint::modulo;
use crate::factor_base::FactorBase;
use crate::mod_sqrt::mod_sqrt;

/// One choice of A with all of its associated B-values.
pub struct PolyGroup {
    pub a: Integer,
    /// The k primes composing A (a subset of the gpool).
    pub gvals: Vec<u32>,
    pub bvals: Vec<Integer>,
    /// `A^-1 mod fb[i]` for every factor-base prime; `None` when `fb[i]` is
    /// one of `gvals` (A is not invertible mod it -- see spec §9). The
    /// sieve must skip that factor-base column for this polygroup.
    pub ainverses: Vec<Option<u32>>,
    /// Index, into the engine's relation arena, of the designated anchor
    /// relation used to normalize every other relation from this group
    /// (spec §3, "victim"). Set once the first relation under this group
    /// is committed.
    pub victim: Option<usize>,
}

impl PolyGroup {
    pub fn generate(n: &Integer, gvals: &[u32], fb: &FactorBase) -> PolyGroup {
        let k = gvals.len();
        let a: Integer = gvals.iter().fold(Integer::from(1), |acc, &g| acc * g);

        // r[i] = (r_i, g_i - r_i), the two square roots of N mod g_i.
        let roots: Vec<(u32, u32)> = gvals
            .iter()
            .map(|&g| {
                let r0 = mod_sqrt(n.mod_u(g) as u64, g as u64) as u32;
                (r0, g - r0)
            })
            .collect();

        let mut bvals = Vec::with_capacity(1 << (k - 1));
        for z in 0..(1u32 << k) {
            let mut b = Integer::new();
            for i in 0..k {
                let g = gvals[i];
                let a_div_g = Integer::from(&a / g);
                let j = a_div_g
                    .clone()
                    .invert(&Integer::from(g))
                    .expect("A/g_i must be invertible mod g_i: g_i are distinct primes");
                let root = if (z >> i) & 1 == 0 { roots[i].0 } else { roots[i].1 };
                b += j * a_div_g * root;
            }
            let b = modulo(b, &a);
            // Keep only the half with b <= a/2; the rest are negations mod a.
            if Integer::from(&b * 2) <= a {
                bvals.push(b);
            }
        }
        debug_assert_eq!(bvals.len(), 1 << (k - 1));

        let mut ainverses = Vec::with_capacity(fb.len());
        for &p in &fb.primes {
            if gvals.contains(&p) {
                ainverses.push(None);
                continue;
            }
            let pi = Integer::from(p);
            match a.clone().invert(&pi) {
                Ok(inv) => ainverses.push(Some(inv.to_u32().unwrap())),
                Err(_) => ainverses.push(None),
            }
        }

        log::debug!(
            "polygroup: A has {} bits over g = {:?}, {} B-values",
            a.significant_bits(),
            gvals,
            bvals.len()
        );

        PolyGroup { a, gvals: gvals.to_vec(), bvals, ainverses, victim: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b_values_satisfy_congruence_and_bound() {
        let n = Integer::from(16921456439215439701u64);
        let fb = FactorBase::build(&n, 2000);
        // Pick a handful of small gvals with (n/g) = 1 distinct from fb.
        let mut gvals = Vec::new();
        let mut cand = 100_003u32;
        while gvals.len() < 3 {
            if crate::nt::miller_rabin(cand)
                && n.clone().kronecker(&Integer::from(cand)) == 1
                && !fb.primes.contains(&cand)
            {
                gvals.push(cand);
            }
            cand += 2;
        }

        let pg = PolyGroup::generate(&n, &gvals, &fb);
        assert_eq!(pg.bvals.len(), 1 << (gvals.len() - 1));
        for b in &pg.bvals {
            assert!(Integer::from(b * 2) <= pg.a);
            let lhs = Integer::from(b * b) % &pg.a;
            let rhs = n.clone() % &pg.a;
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn ainverse_is_none_exactly_for_fb_members_of_gvals() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 2000);
        let g = fb.primes[5];
        let gvals = [g, fb.primes[10], fb.primes[20]];
        // Only valid if (n/gvals[i]) = 1 for all (guaranteed since they're FB members).
        let pg = PolyGroup::generate(&n, &gvals, &fb);
        let idx = fb.primes.iter().position(|&p| p == g).unwrap();
        assert!(pg.ainverses[idx].is_none());
    }
}
