//! A single (A, B, C) polynomial and its evaluation (spec §4.5). Grounded
//! on `original_source/src/poly.c` (`generate_poly`, `poly`).

use rug::Integer;

/// `Q(x) = A x^2 + 2 B x + C`, sieved over a window starting at `istart`.
pub struct Poly {
    pub a: Integer,
    pub b: Integer,
    pub c: Integer,
    /// The sieve window's left edge: offset `delta` evaluates at `x =
    /// istart + delta`.
    pub istart: i64,
    /// Index, into the engine's polygroup arena, of the containing
    /// polygroup.
    pub polygroup: usize,
}

impl Poly {
    /// Builds the poly for B-value `bvals[i]` of `pg`. `C = (B^2 - N) / A`
    /// divides exactly by construction (B^2 ≡ N mod A).
    pub fn generate(a: &Integer, b: Integer, n: &Integer, istart: i64, polygroup: usize) -> Poly {
        let c = (Integer::from(&b * &b) - n) / a;
        Poly { a: a.clone(), b, c, istart, polygroup }
    }

    /// Evaluates `Q(istart + delta) = ((A x + 2B) x) + C`.
    pub fn evaluate(&self, delta: i64) -> Integer {
        let x = self.istart + delta;
        let mut res = Integer::from(&self.a * x);
        res += &self.b;
        res += &self.b;
        res *= x;
        res += &self.c;
        res
    }

    /// `x` for a given offset, used to build the H-value during deduction.
    pub fn x_at(&self, delta: i64) -> i64 {
        self.istart + delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_makes_a_times_q_exact() {
        use crate::mod_sqrt::mod_sqrt;

        let n = Integer::from(1_000_007u64);
        let a = 101u32;
        let r = mod_sqrt(n.mod_u(a) as u64, a as u64);
        let b = Integer::from(r);
        let p = Poly::generate(&Integer::from(a), b, &n, 0, 0);
        // A * C == B^2 - N exactly (spec §8 universal invariant).
        assert_eq!(Integer::from(&p.a * &p.c), Integer::from(&p.b * &p.b) - &n);
    }

    #[test]
    fn evaluate_matches_direct_formula() {
        use crate::mod_sqrt::mod_sqrt;

        let n = Integer::from(1_000_007u64);
        let a = 101u32;
        let r = mod_sqrt(n.mod_u(a) as u64, a as u64);
        let b = Integer::from(r);
        let p = Poly::generate(&Integer::from(a), b.clone(), &n, -5, 0);
        for delta in -2..=2 {
            let x = -5 + delta;
            let expect = Integer::from(a) * x * x + 2 * &b * x + &p.c;
            assert_eq!(p.evaluate(delta), expect);
        }
    }
}
