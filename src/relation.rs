//! Relations and matrix rows (spec §3).

use crate::factor_base::FactorBase;
use crate::matrix::BitRow;

/// A smooth value Q(x) found under some polynomial.
pub struct Relation {
    /// Signed sieve offset.
    pub x: i64,
    /// Index into the engine's polynomial arena.
    pub poly: usize,
    /// Sorted (factor-base index, multiplicity) pairs. Index 0 of the
    /// exponent-vector column space is the sign; that is tracked
    /// separately via `negative`, not as an entry here.
    pub factors: Vec<(u32, u8)>,
    pub negative: bool,
    /// 1 for full relations; a prime <= the large-prime bound for partials.
    pub cofactor: u64,
}

impl Relation {
    pub fn is_full(&self) -> bool {
        self.cofactor == 1
    }

    /// Packs this relation's exponent parities into a `BitRow` of
    /// `ceil((fb.len() + 1) / 64)` words. Bit 0 is the sign; bit `i` for
    /// `i >= 1` is the parity of the exponent of `fb.primes[i - 1]`.
    pub fn to_row(&self, fb: &FactorBase) -> BitRow {
        let mut row = BitRow::zeros(fb.len() + 1);
        if self.negative {
            row.flip_bit(0);
        }
        for &(idx, mult) in &self.factors {
            if mult & 1 == 1 {
                row.flip_bit(idx as usize + 1);
            }
        }
        row
    }
}

/// A matrix row plus its origin: `r1` alone for a full relation, or `r1`
/// and `r2` together for two partials combined over a shared large prime.
pub struct MatRel {
    pub r1: usize,
    pub r2: Option<usize>,
    pub row: BitRow,
}
