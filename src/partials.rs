//! Combines one-large-prime partial relations that share a cofactor into
//! full matrix rows (spec §4.1, §4.6's "extra relations" budget leans on
//! this). Grounded on `original_source/src/matrix.c`'s accumulation of
//! partials before `solve_matrix`, adapted to a hash map keyed by
//! cofactor rather than a sorted-and-scanned array.

use std::collections::HashMap;

use crate::factor_base::FactorBase;
use crate::matrix::BitRow;
use crate::relation::{MatRel, Relation};

/// Buckets partial relations by large-prime cofactor; the first partial
/// seen for a cofactor waits, the second combines with it (their XORed
/// row is square in that cofactor, so it drops out) and the pairing is
/// removed from `pending`. A third partial for the same cofactor finds
/// nothing pending and simply waits again, ready to combine with a
/// fourth -- pairs, not single slots, are what get consumed.
#[derive(Default)]
pub struct PartialCombiner {
    pending: HashMap<u64, usize>,
}

impl PartialCombiner {
    pub fn new() -> PartialCombiner {
        PartialCombiner::default()
    }

    /// Offers a partial relation (by its index into the relation arena).
    /// Returns the combined `MatRel` once a matching pair completes.
    pub fn offer(&mut self, idx: usize, relations: &[Relation], fb: &FactorBase) -> Option<MatRel> {
        let rel = &relations[idx];
        debug_assert!(!rel.is_full());

        match self.pending.remove(&rel.cofactor) {
            None => {
                self.pending.insert(rel.cofactor, idx);
                None
            }
            Some(first) => {
                let mut row = relations[first].to_row(fb);
                row.xor_assign(&rel.to_row(fb));
                log::trace!(
                    "combined partials {} and {} over cofactor {}",
                    first,
                    idx,
                    rel.cofactor
                );
                Some(MatRel { r1: first, r2: Some(idx), row })
            }
        }
    }

    /// Number of cofactors still waiting on a second partial.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Wraps a full relation as a `MatRel` with no combination needed.
pub fn full_mat_rel(idx: usize, relations: &[Relation], fb: &FactorBase) -> MatRel {
    let row: BitRow = relations[idx].to_row(fb);
    MatRel { r1: idx, r2: None, row }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rug::Integer;

    fn dummy_relation(cofactor: u64, factors: Vec<(u32, u8)>) -> Relation {
        Relation { x: 0, poly: 0, factors, negative: false, cofactor }
    }

    #[test]
    fn first_partial_waits_second_combines() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 500);
        let relations = vec![
            dummy_relation(97, vec![(0, 1)]),
            dummy_relation(97, vec![(0, 1), (1, 2)]),
        ];
        let mut combiner = PartialCombiner::new();
        assert!(combiner.offer(0, &relations, &fb).is_none());
        assert_eq!(combiner.pending_count(), 1);
        let combined = combiner.offer(1, &relations, &fb).expect("should combine");
        assert_eq!(combined.r1, 0);
        assert_eq!(combined.r2, Some(1));
        assert_eq!(combiner.pending_count(), 0);
        // Both relations carry fb[0] with odd multiplicity; XOR cancels that bit.
        assert!(!combined.row.get_bit(1));
    }

    #[test]
    fn unrelated_cofactors_stay_pending() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 500);
        let relations = vec![dummy_relation(97, vec![]), dummy_relation(101, vec![])];
        let mut combiner = PartialCombiner::new();
        assert!(combiner.offer(0, &relations, &fb).is_none());
        assert!(combiner.offer(1, &relations, &fb).is_none());
        assert_eq!(combiner.pending_count(), 2);
    }

    #[test]
    fn full_mat_rel_has_no_second_origin() {
        let n = Integer::from(1_000_007u64);
        let fb = FactorBase::build(&n, 500);
        let relations = vec![dummy_relation(1, vec![(0, 1)])];
        let mr = full_mat_rel(0, &relations, &fb);
        assert_eq!(mr.r1, 0);
        assert!(mr.r2.is_none());
    }
}
