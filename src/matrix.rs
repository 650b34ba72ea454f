//! Bit-packed rows, the history matrix, and the right-to-left Gaussian
//! elimination sweep (spec §4.6, §4.8). Grounded on
//! `original_source/src/matrix.c` (`solve_matrix`) and, for the packed-row
//! idiom, the teacher's `src/linalg.rs`.

const WORD_BITS: usize = u64::BITS as usize;

/// A dense bit vector packed into `u64` words, used for both exponent-parity
/// rows and history rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitRow(pub Vec<u64>);

impl BitRow {
    pub fn zeros(bits: usize) -> BitRow {
        BitRow(vec![0u64; (bits + WORD_BITS - 1) / WORD_BITS])
    }

    pub fn words(&self) -> usize {
        self.0.len()
    }

    pub fn get_bit(&self, i: usize) -> bool {
        (self.0[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1
    }

    pub fn flip_bit(&mut self, i: usize) {
        self.0[i / WORD_BITS] ^= 1 << (i % WORD_BITS);
    }

    pub fn xor_assign(&mut self, other: &BitRow) {
        debug_assert_eq!(self.0.len(), other.0.len());
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a ^= b;
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Index of the highest-indexed set bit at position <= `max_col`, or
    /// `None` if there is none (the "rightmost 1", scanning from the most
    /// significant column down).
    pub fn rightmost_1(&self, max_col: usize) -> Option<usize> {
        let mut col = max_col as isize;
        while col >= 0 {
            if self.get_bit(col as usize) {
                return Some(col as usize);
            }
            col -= 1;
        }
        None
    }
}

/// The square bit matrix of side `rels_needed`, initially the identity;
/// row `h` records which original relation indices have been XORed
/// together to produce the current exponent row `h`.
pub struct HistoryMatrix {
    rows: Vec<BitRow>,
}

impl HistoryMatrix {
    pub fn identity(n: usize) -> HistoryMatrix {
        let mut rows = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = BitRow::zeros(n);
            row.flip_bit(i);
            rows.push(row);
        }
        HistoryMatrix { rows }
    }

    pub fn get_bit(&self, row: usize, col: usize) -> bool {
        self.rows[row].get_bit(col)
    }

    fn xor_rows(&mut self, dst: usize, src: usize) {
        let src_row = self.rows[src].clone();
        self.rows[dst].xor_assign(&src_row);
    }

    /// The set of original relation indices XORed into `row` (the 1-bits).
    pub fn selected(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.rows.len()).filter(move |&i| self.get_bit(row, i))
    }
}

/// Performs the right-to-left column sweep of spec §4.6 in place over
/// `exponent` (one row per relation, `num_cols` columns with column 0 the
/// sign bit), tracking combinations in `history`. Zero rows of `exponent`
/// after the sweep are dependencies; `history.selected(row)` gives the
/// relation indices combined to produce each one.
pub fn eliminate(exponent: &mut [BitRow], history: &mut HistoryMatrix, num_cols: usize) {
    let num_rows = exponent.len();
    let mut rightmost: Vec<Option<usize>> =
        exponent.iter().map(|r| r.rightmost_1(num_cols - 1)).collect();

    for col in (0..num_cols).rev() {
        let pivot = match (0..num_rows).find(|&r| rightmost[r] == Some(col)) {
            Some(p) => p,
            None => continue,
        };

        for y in (pivot + 1)..num_rows {
            if rightmost[y] == Some(col) {
                let pivot_row = exponent[pivot].clone();
                exponent[y].xor_assign(&pivot_row);
                history.xor_rows(y, pivot);
                // After XORing in the pivot (whose rightmost-1 is `col`),
                // row y's rightmost-1 must now be strictly below `col`.
                rightmost[y] = if col == 0 { None } else { exponent[y].rightmost_1(col - 1) };
            }
        }
    }
}

/// A self-check pass: XORs the original relation rows selected by each
/// zero row's history bits and verifies the result is the zero vector
/// (spec §4.6's optional development check). `originals` must be the
/// exponent matrix as it stood before elimination.
pub fn verify_dependency(originals: &[BitRow], history: &HistoryMatrix, row: usize, words: usize) -> bool {
    let mut check = BitRow::zeros(words * 64);
    for i in history.selected(row) {
        check.xor_assign(&originals[i]);
    }
    check.is_zero()
}
