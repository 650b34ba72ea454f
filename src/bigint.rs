//! Small helpers around `rug::Integer` shared by the polynomial and
//! deduction code, where a canonical (non-negative) residue is needed
//! regardless of the sign convention of the arithmetic that produced it.

use rug::Integer;

/// `x mod n`, normalized to `[0, n)` for positive `n`.
pub fn modulo(x: Integer, n: &Integer) -> Integer {
    let mut r = x % n;
    if r.cmp0() == std::cmp::Ordering::Less {
        r += n;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulo_of_negative_is_nonnegative() {
        let r = modulo(Integer::from(-5), &Integer::from(7));
        assert_eq!(r, Integer::from(2));
    }

    #[test]
    fn modulo_of_positive_is_unchanged_residue() {
        let r = modulo(Integer::from(10), &Integer::from(7));
        assert_eq!(r, Integer::from(3));
    }
}
