//! The bit-length-indexed parameter table of spec §4.2, with linear
//! interpolation between rows and CLI overrides (spec §6). Grounded on
//! `original_source/src/nsieve.c`'s `params[]`, `set_params`, and
//! `select_parameters`.

/// One row of the parameter table: (bit length, fb_bound, lp_bound, M, T).
struct Row {
    bits: f64,
    fb_bound: u32,
    lp_bound: u32,
    m: u32,
    t: f64,
}

const TABLE: [Row; 4] = [
    Row { bits: 100.0, fb_bound: 5000, lp_bound: 5000, m: 1 * 32768, t: 1.3 },
    Row { bits: 120.0, fb_bound: 11000, lp_bound: 11000, m: 2 * 32768, t: 1.3 },
    Row { bits: 140.0, fb_bound: 25000, lp_bound: 25000, m: 2 * 32768, t: 1.3 },
    Row { bits: 160.0, fb_bound: 55000, lp_bound: 55000, m: 2 * 32768, t: 1.3 },
];

/// The count of extra relations collected beyond `fb_len`, to leave slack
/// for the Gaussian elimination to yield a solvable null space (spec §4.1).
pub const EXTRA_RELATIONS: usize = 48;

#[derive(Debug, Clone, Copy)]
pub struct Params {
    pub fb_bound: u32,
    pub lp_bound: u32,
    pub m: u32,
    pub t: f64,
}

/// User-supplied overrides from the CLI (spec §6). `None` means "fall back
/// to the interpolated table row"; for `lp_bound`, `Some(0)` is a distinct
/// value from `None` (it forces partials off rather than consulting the
/// table), matching the sentinel semantics of the C original's `-lpb 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub fb_bound: Option<u32>,
    pub lp_bound: Option<u32>,
    pub m: Option<u32>,
    pub t: Option<f64>,
}

fn interpolate(bits: u32, pick: impl Fn(&Row) -> f64) -> f64 {
    let bits = bits as f64;
    if bits <= TABLE[0].bits {
        return pick(&TABLE[0]);
    }
    if bits >= TABLE[TABLE.len() - 1].bits {
        return pick(&TABLE[TABLE.len() - 1]);
    }
    let mut i = 1;
    while TABLE[i].bits < bits {
        i += 1;
    }
    let (lo, hi) = (&TABLE[i - 1], &TABLE[i]);
    let frac = (bits - lo.bits) / (hi.bits - lo.bits);
    pick(lo) + frac * (pick(hi) - pick(lo))
}

impl Params {
    /// Selects parameters for an N of the given bit length, honoring any
    /// CLI overrides. `overrides.lp_bound == Some(0)` disables partials by
    /// pinning `lp_bound` to `fb_bound`, independent of the table.
    pub fn select(bits: u32, overrides: Overrides) -> Params {
        let fb_bound = overrides
            .fb_bound
            .unwrap_or_else(|| interpolate(bits, |r| r.fb_bound as f64).round() as u32);

        let lp_bound = match overrides.lp_bound {
            Some(0) => fb_bound,
            Some(v) => v,
            None => interpolate(bits, |r| r.lp_bound as f64).round() as u32,
        };

        let m = overrides
            .m
            .unwrap_or_else(|| interpolate(bits, |r| r.m as f64).round() as u32);

        let t = overrides.t.unwrap_or_else(|| interpolate(bits, |r| r.t));

        log::info!(
            "selected parameters for {bits}-bit N: fb_bound={fb_bound}, lp_bound={lp_bound}, M={m}, T={t}"
        );

        Params { fb_bound, lp_bound, m, t }
    }

    /// True when partials (the large-prime variation) are in use.
    pub fn partials_enabled(&self) -> bool {
        self.lp_bound > self.fb_bound
    }
}
