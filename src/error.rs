//! The configuration-error taxonomy of spec §7. Invariant violations and
//! trivial GCDs are not errors in this sense: they are logged via the `log`
//! crate and handled inline by skipping the offending relation/dependency.

use std::fmt;

/// A fatal configuration error: the engine cannot proceed at all. These are
/// the only errors that propagate out of the engine; `main` reports them
/// and exits nonzero.
#[derive(Debug)]
pub enum FatalError {
    /// The input could not be parsed as a positive decimal integer.
    InvalidInput(String),
    /// `gpool` selection found no viable k (spec §4.3); never expected to
    /// occur for N in the supported 60-170 bit range.
    NoViableGpoolSize,
    /// N is smaller than 2, or otherwise outside the domain this engine
    /// supports (it is not a general-purpose integer calculator).
    NNotFactorable(String),
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalError::InvalidInput(s) => write!(f, "could not parse '{s}' as a decimal integer"),
            FatalError::NoViableGpoolSize => {
                write!(f, "gpool selection found no viable k; N is out of range")
            }
            FatalError::NNotFactorable(s) => write!(f, "N = {s} cannot be factored by this engine"),
        }
    }
}

impl std::error::Error for FatalError {}
