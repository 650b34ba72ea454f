//! Self-initializing multiple-polynomial quadratic sieve with large-prime
//! variation. See `Engine::factorize` for the entry point.

pub mod bigint;
pub mod deduce;
pub mod engine;
pub mod error;
pub mod factor_base;
pub mod gpool;
pub mod matrix;
pub mod mod_sqrt;
pub mod nt;
pub mod params;
pub mod partials;
pub mod poly;
pub mod polygroup;
pub mod relation;
pub mod sieve;

pub use engine::{Engine, FactorOutcome, Timing};
pub use error::FatalError;
pub use params::Overrides;
