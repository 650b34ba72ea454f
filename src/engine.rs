//! The engine: owns every arena and drives the straight-line pipeline
//! init -> gpool -> loop{polygroup, sieve, combine} -> matrix solve ->
//! deduce (spec §2, §5). Grounded on `original_source/src/nsieve.c`
//! (`nsieve_init`, `factor`, `main`).

use std::time::{Duration, Instant};

use rug::Integer;

use crate::deduce::{self, Factor};
use crate::error::FatalError;
use crate::factor_base::FactorBase;
use crate::gpool::GPool;
use crate::matrix::{eliminate, BitRow, HistoryMatrix};
use crate::params::{Overrides, Params, EXTRA_RELATIONS};
use crate::partials::{full_mat_rel, PartialCombiner};
use crate::poly::Poly;
use crate::polygroup::PolyGroup;
use crate::relation::{MatRel, Relation};
use crate::sieve::sieve_poly;

/// Cumulative wall-clock spent in each phase (spec §6's timing summary).
#[derive(Debug, Default, Clone, Copy)]
pub struct Timing {
    pub init: Duration,
    pub sieve: Duration,
    pub matrix_solve: Duration,
    pub fact_deduce: Duration,
}

pub struct FactorOutcome {
    pub factors: Vec<Factor>,
    /// Whatever of N was not resolved into reported factors (1 if fully
    /// factored).
    pub remaining: Integer,
    pub timing: Timing,
}

/// Owns the factor base, gpool, and the polygroup/poly/relation/matrel
/// arenas for the engine's entire lifetime (spec §9: no cyclic ownership,
/// every back-reference is an index into one of these).
pub struct Engine {
    n: Integer,
    /// The `select_multiplier` step is a no-op in the source (spec §9
    /// open question); kept at 1 and never reassigned.
    multiplier: u32,
    params: Params,
    fb: FactorBase,
    polygroups: Vec<PolyGroup>,
    polys: Vec<Poly>,
    relations: Vec<Relation>,
    matrels: Vec<MatRel>,
    combiner: PartialCombiner,
    nfull: usize,
}

impl Engine {
    pub fn new(n: Integer, overrides: Overrides) -> Engine {
        let params = Params::select(n.significant_bits(), overrides);
        let fb = FactorBase::build(&n, params.fb_bound);
        Engine {
            n,
            multiplier: 1,
            params,
            fb,
            polygroups: Vec::new(),
            polys: Vec::new(),
            relations: Vec::new(),
            matrels: Vec::new(),
            combiner: PartialCombiner::new(),
            nfull: 0,
        }
    }

    fn rels_needed(&self) -> usize {
        self.fb.len() + EXTRA_RELATIONS
    }

    /// Commits a sieve find: creates the `Relation`, installs it as its
    /// group's victim if none exists yet, and produces a `MatRel` (either
    /// immediately for a full relation, or once a matching partial arrives).
    fn commit(&mut self, polygroup: usize, found: crate::sieve::Found) {
        let rel = Relation {
            x: found.x,
            poly: self.polys.len() - 1,
            factors: found.factors,
            negative: found.negative,
            cofactor: found.cofactor,
        };
        let idx = self.relations.len();
        self.relations.push(rel);

        if self.polygroups[polygroup].victim.is_none() {
            self.polygroups[polygroup].victim = Some(idx);
        }

        if found.cofactor == 1 {
            self.matrels.push(full_mat_rel(idx, &self.relations, &self.fb));
            self.nfull += 1;
        } else if let Some(combined) = self.combiner.offer(idx, &self.relations, &self.fb) {
            self.matrels.push(combined);
        }
    }

    fn sieve_one_polygroup(&mut self, gpool: &GPool, frog: &[usize]) {
        let gvals: Vec<u32> = frog.iter().map(|&i| gpool.gvals[i]).collect();
        let pg = PolyGroup::generate(&self.n, &gvals, &self.fb);
        let pg_idx = self.polygroups.len();
        self.polygroups.push(pg);

        for j in 0..self.polygroups[pg_idx].bvals.len() {
            let b = self.polygroups[pg_idx].bvals[j].clone();
            let a = self.polygroups[pg_idx].a.clone();
            let poly = Poly::generate(&a, b, &self.n, -(self.params.m as i64), pg_idx);
            self.polys.push(poly);
            let poly_idx = self.polys.len() - 1;

            let found = sieve_poly(&self.polys[poly_idx], &self.polygroups[pg_idx], &self.fb, &self.params);
            for f in found {
                self.commit(pg_idx, f);
            }
        }
    }

    /// Runs the full pipeline: collects relations, solves the matrix, and
    /// deduces factors. Returns a fatal error only if gpool selection
    /// itself fails (spec §4.3's "no viable k").
    pub fn factorize(mut self) -> Result<FactorOutcome, FatalError> {
        let mut timing = Timing::default();

        let t0 = Instant::now();
        let mut gpool = GPool::select(&self.n, self.params.m, &self.fb)?;
        timing.init = t0.elapsed();

        let t1 = Instant::now();
        while self.matrels.len() < self.rels_needed() {
            let frog = gpool.current_frog().to_vec();
            self.sieve_one_polygroup(&gpool, &frog);
            gpool.advance();
            log::info!(
                "have {} of {} relations ({} full, {} pending partials) after {} polygroups",
                self.matrels.len(),
                self.rels_needed(),
                self.nfull,
                self.combiner.pending_count(),
                self.polygroups.len()
            );
        }
        timing.sieve = t1.elapsed();

        let t2 = Instant::now();
        let mut exponent: Vec<BitRow> = self.matrels.iter().map(|m| m.row.clone()).collect();
        let mut history = HistoryMatrix::identity(exponent.len());
        eliminate(&mut exponent, &mut history, self.fb.len() + 1);
        let zero_rows: Vec<usize> = (0..exponent.len()).filter(|&i| exponent[i].is_zero()).collect();
        timing.matrix_solve = t2.elapsed();
        log::info!("matrix solved: {} dependencies found among {} rows", zero_rows.len(), exponent.len());

        let t3 = Instant::now();
        let (factors, remaining) = deduce::deduce(
            &self.n,
            self.multiplier,
            &self.relations,
            &self.polys,
            &self.polygroups,
            &self.fb,
            &self.matrels,
            &history,
            &zero_rows,
        );
        timing.fact_deduce = t3.elapsed();

        Ok(FactorOutcome { factors, remaining, timing })
    }
}
