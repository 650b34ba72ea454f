//! Command-line entry point (spec §6). Grounded on
//! `original_source/src/nsieve.c`'s `main`: positional N, flag/value pairs
//! scanned in a single pass, `-np` as a bare switch, and a timing summary
//! printed at the end.

use std::env;
use std::process::ExitCode;

use rug::Integer;

use mpqs::{Engine, FatalError, Overrides};

struct Args {
    n: Integer,
    overrides: Overrides,
}

fn parse_args() -> Result<Args, FatalError> {
    let argv: Vec<String> = env::args().collect();
    let mut overrides = Overrides::default();
    let mut n: Option<Integer> = None;

    let mut pos = 1;
    while pos < argv.len() {
        match argv[pos].as_str() {
            "-T" => {
                let v = argv.get(pos + 1).ok_or_else(|| FatalError::InvalidInput("-T needs a value".into()))?;
                overrides.t = Some(v.parse().map_err(|_| FatalError::InvalidInput(v.clone()))?);
                pos += 2;
            }
            "-fbb" => {
                let v = argv.get(pos + 1).ok_or_else(|| FatalError::InvalidInput("-fbb needs a value".into()))?;
                overrides.fb_bound = Some(v.parse().map_err(|_| FatalError::InvalidInput(v.clone()))?);
                pos += 2;
            }
            "-lpb" => {
                let v = argv.get(pos + 1).ok_or_else(|| FatalError::InvalidInput("-lpb needs a value".into()))?;
                overrides.lp_bound = Some(v.parse().map_err(|_| FatalError::InvalidInput(v.clone()))?);
                pos += 2;
            }
            "-M" => {
                let v = argv.get(pos + 1).ok_or_else(|| FatalError::InvalidInput("-M needs a value".into()))?;
                overrides.m = Some(v.parse().map_err(|_| FatalError::InvalidInput(v.clone()))?);
                pos += 2;
            }
            "-np" => {
                overrides.lp_bound = Some(0);
                pos += 1;
            }
            other => {
                let parsed = Integer::parse(other).map_err(|_| FatalError::InvalidInput(other.to_string()))?;
                n = Some(Integer::from(parsed));
                pos += 1;
            }
        }
    }

    let n = n.ok_or_else(|| FatalError::InvalidInput("no N given on the command line".into()))?;
    if n < 2 {
        return Err(FatalError::NNotFactorable(n.to_string()));
    }
    Ok(Args { n, overrides })
}

fn report_factor(f: &mpqs::FactorOutcome) {
    for factor in &f.factors {
        let tag = if factor.prime { "prp" } else { "c" };
        println!("{} ({tag})", factor.value);
    }
    if f.remaining != 1 {
        println!("{} (c) [unfactored]", f.remaining);
    }
}

fn report_timing(t: &mpqs::Timing) {
    println!(
        "\nTiming summary:\n\tinit: {:.3}s\n\tsieving: {:.3}s\n\tmatrix solve: {:.3}s\n\tfactor deduction: {:.3}s",
        t.init.as_secs_f64(),
        t.sieve.as_secs_f64(),
        t.matrix_solve.as_secs_f64(),
        t.fact_deduce.as_secs_f64(),
    );
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("factoring N = {}", args.n);
    let engine = Engine::new(args.n, args.overrides);
    match engine.factorize() {
        Ok(outcome) => {
            report_factor(&outcome);
            report_timing(&outcome.timing);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
