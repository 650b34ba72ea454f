//! End-to-end factorization scenarios (spec §8): build an `Engine` for a
//! known N, run it to completion, and check the reported factors multiply
//! back to N and match what N is known to factor as.

use rug::{ops::Pow, Integer};

use mpqs::{Engine, Overrides};

fn factor_and_check(n: Integer, expect_primes: &[&str]) {
    let n_copy = n.clone();
    let engine = Engine::new(n, Overrides::default());
    let outcome = engine.factorize().expect("factorization should not hit a fatal error");

    let mut product = Integer::from(1);
    for f in &outcome.factors {
        product *= &f.value;
    }
    product *= &outcome.remaining;
    assert_eq!(product, n_copy, "reported factors must multiply back to N");

    let mut got: Vec<String> = outcome.factors.iter().map(|f| f.value.to_string()).collect();
    if outcome.remaining != 1 {
        got.push(outcome.remaining.to_string());
    }
    got.sort();
    let mut want: Vec<String> = expect_primes.iter().map(|s| s.to_string()).collect();
    want.sort();
    assert_eq!(got, want);
}

#[test]
fn small_semiprime_15347() {
    factor_and_check(Integer::from(15347u64), &["103", "149"]);
}

#[test]
fn seven_digit_semiprime() {
    factor_and_check(Integer::from(1_000_007u64), &["29", "34483"]);
}

#[test]
fn two_close_factors() {
    let n = Integer::from(3837523u64) * Integer::from(3837497u64);
    factor_and_check(n, &["3837523", "3837497"]);
}

#[test]
fn many_small_prime_factors() {
    // 2*3*5*7*101 = 21210; far below any fb_bound, so every prime up to
    // 101 lands directly in the factor base rather than needing a proper
    // large-number sieve, but the pipeline should still resolve it.
    let n = Integer::from(2 * 3 * 5 * 7 * 101u64);
    let engine = Engine::new(n.clone(), Overrides::default());
    let outcome = engine.factorize().expect("factorization should not hit a fatal error");
    let mut product = Integer::from(1);
    for f in &outcome.factors {
        product *= &f.value;
    }
    product *= &outcome.remaining;
    assert_eq!(product, n);
}

#[test]
fn mersenne_like_67_bit() {
    // 2^67 - 1 = 193707721 * 761838257287
    let n = Integer::from(2u32).pow(67) - Integer::from(1);
    factor_and_check(n, &["193707721", "761838257287"]);
}

#[test]
fn twenty_digit_semiprime() {
    // 16921456439215439701 = 2860486313 * 5915587277
    let n = Integer::from(2860486313u64) * Integer::from(5915587277u64);
    factor_and_check(n, &["2860486313", "5915587277"]);
}
