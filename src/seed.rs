//! Seeded randomness for draws.
//!
//! Every random choice a strategy makes is drawn from a generator keyed by
//! `"{tournament}:{round}:{label}"`, so the same round always yields the same
//! draw. `FxHasher64` is used instead of `DefaultHasher`, whose output is not
//! stable across Rust releases, and instead of `FxHasher`, which hashes in
//! `usize` words.
//!
//! The seed is the same on every target. The stream is not: rand 0.8's
//! `SmallRng` is Xoshiro256++ on 64-bit targets and Xoshiro128++ on 32-bit
//! ones, so draws repeat exactly only on targets of the same pointer width.

use std::hash::{Hash, Hasher};

use fxhash::FxHasher64;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::model::entity::Round;

pub fn seed_for(tournament: &str, round: Round, label: &str) -> u64 {
    let mut hasher = FxHasher64::default();
    format!("{}:{}:{}", tournament, round, label).hash(&mut hasher);
    hasher.finish()
}

pub fn seeded_rng(tournament: &str, round: Round, label: &str) -> SmallRng {
    SmallRng::seed_from_u64(seed_for(tournament, round, label))
}
