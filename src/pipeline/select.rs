// src/pipeline/select.rs

//! Two-stage random selection: weighted pool choice, then uniform pick.
//!
//! Weights arbitrate "missing vs. cutoff-unmet" priority, not item counts:
//! a pool with one item gets the same share as a pool with a thousand.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::models::{Candidate, SourcePool};

/// Choose which pool to draw from.
///
/// With both pools non-empty, one uniform roll in `[0, 1)` picks missing if it
/// falls below `missing_weight / (missing_weight + cutoff_weight)`. A single
/// non-empty pool is returned regardless of weights. `None` when both are empty.
pub fn choose_pool<'a, T, R: Rng>(
    missing: &'a [T],
    cutoff: &'a [T],
    missing_weight: f64,
    cutoff_weight: f64,
    rng: &mut R,
) -> Option<(SourcePool, &'a [T])> {
    match (missing.is_empty(), cutoff.is_empty()) {
        (false, false) => {
            let missing_probability = missing_weight / (missing_weight + cutoff_weight);
            let roll: f64 = rng.random();
            let chosen = if roll < missing_probability {
                (SourcePool::Missing, missing)
            } else {
                (SourcePool::CutoffUnmet, cutoff)
            };
            log::debug!(
                "Pool choice roll={:.5} missing_probability={:.5} chosen={}",
                roll,
                missing_probability,
                chosen.0
            );
            Some(chosen)
        }
        (false, true) => {
            log::debug!("Only missing has candidates; using missing pool");
            Some((SourcePool::Missing, missing))
        }
        (true, false) => {
            log::debug!("Only cutoff-unmet has candidates; using cutoff-unmet pool");
            Some((SourcePool::CutoffUnmet, cutoff))
        }
        (true, true) => None,
    }
}

/// Pick one candidate: weighted pool first, then uniform within the pool.
pub fn pick_candidate<R: Rng>(
    missing: &[Candidate],
    cutoff: &[Candidate],
    missing_weight: f64,
    cutoff_weight: f64,
    rng: &mut R,
) -> Option<Candidate> {
    let (_, pool) = choose_pool(missing, cutoff, missing_weight, cutoff_weight, rng)?;
    pool.choose(rng).cloned()
}
