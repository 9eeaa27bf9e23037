//! Multi-round orchestration (multi-match).
//!
//! ## Procedure
//!
//! ```text
//! lists_1 = original
//! round r: result_r = DA(lists_r)
//!          empty result_r  -> stop
//!          lists_{r+1} = lists_r minus every pair of result_r (both sides)
//! ```
//!
//! Rounds run strictly in sequence since pruning depends on the finished
//! round. The caller's store is never modified; each round after the first
//! runs on a pruned copy.

use tracing::{debug, info};

use crate::engine::MatchingEngine;
use crate::error::{MatchError, Result};
use crate::preferences::PreferenceStore;
use crate::types::RoundResult;

pub(crate) fn run_rounds(
    engine: &mut MatchingEngine,
    store: &PreferenceStore,
    k: usize,
) -> Result<Vec<RoundResult>> {
    if k == 0 {
        return Err(MatchError::InvalidRoundCount);
    }

    let mut rounds: Vec<RoundResult> = Vec::new();
    let mut pruned: Option<PreferenceStore> = None;

    for round in 1..=k {
        let current = pruned.as_ref().unwrap_or(store);
        let result = engine.execute(current, round);

        if result.is_empty() {
            info!(round, "no further pairs obtainable, stopping early");
            break;
        }

        let next = current.without_pairs(&result.pairs());
        debug!(
            round,
            pairs = result.matches.len(),
            remaining_entries = next.total_candidate_entries(),
            "pruned matched pairs"
        );

        pruned = Some(next);
        rounds.push(result);
    }

    info!(requested = k, produced = rounds.len(), "multi-round matching finished");
    Ok(rounds)
}
