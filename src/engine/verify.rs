//! Independent checks on finished rounds.
//!
//! A pair (c, e) blocks a Match Set when both list each other, c ranks e
//! above its current employer (or is unmatched), and e ranks c above its
//! current candidate (or is unmatched). A Match Set without blocking pairs
//! is stable.
//!
//! Multi-round results are verified against the pruned lists each round
//! actually ran on, which [`verify_rounds`] rebuilds by replaying pruning.

use std::collections::HashSet;

use crate::error::{MatchError, Result};
use crate::preferences::PreferenceStore;
use crate::types::{AgentId, MatchSet, Pair, RoundResult};

/// Check that both directions of the Match Set agree.
///
/// With both directions consistent, no agent can be assigned twice.
pub fn check_injective(matches: &MatchSet) -> bool {
    let forward = matches
        .candidate_partner
        .iter()
        .enumerate()
        .filter_map(|(i, partner)| partner.map(|e| (i as AgentId + 1, e)))
        .all(|(c, e)| matches.candidate_of(e) == Some(c));

    let backward = matches
        .employer_partner
        .iter()
        .enumerate()
        .filter_map(|(i, partner)| partner.map(|c| (c, i as AgentId + 1)))
        .all(|(c, e)| matches.employer_of(c) == Some(e));

    let count = matches.candidate_partner.iter().flatten().count();

    forward && backward && count == matches.len()
}

/// First blocking pair in candidate order, then in that candidate's
/// preference order. `None` means the matching is stable.
pub fn find_blocking_pair(store: &PreferenceStore, matches: &MatchSet) -> Option<Pair> {
    let ranks = store.employer_ranks();

    for (i, list) in store.candidates().iter().enumerate() {
        let candidate = i as AgentId + 1;
        let current = matches.employer_of(candidate);

        for &employer in list {
            // Everything past the current partner is worse for the candidate
            if current == Some(employer) {
                break;
            }
            if !ranks.accepts(employer, candidate) {
                continue;
            }

            let employer_prefers = match matches.candidate_of(employer) {
                None => true,
                Some(held) => ranks.prefers(employer, candidate, held),
            };
            if employer_prefers {
                return Some(Pair::new(candidate, employer));
            }
        }
    }

    None
}

/// Verify one round against the lists it ran on.
///
/// # Panics
///
/// Panics on an inconsistent Match Set, which can only come from an engine
/// bug.
///
/// # Errors
///
/// [`MatchError::Unstable`] with the first blocking pair.
pub fn verify_round(store: &PreferenceStore, result: &RoundResult) -> Result<()> {
    assert!(
        check_injective(&result.matches),
        "round {} holds a non-injective match set",
        result.round
    );

    match find_blocking_pair(store, &result.matches) {
        Some(pair) => Err(MatchError::Unstable {
            round: result.round,
            candidate: pair.candidate,
            employer: pair.employer,
        }),
        None => Ok(()),
    }
}

/// Verify a multi-round sequence: each round stable on its pruned lists and
/// no pair repeated across rounds.
pub fn verify_rounds(store: &PreferenceStore, rounds: &[RoundResult]) -> Result<()> {
    let mut seen: HashSet<Pair> = HashSet::new();
    let mut current = store.clone();

    for result in rounds {
        verify_round(&current, result)?;

        let pairs = result.pairs();
        for pair in &pairs {
            assert!(
                seen.insert(pair.clone()),
                "pair ({}, {}) repeated in round {}",
                pair.candidate,
                pair.employer,
                result.round
            );
        }
        current = current.without_pairs(&pairs);
    }

    Ok(())
}
