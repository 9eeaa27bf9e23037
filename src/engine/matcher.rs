//! Candidate-proposing Deferred Acceptance.
//!
//! ## Selection Rule
//!
//! Active candidates wait in a FIFO queue seeded in ascending identity
//! order. Each step takes exactly one proposal from the head candidate:
//!
//! - rejected: the candidate stays at the head and proposes again next step
//! - accepted: the candidate leaves the queue
//! - a displaced rival joins the tail, keeping its cursor
//! - a candidate whose cursor ran past its list is dropped
//!
//! The final Match Set does not depend on this order; the proposal log does.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::Result;
use crate::preferences::PreferenceStore;
use crate::types::{AgentId, MatchSet, Proposal, ProposalOutcome, RoundResult};

/// Running totals across every round an engine has executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub rounds: u64,
    pub proposals: u64,
    pub pairs: u64,
}

/// Matching engine: runs single rounds and multi-round orchestration.
///
/// The engine never mutates a [`PreferenceStore`]. Its only state is the
/// running [`EngineStats`], which do not influence results.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    stats: EngineStats,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Compute one stable matching over `store`.
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_match::{MatchingEngine, PreferenceStore};
    ///
    /// let store = PreferenceStore::from_lists(
    ///     vec![vec![2, 1, 3], vec![1, 3, 2], vec![1, 2, 3]],
    ///     vec![vec![1, 2, 3], vec![2, 1, 3], vec![1, 3, 2]],
    /// );
    /// let result = MatchingEngine::new().run_round(&store);
    ///
    /// assert_eq!(result.matches.employer_of(1), Some(2));
    /// assert_eq!(result.matches.employer_of(2), Some(1));
    /// assert_eq!(result.matches.employer_of(3), Some(3));
    /// ```
    pub fn run_round(&mut self, store: &PreferenceStore) -> RoundResult {
        self.execute(store, 1)
    }

    /// Produce up to `k` pairwise disjoint stable matchings.
    ///
    /// See [`multi`](crate::engine::multi) for the pruning procedure.
    pub fn run_multi_round(&mut self, store: &PreferenceStore, k: usize) -> Result<Vec<RoundResult>> {
        super::multi::run_rounds(self, store, k)
    }

    pub(crate) fn execute(&mut self, store: &PreferenceStore, round: usize) -> RoundResult {
        let result = deferred_acceptance(store, round);

        self.stats.rounds += 1;
        self.stats.proposals += result.proposals.len() as u64;
        self.stats.pairs += result.matches.len() as u64;

        result
    }
}

/// One convergence pass of Deferred Acceptance
pub(crate) fn deferred_acceptance(store: &PreferenceStore, round: usize) -> RoundResult {
    let lists = store.candidates();
    let ranks = store.employer_ranks();

    let mut matches = MatchSet::new(store.candidate_count(), store.employer_count());
    let mut cursors = vec![0usize; lists.len()];
    let mut proposals = Vec::with_capacity(lists.len());
    let mut active: VecDeque<AgentId> = (1..=lists.len() as AgentId).collect();

    while let Some(candidate) = active.pop_front() {
        let slot = (candidate - 1) as usize;
        let Some(&employer) = lists[slot].get(cursors[slot]) else {
            trace!(round, candidate, "preference list exhausted");
            continue;
        };
        cursors[slot] += 1;

        // Unlisted proposers and out-of-range employers are rejected here
        let outcome = if !ranks.accepts(employer, candidate) {
            ProposalOutcome::Rejected
        } else {
            match matches.candidate_of(employer) {
                None => {
                    matches.engage(candidate, employer);
                    ProposalOutcome::Accepted
                }
                Some(rival) if ranks.prefers(employer, candidate, rival) => {
                    matches.engage(candidate, employer);
                    active.push_back(rival);
                    ProposalOutcome::Displaced { rival }
                }
                Some(_) => ProposalOutcome::Rejected,
            }
        };

        if outcome == ProposalOutcome::Rejected {
            active.push_front(candidate);
        }

        trace!(round, candidate, employer, ?outcome, "proposal");
        proposals.push(Proposal {
            candidate,
            employer,
            outcome,
        });
    }

    debug_assert!(proposals.len() <= store.total_candidate_entries());
    debug!(
        round,
        proposals = proposals.len(),
        pairs = matches.len(),
        unmatched_candidates = matches.unmatched_candidates(),
        "round converged"
    );

    RoundResult {
        round,
        matches,
        proposals,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
