//! Round results: the finished Match Set plus the proposal log.
//!
//! ## Digest
//!
//! A round digest is the SHA-256 of the SSZ-encoded pairs in ascending
//! candidate order. Two rounds with the same digest hold the same Match
//! Set, which makes the digest a cheap determinism check across runs.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::error::{MatchError, Result};
use crate::types::{AgentId, MatchSet, Pair};

/// What the employer did with a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProposalOutcome {
    /// Employer was free and accepted tentatively
    Accepted,
    /// Employer dropped `rival` for the proposer
    Displaced { rival: AgentId },
    /// Employer kept its current match or found the proposer unacceptable
    Rejected,
}

impl ProposalOutcome {
    /// Check if the proposer ended up holding the employer
    #[inline]
    pub fn is_accepted(self) -> bool {
        !matches!(self, ProposalOutcome::Rejected)
    }
}

/// A single proposal step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Proposal {
    pub candidate: AgentId,
    pub employer: AgentId,
    pub outcome: ProposalOutcome,
}

/// Summary numbers for one round.
///
/// The average is fixed-point with two decimal places.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundMetrics {
    /// Total proposals issued
    pub total_proposals: usize,

    /// Proposals per candidate, rounded to 2 places
    pub average_proposals: Decimal,

    /// Candidates left without an employer
    pub unmatched_candidates: usize,

    /// Matched pairs
    pub matched_pairs: usize,
}

/// Outcome of one convergence pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// 1-based round number
    pub round: usize,

    /// Final assignment of the round
    pub matches: MatchSet,

    /// Proposals in the order they were made
    pub proposals: Vec<Proposal>,
}

impl RoundResult {
    /// Matched pairs in ascending candidate order
    pub fn pairs(&self) -> Vec<Pair> {
        self.matches.pairs()
    }

    /// Check whether the round produced no pairs
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Compute the summary metrics for this round
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_match::{MatchingEngine, PreferenceStore};
    ///
    /// let store = PreferenceStore::from_lists(vec![vec![1], vec![1]], vec![vec![2, 1]]);
    /// let result = MatchingEngine::new().run_round(&store);
    /// let metrics = result.metrics();
    ///
    /// assert_eq!(metrics.total_proposals, 2);
    /// assert_eq!(metrics.average_proposals.to_string(), "1.00");
    /// assert_eq!(metrics.unmatched_candidates, 1);
    /// ```
    pub fn metrics(&self) -> RoundMetrics {
        let total_proposals = self.proposals.len();
        let candidates = self.matches.candidate_count();

        let mut average_proposals = if candidates == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(total_proposals as u64) / Decimal::from(candidates as u64)).round_dp(2)
        };
        // Two places in the rendered value, whole numbers included
        average_proposals.rescale(2);

        RoundMetrics {
            total_proposals,
            average_proposals,
            unmatched_candidates: self.matches.unmatched_candidates(),
            matched_pairs: self.matches.len(),
        }
    }

    /// SHA-256 over the SSZ encoding of the round's pairs
    pub fn digest(&self) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();

        for pair in self.matches.pairs() {
            let bytes = ssz_rs::serialize(&pair)
                .map_err(|e| MatchError::Encoding(format!("{e:?}")))?;
            hasher.update(&bytes);
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Ok(digest)
    }

    /// Get the digest as a hex string
    pub fn digest_hex(&self) -> Result<String> {
        self.digest().map(hex::encode)
    }
}
