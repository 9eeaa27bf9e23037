//! Partial injective mapping between candidates and employers.
//!
//! ## Layout
//!
//! Both directions are stored as dense vectors indexed by zero-based slot,
//! so lookups in either direction are O(1):
//!
//! ```text
//! candidate_partner[c - 1] = Some(e)  <=>  employer_partner[e - 1] = Some(c)
//! ```
//!
//! Only the engine mutates a Match Set. Once a round concludes the set is
//! handed out by value inside a [`RoundResult`](crate::types::RoundResult)
//! and is read-only from then on.

use crate::types::agent::slot;
use crate::types::{AgentId, Pair};

/// Current assignment of one round
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchSet {
    /// Employer held by each candidate
    pub(crate) candidate_partner: Vec<Option<AgentId>>,

    /// Candidate held by each employer
    pub(crate) employer_partner: Vec<Option<AgentId>>,

    /// Number of matched pairs
    matched: usize,
}

impl MatchSet {
    /// Create an empty Match Set for the given population sizes
    pub fn new(candidate_count: usize, employer_count: usize) -> Self {
        Self {
            candidate_partner: vec![None; candidate_count],
            employer_partner: vec![None; employer_count],
            matched: 0,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of matched pairs
    #[inline]
    pub fn len(&self) -> usize {
        self.matched
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }

    #[inline]
    pub fn candidate_count(&self) -> usize {
        self.candidate_partner.len()
    }

    #[inline]
    pub fn employer_count(&self) -> usize {
        self.employer_partner.len()
    }

    /// Number of candidates left without an employer
    pub fn unmatched_candidates(&self) -> usize {
        self.candidate_count() - self.matched
    }

    /// Number of employers left without a candidate
    pub fn unmatched_employers(&self) -> usize {
        self.employer_count() - self.matched
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Employer matched to `candidate`, if any.
    ///
    /// Out-of-range identities are simply unmatched.
    #[inline]
    pub fn employer_of(&self, candidate: AgentId) -> Option<AgentId> {
        slot(candidate)
            .and_then(|i| self.candidate_partner.get(i))
            .copied()
            .flatten()
    }

    /// Candidate matched to `employer`, if any
    #[inline]
    pub fn candidate_of(&self, employer: AgentId) -> Option<AgentId> {
        slot(employer)
            .and_then(|i| self.employer_partner.get(i))
            .copied()
            .flatten()
    }

    /// Check whether `candidate` and `employer` are matched to each other
    #[inline]
    pub fn contains(&self, candidate: AgentId, employer: AgentId) -> bool {
        self.employer_of(candidate) == Some(employer)
    }

    /// All pairs in ascending candidate order
    pub fn pairs(&self) -> Vec<Pair> {
        self.candidate_partner
            .iter()
            .enumerate()
            .filter_map(|(i, partner)| partner.map(|e| Pair::new(i as AgentId + 1, e)))
            .collect()
    }

    // ========================================================================
    // Mutation (engine only)
    // ========================================================================

    /// Tentatively match `candidate` with `employer`.
    ///
    /// Returns the rival the employer held before, who is now unmatched.
    ///
    /// # Panics
    ///
    /// Panics if either identity is out of range or the candidate already
    /// holds an employer. Either case is an engine bug.
    pub(crate) fn engage(&mut self, candidate: AgentId, employer: AgentId) -> Option<AgentId> {
        let c = slot(candidate)
            .filter(|&i| i < self.candidate_partner.len())
            .unwrap_or_else(|| panic!("candidate {candidate} out of range"));
        let e = slot(employer)
            .filter(|&i| i < self.employer_partner.len())
            .unwrap_or_else(|| panic!("employer {employer} out of range"));

        assert!(
            self.candidate_partner[c].is_none(),
            "candidate {candidate} is already matched"
        );

        let rival = self.employer_partner[e].replace(candidate);
        self.candidate_partner[c] = Some(employer);

        match rival {
            Some(rival) => {
                // Rival's slot is in range: it was engaged through this method
                let r = (rival - 1) as usize;
                debug_assert_eq!(self.candidate_partner[r], Some(employer));
                self.candidate_partner[r] = None;
            }
            None => self.matched += 1,
        }

        rival
    }
}
