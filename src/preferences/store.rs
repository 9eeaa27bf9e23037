//! Preference Store: validated lists for both sides plus their rank indices.
//!
//! ## Lifecycle
//!
//! A store is built once from external input and is never mutated. The
//! multi-round orchestrator derives pruned copies with
//! [`PreferenceStore::without_pairs`], leaving the original intact.
//!
//! ## Example
//!
//! ```
//! use deferred_match::PreferenceStore;
//!
//! let store = PreferenceStore::load(
//!     &[vec!["2", "1", "0"], vec!["1"]],
//!     &[vec!["1", "2"], vec!["2", "-1"]],
//! ).unwrap();
//!
//! assert_eq!(store.candidate_prefs(1), &[2, 1]);
//! assert_eq!(store.employer_prefs(2), &[2]);
//! assert_eq!(store.employer_ranks().rank(1, 2), Some(1));
//! ```

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{MatchError, Result};
use crate::preferences::parse::{normalize_rows, parse_rows};
use crate::preferences::{build_rank_index, RankIndex};
use crate::types::agent::slot;
use crate::types::{AgentId, Pair, Side};

/// Ranked preference lists for candidates and employers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreferenceStore {
    /// Employers acceptable to each candidate, most preferred first
    candidates: Vec<Vec<AgentId>>,

    /// Candidates acceptable to each employer, most preferred first
    employers: Vec<Vec<AgentId>>,

    /// Candidate identity -> rank, per employer (drives rejections)
    employer_ranks: RankIndex,

    /// Employer identity -> rank, per candidate (drives displacement)
    candidate_ranks: RankIndex,
}

impl PreferenceStore {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Validate and normalize raw token rows for both sides.
    ///
    /// Row `n` of each side is agent `n`. Non-positive entries are padding,
    /// order is preserved, and identity ranges are not checked: an
    /// out-of-range identity simply never matches.
    ///
    /// # Errors
    ///
    /// [`MatchError::MalformedInput`] on the first token that is not an
    /// integer identity.
    pub fn load<S: AsRef<str>>(raw_candidates: &[Vec<S>], raw_employers: &[Vec<S>]) -> Result<Self> {
        let candidates = normalize_rows(raw_candidates, Side::Candidate)?;
        let employers = normalize_rows(raw_employers, Side::Employer)?;

        Ok(Self::from_lists(candidates, employers))
    }

    /// Load both sides from tabular text
    pub fn from_text(candidates: &str, employers: &str) -> Result<Self> {
        Self::load(&parse_rows(candidates), &parse_rows(employers))
    }

    /// Read and load the two preference files
    pub fn from_files(candidates_path: impl AsRef<Path>, employers_path: impl AsRef<Path>) -> Result<Self> {
        let candidates_path = candidates_path.as_ref();
        let employers_path = employers_path.as_ref();

        let candidates = fs::read_to_string(candidates_path)
            .map_err(|e| MatchError::io(candidates_path, e))?;
        let employers = fs::read_to_string(employers_path)
            .map_err(|e| MatchError::io(employers_path, e))?;

        let store = Self::from_text(&candidates, &employers)?;
        debug!(
            candidates = store.candidate_count(),
            employers = store.employer_count(),
            entries = store.total_candidate_entries(),
            "loaded preference files"
        );
        Ok(store)
    }

    /// Build a store from identity lists that are already integers.
    ///
    /// Zero entries and repeats are dropped the same way [`load`](Self::load)
    /// drops them.
    pub fn from_lists(candidates: Vec<Vec<AgentId>>, employers: Vec<Vec<AgentId>>) -> Self {
        let candidates: Vec<Vec<AgentId>> = candidates.into_iter().map(dedup_positive).collect();
        let employers: Vec<Vec<AgentId>> = employers.into_iter().map(dedup_positive).collect();

        let employer_ranks = build_rank_index(&employers);
        let candidate_ranks = build_rank_index(&candidates);

        Self {
            candidates,
            employers,
            employer_ranks,
            candidate_ranks,
        }
    }

    // ========================================================================
    // Access
    // ========================================================================

    #[inline]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn employer_count(&self) -> usize {
        self.employers.len()
    }

    /// All candidate lists, indexed by zero-based slot
    #[inline]
    pub fn candidates(&self) -> &[Vec<AgentId>] {
        &self.candidates
    }

    /// All employer lists, indexed by zero-based slot
    #[inline]
    pub fn employers(&self) -> &[Vec<AgentId>] {
        &self.employers
    }

    /// List of one candidate (empty for unknown identities)
    pub fn candidate_prefs(&self, candidate: AgentId) -> &[AgentId] {
        lookup(&self.candidates, candidate)
    }

    /// List of one employer (empty for unknown identities)
    pub fn employer_prefs(&self, employer: AgentId) -> &[AgentId] {
        lookup(&self.employers, employer)
    }

    #[inline]
    pub fn employer_ranks(&self) -> &RankIndex {
        &self.employer_ranks
    }

    #[inline]
    pub fn candidate_ranks(&self) -> &RankIndex {
        &self.candidate_ranks
    }

    /// Sum of candidate list lengths; an upper bound on proposals per round
    pub fn total_candidate_entries(&self) -> usize {
        self.candidates.iter().map(Vec::len).sum()
    }

    /// Largest employer identity listed by any candidate
    pub fn max_listed_employer(&self) -> Option<AgentId> {
        self.candidates.iter().flatten().copied().max()
    }

    /// Report a side with no agents.
    ///
    /// This is a degenerate but valid input: the engine returns an empty
    /// Match Set for it. Callers decide whether to warn or abort.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.candidates.is_empty() || self.employers.is_empty() {
            return Err(MatchError::EmptyInput {
                candidates: self.candidate_count(),
                employers: self.employer_count(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Pruning
    // ========================================================================

    /// Copy of this store with every pair removed from both agents' lists.
    ///
    /// The employer is dropped from the candidate's list and the candidate
    /// from the employer's list; all other entries keep their order.
    pub fn without_pairs<'a>(&self, pairs: impl IntoIterator<Item = &'a Pair>) -> Self {
        let mut candidates = self.candidates.clone();
        let mut employers = self.employers.clone();

        for pair in pairs {
            match slot(pair.candidate).and_then(|i| candidates.get_mut(i)) {
                Some(list) => list.retain(|&e| e != pair.employer),
                None => warn!(candidate = pair.candidate, "pruned pair names unknown candidate"),
            }
            match slot(pair.employer).and_then(|i| employers.get_mut(i)) {
                Some(list) => list.retain(|&c| c != pair.candidate),
                None => warn!(employer = pair.employer, "pruned pair names unknown employer"),
            }
        }

        let employer_ranks = build_rank_index(&employers);
        let candidate_ranks = build_rank_index(&candidates);

        Self {
            candidates,
            employers,
            employer_ranks,
            candidate_ranks,
        }
    }
}

fn lookup(lists: &[Vec<AgentId>], id: AgentId) -> &[AgentId] {
    slot(id)
        .and_then(|i| lists.get(i))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn dedup_positive(list: Vec<AgentId>) -> Vec<AgentId> {
    let mut out = Vec::with_capacity(list.len());
    for id in list {
        if id != 0 && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> PreferenceStore {
        PreferenceStore::from_lists(
            vec![vec![2, 1, 3], vec![1, 3, 2], vec![1, 2, 3]],
            vec![vec![1, 2, 3], vec![2, 1, 3], vec![1, 3, 2]],
        )
    }

    #[test]
    fn test_load_filters_padding() {
        let store = PreferenceStore::load(
            &[vec!["3", "0", "1"], vec!["0", "0"]],
            &[vec!["-1", "2"]],
        )
        .unwrap();

        assert_eq!(store.candidate_count(), 2);
        assert_eq!(store.employer_count(), 1);
        assert_eq!(store.candidate_prefs(1), &[3, 1]);
        assert!(store.candidate_prefs(2).is_empty());
        assert_eq!(store.employer_prefs(1), &[2]);
    }

    #[test]
    fn test_load_malformed_employer_row() {
        let err = PreferenceStore::load(&[vec!["1"]], &[vec!["1"], vec!["2", "abc"]]).unwrap_err();

        assert!(matches!(
            err,
            MatchError::MalformedInput { side: Side::Employer, row: 2, .. }
        ));
    }

    #[test]
    fn test_from_text() {
        let store = PreferenceStore::from_text("2,1\n1,2\n", "1,0\n\n").unwrap();

        assert_eq!(store.candidate_count(), 2);
        assert_eq!(store.employer_count(), 1);
        assert_eq!(store.employer_prefs(1), &[1]);
    }

    #[test]
    fn test_inner_blank_line_keeps_later_identities() {
        let store = PreferenceStore::from_text("1\n\n2\n", "1\n3\n").unwrap();

        assert_eq!(store.candidate_count(), 3);
        assert!(store.candidate_prefs(2).is_empty());
        assert_eq!(store.candidate_prefs(3), &[2]);
        assert_eq!(store.employer_prefs(2), &[3]);
    }

    #[test]
    fn test_from_lists_drops_zero_and_repeats() {
        let store = PreferenceStore::from_lists(vec![vec![0, 2, 2, 1]], vec![]);

        assert_eq!(store.candidate_prefs(1), &[2, 1]);
    }

    #[test]
    fn test_rank_indices_built_for_both_sides() {
        let store = sample();

        assert_eq!(store.employer_ranks().rank(2, 2), Some(0));
        assert_eq!(store.employer_ranks().rank(2, 3), Some(2));
        assert_eq!(store.candidate_ranks().rank(1, 2), Some(0));
    }

    #[test]
    fn test_unknown_agent_has_empty_list() {
        let store = sample();

        assert!(store.candidate_prefs(0).is_empty());
        assert!(store.employer_prefs(99).is_empty());
    }

    #[test]
    fn test_totals() {
        let store = sample();

        assert_eq!(store.total_candidate_entries(), 9);
        assert_eq!(store.max_listed_employer(), Some(3));
    }

    #[test]
    fn test_ensure_non_empty() {
        assert!(sample().ensure_non_empty().is_ok());

        let err = PreferenceStore::from_lists(vec![vec![1]], vec![])
            .ensure_non_empty()
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::EmptyInput { candidates: 1, employers: 0 }
        ));
    }

    #[test]
    fn test_without_pairs_leaves_original_intact() {
        let store = sample();
        let pruned = store.without_pairs(&[Pair::new(1, 2), Pair::new(3, 3)]);

        assert_eq!(pruned.candidate_prefs(1), &[1, 3]);
        assert_eq!(pruned.candidate_prefs(3), &[1, 2]);
        assert_eq!(pruned.employer_prefs(2), &[2, 3]);
        assert_eq!(pruned.employer_prefs(3), &[1, 2]);
        assert_eq!(pruned.employer_ranks().rank(2, 3), Some(1));
        assert_eq!(pruned.employer_ranks().rank(2, 1), None);

        assert_eq!(store, sample());
    }

    #[test]
    fn test_without_pairs_ignores_unknown_agents() {
        let store = sample();
        let pruned = store.without_pairs(&[Pair::new(9, 9)]);

        assert_eq!(pruned, store);
    }

    #[test]
    fn test_from_files_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = dir.path().join("candidates.csv");
        let employers = dir.path().join("employers.csv");
        writeln!(fs::File::create(&candidates).unwrap(), "1,2\n2,1").unwrap();
        writeln!(fs::File::create(&employers).unwrap(), "2,1,0\n1,2,0").unwrap();

        let store = PreferenceStore::from_files(&candidates, &employers).unwrap();

        assert_eq!(store.candidate_prefs(2), &[2, 1]);
        assert_eq!(store.employer_prefs(1), &[2, 1]);
    }

    #[test]
    fn test_from_files_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");

        let err = PreferenceStore::from_files(&missing, &missing).unwrap_err();
        assert!(matches!(err, MatchError::Io { .. }));
    }
}
