//! Reverse lookup from counterpart identity to preference position.
//!
//! ## Comparison Rule
//!
//! A counterpart absent from an agent's list has rank +infinity. A listed
//! counterpart always beats an absent one, and between two listed
//! counterparts the lower position wins.
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Build | O(total entries) |
//! | Rank lookup | O(1) |
//! | Compare two counterparts | O(1) |

use std::collections::HashMap;

use crate::types::agent::slot;
use crate::types::AgentId;

/// Per-agent identity to rank mapping for one side
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankIndex {
    /// Indexed by the owner's zero-based slot
    ranks: Vec<HashMap<AgentId, usize>>,
}

impl RankIndex {
    /// Build the index for every list of one side.
    ///
    /// Lists are expected to be normalized (no repeats). If a repeat slips
    /// through, its first position is kept.
    pub fn build(lists: &[Vec<AgentId>]) -> Self {
        let ranks = lists
            .iter()
            .map(|list| {
                let mut ranking = HashMap::with_capacity(list.len());
                for (rank, &id) in list.iter().enumerate() {
                    ranking.entry(id).or_insert(rank);
                }
                ranking
            })
            .collect();

        Self { ranks }
    }

    /// Position of `other` in `owner`'s list; `None` means unacceptable.
    ///
    /// Unknown owners find everyone unacceptable.
    #[inline]
    pub fn rank(&self, owner: AgentId, other: AgentId) -> Option<usize> {
        slot(owner)
            .and_then(|i| self.ranks.get(i))
            .and_then(|ranking| ranking.get(&other))
            .copied()
    }

    /// Check whether `owner` lists `other` at all
    #[inline]
    pub fn accepts(&self, owner: AgentId, other: AgentId) -> bool {
        self.rank(owner, other).is_some()
    }

    /// Check whether `owner` strictly prefers `challenger` to `incumbent`
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_match::preferences::RankIndex;
    ///
    /// let index = RankIndex::build(&[vec![3, 1]]);
    ///
    /// assert!(index.prefers(1, 3, 1));
    /// assert!(!index.prefers(1, 1, 3));
    /// // Listed beats unlisted
    /// assert!(index.prefers(1, 1, 2));
    /// assert!(!index.prefers(1, 2, 1));
    /// ```
    #[inline]
    pub fn prefers(&self, owner: AgentId, challenger: AgentId, incumbent: AgentId) -> bool {
        match (self.rank(owner, challenger), self.rank(owner, incumbent)) {
            (Some(new), Some(old)) => new < old,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Build a [`RankIndex`] for one side's lists
pub fn build_rank_index(lists: &[Vec<AgentId>]) -> RankIndex {
    RankIndex::build(lists)
}
