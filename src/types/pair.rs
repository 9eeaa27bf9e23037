//! A matched (candidate, employer) pair.
//!
//! ## SSZ Serialization
//!
//! Pairs derive `SimpleSerialize` so a round's pairs can be encoded
//! deterministically and hashed into a round digest. A pair is a fixed-size
//! container of two little-endian `u32` values (8 bytes).

use ssz_rs::prelude::*;

use crate::types::AgentId;

/// One matched pair within a round.
///
/// Ordering is by candidate first, then employer, which is the order pairs
/// are reported and hashed in.
///
/// ## Example
///
/// ```
/// use deferred_match::types::Pair;
///
/// let pair = Pair::new(1, 2);
/// assert_eq!(pair.candidate, 1);
/// assert_eq!(pair.employer, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, SimpleSerialize)]
pub struct Pair {
    /// Candidate identity (1-based)
    pub candidate: AgentId,

    /// Employer identity (1-based)
    pub employer: AgentId,
}

impl Pair {
    pub fn new(candidate: AgentId, employer: AgentId) -> Self {
        Self {
            candidate,
            employer,
        }
    }
}
