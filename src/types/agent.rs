//! Agent identities and the two sides of the market.

use std::fmt;

/// Identity of a candidate or an employer.
///
/// Identities are dense and 1-based: the agent on row `n` of its side's
/// preference file has identity `n`. Zero is never a valid identity.
pub type AgentId = u32;

/// Which population an agent belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Proposing side
    #[default]
    Candidate,
    /// Receiving side
    Employer,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Candidate => "candidate",
            Side::Employer => "employer",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-based slot of an identity in a per-side vector.
///
/// Returns `None` for identity 0.
#[inline]
pub(crate) fn slot(id: AgentId) -> Option<usize> {
    (id as usize).checked_sub(1)
}
