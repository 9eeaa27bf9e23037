//! Core data types for the matching engine
//!
//! ## Types
//!
//! - [`AgentId`]: 1-based identity of a candidate or employer
//! - [`Side`]: Candidate or Employer
//! - [`Pair`]: A matched (candidate, employer) pair
//! - [`MatchSet`]: Partial injective mapping built during one round
//! - [`Proposal`] / [`ProposalOutcome`]: One step of the proposal log
//! - [`RoundResult`] / [`RoundMetrics`]: Finished round and its summary

pub(crate) mod agent;
mod match_set;
mod pair;
mod round;

// Re-export all types at module level
pub use agent::{AgentId, Side};
pub use match_set::MatchSet;
pub use pair::Pair;
pub use round::{Proposal, ProposalOutcome, RoundMetrics, RoundResult};
