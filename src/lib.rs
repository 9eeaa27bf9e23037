//! # Deferred Match
//!
//! Two-sided stable matching between candidates and employers.
//!
//! ## Architecture
//!
//! - **Preferences**: Validated ranked lists for both sides plus rank indices
//! - **Engine**: Deferred Acceptance (Gale-Shapley) for one round, and
//!   multi-round orchestration producing disjoint stable matchings
//! - **Report**: Output files, round metrics and displacement analytics
//!
//! ## Design Principles
//!
//! 1. **Stability**: Every round's Match Set has no blocking pair
//! 2. **Determinism**: Identical lists produce identical rounds
//! 3. **Immutability**: The loaded store is never mutated; later rounds run
//!    on pruned copies
//! 4. **No Floating Point**: Reported averages are fixed-point decimals
//!
//! ## Example
//!
//! ```
//! use deferred_match::{MatchingEngine, PreferenceStore};
//!
//! let store = PreferenceStore::from_text("2,1,3\n1,3,2\n1,2,3\n", "1,2,3\n2,1,3\n1,3,2\n").unwrap();
//! let mut engine = MatchingEngine::new();
//!
//! let result = engine.run_round(&store);
//! assert_eq!(result.matches.len(), 3);
//! assert_eq!(result.metrics().total_proposals, 5);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: AgentId, Pair, MatchSet, RoundResult
pub mod types;

/// Preference Store: parsing, normalization and rank indices
pub mod preferences;

/// Matching engine: Deferred Acceptance and multi-round orchestration
pub mod engine;

/// Output files and displacement analytics
pub mod report;

/// Layered run configuration
pub mod config;

/// Crate error type
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{EngineStats, MatchingEngine};
pub use error::{MatchError, Result};
pub use preferences::{build_rank_index, PreferenceStore, RankIndex};
pub use types::{AgentId, MatchSet, Pair, Proposal, ProposalOutcome, RoundMetrics, RoundResult, Side};
