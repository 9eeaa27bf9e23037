//! Matching engine module.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Same lists always produce the same rounds, proposal
//!    log included
//! 2. **Purity**: Results depend only on the input lists and the round
//!    count; no process-wide state
//! 3. **Synchronous Execution**: Rounds are finite in-memory computations
//!    with no blocking, timeouts or cancellation
//!
//! ## Matching Rules
//!
//! - **Candidates** propose down their lists, one proposal per step
//! - **Employers** hold the best acceptable proposer seen so far
//! - A proposer absent from an employer's list is **always rejected**
//! - A round ends when no unmatched candidate has anyone left to propose to
//!
//! ## Example
//!
//! ```
//! use deferred_match::{MatchingEngine, PreferenceStore};
//! use deferred_match::engine::verify::find_blocking_pair;
//!
//! let store = PreferenceStore::from_lists(
//!     vec![vec![1, 2], vec![2, 1]],
//!     vec![vec![1, 2], vec![2, 1]],
//! );
//! let mut engine = MatchingEngine::new();
//!
//! let rounds = engine.run_multi_round(&store, 2).unwrap();
//! assert_eq!(rounds.len(), 2);
//! assert!(find_blocking_pair(&store, &rounds[0].matches).is_none());
//! ```

pub mod matcher;
pub mod multi;
pub mod verify;

pub use matcher::{EngineStats, MatchingEngine};
