//! Reporting for finished rounds.
//!
//! - [`writer`]: single-round table and multi-round pair files
//! - [`displacement`]: per-round displacement averages
//!
//! Round metrics and digests live on [`RoundResult`](crate::types::RoundResult)
//! itself.

pub mod displacement;
pub mod writer;

pub use displacement::{DisplacementReport, RoundDisplacement};
pub use writer::{pair_rows, write_pair_files, write_round, write_round_file, UNMATCHED};
