//! Preference Store module.
//!
//! ## Components
//!
//! - [`parse`]: Tokenizing tabular rows and normalizing them into identity lists
//! - [`RankIndex`]: Reverse lookup from counterpart to preference position
//! - [`PreferenceStore`]: Both sides' lists plus their rank indices
//!
//! ## Normalization Rules
//!
//! - Non-positive entries are padding and are dropped
//! - Order is preserved, most preferred first
//! - A repeated identity keeps its first position
//! - A non-integer token fails the whole load with the row that held it

pub mod parse;
pub mod rank;
pub mod store;

pub use parse::parse_rows;
pub use rank::{build_rank_index, RankIndex};
pub use store::PreferenceStore;
