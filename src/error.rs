//! Error type shared by every stage of a matching run.
//!
//! Parse failures are fatal and carry the offending row. An empty side is
//! reported through [`MatchError::EmptyInput`] but callers are expected to
//! treat it as a warning: the engine handles it by producing an empty
//! Match Set.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{AgentId, Side};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Debug, Error)]
pub enum MatchError {
    /// A preference row contains a token that is not an integer identity.
    #[error("malformed {side} preferences at row {row}: invalid token {token:?}")]
    MalformedInput {
        side: Side,
        /// 1-based row number, which is also the agent identity
        row: usize,
        token: String,
    },

    /// One side has no agents at all.
    #[error("empty input: {candidates} candidates, {employers} employers")]
    EmptyInput { candidates: usize, employers: usize },

    #[error("multi-round matching needs at least one round")]
    InvalidRoundCount,

    /// Verification found a blocking pair in a finished round.
    #[error("round {round} is unstable: candidate {candidate} and employer {employer} block it")]
    Unstable {
        round: usize,
        candidate: AgentId,
        employer: AgentId,
    },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode round digest: {0}")]
    Encoding(String),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

impl MatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MatchError::Io {
            path: path.into(),
            source,
        }
    }
}
