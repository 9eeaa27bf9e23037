//! Tokenizing and normalizing raw preference rows.
//!
//! ## Row Format
//!
//! ```text
//! 2,1,3
//! 1,0,0      <- zeros are padding
//! 3,-1,2,    <- negatives and empty tokens are padding too
//! ```
//!
//! Row `n` (1-based) belongs to agent `n`. A blank line is an agent with an
//! empty list; blank lines after the last non-blank row are ignored.
//!
//! ## Blank Lines
//!
//! Many CSV readers (pandas `read_csv`, `str.strip().split`) skip blank
//! lines, which shifts the identity of every later row down by one. Here a
//! blank line keeps its row, so identities always equal physical line
//! numbers. Files with inner blank lines therefore number agents
//! differently than those readers do.

use std::collections::HashSet;

use tracing::trace;

use crate::error::{MatchError, Result};
use crate::types::{AgentId, Side};

/// Split tabular text into rows of raw tokens.
///
/// No validation happens here; see [`normalize_row`].
pub fn parse_rows(text: &str) -> Vec<Vec<&str>> {
    let mut rows: Vec<Vec<&str>> = text
        .lines()
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .collect()
        })
        .collect();

    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }

    rows
}

/// Turn one row of raw tokens into an ordered identity list.
///
/// Non-positive values are dropped, order is preserved, and a repeated
/// identity keeps only its first (most preferred) position.
///
/// # Errors
///
/// [`MatchError::MalformedInput`] when a token is not an integer or does
/// not fit an [`AgentId`].
pub fn normalize_row<S: AsRef<str>>(tokens: &[S], side: Side, row: usize) -> Result<Vec<AgentId>> {
    let mut seen = HashSet::with_capacity(tokens.len());
    let mut list = Vec::with_capacity(tokens.len());

    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }

        let malformed = || MatchError::MalformedInput {
            side,
            row,
            token: token.to_string(),
        };

        let value: i64 = token.parse().map_err(|_| malformed())?;
        if value <= 0 {
            continue;
        }
        let id = AgentId::try_from(value).map_err(|_| malformed())?;

        if seen.insert(id) {
            list.push(id);
        } else {
            trace!(%side, row, id, "dropping repeated preference entry");
        }
    }

    Ok(list)
}

/// Normalize every row of one side
pub fn normalize_rows<S: AsRef<str>>(rows: &[Vec<S>], side: Side) -> Result<Vec<Vec<AgentId>>> {
    rows.iter()
        .enumerate()
        .map(|(i, tokens)| normalize_row(tokens, side, i + 1))
        .collect()
}
