//! Output files for single-round and multi-round runs.
//!
//! ## Single Round
//!
//! ```text
//! # Matching Results
//! employer,matched_candidate
//! 1,2
//! 2,0        <- 0 marks an unmatched employer
//! ```
//!
//! ## Multi Round
//!
//! One file per side, one row per agent, listing the counterparts matched
//! across all rounds in round order. An agent never matched gets an empty
//! row so row numbers stay aligned with identities.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{MatchError, Result};
use crate::types::agent::slot;
use crate::types::{AgentId, RoundResult};

/// Sentinel written for an employer left unmatched
pub const UNMATCHED: AgentId = 0;

/// Write the employer -> candidate table of one round
pub fn write_round<W: Write>(mut out: W, result: &RoundResult) -> std::io::Result<()> {
    writeln!(out, "# Matching Results")?;
    writeln!(out, "employer,matched_candidate")?;

    for employer in 1..=result.matches.employer_count() as AgentId {
        let candidate = result.matches.candidate_of(employer).unwrap_or(UNMATCHED);
        writeln!(out, "{employer},{candidate}")?;
    }

    out.flush()
}

/// Write the single-round table to `path`
pub fn write_round_file(path: impl AsRef<Path>, result: &RoundResult) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MatchError::io(path, e))?;
    write_round(BufWriter::new(file), result).map_err(|e| MatchError::io(path, e))
}

/// Counterparts matched to each agent across rounds, in round order.
///
/// Returns `(candidate_rows, employer_rows)` indexed by zero-based slot.
pub fn pair_rows(
    rounds: &[RoundResult],
    candidate_count: usize,
    employer_count: usize,
) -> (Vec<Vec<AgentId>>, Vec<Vec<AgentId>>) {
    let mut candidate_rows = vec![Vec::new(); candidate_count];
    let mut employer_rows = vec![Vec::new(); employer_count];

    for result in rounds {
        for pair in result.pairs() {
            if let Some(row) = slot(pair.candidate).and_then(|i| candidate_rows.get_mut(i)) {
                row.push(pair.employer);
            }
            if let Some(row) = slot(pair.employer).and_then(|i| employer_rows.get_mut(i)) {
                row.push(pair.candidate);
            }
        }
    }

    (candidate_rows, employer_rows)
}

/// Write one comma separated row per agent
pub fn write_rows<W: Write>(mut out: W, rows: &[Vec<AgentId>]) -> std::io::Result<()> {
    for row in rows {
        let line: Vec<String> = row.iter().map(ToString::to_string).collect();
        writeln!(out, "{}", line.join(","))?;
    }
    out.flush()
}

/// Write the candidate and employer pair files of a multi-round run
pub fn write_pair_files(
    candidate_path: impl AsRef<Path>,
    employer_path: impl AsRef<Path>,
    rounds: &[RoundResult],
    candidate_count: usize,
    employer_count: usize,
) -> Result<()> {
    let (candidate_rows, employer_rows) = pair_rows(rounds, candidate_count, employer_count);

    for (path, rows) in [
        (candidate_path.as_ref(), &candidate_rows),
        (employer_path.as_ref(), &employer_rows),
    ] {
        let file = File::create(path).map_err(|e| MatchError::io(path, e))?;
        write_rows(BufWriter::new(file), rows).map_err(|e| MatchError::io(path, e))?;
    }

    Ok(())
}
