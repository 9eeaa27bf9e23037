//! Displacement analytics across multi-round results.
//!
//! An agent's displacement in a round is the position of its partner in the
//! agent's *original* list (0 = first choice). Agents left unmatched, or
//! matched to someone they never listed, score the length of their list.
//! Later rounds draw from less preferred counterparts, so averages are
//! expected to grow with the round number.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{MatchError, Result};
use crate::preferences::{PreferenceStore, RankIndex};
use crate::types::{AgentId, RoundResult};

/// Average displacement of both sides in one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundDisplacement {
    pub round: usize,
    pub candidate_avg: Decimal,
    pub employer_avg: Decimal,
}

/// Per-round displacement averages
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplacementReport {
    pub rounds: Vec<RoundDisplacement>,
}

impl DisplacementReport {
    /// Measure every round against the original (unpruned) lists
    pub fn compute(original: &PreferenceStore, rounds: &[RoundResult]) -> Self {
        let rounds = rounds
            .iter()
            .map(|result| {
                let matches = &result.matches;
                let candidate_avg = side_average(
                    original.candidates(),
                    original.candidate_ranks(),
                    |c| matches.employer_of(c),
                );
                let employer_avg = side_average(
                    original.employers(),
                    original.employer_ranks(),
                    |e| matches.candidate_of(e),
                );

                RoundDisplacement {
                    round: result.round,
                    candidate_avg,
                    employer_avg,
                }
            })
            .collect();

        Self { rounds }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Write `round,candidate_avg,employer_avg` rows with a header
    pub fn write_csv<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "round,candidate_avg,employer_avg")?;
        for row in &self.rounds {
            writeln!(out, "{},{},{}", row.round, row.candidate_avg, row.employer_avg)?;
        }
        out.flush()
    }

    pub fn write_csv_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| MatchError::io(path, e))?;
        self.write_csv(BufWriter::new(file))
            .map_err(|e| MatchError::io(path, e))
    }
}

/// Displacement of one agent given its list, rank index and partner
pub fn displacement(list_len: usize, ranks: &RankIndex, agent: AgentId, partner: Option<AgentId>) -> usize {
    partner
        .and_then(|p| ranks.rank(agent, p))
        .unwrap_or(list_len)
}

fn side_average(
    lists: &[Vec<AgentId>],
    ranks: &RankIndex,
    partner_of: impl Fn(AgentId) -> Option<AgentId>,
) -> Decimal {
    let mut average = if lists.is_empty() {
        Decimal::ZERO
    } else {
        let total: usize = lists
            .iter()
            .enumerate()
            .map(|(i, list)| {
                let agent = i as AgentId + 1;
                displacement(list.len(), ranks, agent, partner_of(agent))
            })
            .sum();
        (Decimal::from(total as u64) / Decimal::from(lists.len() as u64)).round_dp(2)
    };
    average.rescale(2);
    average
}
