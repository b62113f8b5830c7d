//! Single-elimination bracket: generated rounds of playoff series.

use crate::models::game::{MatchId, PlayoffSeries};
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Whether a bracket round exists yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoundState<'a> {
    NotGenerated,
    Generated(&'a [PlayoffSeries]),
}

/// Rounds generated so far. Round `n + 1` is always derived from the winners of round `n`;
/// it is dropped (never patched) when an upstream winner changes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub best_of: u32,
    /// Number of teams seeded into the first round.
    pub entrants: usize,
    pub rounds: Vec<Vec<PlayoffSeries>>,
}

impl Bracket {
    pub fn new(best_of: u32, first_round: Vec<PlayoffSeries>) -> Self {
        Self {
            best_of,
            entrants: first_round.len() * 2,
            rounds: vec![first_round],
        }
    }

    /// Round by 1-based number.
    pub fn round(&self, number: u32) -> RoundState<'_> {
        match number
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i as usize))
        {
            Some(series) => RoundState::Generated(series),
            None => RoundState::NotGenerated,
        }
    }

    /// Number of the latest generated round (1-based).
    pub fn latest_round(&self) -> u32 {
        self.rounds.len() as u32
    }

    /// Total rounds a bracket of this many entrants needs.
    pub fn total_rounds(&self) -> u32 {
        self.entrants.max(1).trailing_zeros()
    }

    pub fn series(&self) -> impl Iterator<Item = &PlayoffSeries> {
        self.rounds.iter().flatten()
    }

    pub fn find_series(&self, id: MatchId) -> Option<&PlayoffSeries> {
        self.series().find(|s| s.id == id)
    }

    pub fn find_series_mut(&mut self, id: MatchId) -> Option<&mut PlayoffSeries> {
        self.rounds.iter_mut().flatten().find(|s| s.id == id)
    }

    /// Drop every round after `round` (1-based). Returns how many rounds were discarded.
    pub fn discard_after(&mut self, round: u32) -> usize {
        let keep = round as usize;
        let before = self.rounds.len();
        self.rounds.truncate(keep.max(1));
        before - self.rounds.len()
    }

    /// Winner of the final, once the single-series last round is decided.
    pub fn champion(&self) -> Option<TeamId> {
        match self.rounds.last() {
            Some(last) if last.len() == 1 => last[0].winner_team(),
            _ => None,
        }
    }
}
