//! Player and per-player statistics.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in stat lines and lookups).
pub type PlayerId = Uuid;

/// Cumulative statistics for one phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: u32,
    pub cups: u32,
    pub ices: u32,
    pub defenses: u32,
}

impl PlayerStats {
    /// Add one game's line to the totals.
    pub fn add_game(&mut self, line: &StatLine) {
        self.games_played += 1;
        self.cups += line.cups;
        self.ices += line.ices;
        self.defenses += line.defenses;
    }
}

/// One player's contribution to a single game.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub player_id: PlayerId,
    #[serde(default)]
    pub cups: u32,
    #[serde(default)]
    pub ices: u32,
    #[serde(default)]
    pub defenses: u32,
}

impl StatLine {
    /// Zeroed line for a player (what every new match starts with).
    pub fn zero(player_id: PlayerId) -> Self {
        Self {
            player_id,
            ..Default::default()
        }
    }
}

/// A player in the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Regular-season totals.
    pub regular: PlayerStats,
    /// Playoff totals.
    pub playoffs: PlayerStats,
}

impl Player {
    /// Create a new player with the given name. Stats start at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            regular: PlayerStats::default(),
            playoffs: PlayerStats::default(),
        }
    }

    /// Reset both stat blocks (before recomputing them from match history).
    pub fn clear_stats(&mut self) {
        self.regular = PlayerStats::default();
        self.playoffs = PlayerStats::default();
    }
}
