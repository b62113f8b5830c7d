//! Team: one player (singles) or two players (doubles).

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// Member names joined with " & " for doubles.
    pub name: String,
    /// Member player ids in entry order.
    pub players: Vec<PlayerId>,
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
}

impl Team {
    /// Build a team from its members; the display name is derived from their names.
    pub fn from_players(members: &[&Player]) -> Self {
        let name = members
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(" & ");
        Self {
            id: Uuid::new_v4(),
            name,
            players: members.iter().map(|p| p.id).collect(),
            wins: 0,
            losses: 0,
            games_played: 0,
        }
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.players.contains(&player_id)
    }

    pub fn record_win(&mut self) {
        self.wins += 1;
        self.games_played += 1;
    }

    pub fn record_loss(&mut self) {
        self.losses += 1;
        self.games_played += 1;
    }

    pub fn clear_record(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.games_played = 0;
    }
}
