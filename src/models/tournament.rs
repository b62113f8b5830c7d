//! Tournament, its format/type/phase, and TournamentError.

use crate::models::bracket::Bracket;
use crate::models::game::{MatchId, MatchRef, RegularMatch};
use crate::models::player::{Player, PlayerId};
use crate::models::team::{Team, TeamId};
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Debug)]
pub enum TournamentError {
    /// Tournament or player name is empty.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName(String),
    /// Player count does not fit the format.
    InvalidPlayerCount { format: Format, count: usize },
    /// Fewer than two teams.
    NotEnoughTeams,
    /// `matches_per_team` must be 1..=10 for a regular season.
    InvalidMatchesPerTeam,
    /// Series length must be 1, 3 or 5.
    InvalidBestOf(u32),
    /// Games must have a strict winner.
    TiedScore,
    /// A side's player cups do not add up to its score.
    CupsMismatch { expected: u32, actual: u32 },
    /// Stat line for a player who is not on that side.
    UnknownPlayer(PlayerId),
    /// More than one stat line for the same player on one side.
    DuplicateStatLine(PlayerId),
    BracketSizeNotPowerOfTwo(usize),
    BracketTooLarge { size: usize, teams: usize },
    GameIndexOutOfRange { index: usize, best_of: u32 },
    /// The series is already won; no further games can be added.
    SeriesAlreadyDecided,
    /// Tournament is not in a phase or type that allows this action.
    WrongPhase,
    RegularSeasonIncomplete,
    RoundIncomplete,
    /// Only the latest generated round can be advanced.
    RoundNotCurrent,
    /// The final has been generated; nothing left to advance to.
    BracketComplete,
    /// Teams can no longer be reshuffled once results exist.
    MatchesAlreadyPlayed,
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    SeriesNotFound(MatchId),
    /// CSV export failed.
    Export(String),
    Storage(StoreError),
}

impl TournamentError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TournamentNotFound(_)
                | TournamentError::MatchNotFound(_)
                | TournamentError::SeriesNotFound(_)
        )
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, TournamentError::Storage(_))
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::DuplicatePlayerName(name) => {
                write!(f, "A player named \"{}\" already exists", name)
            }
            TournamentError::InvalidPlayerCount { format, count } => match format {
                Format::Singles => write!(f, "Singles needs at least 2 players (got {})", count),
                Format::Doubles => write!(
                    f,
                    "Doubles needs an even number of players, at least 4 (got {})",
                    count
                ),
            },
            TournamentError::NotEnoughTeams => write!(f, "Need at least 2 teams"),
            TournamentError::InvalidMatchesPerTeam => {
                write!(f, "Matches per team must be between 1 and 10")
            }
            TournamentError::InvalidBestOf(n) => {
                write!(f, "Series must be best of 1, 3 or 5 (got {})", n)
            }
            TournamentError::TiedScore => write!(f, "Games cannot end in a tie"),
            TournamentError::CupsMismatch { expected, actual } => write!(
                f,
                "Player cups add up to {} but the team score is {}",
                actual, expected
            ),
            TournamentError::UnknownPlayer(_) => write!(f, "Player is not on this team"),
            TournamentError::DuplicateStatLine(_) => {
                write!(f, "Player has more than one stat line")
            }
            TournamentError::BracketSizeNotPowerOfTwo(n) => write!(
                f,
                "Playoff bracket needs 2, 4, 8 or 16 teams (got {})",
                n
            ),
            TournamentError::BracketTooLarge { size, teams } => write!(
                f,
                "Bracket of {} needs more teams than the {} entered",
                size, teams
            ),
            TournamentError::GameIndexOutOfRange { index, best_of } => write!(
                f,
                "Game {} does not exist in a best of {}",
                index + 1,
                best_of
            ),
            TournamentError::SeriesAlreadyDecided => write!(f, "Series is already decided"),
            TournamentError::WrongPhase => write!(f, "Invalid phase for this action"),
            TournamentError::RegularSeasonIncomplete => {
                write!(f, "Not all regular season matches have a result")
            }
            TournamentError::RoundIncomplete => write!(f, "Not all series in this round are decided"),
            TournamentError::RoundNotCurrent => write!(f, "Only the latest round can be advanced"),
            TournamentError::BracketComplete => write!(f, "The final has already been set"),
            TournamentError::MatchesAlreadyPlayed => {
                write!(f, "Teams cannot change after results have been recorded")
            }
            TournamentError::TournamentNotFound(_) => write!(f, "No tournament"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::SeriesNotFound(_) => write!(f, "Series not found"),
            TournamentError::Export(e) => write!(f, "Export failed: {}", e),
            TournamentError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TournamentError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for TournamentError {
    fn from(e: StoreError) -> Self {
        TournamentError::Storage(e)
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Team size.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    Singles,
    Doubles,
}

impl Format {
    pub fn team_size(self) -> usize {
        match self {
            Format::Singles => 1,
            Format::Doubles => 2,
        }
    }
}

/// Whether the tournament has a regular season before the playoffs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum TournamentType {
    #[serde(rename = "playoffs")]
    Playoffs,
    #[default]
    #[serde(rename = "regular+playoffs")]
    RegularPlusPlayoffs,
}

/// Current phase. Only ever moves Regular -> Playoffs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Regular,
    Playoffs,
}

/// Full tournament document: teams, players, both match lists and the bracket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    /// Opaque id of the user who created it.
    pub owner_id: String,
    pub name: String,
    pub format: Format,
    /// Cycle count for the regular season, or series length for playoff-only.
    pub matches_per_team: u32,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub phase: Phase,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub regular_matches: Vec<RegularMatch>,
    /// None until the playoffs start.
    pub bracket: Option<Bracket>,
    /// Team -> seed (1 = top seed) for the bracket.
    pub playoff_seed_map: Option<HashMap<TeamId, u32>>,
    pub created_at: DateTime<Utc>,
    pub last_visited: Option<DateTime<Utc>>,
}

impl Tournament {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Player ids of a team, empty if the team is unknown.
    pub fn roster(&self, team_id: TeamId) -> Vec<PlayerId> {
        self.team(team_id)
            .map(|t| t.players.clone())
            .unwrap_or_default()
    }

    /// Look up any match (regular fixture or playoff series) by id.
    pub fn find_match(&self, id: MatchId) -> Option<MatchRef<'_>> {
        self.regular_matches
            .iter()
            .find(|m| m.id == id)
            .map(MatchRef::Regular)
            .or_else(|| {
                self.bracket
                    .as_ref()
                    .and_then(|b| b.find_series(id))
                    .map(MatchRef::Playoff)
            })
    }

    /// Every match in the tournament, regular fixtures first.
    pub fn all_matches(&self) -> Vec<MatchRef<'_>> {
        let regular = self.regular_matches.iter().map(MatchRef::Regular);
        let playoff = self
            .bracket
            .iter()
            .flat_map(|b| b.series())
            .map(MatchRef::Playoff);
        regular.chain(playoff).collect()
    }

    /// Matches involving a team, in schedule/bracket order.
    pub fn matches_for_team(&self, team_id: TeamId) -> Vec<MatchRef<'_>> {
        self.all_matches()
            .into_iter()
            .filter(|m| {
                let (a, b) = m.teams();
                a == team_id || b == team_id
            })
            .collect()
    }

    pub fn regular_season_complete(&self) -> bool {
        self.regular_matches.iter().all(|m| m.result.completed)
    }

    /// Winner of the final, if the bracket is finished.
    pub fn champion(&self) -> Option<&Team> {
        self.bracket
            .as_ref()
            .and_then(Bracket::champion)
            .and_then(|id| self.team(id))
    }

    /// Record a visit (used to order the owner's tournament list).
    pub fn touch(&mut self) {
        self.last_visited = Some(Utc::now());
    }
}
