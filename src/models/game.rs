//! Matches: regular-season fixtures, playoff series and the games inside a series.

use crate::models::player::{PlayerId, StatLine};
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match or a playoff series.
pub type MatchId = Uuid;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

/// Scores and stat lines of one played (or to-be-played) game.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scoreline {
    pub team_1_score: u32,
    pub team_2_score: u32,
    pub team_1_stats: Vec<StatLine>,
    pub team_2_stats: Vec<StatLine>,
    pub completed: bool,
}

impl Scoreline {
    /// Zero scores with a zero stat row for every player on both sides.
    pub fn empty(roster_1: &[PlayerId], roster_2: &[PlayerId]) -> Self {
        Self {
            team_1_score: 0,
            team_2_score: 0,
            team_1_stats: roster_1.iter().copied().map(StatLine::zero).collect(),
            team_2_stats: roster_2.iter().copied().map(StatLine::zero).collect(),
            completed: false,
        }
    }

    /// Winning side of a completed, untied game.
    pub fn winner(&self) -> Option<Side> {
        if !self.completed {
            return None;
        }
        match self.team_1_score.cmp(&self.team_2_score) {
            std::cmp::Ordering::Greater => Some(Side::One),
            std::cmp::Ordering::Less => Some(Side::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A submitted result: both scores and per-player stat lines for each side.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub team_1_score: u32,
    pub team_2_score: u32,
    #[serde(default)]
    pub team_1_stats: Vec<StatLine>,
    #[serde(default)]
    pub team_2_stats: Vec<StatLine>,
}

/// A regular-season fixture.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RegularMatch {
    pub id: MatchId,
    pub team_1: TeamId,
    pub team_2: TeamId,
    #[serde(flatten)]
    pub result: Scoreline,
    /// 1-based; keeps increasing across repeated cycles.
    pub round: u32,
}

impl RegularMatch {
    pub fn new(
        team_1: (TeamId, &[PlayerId]),
        team_2: (TeamId, &[PlayerId]),
        round: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_1: team_1.0,
            team_2: team_2.0,
            result: Scoreline::empty(team_1.1, team_2.1),
            round,
        }
    }

    pub fn winner_team(&self) -> Option<TeamId> {
        self.result.winner().map(|side| self.team(side))
    }

    pub fn team(&self, side: Side) -> TeamId {
        match side {
            Side::One => self.team_1,
            Side::Two => self.team_2,
        }
    }
}

/// Progress of a playoff series.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    Pending,
    InProgress,
    Complete,
}

/// A best-of-N playoff series between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayoffSeries {
    pub id: MatchId,
    pub team_1: TeamId,
    pub team_2: TeamId,
    /// Bracket round, 1-based.
    pub series: u32,
    pub best_of: u32,
    /// Always `best_of` long.
    pub games: Vec<Scoreline>,
    /// Game being viewed/edited, in `0..best_of`.
    pub current_game: usize,
    /// Mirrors the scores of `games[current_game]`.
    pub team_1_score: u32,
    pub team_2_score: u32,
    pub completed: bool,
}

impl PlayoffSeries {
    pub fn new(
        team_1: (TeamId, &[PlayerId]),
        team_2: (TeamId, &[PlayerId]),
        series: u32,
        best_of: u32,
    ) -> Self {
        let games = (0..best_of)
            .map(|_| Scoreline::empty(team_1.1, team_2.1))
            .collect();
        Self {
            id: Uuid::new_v4(),
            team_1: team_1.0,
            team_2: team_2.0,
            series,
            best_of,
            games,
            current_game: 0,
            team_1_score: 0,
            team_2_score: 0,
            completed: false,
        }
    }

    /// Game wins needed to take the series.
    pub fn wins_needed(&self) -> u32 {
        self.best_of.div_ceil(2)
    }

    /// Completed games won by each side.
    pub fn game_wins(&self) -> (u32, u32) {
        self.games
            .iter()
            .filter_map(Scoreline::winner)
            .fold((0, 0), |(one, two), side| match side {
                Side::One => (one + 1, two),
                Side::Two => (one, two + 1),
            })
    }

    pub fn winner(&self) -> Option<Side> {
        if self.best_of == 1 {
            return self.games.first().and_then(Scoreline::winner);
        }
        let needed = self.wins_needed();
        match self.game_wins() {
            (one, _) if one >= needed => Some(Side::One),
            (_, two) if two >= needed => Some(Side::Two),
            _ => None,
        }
    }

    pub fn winner_team(&self) -> Option<TeamId> {
        self.winner().map(|side| self.team(side))
    }

    pub fn status(&self) -> SeriesStatus {
        if self.winner().is_some() {
            SeriesStatus::Complete
        } else if self.games.iter().any(|g| g.completed) {
            SeriesStatus::InProgress
        } else {
            SeriesStatus::Pending
        }
    }

    pub fn team(&self, side: Side) -> TeamId {
        match side {
            Side::One => self.team_1,
            Side::Two => self.team_2,
        }
    }

    /// Point the cursor at a game and mirror its score into the series view.
    pub fn select_game(&mut self, index: usize) {
        self.current_game = index;
        if let Some(game) = self.games.get(index) {
            self.team_1_score = game.team_1_score;
            self.team_2_score = game.team_2_score;
        }
    }

    /// Sync `completed` with the game results.
    pub fn refresh(&mut self) {
        self.completed = self.winner().is_some();
    }
}

/// Borrowed view over either kind of match. Serializes with a `kind` tag.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchRef<'a> {
    Regular(&'a RegularMatch),
    Playoff(&'a PlayoffSeries),
}

impl<'a> MatchRef<'a> {
    pub fn id(&self) -> MatchId {
        match self {
            MatchRef::Regular(m) => m.id,
            MatchRef::Playoff(s) => s.id,
        }
    }

    pub fn teams(&self) -> (TeamId, TeamId) {
        match self {
            MatchRef::Regular(m) => (m.team_1, m.team_2),
            MatchRef::Playoff(s) => (s.team_1, s.team_2),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            MatchRef::Regular(m) => m.result.completed,
            MatchRef::Playoff(s) => s.completed,
        }
    }

    /// The series, when this is a playoff match.
    pub fn as_series(&self) -> Option<&'a PlayoffSeries> {
        match *self {
            MatchRef::Regular(_) => None,
            MatchRef::Playoff(s) => Some(s),
        }
    }
}
