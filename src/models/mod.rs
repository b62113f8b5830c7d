//! Data structures for the cup tournament: players, teams, matches, bracket, tournament.

mod bracket;
mod game;
mod player;
mod team;
mod tournament;

pub use bracket::{Bracket, RoundState};
pub use game::{
    MatchId, MatchRef, PlayoffSeries, RegularMatch, ResultEntry, Scoreline, SeriesStatus, Side,
};
pub use player::{Player, PlayerId, PlayerStats, StatLine};
pub use team::{Team, TeamId};
pub use tournament::{
    Format, Phase, Tournament, TournamentError, TournamentId, TournamentType,
};
