//! Cup tournament web app: library with models, tournament logic, storage and service layer.

pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use logic::{
    advance_playoff_round, build_initial_round, can_advance, compute_standings,
    create_tournament, enter_playoffs, generate_schedule, player_leaderboard, players_csv,
    record_playoff_game, record_regular_result, reshuffle_teams, select_game, standings_csv,
    NewTournament, PlayerLine, Standing,
};
pub use models::{
    Bracket, Format, MatchId, MatchRef, Phase, Player, PlayerId, PlayerStats, PlayoffSeries,
    RegularMatch, ResultEntry, RoundState, Scoreline, SeriesStatus, Side, StatLine, Team, TeamId,
    Tournament, TournamentError, TournamentId, TournamentType,
};
pub use store::{JsonFileStore, MemoryStore, Store, StoreError, TournamentStore};
