//! Tournament business logic: setup, scheduling, results, standings, playoffs, stats.

mod playoffs;
mod regular_season;
mod schedule;
mod setup;
mod standings;
mod stats;

pub use playoffs::{
    advance_playoff_round, build_initial_round, can_advance, enter_playoffs, record_playoff_game,
    select_game, validate_best_of, validate_bracket_size, BRACKET_SIZES, SERIES_LENGTHS,
};
pub use regular_season::record_regular_result;
pub use schedule::generate_schedule;
pub use setup::{create_tournament, reshuffle_teams, NewTournament, MAX_CYCLES};
pub use standings::{compute_standings, seeding_order, Standing};
pub use stats::{player_leaderboard, players_csv, recompute, standings_csv, PlayerLine};
