//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use cup_tournament_web::{
    create_tournament, Format, MatchId, NewTournament, Player, ResultEntry, StatLine, Team,
    TeamId, Tournament, TournamentType,
};

pub const OWNER: &str = "owner-1";

/// Singles teams named T0, T1, ...
pub fn singles_teams(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| Team::from_players(&[&Player::new(format!("T{i}"))]))
        .collect()
}

pub fn new_tournament(
    format: Format,
    kind: TournamentType,
    matches_per_team: u32,
    players: &[&str],
) -> NewTournament {
    NewTournament {
        name: "Test cup".to_string(),
        format,
        matches_per_team,
        kind,
        players: players.iter().map(|p| p.to_string()).collect(),
        random_teams: false,
    }
}

/// Playoff-only singles tournament; players are seeded in the given order.
pub fn playoff_only(best_of: u32, players: &[&str]) -> Tournament {
    create_tournament(
        OWNER,
        new_tournament(Format::Singles, TournamentType::Playoffs, best_of, players),
    )
    .unwrap()
}

/// Regular-season singles tournament.
pub fn league(cycles: u32, players: &[&str]) -> Tournament {
    create_tournament(
        OWNER,
        new_tournament(Format::Singles, TournamentType::RegularPlusPlayoffs, cycles, players),
    )
    .unwrap()
}

pub fn team_id(t: &Tournament, name: &str) -> TeamId {
    t.teams.iter().find(|team| team.name == name).unwrap().id
}

/// A valid result where side one scores `one` and side two scores `two`, with all cups
/// credited to each side's first player.
pub fn entry_for(t: &Tournament, team_1: TeamId, team_2: TeamId, one: u32, two: u32) -> ResultEntry {
    let line = |team: TeamId, cups: u32| StatLine {
        player_id: t.roster(team)[0],
        cups,
        ices: 0,
        defenses: 0,
    };
    ResultEntry {
        team_1_score: one,
        team_2_score: two,
        team_1_stats: vec![line(team_1, one)],
        team_2_stats: vec![line(team_2, two)],
    }
}

/// Find the series (in any round) between two teams.
pub fn series_between(t: &Tournament, a: TeamId, b: TeamId) -> MatchId {
    t.bracket
        .as_ref()
        .unwrap()
        .series()
        .find(|s| (s.team_1 == a && s.team_2 == b) || (s.team_1 == b && s.team_2 == a))
        .unwrap()
        .id
}

/// Record game `game` of a series so that `winner` wins it 3-1.
pub fn win_game(t: &mut Tournament, series_id: MatchId, game: usize, winner: TeamId) {
    let s = t.bracket.as_ref().unwrap().find_series(series_id).unwrap().clone();
    let (one, two) = if s.team_1 == winner { (3, 1) } else { (1, 3) };
    let entry = entry_for(t, s.team_1, s.team_2, one, two);
    cup_tournament_web::record_playoff_game(t, series_id, game, &entry).unwrap();
}
