//! Integration tests for setup and regular-season result entry.

mod common;

use common::{entry_for, league, new_tournament, OWNER};
use cup_tournament_web::{
    create_tournament, player_leaderboard, players_csv, record_regular_result, reshuffle_teams,
    standings_csv, compute_standings, Format, Phase, StatLine, TournamentError, TournamentType,
};
use uuid::Uuid;

#[test]
fn three_singles_players_two_cycles() {
    let t = league(2, &["Ann", "Bob", "Cy"]);
    assert_eq!(t.phase, Phase::Regular);
    assert_eq!(t.teams.len(), 3);
    assert_eq!(t.regular_matches.len(), 6);
    assert!(t.bracket.is_none());
    assert!(t.teams.iter().all(|team| team.players.len() == 1));
}

#[test]
fn doubles_teams_are_named_after_both_players() {
    let t = create_tournament(
        OWNER,
        new_tournament(
            Format::Doubles,
            TournamentType::RegularPlusPlayoffs,
            1,
            &["Ann", "Bob", "Cy", "Dee", "Eve", "Fay"],
        ),
    )
    .unwrap();
    assert_eq!(t.teams.len(), 3);
    assert!(t.teams.iter().all(|team| team.players.len() == 2));
    assert_eq!(t.teams[0].name, "Ann & Bob");
    assert_eq!(t.regular_matches.len(), 3);
    assert_eq!(t.regular_matches[0].result.team_1_stats.len(), 2);
}

#[test]
fn cycle_count_is_capped() {
    let names: Vec<String> = (0..16).map(|i| format!("P{i}")).collect();
    let players: Vec<&str> = names.iter().map(String::as_str).collect();

    let err = create_tournament(
        OWNER,
        new_tournament(Format::Singles, TournamentType::RegularPlusPlayoffs, u32::MAX, &players),
    )
    .unwrap_err();
    assert!(matches!(err, TournamentError::InvalidMatchesPerTeam));

    let err = create_tournament(
        OWNER,
        new_tournament(Format::Singles, TournamentType::RegularPlusPlayoffs, 11, &players),
    )
    .unwrap_err();
    assert!(matches!(err, TournamentError::InvalidMatchesPerTeam));

    let t = league(10, &players);
    assert_eq!(t.regular_matches.len(), 10 * 16 * 15 / 2);
}

#[test]
fn invalid_setups_are_rejected() {
    let cases = [
        (Format::Singles, 1, vec!["Solo"]),
        (Format::Doubles, 1, vec!["A", "B", "C"]),
        (Format::Doubles, 1, vec!["A", "B"]),
    ];
    for (format, mpt, players) in cases {
        let err = create_tournament(
            OWNER,
            new_tournament(format, TournamentType::RegularPlusPlayoffs, mpt, &players),
        )
        .unwrap_err();
        assert!(matches!(err, TournamentError::InvalidPlayerCount { .. }), "{err}");
    }

    let err = create_tournament(
        OWNER,
        new_tournament(Format::Singles, TournamentType::RegularPlusPlayoffs, 0, &["A", "B"]),
    )
    .unwrap_err();
    assert!(matches!(err, TournamentError::InvalidMatchesPerTeam));

    let mut blank = new_tournament(Format::Singles, TournamentType::RegularPlusPlayoffs, 1, &["A", "B"]);
    blank.name = "   ".to_string();
    assert!(matches!(
        create_tournament(OWNER, blank),
        Err(TournamentError::EmptyName)
    ));
}

#[test]
fn recording_a_result_updates_records_and_player_stats() {
    let mut t = league(1, &["Ann", "Bob"]);
    let m = t.regular_matches[0].clone();
    let mut entry = entry_for(&t, m.team_1, m.team_2, 5, 2);
    entry.team_1_stats[0].ices = 1;
    entry.team_2_stats[0].defenses = 2;
    record_regular_result(&mut t, m.id, &entry).unwrap();

    let winner = t.team(m.team_1).unwrap();
    let loser = t.team(m.team_2).unwrap();
    assert_eq!((winner.wins, winner.losses, winner.games_played), (1, 0, 1));
    assert_eq!((loser.wins, loser.losses, loser.games_played), (0, 1, 1));

    let p1 = t.player(winner.players[0]).unwrap();
    assert_eq!((p1.regular.games_played, p1.regular.cups, p1.regular.ices), (1, 5, 1));
    let p2 = t.player(loser.players[0]).unwrap();
    assert_eq!((p2.regular.cups, p2.regular.defenses), (2, 2));
    assert!(t.regular_season_complete());
}

#[test]
fn correcting_a_result_replaces_the_old_one() {
    let mut t = league(1, &["Ann", "Bob"]);
    let m = t.regular_matches[0].clone();
    let first = entry_for(&t, m.team_1, m.team_2, 5, 2);
    record_regular_result(&mut t, m.id, &first).unwrap();
    let corrected = entry_for(&t, m.team_1, m.team_2, 1, 4);
    record_regular_result(&mut t, m.id, &corrected).unwrap();

    let team_1 = t.team(m.team_1).unwrap();
    assert_eq!((team_1.wins, team_1.losses), (0, 1));
    let p1 = t.player(team_1.players[0]).unwrap();
    assert_eq!((p1.regular.games_played, p1.regular.cups), (1, 1));
}

#[test]
fn invalid_results_change_nothing() {
    let mut t = league(1, &["Ann", "Bob"]);
    let m = t.regular_matches[0].clone();

    let tie = entry_for(&t, m.team_1, m.team_2, 3, 3);
    assert!(matches!(
        record_regular_result(&mut t, m.id, &tie),
        Err(TournamentError::TiedScore)
    ));

    let mut short = entry_for(&t, m.team_1, m.team_2, 5, 2);
    short.team_2_stats[0].cups = 1;
    assert!(matches!(
        record_regular_result(&mut t, m.id, &short),
        Err(TournamentError::CupsMismatch { expected: 2, actual: 1 })
    ));

    let mut stranger = entry_for(&t, m.team_1, m.team_2, 5, 2);
    stranger.team_1_stats.push(StatLine::zero(Uuid::new_v4()));
    assert!(matches!(
        record_regular_result(&mut t, m.id, &stranger),
        Err(TournamentError::UnknownPlayer(_))
    ));

    let missing = Uuid::new_v4();
    let ok = entry_for(&t, m.team_1, m.team_2, 5, 2);
    assert!(matches!(
        record_regular_result(&mut t, missing, &ok),
        Err(TournamentError::MatchNotFound(id)) if id == missing
    ));

    assert!(!t.regular_matches[0].result.completed);
    assert!(t.teams.iter().all(|team| team.games_played == 0));
}

#[test]
fn reshuffle_only_before_results() {
    let mut t = create_tournament(
        OWNER,
        new_tournament(
            Format::Doubles,
            TournamentType::RegularPlusPlayoffs,
            1,
            &["Ann", "Bob", "Cy", "Dee"],
        ),
    )
    .unwrap();
    reshuffle_teams(&mut t).unwrap();
    assert_eq!(t.teams.len(), 2);
    assert_eq!(t.regular_matches.len(), 1);
    let mut members: Vec<_> = t.teams.iter().flat_map(|team| team.players.clone()).collect();
    members.sort();
    let mut players: Vec<_> = t.players.iter().map(|p| p.id).collect();
    players.sort();
    assert_eq!(members, players);

    let m = t.regular_matches[0].clone();
    let entry = entry_for(&t, m.team_1, m.team_2, 2, 0);
    record_regular_result(&mut t, m.id, &entry).unwrap();
    assert!(matches!(
        reshuffle_teams(&mut t),
        Err(TournamentError::MatchesAlreadyPlayed)
    ));

    let mut singles = league(1, &["Ann", "Bob"]);
    assert!(matches!(
        reshuffle_teams(&mut singles),
        Err(TournamentError::WrongPhase)
    ));
}

#[test]
fn exports_have_headers_and_rows() {
    let mut t = league(1, &["Ann", "Bob"]);
    let m = t.regular_matches[0].clone();
    let entry = entry_for(&t, m.team_1, m.team_2, 5, 2);
    record_regular_result(&mut t, m.id, &entry).unwrap();

    let standings = standings_csv(&compute_standings(&t.teams)).unwrap();
    let lines: Vec<_> = standings.lines().collect();
    assert_eq!(lines[0], "rank,team,wins,losses,played,win_percentage");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].ends_with(",1,0,1,100.0"));

    let leaderboard = player_leaderboard(&t);
    assert_eq!(leaderboard[0].total_cups, 5);
    assert_eq!(leaderboard[0].cups_per_game, 5.0);
    let players = players_csv(&leaderboard).unwrap();
    assert!(players.starts_with("name,team,games,cups,"));
    assert_eq!(players.lines().count(), 3);
}
