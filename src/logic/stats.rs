//! Derived statistics: team records, player totals, leaderboard and CSV export.

use crate::logic::standings::Standing;
use crate::models::{PlayerId, PlayerStats, Scoreline, StatLine, Tournament, TournamentError};
use serde::Serialize;

/// Rebuild every team record and player total from the match history.
///
/// Team wins/losses come from completed regular-season matches only; player totals count
/// completed regular matches and completed playoff games separately.
pub fn recompute(tournament: &mut Tournament) {
    for team in &mut tournament.teams {
        team.clear_record();
    }
    for player in &mut tournament.players {
        player.clear_stats();
    }

    let mut regular_lines = Vec::new();
    for m in &tournament.regular_matches {
        let Some(winner) = m.winner_team() else {
            continue;
        };
        let loser = if winner == m.team_1 { m.team_2 } else { m.team_1 };
        for team in &mut tournament.teams {
            if team.id == winner {
                team.record_win();
            } else if team.id == loser {
                team.record_loss();
            }
        }
        regular_lines.extend(played_lines(&m.result));
    }

    let playoff_lines: Vec<_> = tournament
        .bracket
        .iter()
        .flat_map(|b| b.series())
        .flat_map(|s| s.games.iter())
        .filter(|g| g.completed)
        .flat_map(played_lines)
        .collect();

    for line in regular_lines {
        if let Some(p) = tournament.players.iter_mut().find(|p| p.id == line.player_id) {
            p.regular.add_game(&line);
        }
    }
    for line in playoff_lines {
        if let Some(p) = tournament.players.iter_mut().find(|p| p.id == line.player_id) {
            p.playoffs.add_game(&line);
        }
    }
}

fn played_lines(game: &Scoreline) -> impl Iterator<Item = StatLine> + '_ {
    game.team_1_stats.iter().chain(game.team_2_stats.iter()).copied()
}

/// A player's row in the statistics table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerLine {
    pub player_id: PlayerId,
    pub name: String,
    pub team: String,
    pub regular: PlayerStats,
    pub playoffs: PlayerStats,
    pub total_cups: u32,
    pub cups_per_game: f64,
}

/// Players ranked by total cups, then by name.
pub fn player_leaderboard(tournament: &Tournament) -> Vec<PlayerLine> {
    let mut lines: Vec<PlayerLine> = tournament
        .players
        .iter()
        .map(|p| {
            let team = tournament
                .teams
                .iter()
                .find(|t| t.has_player(p.id))
                .map(|t| t.name.clone())
                .unwrap_or_default();
            let games = p.regular.games_played + p.playoffs.games_played;
            let total_cups = p.regular.cups + p.playoffs.cups;
            PlayerLine {
                player_id: p.id,
                name: p.name.clone(),
                team,
                regular: p.regular,
                playoffs: p.playoffs,
                total_cups,
                cups_per_game: if games == 0 {
                    0.0
                } else {
                    total_cups as f64 / games as f64
                },
            }
        })
        .collect();
    lines.sort_by(|a, b| {
        b.total_cups
            .cmp(&a.total_cups)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    lines
}

/// Flat CSV row for a player (csv cannot write nested structs).
#[derive(Serialize)]
struct PlayerCsvRow<'a> {
    name: &'a str,
    team: &'a str,
    games: u32,
    cups: u32,
    ices: u32,
    defenses: u32,
    playoff_games: u32,
    playoff_cups: u32,
    playoff_ices: u32,
    playoff_defenses: u32,
    cups_per_game: String,
}

#[derive(Serialize)]
struct StandingCsvRow<'a> {
    rank: usize,
    team: &'a str,
    wins: u32,
    losses: u32,
    played: u32,
    win_percentage: String,
}

/// Standings as CSV with a header row.
pub fn standings_csv(standings: &[Standing]) -> Result<String, TournamentError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (i, s) in standings.iter().enumerate() {
        writer
            .serialize(StandingCsvRow {
                rank: i + 1,
                team: &s.name,
                wins: s.wins,
                losses: s.losses,
                played: s.matches_played,
                win_percentage: format!("{:.1}", s.win_percentage),
            })
            .map_err(|e| TournamentError::Export(e.to_string()))?;
    }
    finish(writer)
}

/// Player statistics table as CSV with a header row.
pub fn players_csv(lines: &[PlayerLine]) -> Result<String, TournamentError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for l in lines {
        writer
            .serialize(PlayerCsvRow {
                name: &l.name,
                team: &l.team,
                games: l.regular.games_played,
                cups: l.regular.cups,
                ices: l.regular.ices,
                defenses: l.regular.defenses,
                playoff_games: l.playoffs.games_played,
                playoff_cups: l.playoffs.cups,
                playoff_ices: l.playoffs.ices,
                playoff_defenses: l.playoffs.defenses,
                cups_per_game: format!("{:.2}", l.cups_per_game),
            })
            .map_err(|e| TournamentError::Export(e.to_string()))?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, TournamentError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| TournamentError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TournamentError::Export(e.to_string()))
}
