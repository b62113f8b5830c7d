//! Regular season: result entry for scheduled fixtures.

use crate::logic::stats;
use crate::models::{
    MatchId, Phase, PlayerId, ResultEntry, Scoreline, StatLine, Tournament, TournamentError,
};

/// Record (or correct) the result of a regular-season match, then refresh all derived stats.
pub fn record_regular_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    entry: &ResultEntry,
) -> Result<(), TournamentError> {
    if tournament.phase != Phase::Regular {
        return Err(TournamentError::WrongPhase);
    }
    let idx = tournament
        .regular_matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    let m = &tournament.regular_matches[idx];
    let roster_1 = tournament.roster(m.team_1);
    let roster_2 = tournament.roster(m.team_2);
    let scoreline = validate_entry(entry, &roster_1, &roster_2)?;

    tournament.regular_matches[idx].result = scoreline;
    stats::recompute(tournament);
    log::debug!("Recorded result for match {} in {}", match_id, tournament.id);
    Ok(())
}

/// Check a submitted result and turn it into a completed scoreline.
///
/// Rejects ties, stat lines for players not on that side, repeated lines for one player, and
/// per-player cups that do not add up to the side's score. Players without a submitted line get a zero line.
pub(crate) fn validate_entry(
    entry: &ResultEntry,
    roster_1: &[PlayerId],
    roster_2: &[PlayerId],
) -> Result<Scoreline, TournamentError> {
    if entry.team_1_score == entry.team_2_score {
        return Err(TournamentError::TiedScore);
    }
    let team_1_stats = side_lines(&entry.team_1_stats, roster_1, entry.team_1_score)?;
    let team_2_stats = side_lines(&entry.team_2_stats, roster_2, entry.team_2_score)?;
    Ok(Scoreline {
        team_1_score: entry.team_1_score,
        team_2_score: entry.team_2_score,
        team_1_stats,
        team_2_stats,
        completed: true,
    })
}

fn side_lines(
    submitted: &[StatLine],
    roster: &[PlayerId],
    score: u32,
) -> Result<Vec<StatLine>, TournamentError> {
    if let Some(stranger) = submitted.iter().find(|l| !roster.contains(&l.player_id)) {
        return Err(TournamentError::UnknownPlayer(stranger.player_id));
    }
    for (i, line) in submitted.iter().enumerate() {
        if submitted[..i].iter().any(|l| l.player_id == line.player_id) {
            return Err(TournamentError::DuplicateStatLine(line.player_id));
        }
    }
    let lines: Vec<StatLine> = roster
        .iter()
        .map(|&pid| {
            submitted
                .iter()
                .find(|l| l.player_id == pid)
                .copied()
                .unwrap_or_else(|| StatLine::zero(pid))
        })
        .collect();
    let cups: u32 = lines.iter().map(|l| l.cups).sum();
    if cups != score {
        return Err(TournamentError::CupsMismatch {
            expected: score,
            actual: cups,
        });
    }
    Ok(lines)
}
