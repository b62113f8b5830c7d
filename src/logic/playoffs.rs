//! Playoffs: seeding, series results and round advancement (single-elimination bracket).

use crate::logic::regular_season::validate_entry;
use crate::logic::setup::seed_map;
use crate::logic::standings::seeding_order;
use crate::logic::stats;
use crate::models::{
    Bracket, MatchId, Phase, PlayoffSeries, ResultEntry, Team, TeamId, Tournament,
    TournamentError, TournamentType,
};

/// Bracket sizes the engine supports.
pub const BRACKET_SIZES: [usize; 4] = [2, 4, 8, 16];

/// Series lengths the engine supports.
pub const SERIES_LENGTHS: [u32; 3] = [1, 3, 5];

pub fn validate_best_of(best_of: u32) -> Result<(), TournamentError> {
    if SERIES_LENGTHS.contains(&best_of) {
        Ok(())
    } else {
        Err(TournamentError::InvalidBestOf(best_of))
    }
}

pub fn validate_bracket_size(size: usize, teams: usize) -> Result<(), TournamentError> {
    if !BRACKET_SIZES.contains(&size) {
        return Err(TournamentError::BracketSizeNotPowerOfTwo(size));
    }
    if size > teams {
        return Err(TournamentError::BracketTooLarge { size, teams });
    }
    Ok(())
}

/// First round for the top `size` seeds: seed `i` plays seed `size + 1 - i`.
///
/// `seeded` must already be in seed order (index 0 = seed 1).
pub fn build_initial_round(seeded: &[&Team], size: usize, best_of: u32) -> Vec<PlayoffSeries> {
    let field = &seeded[..size.min(seeded.len())];
    let k = field.len();
    (0..k / 2)
        .map(|i| {
            let high = field[i];
            let low = field[k - 1 - i];
            PlayoffSeries::new(
                (high.id, high.players.as_slice()),
                (low.id, low.players.as_slice()),
                1,
                best_of,
            )
        })
        .collect()
}

/// Close the regular season and seed the top `bracket_size` teams into the bracket.
///
/// Teams are seeded by wins (desc), then losses (asc).
pub fn enter_playoffs(
    tournament: &mut Tournament,
    bracket_size: usize,
    best_of: u32,
) -> Result<(), TournamentError> {
    if tournament.kind != TournamentType::RegularPlusPlayoffs
        || tournament.phase != Phase::Regular
    {
        return Err(TournamentError::WrongPhase);
    }
    if !tournament.regular_season_complete() {
        return Err(TournamentError::RegularSeasonIncomplete);
    }
    validate_bracket_size(bracket_size, tournament.teams.len())?;
    validate_best_of(best_of)?;

    let seeded: Vec<&Team> = seeding_order(&tournament.teams)
        .into_iter()
        .take(bracket_size)
        .collect();
    let first_round = build_initial_round(&seeded, bracket_size, best_of);
    let seeds = seed_map(&seeded);

    tournament.playoff_seed_map = Some(seeds);
    tournament.bracket = Some(Bracket::new(best_of, first_round));
    tournament.phase = Phase::Playoffs;
    log::info!(
        "Tournament {} entered playoffs: {} teams, best of {}",
        tournament.id,
        bracket_size,
        best_of
    );
    Ok(())
}

/// Record (or correct) one game of a series.
///
/// If the edit changes who wins the series, every round generated after the series' round
/// is discarded; it has to be advanced again once the affected series are decided.
pub fn record_playoff_game(
    tournament: &mut Tournament,
    series_id: MatchId,
    game_index: usize,
    entry: &ResultEntry,
) -> Result<(), TournamentError> {
    if tournament.phase != Phase::Playoffs {
        return Err(TournamentError::WrongPhase);
    }
    let (team_1, team_2) = {
        let bracket = tournament.bracket.as_ref().ok_or(TournamentError::WrongPhase)?;
        let series = bracket
            .find_series(series_id)
            .ok_or(TournamentError::SeriesNotFound(series_id))?;
        if game_index >= series.games.len() {
            return Err(TournamentError::GameIndexOutOfRange {
                index: game_index,
                best_of: series.best_of,
            });
        }
        if series.completed && !series.games[game_index].completed {
            return Err(TournamentError::SeriesAlreadyDecided);
        }
        (series.team_1, series.team_2)
    };
    let scoreline = validate_entry(entry, &tournament.roster(team_1), &tournament.roster(team_2))?;

    let tournament_id = tournament.id;
    let bracket = tournament.bracket.as_mut().ok_or(TournamentError::WrongPhase)?;
    let series = bracket
        .find_series_mut(series_id)
        .ok_or(TournamentError::SeriesNotFound(series_id))?;
    let previous_winner = series.winner_team();
    series.games[game_index] = scoreline;
    series.select_game(game_index);
    series.refresh();
    let winner_changed = series.winner_team() != previous_winner;
    let round = series.series;

    if winner_changed && bracket.latest_round() > round {
        let dropped = bracket.discard_after(round);
        log::warn!(
            "Series {} changed winner; discarded {} later round(s) in {}",
            series_id,
            dropped,
            tournament_id
        );
    }

    stats::recompute(tournament);
    if let Some(champion) = tournament.champion() {
        log::info!("Tournament {} champion: {}", tournament_id, champion.name);
    }
    Ok(())
}

/// Move a series' game cursor. Does not touch results.
pub fn select_game(
    tournament: &mut Tournament,
    series_id: MatchId,
    game_index: usize,
) -> Result<(), TournamentError> {
    let series = tournament
        .bracket
        .as_mut()
        .and_then(|b| b.find_series_mut(series_id))
        .ok_or(TournamentError::SeriesNotFound(series_id))?;
    if game_index >= series.games.len() {
        return Err(TournamentError::GameIndexOutOfRange {
            index: game_index,
            best_of: series.best_of,
        });
    }
    series.select_game(game_index);
    Ok(())
}

/// Whether the latest round is decided and the bracket still has rounds to play.
pub fn can_advance(bracket: &Bracket) -> bool {
    match bracket.rounds.last() {
        Some(last) => {
            bracket.latest_round() < bracket.total_rounds() && last.iter().all(|s| s.completed)
        }
        None => false,
    }
}

/// Generate round `round + 1` from the winners of `round` (1-based), pairing adjacent series.
pub fn advance_playoff_round(tournament: &mut Tournament, round: u32) -> Result<(), TournamentError> {
    if tournament.phase != Phase::Playoffs {
        return Err(TournamentError::WrongPhase);
    }
    let bracket = tournament.bracket.as_ref().ok_or(TournamentError::WrongPhase)?;
    if round != bracket.latest_round() {
        return Err(TournamentError::RoundNotCurrent);
    }
    if round >= bracket.total_rounds() {
        return Err(TournamentError::BracketComplete);
    }
    let current = &bracket.rounds[round as usize - 1];
    let winners: Vec<TeamId> = current
        .iter()
        .map(|s| s.winner_team().ok_or(TournamentError::RoundIncomplete))
        .collect::<Result<_, _>>()?;

    let best_of = bracket.best_of;
    let next: Vec<PlayoffSeries> = winners
        .chunks_exact(2)
        .map(|pair| {
            let roster_1 = tournament.roster(pair[0]);
            let roster_2 = tournament.roster(pair[1]);
            PlayoffSeries::new(
                (pair[0], roster_1.as_slice()),
                (pair[1], roster_2.as_slice()),
                round + 1,
                best_of,
            )
        })
        .collect();

    let next_len = next.len();
    if let Some(bracket) = tournament.bracket.as_mut() {
        bracket.rounds.push(next);
    }
    log::info!(
        "Tournament {} advanced to round {} ({} series)",
        tournament.id,
        round + 1,
        next_len
    );
    Ok(())
}
