//! Client-facing operations: load a tournament from the store, apply the logic, write it back.
//!
//! Every call takes the store handle and the caller's owner id explicitly. A tournament that
//! belongs to another owner is reported as not found.

use crate::logic::{self, NewTournament, PlayerLine, Standing};
use crate::models::{MatchId, ResultEntry, Tournament, TournamentError, TournamentId};
use crate::store::TournamentStore;

/// Fetch a tournament without recording a visit.
pub async fn find_tournament<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
) -> Result<Tournament, TournamentError> {
    match store.get(id).await? {
        Some(t) if t.owner_id == owner_id => Ok(t),
        _ => Err(TournamentError::TournamentNotFound(id)),
    }
}

async fn save<S: TournamentStore>(store: &S, tournament: &Tournament) -> Result<(), TournamentError> {
    if store.replace(tournament).await? {
        Ok(())
    } else {
        Err(TournamentError::TournamentNotFound(tournament.id))
    }
}

/// Load, mutate, and replace the whole document. Nothing is written if `apply` fails.
async fn update<S, F>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
    apply: F,
) -> Result<Tournament, TournamentError>
where
    S: TournamentStore,
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut tournament = find_tournament(store, owner_id, id).await?;
    apply(&mut tournament)?;
    save(store, &tournament).await?;
    Ok(tournament)
}

pub async fn create_tournament<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    new: NewTournament,
) -> Result<Tournament, TournamentError> {
    let tournament = logic::create_tournament(owner_id, new)?;
    store.create(&tournament).await?;
    Ok(tournament)
}

/// Fetch a tournament and record the visit.
pub async fn get_tournament<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
) -> Result<Tournament, TournamentError> {
    update(store, owner_id, id, |t| {
        t.touch();
        Ok(())
    })
    .await
}

pub async fn list_tournaments<S: TournamentStore>(
    store: &S,
    owner_id: &str,
) -> Result<Vec<Tournament>, TournamentError> {
    Ok(store.list_by_owner(owner_id).await?)
}

pub async fn delete_tournament<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
) -> Result<(), TournamentError> {
    find_tournament(store, owner_id, id).await?;
    if !store.delete(id).await? {
        return Err(TournamentError::TournamentNotFound(id));
    }
    log::info!("Deleted tournament {}", id);
    Ok(())
}

pub async fn record_regular_match_result<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
    match_id: MatchId,
    entry: &ResultEntry,
) -> Result<Tournament, TournamentError> {
    update(store, owner_id, id, |t| {
        logic::record_regular_result(t, match_id, entry)
    })
    .await
}

pub async fn reshuffle_teams<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
) -> Result<Tournament, TournamentError> {
    update(store, owner_id, id, logic::reshuffle_teams).await
}

pub async fn enter_playoffs<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
    bracket_size: usize,
    best_of: u32,
) -> Result<Tournament, TournamentError> {
    update(store, owner_id, id, |t| {
        logic::enter_playoffs(t, bracket_size, best_of)
    })
    .await
}

pub async fn record_playoff_game_result<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
    series_id: MatchId,
    game_index: usize,
    entry: &ResultEntry,
) -> Result<Tournament, TournamentError> {
    update(store, owner_id, id, |t| {
        logic::record_playoff_game(t, series_id, game_index, entry)
    })
    .await
}

pub async fn select_game<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
    series_id: MatchId,
    game_index: usize,
) -> Result<Tournament, TournamentError> {
    update(store, owner_id, id, |t| {
        logic::select_game(t, series_id, game_index)
    })
    .await
}

pub async fn advance_playoff_round<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
    round: u32,
) -> Result<Tournament, TournamentError> {
    update(store, owner_id, id, |t| logic::advance_playoff_round(t, round)).await
}

pub async fn get_standings<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
) -> Result<Vec<Standing>, TournamentError> {
    let tournament = find_tournament(store, owner_id, id).await?;
    Ok(logic::compute_standings(&tournament.teams))
}

pub async fn get_player_stats<S: TournamentStore>(
    store: &S,
    owner_id: &str,
    id: TournamentId,
) -> Result<Vec<PlayerLine>, TournamentError> {
    let tournament = find_tournament(store, owner_id, id).await?;
    Ok(logic::player_leaderboard(&tournament))
}
