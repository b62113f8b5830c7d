//! Integration tests for the service layer against both store backends.

mod common;

use common::{entry_for, new_tournament, OWNER};
use cup_tournament_web::{
    service, Format, JsonFileStore, MemoryStore, RoundState, TournamentError, TournamentStore,
    TournamentType,
};
use std::path::PathBuf;
use uuid::Uuid;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("cup-tournament-test-{}", Uuid::new_v4()))
}

async fn full_playoff_flow<S: TournamentStore>(store: &S) {
    let created = service::create_tournament(
        store,
        OWNER,
        new_tournament(Format::Singles, TournamentType::RegularPlusPlayoffs, 1, &["A", "B", "C", "D"]),
    )
    .await
    .unwrap();
    let id = created.id;
    assert_eq!(created.regular_matches.len(), 6);

    for m in &created.regular_matches {
        let entry = entry_for(&created, m.team_1, m.team_2, 3, 1);
        service::record_regular_match_result(store, OWNER, id, m.id, &entry)
            .await
            .unwrap();
    }

    let standings = service::get_standings(store, OWNER, id).await.unwrap();
    assert_eq!(standings.len(), 4);
    assert_eq!(standings.iter().map(|s| s.wins).sum::<u32>(), 6);

    let t = service::enter_playoffs(store, OWNER, id, 2, 1).await.unwrap();
    let final_series = match t.bracket.as_ref().unwrap().round(1) {
        RoundState::Generated(s) => s[0].clone(),
        RoundState::NotGenerated => panic!("no bracket"),
    };
    let entry = entry_for(&t, final_series.team_1, final_series.team_2, 1, 4);
    let t = service::record_playoff_game_result(store, OWNER, id, final_series.id, 0, &entry)
        .await
        .unwrap();
    assert_eq!(t.champion().map(|c| c.id), Some(final_series.team_2));

    // The stored document is the updated one.
    let reloaded = service::get_tournament(store, OWNER, id).await.unwrap();
    assert_eq!(reloaded.champion().map(|c| c.id), Some(final_series.team_2));
    assert!(reloaded.last_visited.is_some());

    let stats = service::get_player_stats(store, OWNER, id).await.unwrap();
    assert_eq!(stats.len(), 4);
    assert_eq!(stats.iter().map(|l| l.playoffs.games_played).sum::<u32>(), 2);

    assert!(matches!(
        service::advance_playoff_round(store, OWNER, id, 1).await,
        Err(TournamentError::BracketComplete)
    ));
}

#[tokio::test]
async fn memory_store_full_flow() {
    full_playoff_flow(&MemoryStore::new()).await;
}

#[tokio::test]
async fn file_store_full_flow() {
    let dir = temp_dir();
    let store = JsonFileStore::open(&dir).await.unwrap();
    full_playoff_flow(&store).await;
    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn other_owners_cannot_see_or_change_a_tournament() {
    let store = MemoryStore::new();
    let t = service::create_tournament(
        &store,
        OWNER,
        new_tournament(Format::Singles, TournamentType::RegularPlusPlayoffs, 1, &["A", "B"]),
    )
    .await
    .unwrap();

    assert!(matches!(
        service::get_tournament(&store, "someone-else", t.id).await,
        Err(TournamentError::TournamentNotFound(_))
    ));
    assert!(matches!(
        service::delete_tournament(&store, "someone-else", t.id).await,
        Err(TournamentError::TournamentNotFound(_))
    ));
    assert!(service::list_tournaments(&store, "someone-else").await.unwrap().is_empty());

    service::delete_tournament(&store, OWNER, t.id).await.unwrap();
    assert!(matches!(
        service::get_standings(&store, OWNER, t.id).await,
        Err(TournamentError::TournamentNotFound(_))
    ));
}

#[tokio::test]
async fn failed_operations_are_not_persisted() {
    let store = MemoryStore::new();
    let t = service::create_tournament(
        &store,
        OWNER,
        new_tournament(Format::Singles, TournamentType::RegularPlusPlayoffs, 1, &["A", "B"]),
    )
    .await
    .unwrap();
    let m = &t.regular_matches[0];
    let tie = entry_for(&t, m.team_1, m.team_2, 2, 2);
    assert!(service::record_regular_match_result(&store, OWNER, t.id, m.id, &tie)
        .await
        .is_err());
    let stored = store.get(t.id).await.unwrap().unwrap();
    assert!(!stored.regular_matches[0].result.completed);
}

#[tokio::test]
async fn list_orders_by_last_visit_then_creation() {
    let store = MemoryStore::new();
    let mut ids = Vec::new();
    for name in ["first", "second", "third"] {
        let mut new = new_tournament(Format::Singles, TournamentType::RegularPlusPlayoffs, 1, &["A", "B"]);
        new.name = name.to_string();
        ids.push(service::create_tournament(&store, OWNER, new).await.unwrap().id);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    // Never visited: newest first.
    let names: Vec<_> = service::list_tournaments(&store, OWNER)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, ["third", "second", "first"]);

    // Visiting the oldest moves it to the top.
    service::get_tournament(&store, OWNER, ids[0]).await.unwrap();
    let names: Vec<_> = service::list_tournaments(&store, OWNER)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, ["first", "third", "second"]);
}

#[tokio::test]
async fn file_store_round_trips_documents() {
    let dir = temp_dir();
    let store = JsonFileStore::open(&dir).await.unwrap();
    let t = service::create_tournament(
        &store,
        OWNER,
        new_tournament(Format::Singles, TournamentType::Playoffs, 3, &["A", "B", "C", "D"]),
    )
    .await
    .unwrap();

    let loaded = store.get(t.id).await.unwrap().unwrap();
    assert_eq!(loaded.bracket, t.bracket);
    assert_eq!(loaded.playoff_seed_map, t.playoff_seed_map);
    assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    assert!(matches!(
        store.create(&t).await,
        Err(cup_tournament_web::StoreError::AlreadyExists(_))
    ));

    assert!(store.delete(t.id).await.unwrap());
    assert!(!store.delete(t.id).await.unwrap());
    let _ = tokio::fs::remove_dir_all(&dir).await;
}
