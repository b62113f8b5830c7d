//! In-memory store: tournaments by id behind an async RwLock.

use crate::models::{Tournament, TournamentId};
use crate::store::{recency_order, StoreError, TournamentStore};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStore for MemoryStore {
    async fn create(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let mut g = self.tournaments.write().await;
        if g.contains_key(&tournament.id) {
            return Err(StoreError::AlreadyExists(tournament.id));
        }
        g.insert(tournament.id, tournament.clone());
        Ok(())
    }

    async fn get(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        Ok(self.tournaments.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Tournament>, StoreError> {
        let g = self.tournaments.read().await;
        let mut owned: Vec<Tournament> = g
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(recency_order);
        Ok(owned)
    }

    async fn replace(&self, tournament: &Tournament) -> Result<bool, StoreError> {
        let mut g = self.tournaments.write().await;
        match g.get_mut(&tournament.id) {
            Some(slot) => {
                *slot = tournament.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: TournamentId) -> Result<bool, StoreError> {
        Ok(self.tournaments.write().await.remove(&id).is_some())
    }
}
