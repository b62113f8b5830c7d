//! Persistence: whole-document tournament storage keyed by id.
//!
//! Writes always replace the full document; there are no partial updates and no
//! concurrency tokens, so concurrent writers are last-write-wins.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::{Tournament, TournamentId};
use std::cmp::Ordering;

/// Errors from a storage backend.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A document with this id already exists.
    AlreadyExists(TournamentId),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Json(e) => write!(f, "Invalid document: {}", e),
            StoreError::AlreadyExists(id) => write!(f, "Tournament {} already exists", id),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
            StoreError::AlreadyExists(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Storage collaborator for tournament documents.
#[allow(async_fn_in_trait)]
pub trait TournamentStore {
    async fn create(&self, tournament: &Tournament) -> Result<(), StoreError>;

    async fn get(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;

    /// All tournaments of an owner, most recently visited first, then newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Tournament>, StoreError>;

    /// Replace an existing document. Returns false if there was nothing to replace.
    async fn replace(&self, tournament: &Tournament) -> Result<bool, StoreError>;

    /// Returns false if there was nothing to delete.
    async fn delete(&self, id: TournamentId) -> Result<bool, StoreError>;
}

/// Order for an owner's list: visited before never-visited, then by recency.
pub(crate) fn recency_order(a: &Tournament, b: &Tournament) -> Ordering {
    match (a.last_visited, b.last_visited) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(b.created_at.cmp(&a.created_at))
}

/// Backend picked at startup from configuration.
pub enum Store {
    Memory(MemoryStore),
    File(JsonFileStore),
}

impl TournamentStore for Store {
    async fn create(&self, tournament: &Tournament) -> Result<(), StoreError> {
        match self {
            Store::Memory(s) => s.create(tournament).await,
            Store::File(s) => s.create(tournament).await,
        }
    }

    async fn get(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        match self {
            Store::Memory(s) => s.get(id).await,
            Store::File(s) => s.get(id).await,
        }
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Tournament>, StoreError> {
        match self {
            Store::Memory(s) => s.list_by_owner(owner_id).await,
            Store::File(s) => s.list_by_owner(owner_id).await,
        }
    }

    async fn replace(&self, tournament: &Tournament) -> Result<bool, StoreError> {
        match self {
            Store::Memory(s) => s.replace(tournament).await,
            Store::File(s) => s.replace(tournament).await,
        }
    }

    async fn delete(&self, id: TournamentId) -> Result<bool, StoreError> {
        match self {
            Store::Memory(s) => s.delete(id).await,
            Store::File(s) => s.delete(id).await,
        }
    }
}
