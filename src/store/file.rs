//! JSON document store: one `<id>.json` file per tournament in a directory.

use crate::models::{Tournament, TournamentId};
use crate::store::{recency_order, StoreError, TournamentStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) the data directory.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path(&self, id: TournamentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Write via a temp file and rename so readers never see a half-written document.
    async fn write(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(tournament)?;
        let path = self.path(tournament.id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn exists(&self, id: TournamentId) -> Result<bool, StoreError> {
        match tokio::fs::metadata(self.path(id)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl TournamentStore for JsonFileStore {
    async fn create(&self, tournament: &Tournament) -> Result<(), StoreError> {
        if self.exists(tournament.id).await? {
            return Err(StoreError::AlreadyExists(tournament.id));
        }
        self.write(tournament).await
    }

    async fn get(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        match tokio::fs::read(self.path(id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Tournament>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut owned = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<Tournament>(&bytes) {
                Ok(t) if t.owner_id == owner_id => owned.push(t),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable document {}: {}", path.display(), e),
            }
        }
        owned.sort_by(recency_order);
        Ok(owned)
    }

    async fn replace(&self, tournament: &Tournament) -> Result<bool, StoreError> {
        if !self.exists(tournament.id).await? {
            return Ok(false);
        }
        self.write(tournament).await?;
        Ok(true)
    }

    async fn delete(&self, id: TournamentId) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(self.path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
