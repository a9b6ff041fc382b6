use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of the app settings row.
///
/// `source_location` is stored verbatim; validation happens when it is read
/// back so that a malformed value can fall back to the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRecord {
    pub source_location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Repository contract for the single persisted configuration value.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch the persisted settings row, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_settings(&self) -> Result<Option<SettingsRecord>, StorageError>;

    /// Persist or replace the settings row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be written.
    async fn save_settings(&self, record: &SettingsRecord) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    settings: Arc<Mutex<Option<SettingsRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with a raw stored value, bypassing validation.
    #[must_use]
    pub fn with_source_location(raw: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            settings: Arc::new(Mutex::new(Some(SettingsRecord {
                source_location: Some(raw.into()),
                updated_at,
            }))),
        }
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<SettingsRecord>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, record: &SettingsRecord) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(record.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let settings: Arc<dyn SettingsRepository> = Arc::new(InMemoryRepository::new());
        Self { settings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn empty_repository_has_no_settings() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_settings().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_previous_row() {
        let repo = InMemoryRepository::with_source_location("garbage", fixed_now());
        let record = SettingsRecord {
            source_location: Some("https://example.com/q.json".into()),
            updated_at: fixed_now(),
        };
        repo.save_settings(&record).await.unwrap();

        let fetched = repo.get_settings().await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();
        let record = SettingsRecord {
            source_location: None,
            updated_at: fixed_now(),
        };
        other.save_settings(&record).await.unwrap();
        assert_eq!(repo.get_settings().await.unwrap(), Some(record));
    }
}
