use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{SettingsRecord, SettingsRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<SettingsRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT source_location, updated_at
            FROM app_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let source_location: Option<String> = row
            .try_get("source_location")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let updated_at: DateTime<Utc> = row
            .try_get("updated_at")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(Some(SettingsRecord {
            source_location,
            updated_at,
        }))
    }

    async fn save_settings(&self, record: &SettingsRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_settings (id, source_location, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                source_location = excluded.source_location,
                updated_at = excluded.updated_at
            ",
        )
        .bind(1_i64)
        .bind(record.source_location.as_deref())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
