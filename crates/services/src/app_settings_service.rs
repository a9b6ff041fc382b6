use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::SourceLocation;
use storage::repository::{SettingsRecord, SettingsRepository};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Process-wide data source configuration, injected into the topic repository.
#[derive(Clone)]
pub struct AppSettingsService {
    clock: Clock,
    repo: Arc<dyn SettingsRepository>,
    override_location: Option<SourceLocation>,
}

impl AppSettingsService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn SettingsRepository>) -> Self {
        Self {
            clock,
            repo,
            override_location: None,
        }
    }

    /// Resolve every read to `location` without persisting it.
    #[must_use]
    pub fn with_override(mut self, location: SourceLocation) -> Self {
        self.override_location = Some(location);
        self
    }

    /// Resolve the data source location.
    ///
    /// An override wins over the persisted value. Never fails: a missing,
    /// malformed or unreadable value resolves to the built-in default.
    pub async fn source_location(&self) -> SourceLocation {
        if let Some(location) = &self.override_location {
            return location.clone();
        }

        let stored = match self.repo.get_settings().await {
            Ok(record) => record.and_then(|r| r.source_location),
            Err(err) => {
                warn!(error = %err, "reading source location failed; using default");
                None
            }
        };

        match stored.as_deref().map(SourceLocation::parse) {
            None => SourceLocation::default(),
            Some(Ok(location)) => location,
            Some(Err(err)) => {
                warn!(error = %err, "stored source location is malformed; using default");
                SourceLocation::default()
            }
        }
    }

    /// Validate and persist a new data source location.
    ///
    /// Fetches already in flight keep the location they started with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the value is blank or not an
    /// http(s) URL, or `ConfigError::Storage` if persistence fails.
    pub async fn set_source_location(&self, raw: &str) -> Result<SourceLocation, ConfigError> {
        let location = SourceLocation::parse(raw)?;
        self.repo
            .save_settings(&SettingsRecord {
                source_location: Some(location.as_str().to_string()),
                updated_at: self.clock.now(),
            })
            .await?;
        info!(location = %location, "source location updated");
        Ok(location)
    }
}
