use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument, warn};

use quiz_core::model::{SourceLocation, Topic};

use crate::app_settings_service::AppSettingsService;
use crate::error::{ConfigError, FetchError};

use super::wire::decode_topics;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Anything that can produce a topic list.
#[async_trait]
pub trait TopicSource: Send + Sync {
    /// Retrieve and decode the full topic list.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` describing why no topics could be produced.
    async fn fetch_topics(&self) -> Result<Vec<Topic>, FetchError>;
}

/// Fetches the topic list from the configured data source.
#[derive(Clone)]
pub struct QuizRepository {
    client: Client,
    settings: Arc<AppSettingsService>,
}

impl QuizRepository {
    /// Build a repository with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the TLS backend cannot be initialised.
    pub fn new(settings: Arc<AppSettingsService>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(client, settings))
    }

    #[must_use]
    pub fn with_client(client: Client, settings: Arc<AppSettingsService>) -> Self {
        Self { client, settings }
    }

    /// Share this repository's HTTP client with different settings.
    #[must_use]
    pub fn with_settings(&self, settings: Arc<AppSettingsService>) -> Self {
        Self::with_client(self.client.clone(), settings)
    }

    /// The location the next fetch will use.
    pub async fn resolve_source_location(&self) -> SourceLocation {
        self.settings.source_location().await
    }

    /// Change the location used by subsequent fetches.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the value is invalid or cannot be persisted.
    pub async fn set_source_location(&self, raw: &str) -> Result<SourceLocation, ConfigError> {
        self.settings.set_source_location(raw).await
    }

    async fn fetch_from(&self, location: &SourceLocation) -> Result<Vec<Topic>, FetchError> {
        let response = self
            .client
            .get(location.url().clone())
            .send()
            .await
            .map_err(|source| FetchError::Connectivity {
                location: location.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerStatus {
                location: location.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Connectivity {
                location: location.to_string(),
                source,
            })?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody {
                location: location.to_string(),
            });
        }

        decode_topics(&body).map_err(|source| FetchError::Decode {
            location: location.to_string(),
            source,
        })
    }
}

#[async_trait]
impl TopicSource for QuizRepository {
    #[instrument(skip(self))]
    async fn fetch_topics(&self) -> Result<Vec<Topic>, FetchError> {
        let location = self.resolve_source_location().await;
        info!(%location, "fetching topics");

        match self.fetch_from(&location).await {
            Ok(topics) => {
                info!(%location, count = topics.len(), "topics fetched");
                Ok(topics)
            }
            Err(err) => {
                warn!(%location, error = %err, "topic fetch failed");
                Err(err)
            }
        }
    }
}
