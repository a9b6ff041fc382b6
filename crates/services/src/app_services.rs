use std::sync::Arc;

use quiz_core::model::SourceLocation;
use storage::repository::Storage;

use crate::Clock;
use crate::app_settings_service::AppSettingsService;
use crate::error::AppServicesError;
use crate::observer::QuizObserver;
use crate::sessions::QuizSessionEngine;
use crate::topics::{QuizRepository, TopicFeed, TopicSource};

/// Assembles app-facing services over a storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    app_settings: Arc<AppSettingsService>,
    quiz_repository: Arc<QuizRepository>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock)
    }

    /// Build services over storage that lives only as long as the process.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::HttpClient` if the HTTP client cannot be built.
    pub fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::HttpClient` if the HTTP client cannot be built.
    pub fn from_storage(storage: &Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let app_settings = Arc::new(AppSettingsService::new(
            clock,
            Arc::clone(&storage.settings),
        ));
        let quiz_repository = Arc::new(QuizRepository::new(Arc::clone(&app_settings))?);
        Ok(Self {
            clock,
            app_settings,
            quiz_repository,
        })
    }

    /// Use `location` for this process only; the stored setting is untouched.
    #[must_use]
    pub fn with_source_override(self, location: SourceLocation) -> Self {
        let app_settings = Arc::new((*self.app_settings).clone().with_override(location));
        let quiz_repository = Arc::new(self.quiz_repository.with_settings(Arc::clone(&app_settings)));
        Self {
            clock: self.clock,
            app_settings,
            quiz_repository,
        }
    }

    #[must_use]
    pub fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }

    #[must_use]
    pub fn quiz_repository(&self) -> Arc<QuizRepository> {
        Arc::clone(&self.quiz_repository)
    }

    /// A topic feed for a browsing screen.
    #[must_use]
    pub fn topic_feed(&self) -> TopicFeed {
        let source: Arc<dyn TopicSource> = self.quiz_repository();
        TopicFeed::new(source)
    }

    /// A fresh session engine for a quiz screen.
    #[must_use]
    pub fn session_engine(&self, observer: Arc<dyn QuizObserver>) -> QuizSessionEngine {
        QuizSessionEngine::new(self.clock).with_observer(observer)
    }
}
