#![forbid(unsafe_code)]

pub mod app_services;
pub mod app_settings_service;
pub mod error;
pub mod observer;
pub mod sessions;
pub mod topics;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use app_settings_service::AppSettingsService;
pub use error::{AppServicesError, ConfigError, DecodeError, FetchError, SessionError};
pub use observer::{NoopObserver, QuizObserver};
pub use sessions::{QuizSessionEngine, SessionProgress, SessionState};
pub use topics::{FetchCompletion, FetchTicket, QuizRepository, TopicFeed, TopicSource};
