//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, QuizResultError, SourceLocationError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Why a fetched body could not be turned into topics.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("unexpected JSON shape: {0}")]
    Json(#[from] serde_json::Error),
    #[error("topic {topic:?}, question #{index}: {source}")]
    Question {
        topic: String,
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Errors emitted by `QuizRepository::fetch_topics`.
///
/// Every variant is a distinct failure cause with its own message; callers
/// receive them all through the one `Err` channel.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("could not reach {location}: {source}")]
    Connectivity {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{location} responded with HTTP {status}")]
    ServerStatus {
        location: String,
        status: reqwest::StatusCode,
    },
    #[error("{location} returned an empty response")]
    EmptyBody { location: String },
    #[error("topic list from {location} is malformed: {source}")]
    Decode {
        location: String,
        #[source]
        source: DecodeError,
    },
    #[error("topic fetch did not complete: {reason}")]
    Interrupted { reason: String },
}

/// Errors emitted when changing the data source configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(transparent)]
    Invalid(#[from] SourceLocationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz session engine.
///
/// None of these change the engine's state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("topic {topic:?} has no questions")]
    InvalidIndex { topic: String },
    #[error("answer {index} is out of range for {len} answers")]
    OutOfRange { index: usize, len: usize },
    #[error("no answer selected")]
    NoSelection,
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
    #[error(transparent)]
    Result(#[from] QuizResultError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
