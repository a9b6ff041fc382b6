use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Performance, TopicId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("score ({score}) exceeds question count ({total})")]
    ScoreExceedsTotal { score: usize, total: usize },
}

/// Outcome of a finished quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    topic_id: TopicId,
    topic_title: String,
    score: usize,
    total: usize,
    performance: Performance,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// # Errors
    ///
    /// Returns `QuizResultError` if the time range is inverted or the score is
    /// larger than the number of questions.
    pub fn new(
        topic_id: TopicId,
        topic_title: impl Into<String>,
        score: usize,
        total: usize,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        if completed_at < started_at {
            return Err(QuizResultError::InvalidTimeRange);
        }
        if score > total {
            return Err(QuizResultError::ScoreExceedsTotal { score, total });
        }
        Ok(Self {
            topic_id,
            topic_title: topic_title.into(),
            score,
            total,
            performance: Performance::from_score(score, total),
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn topic_title(&self) -> &str {
        &self.topic_title
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn performance(&self) -> Performance {
        self.performance
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
