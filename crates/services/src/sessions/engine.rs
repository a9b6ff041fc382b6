use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use quiz_core::Clock;
use quiz_core::model::{Question, QuizResult, Topic};

use crate::error::SessionError;
use crate::observer::{NoopObserver, QuizObserver};

use super::progress::SessionProgress;
use super::state::SessionState;

//
// ─── ACTIVE SESSION ────────────────────────────────────────────────────────────
//

/// Data for the quiz in progress; exists from `select_topic` until the user
/// abandons or acknowledges the result.
struct ActiveSession {
    topic: Arc<Topic>,
    correct_count: usize,
    selected_answer: Option<usize>,
    answered: usize,
    started_at: DateTime<Utc>,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// State machine for one quiz screen.
///
/// Every operation either performs its transition completely or returns a
/// `SessionError` and leaves the engine exactly as it was. Scoring happens
/// only in [`QuizSessionEngine::submit`]. The engine is owned by a single
/// screen and mutated from one context; it is not meant to be shared.
pub struct QuizSessionEngine {
    clock: Clock,
    observer: Arc<dyn QuizObserver>,
    state: SessionState,
    session: Option<ActiveSession>,
    result: Option<QuizResult>,
}

impl QuizSessionEngine {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            observer: Arc::new(NoopObserver),
            state: SessionState::Browsing,
            session: None,
            result: None,
        }
    }

    /// Notify `observer` of every successful transition.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn QuizObserver>) -> Self {
        self.observer = observer;
        self
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Start a quiz on `topic` at its first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidIndex` if the topic has no questions and
    /// `SessionError::InvalidTransition` unless the engine is browsing.
    pub fn select_topic(&mut self, topic: Arc<Topic>) -> Result<SessionState, SessionError> {
        if !self.state.is_browsing() {
            return Err(self.invalid("select a topic"));
        }
        if topic.question_count() == 0 {
            return Err(SessionError::InvalidIndex {
                topic: topic.title().to_string(),
            });
        }

        info!(topic = %topic.id(), questions = topic.question_count(), "quiz started");
        self.session = Some(ActiveSession {
            topic,
            correct_count: 0,
            selected_answer: None,
            answered: 0,
            started_at: self.clock.now(),
        });
        self.result = None;
        Ok(self.transition(SessionState::AwaitingAnswer { question: 0 }))
    }

    /// Choose an answer for the current question. The last choice wins.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if `index` is not one of the
    /// question's answers and `SessionError::InvalidTransition` outside of
    /// answering.
    pub fn select_answer(&mut self, index: usize) -> Result<SessionState, SessionError> {
        let question = match self.state {
            SessionState::AwaitingAnswer { question }
            | SessionState::AnswerSelected { question, .. } => question,
            _ => return Err(self.invalid("select an answer")),
        };

        let len = self.question_at(question, "select an answer")?.answer_count();
        if index >= len {
            return Err(SessionError::OutOfRange { index, len });
        }

        self.session_mut("select an answer")?.selected_answer = Some(index);
        Ok(self.transition(SessionState::AnswerSelected {
            question,
            choice: index,
        }))
    }

    /// Grade the selected answer and show the review for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` if nothing has been selected yet and
    /// `SessionError::InvalidTransition` in any other state, including a
    /// second submit of the same answer.
    pub fn submit(&mut self) -> Result<SessionState, SessionError> {
        let question = match self.state {
            SessionState::AnswerSelected { question, .. } => question,
            SessionState::AwaitingAnswer { .. } => return Err(SessionError::NoSelection),
            _ => return Err(self.invalid("submit")),
        };

        let choice = self
            .active("submit")?
            .selected_answer
            .ok_or(SessionError::NoSelection)?;
        let correct = self.question_at(question, "submit")?.is_correct(choice);

        let session = self.session_mut("submit")?;
        session.answered += 1;
        if correct {
            session.correct_count += 1;
        }
        Ok(self.transition(SessionState::Reviewing { question, correct }))
    }

    /// Move past the review to the next question, or finish the quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless reviewing.
    pub fn next(&mut self) -> Result<SessionState, SessionError> {
        let SessionState::Reviewing { question, .. } = self.state else {
            return Err(self.invalid("advance"));
        };

        let session = self.active("advance")?;
        let total = session.topic.question_count();
        if question + 1 < total {
            self.session_mut("advance")?.selected_answer = None;
            return Ok(self.transition(SessionState::AwaitingAnswer {
                question: question + 1,
            }));
        }

        let score = session.correct_count;
        let completed_at = self.clock.now().max(session.started_at);
        let result = QuizResult::new(
            session.topic.id().clone(),
            session.topic.title(),
            score,
            total,
            session.started_at,
            completed_at,
        )?;
        info!(
            topic = %result.topic_id(),
            score,
            total,
            performance = %result.performance(),
            "quiz finished"
        );

        self.result = Some(result);
        self.session_mut("advance")?.selected_answer = None;
        Ok(self.transition(SessionState::Finished { score, total }))
    }

    /// Drop the quiz in progress without recording a score.
    ///
    /// Abandoning while already browsing is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` once the quiz has finished;
    /// use [`QuizSessionEngine::acknowledge_finish`] instead.
    pub fn abandon(&mut self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::Finished { .. } => Err(self.invalid("abandon")),
            SessionState::Browsing => Ok(SessionState::Browsing),
            _ => {
                if let Some(session) = &self.session {
                    info!(topic = %session.topic.id(), answered = session.answered, "quiz abandoned");
                }
                self.session = None;
                self.result = None;
                Ok(self.transition(SessionState::Browsing))
            }
        }
    }

    /// Dismiss the result screen and return to the topic list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless finished.
    pub fn acknowledge_finish(&mut self) -> Result<SessionState, SessionError> {
        if !self.state.is_finished() {
            return Err(self.invalid("acknowledge the result"));
        }
        self.session = None;
        self.result = None;
        Ok(self.transition(SessionState::Browsing))
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn topic(&self) -> Option<&Arc<Topic>> {
        self.session.as_ref().map(|s| &s.topic)
    }

    /// The question on screen, if one is.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        let index = self.state.question()?;
        self.topic()?.question(index)
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.selected_answer)
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.correct_count)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        let session = self.session.as_ref()?;
        let total = session.topic.question_count();
        Some(SessionProgress {
            total,
            answered: session.answered,
            remaining: total.saturating_sub(session.answered),
            is_complete: self.state.is_finished(),
        })
    }

    /// Result of the finished quiz; `None` until the state is `Finished`.
    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn transition(&mut self, next: SessionState) -> SessionState {
        debug!(from = %self.state, to = %next, "session transition");
        self.state = next;
        self.observer.on_state_changed(&self.state);
        next
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            state: self.state.name(),
        }
    }

    fn active(&self, operation: &'static str) -> Result<&ActiveSession, SessionError> {
        self.session.as_ref().ok_or_else(|| self.invalid(operation))
    }

    fn session_mut(&mut self, operation: &'static str) -> Result<&mut ActiveSession, SessionError> {
        let state = self.state.name();
        self.session
            .as_mut()
            .ok_or(SessionError::InvalidTransition { operation, state })
    }

    fn question_at(&self, index: usize, operation: &'static str) -> Result<&Question, SessionError> {
        self.active(operation)?
            .topic
            .question(index)
            .ok_or_else(|| self.invalid(operation))
    }
}

impl fmt::Debug for QuizSessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSessionEngine")
            .field("state", &self.state)
            .field("topic", &self.topic().map(|t| t.id().clone()))
            .field("correct_count", &self.correct_count())
            .field("selected_answer", &self.selected_answer())
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
