use std::sync::Arc;

use quiz_core::model::Topic;

use crate::sessions::SessionState;

/// Presentation-side callbacks the core drives.
///
/// The core never renders anything itself; a screen implements this trait and
/// derives its widgets from what it is told.
pub trait QuizObserver: Send + Sync {
    fn on_topics_loaded(&self, _topics: &[Arc<Topic>]) {}

    fn on_fetch_failed(&self, _message: &str) {}

    fn on_state_changed(&self, _state: &SessionState) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl QuizObserver for NoopObserver {}
