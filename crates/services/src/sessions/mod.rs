mod engine;
mod progress;
mod state;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::QuizSessionEngine;
pub use progress::SessionProgress;
pub use state::SessionState;
