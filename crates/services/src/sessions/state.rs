use std::fmt;

/// Where the user is in the browse → answer → review → finish loop.
///
/// Question indices are 0-based positions in the active topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Browsing,
    AwaitingAnswer {
        question: usize,
    },
    AnswerSelected {
        question: usize,
        choice: usize,
    },
    Reviewing {
        question: usize,
        correct: bool,
    },
    Finished {
        score: usize,
        total: usize,
    },
}

impl SessionState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Browsing => "browsing",
            Self::AwaitingAnswer { .. } => "awaiting an answer",
            Self::AnswerSelected { .. } => "an answer is selected",
            Self::Reviewing { .. } => "reviewing",
            Self::Finished { .. } => "finished",
        }
    }

    /// Index of the question on screen, if any.
    #[must_use]
    pub fn question(&self) -> Option<usize> {
        match *self {
            Self::AwaitingAnswer { question }
            | Self::AnswerSelected { question, .. }
            | Self::Reviewing { question, .. } => Some(question),
            Self::Browsing | Self::Finished { .. } => None,
        }
    }

    #[must_use]
    pub fn is_browsing(&self) -> bool {
        matches!(self, Self::Browsing)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
