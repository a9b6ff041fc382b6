use std::fmt;

use serde::{Deserialize, Serialize};

/// Feedback band for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Performance {
    Perfect,
    AlmostThere,
    GoodEffort,
    TryHarder,
}

impl Performance {
    /// Band a score against the number of questions.
    ///
    /// Each band includes its lower bound, so exactly 75% is `AlmostThere`
    /// and exactly 50% is `GoodEffort`. Computed with integer arithmetic. A
    /// zero total counts as `Perfect`.
    #[must_use]
    pub fn from_score(correct: usize, total: usize) -> Self {
        let correct = correct as u128;
        let total = total as u128;
        if correct >= total {
            Self::Perfect
        } else if correct * 4 >= total * 3 {
            Self::AlmostThere
        } else if correct * 2 >= total {
            Self::GoodEffort
        } else {
            Self::TryHarder
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::AlmostThere => "Almost there",
            Self::GoodEffort => "Good effort, can improve",
            Self::TryHarder => "Try harder",
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
