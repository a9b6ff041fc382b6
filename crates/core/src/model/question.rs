use serde::Serialize;
use thiserror::Error;

/// Minimum number of answer choices a question must offer.
pub const MIN_ANSWERS: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question needs at least 2 answers, got {len}")]
    TooFewAnswers { len: usize },

    #[error("correct answer ordinal is not an integer: {raw:?}")]
    InvalidOrdinal { raw: String },

    #[error("correct answer ordinal {ordinal} is outside 1..={len}")]
    OrdinalOutOfRange { ordinal: i64, len: usize },

    #[error("correct answer index {index} is outside the {len} answers")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A single multiple-choice question.
///
/// `correct_answer` is always a valid 0-based position in `answers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    answers: Vec<String>,
    correct_answer: usize,
}

impl Question {
    /// Build a question from a 0-based correct answer index.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if there are fewer than two answers or the index
    /// does not point into `answers`.
    pub fn new(
        text: impl Into<String>,
        answers: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if answers.len() < MIN_ANSWERS {
            return Err(QuestionError::TooFewAnswers { len: answers.len() });
        }
        if correct_answer >= answers.len() {
            return Err(QuestionError::IndexOutOfRange {
                index: correct_answer,
                len: answers.len(),
            });
        }
        Ok(Self {
            text,
            answers,
            correct_answer,
        })
    }

    /// Build a question from a 1-based ordinal string, as served on the wire.
    ///
    /// This is the only place a 1-based answer position is accepted.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidOrdinal` if `ordinal` is not an integer,
    /// `QuestionError::OrdinalOutOfRange` if it falls outside `1..=answers.len()`,
    /// or any error from [`Question::new`].
    pub fn from_ordinal(
        text: impl Into<String>,
        answers: Vec<String>,
        ordinal: &str,
    ) -> Result<Self, QuestionError> {
        let parsed: i64 = ordinal
            .parse()
            .map_err(|_| QuestionError::InvalidOrdinal {
                raw: ordinal.to_string(),
            })?;
        let len = answers.len();
        let index = usize::try_from(parsed)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .filter(|idx| *idx < len)
            .ok_or(QuestionError::OrdinalOutOfRange {
                ordinal: parsed,
                len,
            })?;
        Self::new(text, answers, index)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Text of the correct answer.
    #[must_use]
    pub fn correct_answer_text(&self) -> &str {
        &self.answers[self.correct_answer]
    }

    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn ordinal_two_maps_to_index_one() {
        let q = Question::from_ordinal("Pick b", abc(), "2").unwrap();
        assert_eq!(q.correct_answer(), 1);
        assert_eq!(q.correct_answer_text(), "b");
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn padded_ordinal_is_rejected() {
        for raw in [" 3 ", "2\n", ""] {
            let err = Question::from_ordinal("Q", abc(), raw).unwrap_err();
            assert_eq!(err, QuestionError::InvalidOrdinal { raw: raw.into() });
        }
    }

    #[test]
    fn non_numeric_ordinal_is_rejected() {
        let err = Question::from_ordinal("Q", abc(), "two").unwrap_err();
        assert_eq!(err, QuestionError::InvalidOrdinal { raw: "two".into() });
    }

    #[test]
    fn ordinal_outside_range_is_rejected() {
        for raw in ["0", "4", "-1"] {
            let err = Question::from_ordinal("Q", abc(), raw).unwrap_err();
            assert!(
                matches!(err, QuestionError::OrdinalOutOfRange { len: 3, .. }),
                "{raw} -> {err:?}"
            );
        }
    }

    #[test]
    fn single_answer_is_rejected() {
        let err = Question::new("Q", vec!["only".into()], 0).unwrap_err();
        assert_eq!(err, QuestionError::TooFewAnswers { len: 1 });
    }

    #[test]
    fn blank_text_is_kept_verbatim() {
        let q = Question::new("", abc(), 0).unwrap();
        assert_eq!(q.text(), "");
    }

    #[test]
    fn index_must_point_into_answers() {
        let err = Question::new("Q", abc(), 3).unwrap_err();
        assert_eq!(err, QuestionError::IndexOutOfRange { index: 3, len: 3 });
    }
}
