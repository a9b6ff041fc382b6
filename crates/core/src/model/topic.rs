use serde::Serialize;

use crate::model::icon::icon_for_title;
use crate::model::ids::TopicId;
use crate::model::question::Question;

/// A quiz topic as fetched from the data source.
///
/// The id and icon are derived from the title at construction; a topic is
/// never mutated afterwards. A topic may carry zero questions; starting a
/// session on it is refused by the session engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    id: TopicId,
    title: String,
    description: String,
    icon: String,
    questions: Vec<Question>,
}

impl Topic {
    /// Create a topic, attaching the icon registered for its title.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        let title = title.into();
        Self {
            id: TopicId::from_title(&title),
            icon: icon_for_title(&title).to_string(),
            title,
            description: description.into(),
            questions,
        }
    }

    #[must_use]
    pub fn id(&self) -> &TopicId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
