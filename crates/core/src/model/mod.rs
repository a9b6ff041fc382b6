mod icon;
mod ids;
mod performance;
mod question;
mod result;
mod source;
mod topic;

pub use icon::{GENERIC_ICON, icon_for_title};
pub use ids::TopicId;
pub use performance::Performance;
pub use question::{MIN_ANSWERS, Question, QuestionError};
pub use result::{QuizResult, QuizResultError};
pub use source::{DEFAULT_SOURCE_URL, SourceLocation, SourceLocationError};
pub use topic::Topic;
