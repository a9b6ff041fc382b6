mod feed;
mod repository;
mod wire;

pub use feed::{FetchCompletion, FetchTicket, TopicFeed};
pub use repository::{QuizRepository, TopicSource};
