//! Wire shape of the topic list and its conversion into domain topics.

use serde::Deserialize;

use quiz_core::model::{Question, Topic};

use crate::error::DecodeError;

#[derive(Debug, Deserialize)]
struct WireTopic {
    title: String,
    desc: String,
    questions: Vec<WireQuestion>,
}

#[derive(Debug, Deserialize)]
struct WireQuestion {
    text: String,
    /// 1-based ordinal of the correct entry in `answers`.
    answer: String,
    answers: Vec<String>,
}

/// Decode a topic list body.
///
/// Any malformed topic or question fails the whole list.
pub(crate) fn decode_topics(body: &str) -> Result<Vec<Topic>, DecodeError> {
    let wire: Vec<WireTopic> = serde_json::from_str(body)?;
    wire.into_iter()
        .map(into_topic)
        .collect()
}

fn into_topic(wire: WireTopic) -> Result<Topic, DecodeError> {
    let questions = wire
        .questions
        .into_iter()
        .enumerate()
        .map(|(q_index, q)| {
            Question::from_ordinal(q.text, q.answers, &q.answer).map_err(|source| {
                DecodeError::Question {
                    topic: wire.title.clone(),
                    index: q_index,
                    source,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Topic::new(wire.title, wire.desc, questions))
}
