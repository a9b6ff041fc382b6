use std::sync::{Arc, Mutex};

use quiz_core::model::{Performance, Topic};
use quiz_core::time::fixed_clock;
use services::{AppServices, QuizObserver, SessionState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct ScreenLog {
    topics: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
    states: Mutex<Vec<SessionState>>,
}

impl QuizObserver for ScreenLog {
    fn on_topics_loaded(&self, topics: &[Arc<Topic>]) {
        *self.topics.lock().unwrap() = topics.iter().map(|t| t.title().to_string()).collect();
    }

    fn on_fetch_failed(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }

    fn on_state_changed(&self, state: &SessionState) {
        self.states.lock().unwrap().push(*state);
    }
}

fn three_topics() -> serde_json::Value {
    serde_json::json!([
        {"title": "Mathematics", "desc": "Did you pass the third grade?", "questions": [
            {"text": "What is 2+2?", "answer": "1", "answers": ["4", "22", "An irrational number", "Nobody knows"]},
            {"text": "What is 3*3?", "answer": "2", "answers": ["6", "9", "33"]}
        ]},
        {"title": "Marvel Super Heroes", "desc": "Avengers, Assemble!", "questions": [
            {"text": "Who is Iron Man?", "answer": "1", "answers": ["Tony Stark", "Obadiah Stane"]}
        ]},
        {"title": "Science!", "desc": "Because SCIENCE!", "questions": [
            {"text": "What is fire?", "answer": "1", "answers": ["One of the four classical elements", "A magical reaction"]}
        ]}
    ])
}

async fn serve(body: &serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/questions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn fetch_play_and_finish_perfect() {
    let server = serve(&three_topics()).await;
    let services = AppServices::in_memory(fixed_clock()).unwrap();
    services
        .app_settings()
        .set_source_location(&format!("{}/questions.json", server.uri()))
        .await
        .unwrap();

    let screen = Arc::new(ScreenLog::default());
    let mut feed = services.topic_feed();
    feed.refresh(screen.as_ref()).await;

    assert_eq!(feed.topics().len(), 3);
    assert_eq!(
        *screen.topics.lock().unwrap(),
        vec!["Mathematics", "Marvel Super Heroes", "Science!"]
    );
    assert_eq!(feed.topics()[0].icon(), "math_icon");
    assert_eq!(feed.topics()[1].icon(), "heroes_icon");
    assert_eq!(feed.topics()[2].icon(), "photo");

    let topic = Arc::clone(&feed.topics()[0]);
    let mut engine = services.session_engine(screen.clone());
    engine.select_topic(Arc::clone(&topic)).unwrap();

    while let Some(question) = engine.current_question() {
        let correct = question.correct_answer();
        engine.select_answer(correct).unwrap();
        assert!(matches!(
            engine.submit().unwrap(),
            SessionState::Reviewing { correct: true, .. }
        ));
        engine.next().unwrap();
    }

    assert_eq!(
        engine.state(),
        SessionState::Finished {
            score: topic.question_count(),
            total: topic.question_count()
        }
    );
    let result = engine.result().unwrap();
    assert_eq!(result.score(), topic.question_count());
    assert_eq!(result.performance(), Performance::Perfect);
    assert_eq!(result.performance().message(), "Perfect");

    engine.acknowledge_finish().unwrap();
    assert_eq!(
        screen.states.lock().unwrap().last(),
        Some(&SessionState::Browsing)
    );
}

#[tokio::test]
async fn second_ordinal_marks_second_answer_correct() {
    let body = serde_json::json!([
        {"title": "Letters", "desc": "abc", "questions": [
            {"text": "Pick b", "answer": "2", "answers": ["a", "b", "c"]}
        ]}
    ]);
    let server = serve(&body).await;
    let services = AppServices::in_memory(fixed_clock()).unwrap();
    services
        .app_settings()
        .set_source_location(&format!("{}/questions.json", server.uri()))
        .await
        .unwrap();

    let screen = ScreenLog::default();
    let mut feed = services.topic_feed();
    feed.refresh(&screen).await;

    let topic = Arc::clone(&feed.topics()[0]);
    assert_eq!(topic.questions()[0].correct_answer(), 1);

    let mut engine = services.session_engine(Arc::new(ScreenLog::default()));
    engine.select_topic(topic).unwrap();
    engine.select_answer(1).unwrap();
    assert_eq!(
        engine.submit().unwrap(),
        SessionState::Reviewing {
            question: 0,
            correct: true
        }
    );
}

#[tokio::test]
async fn fetch_failure_reaches_the_screen() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let services = AppServices::in_memory(fixed_clock()).unwrap();
    services
        .app_settings()
        .set_source_location(&server.uri())
        .await
        .unwrap();

    let screen = ScreenLog::default();
    let mut feed = services.topic_feed();
    feed.refresh(&screen).await;

    assert!(feed.topics().is_empty());
    let failures = screen.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("HTTP 500"));
}
