use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use quiz_core::model::Topic;

use crate::error::FetchError;
use crate::observer::QuizObserver;

use super::repository::TopicSource;

/// Handle for a fetch issued by [`TopicFeed::request_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket {
    pub generation: u64,
}

/// Outcome of one fetch, delivered exactly once on the feed's channel.
///
/// A fetch that panics is delivered as `FetchError::Interrupted`.
#[derive(Debug)]
pub struct FetchCompletion {
    pub generation: u64,
    pub result: Result<Vec<Topic>, FetchError>,
}

/// Topic list owned by the browsing screen.
///
/// Fetches run on the tokio runtime and report back through a channel that
/// the owner drains on its own context. Overlapping fetches are not
/// cancelled; only the completion of the most recently issued one is applied.
pub struct TopicFeed {
    source: Arc<dyn TopicSource>,
    issued: u64,
    sender: mpsc::UnboundedSender<FetchCompletion>,
    receiver: mpsc::UnboundedReceiver<FetchCompletion>,
    topics: Vec<Arc<Topic>>,
}

impl TopicFeed {
    #[must_use]
    pub fn new(source: Arc<dyn TopicSource>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            source,
            issued: 0,
            sender,
            receiver,
            topics: Vec::new(),
        }
    }

    /// Start a fetch in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_refresh(&mut self) -> FetchTicket {
        self.issued += 1;
        let generation = self.issued;
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { source.fetch_topics().await });
            let result = match fetch.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(generation, error = %err, "topic fetch task died");
                    Err(FetchError::Interrupted {
                        reason: err.to_string(),
                    })
                }
            };
            // Fails only once the feed itself is gone.
            let _ = sender.send(FetchCompletion { generation, result });
        });
        debug!(generation, "topic refresh requested");
        FetchTicket { generation }
    }

    /// Wait for the next completion, in arrival order.
    pub async fn next_completion(&mut self) -> Option<FetchCompletion> {
        self.receiver.recv().await
    }

    /// Apply a completion if it belongs to the latest request.
    ///
    /// Returns `false` and leaves the topic list untouched for stale
    /// completions.
    pub fn apply(&mut self, completion: FetchCompletion, observer: &dyn QuizObserver) -> bool {
        if completion.generation != self.issued {
            debug!(
                generation = completion.generation,
                latest = self.issued,
                "discarding stale topic fetch"
            );
            return false;
        }

        match completion.result {
            Ok(topics) => {
                self.topics = topics.into_iter().map(Arc::new).collect();
                observer.on_topics_loaded(&self.topics);
            }
            Err(err) => observer.on_fetch_failed(&err.to_string()),
        }
        true
    }

    /// Issue a fetch and wait until the latest one has been applied.
    ///
    /// Stale completions that arrive first are discarded.
    pub async fn refresh(&mut self, observer: &dyn QuizObserver) {
        self.request_refresh();
        while let Some(completion) = self.next_completion().await {
            if self.apply(completion, observer) {
                break;
            }
        }
    }

    #[must_use]
    pub fn topics(&self) -> &[Arc<Topic>] {
        &self.topics
    }

    #[must_use]
    pub fn latest_ticket(&self) -> Option<FetchTicket> {
        (self.issued > 0).then_some(FetchTicket {
            generation: self.issued,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use quiz_core::model::Question;
    use tokio::sync::Notify;

    use crate::sessions::SessionState;

    #[derive(Default)]
    struct Recorder {
        loaded: Mutex<Vec<Vec<String>>>,
        failures: Mutex<Vec<String>>,
    }

    impl QuizObserver for Recorder {
        fn on_topics_loaded(&self, topics: &[Arc<Topic>]) {
            self.loaded
                .lock()
                .unwrap()
                .push(topics.iter().map(|t| t.title().to_string()).collect());
        }

        fn on_fetch_failed(&self, message: &str) {
            self.failures.lock().unwrap().push(message.to_string());
        }

        fn on_state_changed(&self, _state: &SessionState) {}
    }

    fn topic(title: &str) -> Topic {
        let q = Question::new("Q", vec!["a".into(), "b".into()], 0).unwrap();
        Topic::new(title, "", vec![q])
    }

    /// Returns topics named after the call number; the first call blocks
    /// until released.
    struct GatedSource {
        calls: Mutex<u32>,
        gate: Notify,
    }

    #[async_trait]
    impl TopicSource for GatedSource {
        async fn fetch_topics(&self) -> Result<Vec<Topic>, FetchError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if call == 1 {
                self.gate.notified().await;
            }
            Ok(vec![topic(&format!("call {call}"))])
        }
    }

    struct EmptySource;

    #[async_trait]
    impl TopicSource for EmptySource {
        async fn fetch_topics(&self) -> Result<Vec<Topic>, FetchError> {
            Err(FetchError::EmptyBody {
                location: "http://test.invalid/q.json".into(),
            })
        }
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let source = Arc::new(GatedSource {
            calls: Mutex::new(0),
            gate: Notify::new(),
        });
        let mut feed = TopicFeed::new(source.clone());
        let recorder = Recorder::default();

        let first = feed.request_refresh();
        tokio::task::yield_now().await;
        let second = feed.request_refresh();
        assert!(second > first);

        let fresh = feed.next_completion().await.unwrap();
        assert_eq!(fresh.generation, second.generation);
        assert!(feed.apply(fresh, &recorder));

        source.gate.notify_one();
        let stale = feed.next_completion().await.unwrap();
        assert_eq!(stale.generation, first.generation);
        assert!(!feed.apply(stale, &recorder));

        assert_eq!(feed.topics().len(), 1);
        assert_eq!(feed.topics()[0].title(), "call 2");
        assert_eq!(recorder.loaded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failure_is_reported_with_message() {
        let mut feed = TopicFeed::new(Arc::new(EmptySource));
        let recorder = Recorder::default();

        feed.refresh(&recorder).await;

        let failures = recorder.failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("empty response"));
        assert!(feed.topics().is_empty());
    }

    struct PanickingSource;

    #[async_trait]
    impl TopicSource for PanickingSource {
        async fn fetch_topics(&self) -> Result<Vec<Topic>, FetchError> {
            panic!("source blew up");
        }
    }

    #[tokio::test]
    async fn panicking_source_still_completes_refresh() {
        let mut feed = TopicFeed::new(Arc::new(PanickingSource));
        let recorder = Recorder::default();

        tokio::time::timeout(Duration::from_secs(5), feed.refresh(&recorder))
            .await
            .expect("refresh should not hang");

        let failures = recorder.failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("did not complete"));
        assert!(feed.topics().is_empty());
    }

    #[test]
    fn apply_checks_generation_without_a_runtime() {
        let mut feed = TopicFeed::new(Arc::new(EmptySource));
        let recorder = Recorder::default();
        assert!(feed.latest_ticket().is_none());

        // Nothing has been issued yet, so generation 1 is from the future.
        let applied = feed.apply(
            FetchCompletion {
                generation: 1,
                result: Ok(vec![topic("ghost")]),
            },
            &recorder,
        );
        assert!(!applied);
        assert!(feed.topics().is_empty());
    }
}
