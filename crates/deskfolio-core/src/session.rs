//! Chat transcript and message sending
//!
//! `send` records the user's message and a pending placeholder right away, then
//! fetches the answer on a background task. The owner of the session collects
//! finished answers with [`ChatSession::poll`] (from a UI tick) or waits for
//! all of them with [`ChatSession::settle`]. Each placeholder is replaced in
//! place, so a reply always sits directly after the message that asked for it.

use std::sync::Arc;

use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

use crate::answer::AnswerSource;

pub const APOLOGY: &str =
    "Sorry, I'm having trouble processing your request right now. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(u64);

/// A chat message in the assistant conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub content: String,
    /// Placeholder waiting for its answer
    pub pending: bool,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

struct InFlight {
    placeholder: MessageId,
    task: JoinHandle<String>,
}

pub struct ChatSession {
    source: Arc<dyn AnswerSource>,
    messages: Vec<ChatMessage>,
    in_flight: Vec<InFlight>,
    next_id: u64,
}

impl ChatSession {
    pub fn new(source: Arc<dyn AnswerSource>) -> Self {
        Self {
            source,
            messages: Vec::new(),
            in_flight: Vec::new(),
            next_id: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Send a user message. Blank input is ignored and returns `None`;
    /// otherwise returns the id of the pending placeholder.
    pub fn send(&mut self, raw: &str) -> Option<MessageId> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.push(ChatRole::User, text.to_string(), false);
        let placeholder = self.push(ChatRole::Assistant, String::new(), true);

        match Handle::try_current() {
            Ok(handle) => {
                let source = Arc::clone(&self.source);
                let query = text.to_string();
                let task = handle.spawn(async move { source.get_answer(&query).await });
                self.in_flight.push(InFlight { placeholder, task });
            }
            Err(e) => {
                tracing::error!(error = %e, "no async runtime to fetch an answer");
                self.fill(placeholder, APOLOGY.to_string());
            }
        }

        Some(placeholder)
    }

    /// Settle every answer that has already arrived without waiting.
    /// Returns how many placeholders were filled.
    pub fn poll(&mut self) -> usize {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.in_flight)
            .into_iter()
            .partition(|flight| flight.task.is_finished());
        self.in_flight = running;

        let mut settled = 0;
        for mut flight in finished {
            match (&mut flight.task).now_or_never() {
                Some(result) => {
                    self.complete(flight.placeholder, result);
                    settled += 1;
                }
                None => self.in_flight.push(flight),
            }
        }
        settled
    }

    /// Wait for every in-flight answer.
    pub async fn settle(&mut self) {
        for flight in std::mem::take(&mut self.in_flight) {
            let result = flight.task.await;
            self.complete(flight.placeholder, result);
        }
    }

    fn push(&mut self, role: ChatRole, content: String, pending: bool) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            pending,
        });
        id
    }

    fn complete(&mut self, placeholder: MessageId, result: Result<String, JoinError>) {
        let content = match result {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, "answer task failed");
                APOLOGY.to_string()
            }
        };
        self.fill(placeholder, content);
    }

    fn fill(&mut self, placeholder: MessageId, content: String) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == placeholder) {
            message.content = content;
            message.pending = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::LocalAnswers;
    use crate::resolver::{Resolver, GREETING};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn local_session() -> ChatSession {
        ChatSession::new(Arc::new(LocalAnswers::default()))
    }

    struct Exploding;

    #[async_trait]
    impl AnswerSource for Exploding {
        async fn get_answer(&self, query: &str) -> String {
            if query.contains("boom") {
                panic!("source exploded");
            }
            format!("echo: {query}")
        }
    }

    struct Gated {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl AnswerSource for Gated {
        async fn get_answer(&self, query: &str) -> String {
            self.gate.notified().await;
            query.to_uppercase()
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut session = local_session();
        assert_eq!(session.send(""), None);
        assert_eq!(session.send("   "), None);
        assert_eq!(session.send("\n\t"), None);
        assert!(session.is_empty());
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_send_appends_user_then_placeholder() {
        let mut session = local_session();
        session.send("  hi  ");

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "hi");
        assert!(!messages[0].pending);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert!(messages[1].pending);
    }

    #[tokio::test]
    async fn test_send_hi_settles_to_user_and_assistant() {
        let mut session = local_session();
        session.send("hi");
        session.settle().await;

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, GREETING);
        assert!(messages.iter().all(|m| !m.pending));
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_overlapping_sends_resolve_independently() {
        let mut session = local_session();
        session.send("what are your skills");
        session.send("thanks");
        assert_eq!(session.messages().iter().filter(|m| m.pending).count(), 2);

        session.settle().await;
        let resolver = Resolver::default();
        let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
        let skills = resolver.resolve("what are your skills");
        let thanks = resolver.resolve("thanks");
        assert_eq!(
            contents,
            vec!["what are your skills", skills.as_str(), "thanks", thanks.as_str()]
        );
    }

    #[tokio::test]
    async fn test_failed_answer_becomes_apology_and_session_recovers() {
        let mut session = ChatSession::new(Arc::new(Exploding));
        session.send("boom");
        session.settle().await;
        assert_eq!(session.messages()[1].content, APOLOGY);
        assert!(!session.messages()[1].pending);

        session.send("still there?");
        session.settle().await;
        assert_eq!(session.len(), 4);
        assert_eq!(session.messages()[3].content, "echo: still there?");
    }

    #[tokio::test]
    async fn test_poll_only_settles_finished_answers() {
        let gate = Arc::new(Notify::new());
        let mut session = ChatSession::new(Arc::new(Gated { gate: Arc::clone(&gate) }));
        session.send("hello");

        tokio::task::yield_now().await;
        assert_eq!(session.poll(), 0);
        assert!(session.messages()[1].pending);

        gate.notify_one();
        let settled = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                tokio::task::yield_now().await;
                let n = session.poll();
                if n > 0 {
                    break n;
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(settled, 1);
        assert_eq!(session.messages()[1].content, "HELLO");
        assert!(!session.is_pending());
    }

    #[test]
    fn test_send_without_runtime_apologizes() {
        let mut session = local_session();
        session.send("hi");
        assert_eq!(session.len(), 2);
        assert_eq!(session.messages()[1].content, APOLOGY);
        assert!(!session.is_pending());
    }
}
