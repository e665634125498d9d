//! Deterministic `BotTransport` fakes for tests.
#![allow(clippy::expect_used)]

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    envelope::ActivityEnvelope,
    error::TransportError,
    transport::{BotTransport, TransportResponse},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedActivity {
    pub conversation_id: String,
    pub token: String,
    pub envelope: ActivityEnvelope,
}

type FailurePredicate = Box<dyn Fn(&ActivityEnvelope) -> bool + Send + Sync>;

/// Accepts every post with a 200 and a sequential activity id, except the
/// envelopes matched by the failure predicate, which fail on every attempt.
pub struct ScriptedTransport {
    fail_when: FailurePredicate,
    start: Result<TransportResponse, String>,
    attempts: Mutex<usize>,
    posts: Mutex<Vec<PostedActivity>>,
}

impl ScriptedTransport {
    pub fn accepting() -> Self {
        Self::failing_when(|_| false)
    }

    pub fn failing_when(predicate: impl Fn(&ActivityEnvelope) -> bool + Send + Sync + 'static) -> Self {
        Self {
            fail_when: Box::new(predicate),
            start: Ok(TransportResponse {
                status: 200,
                body: r#"{"conversationId":"conv-1","token":"tok-1","expires_in":1800}"#.to_string(),
            }),
            attempts: Mutex::new(0),
            posts: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_start_response(mut self, status: u16, body: &str) -> Self {
        self.start = Ok(TransportResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    #[must_use]
    pub fn with_start_failure(mut self, message: &str) -> Self {
        self.start = Err(message.to_string());
        self
    }

    /// Successfully delivered posts, in order.
    pub fn posts(&self) -> Vec<PostedActivity> {
        self.posts.lock().expect("posts lock").clone()
    }

    /// Every post attempt, failed ones included.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().expect("attempts lock")
    }
}

#[async_trait]
impl BotTransport for ScriptedTransport {
    async fn start_conversation(&self, _secret: &str) -> Result<TransportResponse, TransportError> {
        self.start.clone().map_err(TransportError::Unavailable)
    }

    async fn post_activity(
        &self,
        conversation_id: &str,
        token: &str,
        envelope: &ActivityEnvelope,
    ) -> Result<TransportResponse, TransportError> {
        let mut attempts = self.attempts.lock().expect("attempts lock");
        *attempts = attempts.saturating_add(1);
        drop(attempts);
        if (self.fail_when)(envelope) {
            return Err(TransportError::Unavailable("connection reset".to_string()));
        }

        let mut posts = self.posts.lock().expect("posts lock");
        posts.push(PostedActivity {
            conversation_id: conversation_id.to_string(),
            token: token.to_string(),
            envelope: envelope.clone(),
        });
        Ok(TransportResponse {
            status: 200,
            body: format!(r#"{{"id":"{conversation_id}|{:07}"}}"#, posts.len()),
        })
    }
}
