use async_trait::async_trait;
use serde_json::Value;

use crate::{envelope::ActivityEnvelope, error::TransportError};

/// Status and raw body of a bot-service response. Any status counts as a
/// response; only failing to get one is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// The `id` the service assigned to a posted activity, if the body has one.
    pub fn activity_id(&self) -> Option<String> {
        self.json()
            .ok()?
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[async_trait]
pub trait BotTransport: Send + Sync {
    async fn start_conversation(&self, secret: &str) -> Result<TransportResponse, TransportError>;

    async fn post_activity(
        &self,
        conversation_id: &str,
        token: &str,
        envelope: &ActivityEnvelope,
    ) -> Result<TransportResponse, TransportError>;
}
