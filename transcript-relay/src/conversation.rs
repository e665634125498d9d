use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::{report::ReportStatus, transport::BotTransport};

/// Outcome of opening a conversation, shaped for the HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationStart {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConversationStart {
    fn failed(code: Option<u16>, message: String) -> Self {
        Self {
            status: ReportStatus::Error,
            data: None,
            code,
            message: Some(message),
        }
    }
}

pub async fn start_conversation(transport: &dyn BotTransport, secret: &str) -> ConversationStart {
    let response = match transport.start_conversation(secret).await {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "Conversation start failed");
            return ConversationStart::failed(None, err.to_string());
        }
    };

    if !response.is_ok() {
        info!(status = response.status, "Conversation start rejected");
        return ConversationStart::failed(Some(response.status), response.body);
    }

    match response.json() {
        Ok(data) => {
            info!("Conversation started");
            ConversationStart {
                status: ReportStatus::Ok,
                data: Some(data),
                code: None,
                message: None,
            }
        }
        Err(err) => {
            error!(error = %err, "Conversation start returned invalid JSON");
            ConversationStart::failed(None, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn ok_response_passes_body_through() {
        let outcome = start_conversation(&ScriptedTransport::accepting(), "secret").await;
        assert_eq!(
            serde_json::to_value(outcome).expect("serialize"),
            json!({
                "status": "ok",
                "data": {"conversationId": "conv-1", "token": "tok-1", "expires_in": 1800}
            })
        );
    }

    #[tokio::test]
    async fn non_200_reports_code_and_body() {
        let transport = ScriptedTransport::accepting().with_start_response(403, "Forbidden");
        let outcome = start_conversation(&transport, "bad").await;
        assert_eq!(
            serde_json::to_value(outcome).expect("serialize"),
            json!({"status": "error", "code": 403, "message": "Forbidden"})
        );
    }

    #[tokio::test]
    async fn transport_failure_reports_message() {
        let transport = ScriptedTransport::accepting().with_start_failure("dns failure");
        let outcome = start_conversation(&transport, "secret").await;
        assert_eq!(outcome.status, ReportStatus::Error);
        assert_eq!(outcome.code, None);
        assert_eq!(outcome.message.as_deref(), Some("Transport unavailable: dns failure"));
    }
}
