use document_pipeline::TranscriptFragment;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    envelope::{ActivityEnvelope, FRAGMENT_SENDER_ID},
    report::ReportStatus,
    retry::{post_with_retry, RetryPolicy},
    transport::BotTransport,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentSendResult {
    pub id: String,
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentRelayReport {
    pub status: ReportStatus,
    pub message: String,
    pub sent: Vec<FragmentSendResult>,
}

/// Posts every fragment as its own message, in order.
pub async fn relay_fragments(
    transport: &dyn BotTransport,
    retry: &RetryPolicy,
    conversation_id: &str,
    token: &str,
    fragments: &[TranscriptFragment],
) -> FragmentRelayReport {
    let mut sent = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        let envelope = ActivityEnvelope::message(FRAGMENT_SENDER_ID, fragment.text.as_str());
        let result = match post_with_retry(transport, retry, conversation_id, token, &envelope).await {
            Ok(response) => FragmentSendResult {
                id: fragment.id.clone(),
                status: Some(response.status),
                error: None,
            },
            Err(err) => {
                warn!(fragment = %fragment.id, error = %err, "Giving up on transcript fragment");
                FragmentSendResult {
                    id: fragment.id.clone(),
                    status: None,
                    error: Some(err.to_string()),
                }
            }
        };
        sent.push(result);
    }

    let delivered = sent.iter().filter(|r| r.status.is_some()).count();
    info!(conversation_id, delivered, total = sent.len(), "Relayed transcript fragments");

    FragmentRelayReport {
        status: ReportStatus::Ok,
        message: format!("Sent {} messages successfully", sent.len()),
        sent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;

    fn fragment(id: &str, text: &str) -> TranscriptFragment {
        TranscriptFragment {
            id: id.into(),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn posts_each_fragment_as_plain_message() {
        let transport = ScriptedTransport::accepting();
        let fragments = [fragment("msg1", "Hello"), fragment("msg2", "How are you?")];

        let report =
            relay_fragments(&transport, &RetryPolicy::immediate(3), "conv", "tok", &fragments).await;

        assert_eq!(report.status, ReportStatus::Ok);
        assert_eq!(report.message, "Sent 2 messages successfully");
        assert_eq!(
            report.sent,
            vec![
                FragmentSendResult { id: "msg1".into(), status: Some(200), error: None },
                FragmentSendResult { id: "msg2".into(), status: Some(200), error: None },
            ]
        );
        let posts = transport.posts();
        assert_eq!(posts[1].envelope, ActivityEnvelope::message("user", "How are you?"));
    }

    #[tokio::test]
    async fn failed_fragment_is_recorded_and_relay_continues() {
        let transport = ScriptedTransport::failing_when(|envelope| envelope.text == "bad");
        let fragments = [fragment("msg1", "bad"), fragment("msg2", "good")];

        let report =
            relay_fragments(&transport, &RetryPolicy::immediate(2), "conv", "tok", &fragments).await;

        assert_eq!(report.message, "Sent 2 messages successfully");
        assert_eq!(report.sent[0].status, None);
        assert!(report.sent[0].error.is_some());
        assert_eq!(report.sent[1].status, Some(200));
        assert_eq!(transport.attempts(), 3);

        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json["sent"][0]["status"].is_null());
        assert!(json["sent"][1].get("error").is_none());
    }
}
