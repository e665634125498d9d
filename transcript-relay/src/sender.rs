use std::{sync::Arc, time::Duration};

use serde::{Serialize, Serializer};
use tracing::{error, info, warn};

use crate::{
    config::SenderConfig,
    envelope::ActivityEnvelope,
    error::TransportError,
    report::ReportStatus,
    retry::post_with_retry,
    transport::{BotTransport, TransportResponse},
};

/// Progress of one transcript delivery. `Failed` can follow any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryPhase {
    Start,
    SendingChunks,
    SendingComplete,
    Done,
    Failed,
}

impl DeliveryPhase {
    pub const fn advance(self) -> Self {
        match self {
            Self::Start => Self::SendingChunks,
            Self::SendingChunks => Self::SendingComplete,
            Self::SendingComplete | Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Which post a result belongs to: a 1-based chunk or the completion marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkIndex {
    Chunk(usize),
    Complete,
}

impl Serialize for ChunkIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Chunk(number) => serializer.serialize_u64(*number as u64),
            Self::Complete => serializer.serialize_str("complete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSendResult {
    pub chunk_index: ChunkIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    pub sent_text: String,
    #[serde(rename = "status")]
    pub status_code: Option<u16>,
    #[serde(rename = "response")]
    pub raw_response: Option<String>,
    pub activity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChunkSendResult {
    fn new(
        chunk_index: ChunkIndex,
        word_count: Option<usize>,
        envelope: &ActivityEnvelope,
        outcome: &Result<TransportResponse, TransportError>,
    ) -> Self {
        let mut result = Self {
            chunk_index,
            word_count,
            sent_text: envelope.text.clone(),
            status_code: None,
            raw_response: None,
            activity_id: None,
            error: None,
        };
        match outcome {
            Ok(response) => {
                result.status_code = Some(response.status);
                result.activity_id = response.activity_id();
                result.raw_response = Some(response.body.clone());
            }
            Err(err) => result.error = Some(err.to_string()),
        }
        result
    }

    pub fn delivered(&self) -> bool {
        self.status_code.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub status: ReportStatus,
    pub message: String,
    pub phase: DeliveryPhase,
    pub sent: Vec<ChunkSendResult>,
    pub watermark: u64,
}

/// Sequence-position hint for a conversation after `posts` logical posts,
/// assuming the service echoes one activity per post.
pub fn estimate_watermark(posts: usize) -> u64 {
    u64::try_from(posts)
        .unwrap_or(u64::MAX)
        .saturating_mul(2)
        .saturating_sub(1)
}

/// Streams a transcript to a conversation as numbered word chunks followed
/// by a completion marker.
pub struct ChunkedTranscriptSender {
    transport: Arc<dyn BotTransport>,
    config: SenderConfig,
}

impl ChunkedTranscriptSender {
    pub fn new(transport: Arc<dyn BotTransport>, config: SenderConfig) -> Self {
        Self { transport, config }
    }

    pub async fn send(
        &self,
        conversation_id: &str,
        token: &str,
        transcript: &str,
    ) -> DeliveryReport {
        let words: Vec<&str> = transcript.split_whitespace().collect();
        let chunks = self.config.chunking.split(&words);
        let total_chunks = chunks.len();
        info!(
            conversation_id,
            words = words.len(),
            total_chunks,
            "Sending transcript"
        );

        let mut phase = DeliveryPhase::Start.advance();
        let mut sent = Vec::with_capacity(total_chunks.saturating_add(1));

        for (position, chunk) in chunks.iter().enumerate() {
            let chunk_number = position.saturating_add(1);
            pause(self.config.pacing.before_chunk).await;

            let envelope = ActivityEnvelope::transcript_chunk(chunk_number, chunk);
            let outcome = self.post(conversation_id, token, &envelope).await;
            match &outcome {
                Ok(response) => info!(chunk_number, status = response.status, "Sent transcript chunk"),
                Err(err) => warn!(chunk_number, error = %err, "Giving up on transcript chunk"),
            }
            sent.push(ChunkSendResult::new(
                ChunkIndex::Chunk(chunk_number),
                Some(chunk.len()),
                &envelope,
                &outcome,
            ));
        }

        phase = phase.advance();
        pause(self.config.pacing.before_complete).await;

        let envelope = ActivityEnvelope::transcript_complete(total_chunks);
        let outcome = self.post(conversation_id, token, &envelope).await;
        sent.push(ChunkSendResult::new(ChunkIndex::Complete, None, &envelope, &outcome));

        let (status, message) = match outcome {
            Ok(response) => {
                phase = phase.advance();
                info!(status = response.status, total_chunks, "Sent transcript completion");
                (ReportStatus::Ok, "Transcript phase completed successfully".to_string())
            }
            Err(err) => {
                phase = DeliveryPhase::Failed;
                error!(error = %err, "Failed to send transcript completion");
                (ReportStatus::Error, "Failed to send TRANSCRIPT COMPLETE".to_string())
            }
        };

        DeliveryReport {
            status,
            message,
            phase,
            watermark: estimate_watermark(sent.len()),
            sent,
        }
    }

    async fn post(
        &self,
        conversation_id: &str,
        token: &str,
        envelope: &ActivityEnvelope,
    ) -> Result<TransportResponse, TransportError> {
        post_with_retry(
            self.transport.as_ref(),
            &self.config.retry,
            conversation_id,
            token,
            envelope,
        )
        .await
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{ChunkPolicy, PacingPolicy},
        envelope::EnvelopePhase,
        retry::RetryPolicy,
        testing::ScriptedTransport,
    };

    fn config(words_per_chunk: usize) -> SenderConfig {
        SenderConfig {
            chunking: ChunkPolicy { words_per_chunk },
            retry: RetryPolicy::immediate(3),
            pacing: PacingPolicy::none(),
        }
    }

    fn sender_for(transport: &Arc<ScriptedTransport>, config: SenderConfig) -> ChunkedTranscriptSender {
        let shared: Arc<ScriptedTransport> = Arc::clone(transport);
        ChunkedTranscriptSender::new(shared, config)
    }

    #[test]
    fn watermark_counts_two_activities_per_post() {
        assert_eq!(estimate_watermark(0), 0);
        assert_eq!(estimate_watermark(1), 1);
        assert_eq!(estimate_watermark(3), 5);
    }

    #[test]
    fn phases_advance_in_order() {
        let phase = DeliveryPhase::Start.advance();
        assert_eq!(phase, DeliveryPhase::SendingChunks);
        assert_eq!(phase.advance().advance(), DeliveryPhase::Done);
        assert_eq!(DeliveryPhase::Failed.advance(), DeliveryPhase::Failed);
        assert!(DeliveryPhase::Done.is_terminal());
    }

    #[tokio::test]
    async fn two_full_chunks_then_completion() {
        let transport = Arc::new(ScriptedTransport::accepting());
        let sender = sender_for(&transport, config(3));

        let report = sender
            .send("conv", "tok", "one two three\nfour five six")
            .await;

        assert_eq!(report.status, ReportStatus::Ok);
        assert_eq!(report.phase, DeliveryPhase::Done);
        assert_eq!(report.watermark, 5);
        assert_eq!(report.sent.len(), 3);
        assert_eq!(report.sent[0].chunk_index, ChunkIndex::Chunk(1));
        assert_eq!(report.sent[0].sent_text, "TRANSCRIPT CHUNK 1: one two three");
        assert_eq!(report.sent[1].word_count, Some(3));
        assert_eq!(report.sent[2].chunk_index, ChunkIndex::Complete);
        assert!(report.sent.iter().all(ChunkSendResult::delivered));
        assert_eq!(report.sent[0].activity_id.as_deref(), Some("conv|0000001"));

        let posts = transport.posts();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|p| p.conversation_id == "conv" && p.token == "tok"));
        assert_eq!(posts[2].envelope.phase, Some(EnvelopePhase::TranscriptComplete));
        assert_eq!(posts[2].envelope.total_chunks, Some(2));
    }

    #[tokio::test]
    async fn exhausted_chunk_does_not_stop_later_chunks() {
        let transport = Arc::new(ScriptedTransport::failing_when(|envelope| {
            envelope.chunk_number == Some(1)
        }));
        let sender = sender_for(&transport, config(2));

        let report = sender.send("conv", "tok", "a b c d").await;

        assert_eq!(report.status, ReportStatus::Ok);
        assert_eq!(report.sent.len(), 3);
        assert!(!report.sent[0].delivered());
        assert!(report.sent[0].error.is_some());
        assert_eq!(report.sent[0].status_code, None);
        assert!(report.sent[1].delivered());
        assert_eq!(report.watermark, 5);
        // three attempts on chunk 1, one each for chunk 2 and completion
        assert_eq!(transport.attempts(), 5);
    }

    #[tokio::test]
    async fn failed_completion_reports_error_with_all_chunks() {
        let transport = Arc::new(ScriptedTransport::failing_when(|envelope| {
            envelope.phase == Some(EnvelopePhase::TranscriptComplete)
        }));
        let sender = sender_for(&transport, config(990));

        let report = sender.send("conv", "tok", "short transcript").await;

        assert_eq!(report.status, ReportStatus::Error);
        assert_eq!(report.message, "Failed to send TRANSCRIPT COMPLETE");
        assert_eq!(report.phase, DeliveryPhase::Failed);
        assert!(report.sent[0].delivered());
        assert_eq!(report.sent.len(), 2);
    }

    #[tokio::test]
    async fn empty_transcript_sends_only_completion() {
        let transport = Arc::new(ScriptedTransport::accepting());
        let sender = sender_for(&transport, config(990));

        let report = sender.send("conv", "tok", "  \n ").await;

        assert_eq!(report.sent.len(), 1);
        assert_eq!(report.watermark, 1);
        assert_eq!(transport.posts()[0].envelope.total_chunks, Some(0));
    }

    #[tokio::test]
    async fn report_serializes_wire_names() {
        let transport = Arc::new(ScriptedTransport::accepting());
        let sender = sender_for(&transport, config(990));
        let report = sender.send("conv", "tok", "hi").await;

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["phase"], "DONE");
        assert_eq!(json["sent"][0]["chunk_index"], 1);
        assert_eq!(json["sent"][0]["status"], 200);
        assert_eq!(json["sent"][1]["chunk_index"], "complete");
        assert!(json["sent"][1].get("word_count").is_none());
        assert!(json["sent"][1].get("error").is_none());
    }
}
