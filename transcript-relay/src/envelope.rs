use serde::Serialize;

pub const TRANSCRIPT_SENDER_ID: &str = "user1";
pub const FRAGMENT_SENDER_ID: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopePhase {
    TranscriptChunk,
    TranscriptComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivitySender {
    pub id: String,
}

/// JSON body of one activity posted to the bot service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub from: ActivitySender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<EnvelopePhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<usize>,
    pub text: String,
}

impl ActivityEnvelope {
    pub fn message(sender_id: &str, text: impl Into<String>) -> Self {
        Self {
            kind: "message".to_string(),
            from: ActivitySender { id: sender_id.to_string() },
            phase: None,
            chunk_number: None,
            total_chunks: None,
            text: text.into(),
        }
    }

    pub fn transcript_chunk(chunk_number: usize, words: &[&str]) -> Self {
        Self {
            phase: Some(EnvelopePhase::TranscriptChunk),
            chunk_number: Some(chunk_number),
            ..Self::message(
                TRANSCRIPT_SENDER_ID,
                format!("TRANSCRIPT CHUNK {chunk_number}: {}", words.join(" ")),
            )
        }
    }

    pub fn transcript_complete(total_chunks: usize) -> Self {
        Self {
            phase: Some(EnvelopePhase::TranscriptComplete),
            total_chunks: Some(total_chunks),
            ..Self::message(TRANSCRIPT_SENDER_ID, "TRANSCRIPT COMPLETE")
        }
    }
}
