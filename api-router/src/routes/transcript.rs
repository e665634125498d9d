use std::{path::PathBuf, sync::Arc};

use axum::{extract::State, response::IntoResponse, Json};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::info;
use document_pipeline::{extract_transcript, transcript_text};
use transcript_relay::{relay_fragments, ChunkedTranscriptSender};

use super::{ensure_exists, read_document};
use crate::{api_state::ApiState, error::ApiError};

#[derive(Deserialize)]
pub struct TranscriptRequest {
    pub conversation_id: String,
    pub token: String,
    pub local_path: String,
}

/// Posts each transcript fragment of a local document as its own message.
pub async fn send_transcript(
    State(state): State<ApiState>,
    Json(input): Json<TranscriptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let path = PathBuf::from(&input.local_path);
    ensure_exists(&path, "File not found").await?;

    let fragments = read_document(path, extract_transcript).await?;
    info!(
        conversation_id = %input.conversation_id,
        fragments = fragments.len(),
        "Relaying transcript fragments"
    );

    let report = relay_fragments(
        state.transport.as_ref(),
        &state.sender.retry,
        &input.conversation_id,
        &input.token,
        &fragments,
    )
    .await;

    Ok(Json(report))
}

#[derive(Debug, TryFromMultipart)]
pub struct TranscriptUpload {
    pub conversation_id: String,
    pub token: String,
    #[form_data(limit = "unlimited")]
    pub transcript_file: FieldData<NamedTempFile>,
}

/// Streams the body paragraphs of an uploaded transcript document as
/// numbered chunks.
pub async fn send_transcript_upload(
    State(state): State<ApiState>,
    TypedMultipart(input): TypedMultipart<TranscriptUpload>,
) -> Result<impl IntoResponse, ApiError> {
    let file_name = input
        .transcript_file
        .metadata
        .file_name
        .clone()
        .unwrap_or_default();
    info!(
        conversation_id = %input.conversation_id,
        file_name = %file_name,
        "Received transcript upload"
    );

    let upload = input.transcript_file.contents;
    let transcript = read_document(upload.path().to_path_buf(), transcript_text).await?;
    drop(upload);

    let sender = ChunkedTranscriptSender::new(Arc::clone(&state.transport), state.sender);
    let report = sender
        .send(&input.conversation_id, &input.token, &transcript)
        .await;

    Ok(Json(report))
}
