use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use common::storage::reply_store::BotReplyStore;
use document_pipeline::{insert_bot_replies, Document};
use tracing::info;

use super::{ensure_exists, run_blocking, LocalPathRequest};
use crate::{api_state::ApiState, error::ApiError};

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Writes stored replies into the document in place and returns the result.
pub async fn insert_replies(
    State(state): State<ApiState>,
    Json(input): Json<LocalPathRequest>,
) -> Result<Response, ApiError> {
    let path = PathBuf::from(&input.local_path);
    ensure_exists(&path, "Local file not found").await?;
    info!(local_path = %input.local_path, "Inserting bot replies");

    let store = BotReplyStore::load(&state.reply_store_path()).await?;
    let row_map = Arc::clone(&state.row_map);
    let save_path = path.clone();
    let (outcome, bytes) = run_blocking(move || {
        let mut document = Document::open(&save_path)?;
        let outcome = insert_bot_replies(&mut document, &row_map, &store)?;
        document.save(&save_path)?;
        Ok((outcome, document.to_bytes()?))
    })
    .await?;
    info!(inserted = outcome.inserted, bytes = bytes.len(), "Saved document with replies");

    let file_name = path
        .file_name()
        .map_or_else(|| "document.docx".to_string(), |name| name.to_string_lossy().into_owned());

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
