use std::{path::PathBuf, sync::Arc};

use axum::{extract::State, response::IntoResponse, Json};
use document_pipeline::{extract_qa_pairs, Document, QaResultSet};
use serde::Serialize;
use tracing::info;

use super::{ensure_exists, run_blocking, LocalPathRequest};
use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, Serialize)]
struct ExtractQaResponse {
    status: &'static str,
    tables: QaResultSet,
    file_path: String,
}

pub async fn extract_qa(
    State(state): State<ApiState>,
    Json(input): Json<LocalPathRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let path = PathBuf::from(&input.local_path);
    ensure_exists(&path, "Local file not found").await?;
    info!(local_path = %input.local_path, "Extracting Q/A rows");

    let row_map = Arc::clone(&state.row_map);
    let tables = run_blocking(move || {
        let document = Document::open(&path)?;
        Ok(extract_qa_pairs(document.body(), &row_map)?)
    })
    .await?;

    Ok(Json(ExtractQaResponse {
        status: "ok",
        tables,
        file_path: input.local_path,
    }))
}
