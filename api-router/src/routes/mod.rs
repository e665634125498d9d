pub mod bot_replies;
pub mod conversation;
pub mod extract_qa;
pub mod insert_replies;
pub mod liveness;
pub mod transcript;

use std::path::{Path, PathBuf};

use common::error::AppError;
use document_pipeline::{docx::DocumentBody, Document};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LocalPathRequest {
    pub local_path: String,
}

/// Reports `"{what}: {path}"` when the path does not exist.
async fn ensure_exists(path: &Path, what: &str) -> Result<(), ApiError> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Ok(())
    } else {
        Err(ApiError::Reported(format!("{what}: {}", path.display())))
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

/// Opens a document and reads from its body off the async runtime. An
/// unreadable document is a reported failure, not a server error.
async fn read_document<T, F>(path: PathBuf, read: F) -> Result<T, ApiError>
where
    F: FnOnce(&DocumentBody) -> T + Send + 'static,
    T: Send + 'static,
{
    run_blocking(move || Ok(read(Document::open(&path)?.body())))
        .await
        .map_err(|err| match err {
            AppError::Document(msg) => ApiError::Reported(msg),
            other => ApiError::from(other),
        })
}
