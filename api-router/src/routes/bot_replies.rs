use axum::{extract::State, response::IntoResponse, Json};
use common::{error::AppError, storage::reply_store::BotReplyStore};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{api_state::ApiState, error::ApiError};

#[derive(Serialize)]
struct BotRepliesResponse {
    status: &'static str,
    tables: Map<String, Value>,
}

/// Returns the reply store's tables as written.
pub async fn get_bot_replies(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let store = BotReplyStore::load(&state.reply_store_path())
        .await
        .map_err(|err| match err {
            AppError::NotFound(msg) => ApiError::Reported(msg),
            other => ApiError::reported(other),
        })?;

    Ok(Json(BotRepliesResponse {
        status: "ok",
        tables: store.tables,
    }))
}
