use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::info;
use transcript_relay::start_conversation as open_conversation;

use crate::api_state::ApiState;

#[derive(Deserialize)]
pub struct StartConversationRequest {
    pub secret: String,
}

pub async fn start_conversation(
    State(state): State<ApiState>,
    Json(input): Json<StartConversationRequest>,
) -> impl IntoResponse {
    info!("Starting conversation");
    Json(open_conversation(state.transport.as_ref(), &input.secret).await)
}
