use api_state::ApiState;
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use routes::{
    bot_replies::get_bot_replies,
    conversation::start_conversation,
    extract_qa::extract_qa,
    insert_replies::insert_replies,
    liveness::{live, root},
    transcript::{send_transcript, send_transcript_upload},
};

pub mod api_state;
pub mod error;
mod routes;

pub use routes::insert_replies::DOCX_CONTENT_TYPE;

/// Router for the questionnaire and transcript endpoints
pub fn api_routes<S>(app_state: &ApiState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    Router::new()
        .route("/", get(root))
        .route("/live", get(live))
        .route("/extract-qa", post(extract_qa))
        .route("/insert-bot-replies", post(insert_replies))
        .route("/start-conversation", post(start_conversation))
        .route("/send-transcript", post(send_transcript))
        .route("/get-bot-replies", get(get_bot_replies))
        .route(
            "/send/transcript",
            post(send_transcript_upload).layer(DefaultBodyLimit::max(
                app_state.config.upload_max_body_bytes,
            )),
        )
}
