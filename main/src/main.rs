use api_router::{api_routes, api_state::ApiState};
use axum::{extract::FromRef, Router};
use common::utils::config::get_config;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;
    info!(
        reply_store_path = %config.reply_store_path,
        direct_line_base_url = %config.direct_line_base_url,
        chunk_words = config.chunk_words,
        "Loaded configuration"
    );

    let api_state = ApiState::new(&config)?;
    let app = build_router(api_state);

    info!("Starting server listening on 0.0.0.0:{}", config.http_port);
    let serve_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(api_state: ApiState) -> Router {
    Router::new()
        .merge(api_routes(&api_state))
        .with_state(AppState { api_state })
}

#[derive(Clone, FromRef)]
struct AppState {
    api_state: ApiState,
}
