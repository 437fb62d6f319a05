use std::net::SocketAddr;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;

use resume_bot::config::{Config, Surface};
use resume_bot::routes::build_router;
use resume_bot::{build_state, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env(Surface::Server)?;

    logging::init(&config);

    info!("Starting Resume Bot API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Environment: {}, index: {}",
        config.environment, config.index_dir
    );
    if config.credentials.openai_api_key().is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; questions will fail until it is provided");
    }

    let state = build_state(&config);

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.bind_addr()))?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
