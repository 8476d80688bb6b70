use std::sync::Arc;

use cinelog::config::Config;
use cinelog::db::PgMovieStore;
use cinelog::routes::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinelog=debug,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let store = PgMovieStore::connect(&config.database_url).await?;
    let state = AppState::new(Arc::new(store), config.session_key()?)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
