use anyhow::Result;
use shared::{get_db_connection, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod error;
mod exchange;
mod handlers;
mod response;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting HyperAgents API server...");

    let config = Config::from_env()?;
    let db = get_db_connection(&config.database_url).await?;
    info!("Connected to database");

    let listen_addr = config.listen_addr.clone();
    let state = state::AppState::new(&config, db);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!("API server listening on http://{}", listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
