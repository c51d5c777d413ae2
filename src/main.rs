use anyhow::Context;
use dotenv::dotenv;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod error;
mod models;
mod routes;
mod schema;

use crate::{
    config::Config,
    routes::{router, AppState},
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;
    let pool = db::connect(&config)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    tracing::info!(database_url = %config.database_url, "contacts table ready");

    let app = router(AppState { pool });

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
