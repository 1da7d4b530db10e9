//! Formwright Server - submission endpoint for published forms.
//!
//! Fillers POST their values here once the engine has validated them. Each
//! submission is stored durably as a timestamped record, either as a JSON
//! file in the data directory or as a row in PostgreSQL.

mod config;
mod db;
mod error;
mod handlers;
mod routes;
mod storage;

use crate::config::Config;
use crate::storage::{FileStore, Storage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formwright_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Formwright Server on {}:{}", config.host, config.port);

    let storage = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool).await?;

            Storage::Postgres(pool)
        }
        None => Storage::Files(FileStore::open(&config.data_dir).await?),
    };
    tracing::info!("Storing submissions in {}", storage.describe());

    let state = AppState { storage };

    let app = routes::create_app(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
