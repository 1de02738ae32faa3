//! dlcms API server
//!
//! Digital learning content-management service: course authoring with
//! nested lessons and materials, learner accounts, private reviews, and
//! asset uploads.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dlcms::store::UnavailableStore;
use dlcms::{ensure_admin_account, routes, AppState, Config, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dlcms=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!(?config, "Loaded configuration");

    // Open the document store. A failure is logged, not fatal: the service
    // stays reachable and data operations fail with an internal error.
    let app = match SqliteStore::open(&config.database_path) {
        Ok(store) => {
            let store = Arc::new(store);

            if let Err(error) = ensure_admin_account(store.as_ref()) {
                tracing::error!(%error, "Administrator account reconciliation failed");
            }

            let state = Arc::new(AppState::new(
                config.clone(),
                store.clone(),
                store.clone(),
                store,
            ));
            routes::create_router(state)
        }
        Err(error) => {
            tracing::error!(%error, path = %config.database_path, "Failed to open document store");
            let store = Arc::new(UnavailableStore);
            let state = Arc::new(AppState::new(
                config.clone(),
                store.clone(),
                store.clone(),
                store,
            ));
            routes::create_router(state)
        }
    };

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
