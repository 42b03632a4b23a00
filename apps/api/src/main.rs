mod auth;
mod config;
mod db;
mod errors;
mod fields;
mod forms;
mod routes;
mod state;
mod store;
mod submissions;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{FormStore, MemoryStore, PgStore, SubmissionStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(default_log_filter(&config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting applyform API v{}", env!("CARGO_PKG_VERSION"));

    let (forms, submissions) = match &config.database_url {
        Some(url) => {
            let store = Arc::new(PgStore::new(create_pool(url).await?));
            let forms: Arc<dyn FormStore> = store.clone();
            (forms, store as Arc<dyn SubmissionStore>)
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            let store = Arc::new(MemoryStore::new());
            let forms: Arc<dyn FormStore> = store.clone();
            (forms, store as Arc<dyn SubmissionStore>)
        }
    };

    if config.admin_emails.is_empty() {
        warn!("No admin emails configured; set ADMIN_EMAILS to enable admin access");
    } else {
        info!("Admin emails configured: {}", config.admin_emails.len());
    }

    let state = AppState {
        forms,
        submissions,
        verifier: Arc::new(JwtVerifier::from_config(&config.auth)),
        admins: Arc::new(config.admin_emails.clone()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Our crate at the configured level, plus the request spans from `TraceLayer`.
fn default_log_filter(level: &str) -> String {
    format!(
        "{}={level},tower_http=debug",
        env!("CARGO_PKG_NAME").replace('-', "_")
    )
}
