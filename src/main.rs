use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use civic_aid_api::app::{self, AppState};
use civic_aid_api::audit::AuditPipeline;
use civic_aid_api::{config, storage};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civic_aid_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = config::load_config_with_fallback();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }
    tracing::info!(
        "✓ Configuration loaded (cell resolution {}, audit queue {})",
        config.geo.cell_resolution,
        match config.audit.queue_capacity {
            Some(capacity) => format!("bounded at {}", capacity),
            None => "unbounded".to_string(),
        }
    );

    let store = match storage::create_store(&config.storage).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to initialize storage: {}", e);
            std::process::exit(1);
        }
    };

    // One pipeline, one consumer, for the lifetime of the process.
    let audit = AuditPipeline::from_config(store.clone(), &config.audit);

    let state = AppState::new(&config, store, audit);
    let app = app::router(state);

    let addr: SocketAddr = match config.server.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid bind address '{}': {}", config.server.bind_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 Starting civic-aid-api server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app).await.expect("Server error");
}
