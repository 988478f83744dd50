// Application state and router assembly

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::audit::AuditPipeline;
use crate::config::AppConfig;
use crate::geo::{CellIndexer, GridCellIndexer};
use crate::handlers;
use crate::service::{AuditTrail, RegionalStats, RegistrationService, RequestWorkflow};
use crate::storage::Store;

/// Shared application state: the service types wired over one store and
/// one running audit pipeline.
#[derive(Clone)]
pub struct AppState {
    pub registration: RegistrationService,
    pub workflow: RequestWorkflow,
    pub stats: RegionalStats,
    pub trail: AuditTrail,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn Store>, audit: AuditPipeline) -> Self {
        let indexer: Arc<dyn CellIndexer> = Arc::new(GridCellIndexer);

        Self {
            registration: RegistrationService::new(
                store.clone(),
                audit.clone(),
                indexer,
                config.geo.cell_resolution,
            ),
            workflow: RequestWorkflow::new(store.clone(), audit),
            stats: RegionalStats::new(store.clone()),
            trail: AuditTrail::new(store),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check routes (always available)
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        // Core operations
        .route("/users/register", post(handlers::users::register))
        .route("/requests/create", post(handlers::requests::create))
        .route(
            "/requests/verify/:request_id",
            patch(handlers::requests::verify),
        )
        .route(
            "/analytics/region/:cell_id",
            get(handlers::analytics::regional_stats),
        )
        .route("/system/logs", get(handlers::system::view_logs))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
