use std::sync::Arc;

use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::router::DatabaseRouter;
use crate::handlers;
use crate::middleware::tenant_context::tenant_context_middleware;
use crate::services::license_service::LicenseService;

/// Shared application state, built once in `main` and injected at startup.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<DatabaseRouter>,
    pub licenses: LicenseService,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Tenant-facing API
        .route("/api/context", get(handlers::context::context_get))
        .route("/api/licenses/:document", get(handlers::licenses::license_get))
        // Global middleware
        .layer(middleware::from_fn(tenant_context_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Tenant Gate",
            "version": version,
            "description": "Multi-tenant request context, database routing and license gating control plane",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "context": "/api/context (echoes resolved tenant context)",
                "licenses": "/api/licenses/:document (license validation)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.licenses.store().health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "license_store": "ok",
                    "modules_registered": state.router.policy().len(),
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "license store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "license_store_error": e.to_string()
                }
            })),
        ),
    }
}
