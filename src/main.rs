use std::sync::Arc;

use tenant_gate::app::{app, AppState};
use tenant_gate::config;
use tenant_gate::database::router::DatabaseRouter;
use tenant_gate::database::store::LicenseStore;
use tenant_gate::services::license_service::LicenseService;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up LICENSE_DB_PATH, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting tenant gate in {:?} mode", config.environment);

    let store = LicenseStore::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to open license store: {}", e));
    store
        .ensure_schema()
        .await
        .unwrap_or_else(|e| panic!("failed to bootstrap license schema: {}", e));

    let router = DatabaseRouter::from_config(&config.routing);
    tracing::info!(
        "Routing policy covers {} registered modules",
        router.policy().len()
    );

    let state = AppState {
        router: Arc::new(router),
        licenses: LicenseService::new(store),
    };

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("TENANT_GATE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Tenant gate server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
