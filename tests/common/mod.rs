use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tenant_gate::app::{app, AppState};
use tenant_gate::config::RoutingConfig;
use tenant_gate::database::router::DatabaseRouter;
use tenant_gate::database::store::LicenseStore;
use tenant_gate::services::license_service::LicenseService;

/// Assemble the service over a fresh in-memory license store.
pub async fn test_app() -> Result<(Router, LicenseStore)> {
    let store = LicenseStore::in_memory().await?;
    let state = AppState {
        router: Arc::new(DatabaseRouter::from_config(&RoutingConfig::default())),
        licenses: LicenseService::new(store.clone()),
    };
    Ok((app(state), store))
}

/// Insert a license row the way the out-of-band administrative process would.
pub async fn seed_license(
    store: &LicenseStore,
    document: &str,
    name: &str,
    blocked: bool,
) -> Result<()> {
    sqlx::query("INSERT INTO licencas (lice_docu, lice_nome, lice_bloq) VALUES (?, ?, ?)")
        .bind(document)
        .bind(name)
        .bind(blocked)
        .execute(store.pool())
        .await?;
    Ok(())
}

pub async fn get(app: &Router, uri: &str) -> Result<Response<Body>> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    Ok(response)
}

pub async fn get_with_headers(
    app: &Router,
    uri: &str,
    headers: &[(&str, &str)],
) -> Result<Response<Body>> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let response = app.clone().oneshot(builder.body(Body::empty())?).await?;
    Ok(response)
}

pub async fn body_json(response: Response<Body>) -> Result<serde_json::Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}
