//! Service info and health check.

use axum::Json;
use serde::Serialize;

/// Service info returned from the root path.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// GET / - basic service identification.
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "buy-recipes",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health - liveness probe.
pub async fn health() -> &'static str {
    "OK"
}
