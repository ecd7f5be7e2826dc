//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (store, healthy) = store_status(&state).await;
    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[cfg(feature = "postgres")]
async fn store_status(state: &AppState) -> (&'static str, bool) {
    match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => ("postgres", true),
            Err(e) => {
                tracing::error!("Database ping failed: {}", e);
                ("postgres", false)
            }
        },
        None => ("memory", true),
    }
}

#[cfg(not(feature = "postgres"))]
async fn store_status(_state: &AppState) -> (&'static str, bool) {
    ("memory", true)
}
