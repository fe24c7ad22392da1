//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub posts: usize,
    pub timestamp: String,
}

/// Health check endpoint - reports whether the post store is readable.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match state.posts.stats().await {
        Ok(stats) => HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            posts: stats.total,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed to read post store");
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "degraded",
                version: env!("CARGO_PKG_VERSION"),
                posts: 0,
                timestamp: chrono::Utc::now().to_rfc3339(),
            })
        }
    }
}
