//! Admin session handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use folio_core::ports::{ADMIN_ROLE, ADMIN_SUBJECT};
use folio_shared::StatsResponse;
use folio_shared::dto::{AuthResponse, LoginRequest};

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Key login attempts by client address.
///
/// Forwarded headers are client-controlled, so they are only honoured when
/// the server is configured to sit behind a trusted proxy.
fn client_key(req: &HttpRequest, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(addr) = req.connection_info().realip_remote_addr() {
            return addr.to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// POST /api/admin/auth
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let client = client_key(&req, state.trust_proxy_headers);

    if let Some(limiter) = &state.login_limiter {
        let result = limiter.check(&client).await?;
        if !result.allowed {
            tracing::warn!(client = %client, "Login rate limit exceeded");
            return Err(AppError::TooManyRequests {
                retry_after_secs: result.reset_after.as_secs().max(1),
            });
        }
    }

    let valid = state
        .passwords
        .verify(&body.password, &state.admin_password_hash)?;

    if !valid {
        tracing::warn!(client = %client, "Failed admin login");
        return Err(AppError::Unauthorized);
    }

    let token = state
        .tokens
        .issue_token(ADMIN_SUBJECT, vec![ADMIN_ROLE.to_string()])?;

    tracing::info!(client = %client, "Admin logged in");

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(
        token,
        state.tokens.expiration_seconds().max(0) as u64,
    )))
}

/// GET /api/admin/auth - dashboard counters, admin only.
pub async fn dashboard_stats(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
) -> AppResult<HttpResponse> {
    let stats = state.posts.stats().await?;

    Ok(HttpResponse::Ok().json(StatsResponse::new(stats)))
}
