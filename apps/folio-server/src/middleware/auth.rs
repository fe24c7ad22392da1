//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use folio_core::ports::{ADMIN_ROLE, AuthError, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated administrator.
///
/// Use this in handlers to require a valid admin bearer token:
/// ```ignore
/// async fn protected_route(admin: AdminIdentity) -> impl Responder {
///     format!("Hello, {}!", admin.subject)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub subject: String,
}

impl TryFrom<TokenClaims> for AdminIdentity {
    type Error = AuthError;

    fn try_from(claims: TokenClaims) -> Result<Self, Self::Error> {
        if !claims.has_role(ADMIN_ROLE) {
            return Err(AuthError::InsufficientPermissions);
        }
        Ok(Self {
            subject: claims.subject,
        })
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<AdminIdentity, AppError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AppError::Internal("Server configuration error".to_string()));
    };

    let token = bearer_token(req)?;
    let claims = state.tokens.validate_token(token).inspect_err(|e| {
        tracing::debug!(error = %e, "Rejected admin token");
    })?;

    Ok(AdminIdentity::try_from(claims)?)
}

impl FromRequest for AdminIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Optional admin extractor - anonymous when the token is missing or invalid.
pub struct OptionalAdmin(pub Option<AdminIdentity>);

impl OptionalAdmin {
    pub fn is_admin(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequest for OptionalAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalAdmin(authenticate(req).ok())))
    }
}
