//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod upload;


use actix_web::{error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Blog posts
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list_posts))
                    .route(web::post().to(posts::create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(posts::get_post))
                    .route(web::put().to(posts::update_post))
                    .route(web::delete().to(posts::delete_post)),
            )
            // Admin session
            .service(
                web::resource("/admin/auth")
                    .route(web::post().to(auth::login))
                    .route(web::get().to(auth::dashboard_stats)),
            )
            // Media
            .route("/upload", web::post().to(upload::upload_image)),
    );
}

/// JSON body extractor settings: size cap and envelope-shaped errors.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let app_error = match &err {
                error::JsonPayloadError::Overflow { .. }
                | error::JsonPayloadError::OverflowKnownLength { .. } => {
                    AppError::PayloadTooLarge(err.to_string())
                }
                _ => AppError::BadRequest(format!("Invalid JSON body: {err}")),
            };
            app_error.into()
        })
}

/// Query string extractor settings with envelope-shaped errors.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {err}")).into()
    })
}
