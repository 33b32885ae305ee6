//! HTTP handlers and route configuration.

mod auth;
mod blogs;
mod health;
mod views;


use actix_web::{error::JsonPayloadError, web};

use crate::middleware::error::AppError;

/// Malformed or mistyped JSON bodies become 400 problem details.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        tracing::debug!("Rejected request body: {}", err);
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::resource("/blogs")
                        .route(web::get().to(blogs::list_blogs))
                        .route(web::post().to(blogs::create_blog)),
                ),
        )
        .service(
            web::scope("/auth")
                .route("", web::post().to(auth::sign_up))
                .route("/sign_in", web::post().to(auth::sign_in))
                .route("/sign_out", web::delete().to(auth::sign_out))
                .route("/validate_token", web::get().to(auth::validate_token)),
        );
}
