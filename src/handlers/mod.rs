pub mod auth_handlers;
pub mod dashboard;
pub mod diagnostics_handlers;
pub mod dpr_handlers;
pub mod feedback_handlers;

use actix_web::{HttpResponse, web};

use crate::auth::middleware::require_auth;

/// Configure the portal routes. Session middleware and `AppState` are
/// added by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(actix_files::Files::new("/static", "./static"))
        // Public routes
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/signup", web::get().to(auth_handlers::signup_page))
        .route("/signup", web::post().to(auth_handlers::signup_submit))
        .route("/", web::get().to(|| async {
            HttpResponse::SeeOther()
                .insert_header(("Location", "/dashboard"))
                .finish()
        }))
        // Protected routes
        .service(
            web::scope("")
                .wrap(actix_web::middleware::from_fn(require_auth))
                .route("/dashboard", web::get().to(dashboard::index))
                .route("/logout", web::post().to(auth_handlers::logout))
                .route("/feedback", web::post().to(feedback_handlers::submit))
                .route("/feedback/{id}/{direction}", web::post().to(feedback_handlers::vote))
                .service(
                    web::resource("/dpr/upload")
                        .app_data(web::PayloadConfig::new(dpr_handlers::MAX_UPLOAD_BYTES))
                        .route(web::post().to(dpr_handlers::upload)),
                )
                .route("/diagnostics", web::get().to(diagnostics_handlers::index))
                .route("/diagnostics/health", web::get().to(diagnostics_handlers::health)),
        );
}

/// Default 404 handler (must be registered last).
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../../templates/errors/404.html"))
}
