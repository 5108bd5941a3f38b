use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use dpr_portal::config::{AppConfig, Environment};
use dpr_portal::handlers;
use dpr_portal::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    env_logger::init();

    let secret_key = config.session_key();
    let secure_cookies = config.environment == Environment::Production;
    let state = web::Data::new(AppState::new(&config).map_err(std::io::Error::other)?);

    log::info!("Using DPR service at {}", config.remote.base_url);
    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(secure_cookies)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
