use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::session::require_user;
use crate::errors::{AppError, render};
use crate::models::account::Role;
use crate::models::diagnostics::{check_health, probe_cors};
use crate::state::AppState;
use crate::templates_structs::{DiagnosticsTemplate, PageContext};

/// Origin the browser used to reach this portal.
fn request_origin(req: &HttpRequest) -> String {
    let conn = req.connection_info();
    format!("{}://{}", conn.scheme(), conn.host())
}

/// GET /diagnostics: connectivity checks against the DPR service.
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user = require_user(&session)?;
    let ctx = PageContext::build(&session, &state.app_name, "/diagnostics")?;
    let origin = request_origin(&req);

    let (health, cors) = tokio::join!(check_health(&state.client), probe_cors(&state.client, &origin));
    if !health.healthy {
        log::warn!("DPR service at {} is not healthy: {:?}", state.client.base_url(), health.error);
    }

    render(DiagnosticsTemplate {
        ctx,
        backend_url: state.client.base_url().to_string(),
        health,
        cors,
        can_upload: user.role == Role::Organization,
        upload_timeout_secs: state.client.upload_timeout().as_secs(),
    })
}

/// GET /diagnostics/health: the health check as JSON.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(check_health(&state.client).await)
}
