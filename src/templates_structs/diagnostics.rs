use askama::Template;

use super::PageContext;
use crate::models::diagnostics::{CorsReport, HealthReport};

#[derive(Template)]
#[template(path = "diagnostics.html")]
pub struct DiagnosticsTemplate {
    pub ctx: PageContext,
    pub backend_url: String,
    pub health: HealthReport,
    pub cors: CorsReport,
    pub can_upload: bool,
    pub upload_timeout_secs: u64,
}
