// Template context structures for Askama templates, organized by page.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{require_user, take_flash};
use crate::errors::AppError;

/// Common context shared by all signed-in pages.
/// Templates access these as `ctx.user_name`, `ctx.csrf_token`, etc.
pub struct PageContext {
    pub user_id: String,
    pub user_name: String,
    pub avatar_initial: String,
    pub role_label: String,
    pub flash: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, app_name: &str, current_path: &str) -> Result<Self, AppError> {
        let user = require_user(session)?;
        let flash = take_flash(session);
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = user.name.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            user_id: user.id,
            user_name: user.name,
            avatar_initial,
            role_label: user.role.to_string(),
            flash,
            app_name: app_name.to_string(),
            csrf_token,
            current_path: current_path.to_string(),
        })
    }
}

mod common;
mod dashboard;
mod diagnostics;

pub use self::common::{LoginTemplate, SignupTemplate};
pub use self::dashboard::{
    CivilianDashboardTemplate, DprRow, FeedbackRow, OrganizationDashboardTemplate, ProjectCard, RiskRow, TabLink,
    TimelineRow,
};
pub use self::diagnostics::DiagnosticsTemplate;
