use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::current_user;
use crate::errors::{AppError, render, see_other};
use crate::models::feedback::LoadOutcome;
use crate::models::project::{APPROVED_PROJECTS, PROGRESS_TIMELINE};
use crate::models::view::{AppView, DashboardTab, Page, ViewState, select_view};
use crate::state::AppState;
use crate::templates_structs::{
    CivilianDashboardTemplate, DprRow, FeedbackRow, OrganizationDashboardTemplate, PageContext, ProjectCard, TabLink,
    TimelineRow,
};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
}

/// Reloads the feedback list on every view that shows it. Returns true when
/// the store holds the built-in samples.
async fn reload_feedback(state: &AppState) -> bool {
    state.feedback.load_all().await == LoadOutcome::Fallback
}

fn feedback_rows(state: &AppState, viewer_id: &str) -> Vec<FeedbackRow> {
    state
        .feedback
        .snapshot()
        .iter()
        .map(|record| FeedbackRow::from_record(record, viewer_id))
        .collect()
}

pub async fn index(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let view = select_view(&ViewState::new(current_user(&session), Page::Dashboard));
    match view {
        AppView::OrganizationDashboard => organization(&state, &session).await,
        AppView::CivilianDashboard => {
            let tab = DashboardTab::from_query(query.tab.as_deref());
            civilian(&state, &session, tab).await
        }
        AppView::Login | AppView::Signup => Ok(see_other(view.path())),
    }
}

async fn organization(state: &AppState, session: &Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, &state.app_name, "/dashboard")?;

    let (showing_samples, dprs) = tokio::join!(reload_feedback(state), state.client.organization_dprs());

    let feedback = feedback_rows(state, &ctx.user_id);
    let total_likes: u32 = feedback.iter().map(|f| f.like_count).sum();
    let total_dislikes: u32 = feedback.iter().map(|f| f.dislike_count).sum();

    let (dprs, dpr_error): (Vec<DprRow>, Option<String>) = match dprs {
        Ok(list) => (list.into_iter().map(DprRow::from).collect(), None),
        Err(e) => {
            log::warn!("Could not fetch organization DPRs: {e}");
            (Vec::new(), Some(format!("Failed to fetch DPRs: {e}")))
        }
    };

    render(OrganizationDashboardTemplate {
        ctx,
        feedback,
        showing_samples,
        total_likes,
        total_dislikes,
        dprs,
        dpr_error,
    })
}

async fn civilian(state: &AppState, session: &Session, tab: DashboardTab) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, &state.app_name, "/dashboard")?;

    let (feedback, showing_samples) = if tab == DashboardTab::AllFeedback {
        let showing_samples = reload_feedback(state).await;
        (feedback_rows(state, &ctx.user_id), showing_samples)
    } else {
        (Vec::new(), false)
    };

    render(CivilianDashboardTemplate {
        ctx,
        tabs: TabLink::all(tab),
        active_tab: tab.slug(),
        projects: APPROVED_PROJECTS.iter().map(ProjectCard::from).collect(),
        timeline: PROGRESS_TIMELINE.iter().map(TimelineRow::from).collect(),
        feedback,
        showing_samples,
    })
}
