use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::csrf;
use crate::auth::session::{require_role, set_flash};
use crate::errors::{AppError, see_other};
use crate::models::account::Role;
use crate::models::feedback::{FeedbackForm, VoteDirection, VoteOutcome};
use crate::models::project::find_project;
use crate::state::AppState;

const FEEDBACK_TAB: &str = "/dashboard?tab=feedback";
const COMMUNITY_TAB: &str = "/dashboard?tab=all-feedback";

#[derive(Deserialize)]
pub struct VoteForm {
    pub csrf_token: String,
}

/// POST /feedback/{id}/{direction}
pub async fn vote(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(String, String)>,
    form: web::Form<VoteForm>,
) -> Result<HttpResponse, AppError> {
    let user = require_role(&session, Role::Civilian)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (feedback_id, direction) = path.into_inner();
    let direction: VoteDirection = direction.parse().map_err(AppError::BadRequest)?;

    match state.feedback.vote(&feedback_id, &user.id, direction).await {
        VoteOutcome::Applied | VoteOutcome::Ignored => {}
        VoteOutcome::NotLoaded => {
            set_flash(&session, "That feedback is no longer listed. Refresh the list and try again.");
        }
        VoteOutcome::Failed => {
            set_flash(&session, format!("Could not record your {direction}. Please try again."));
        }
    }
    Ok(see_other(COMMUNITY_TAB))
}

/// POST /feedback
pub async fn submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<FeedbackForm>,
) -> Result<HttpResponse, AppError> {
    let user = require_role(&session, Role::Civilian)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let feedback = match form.validate() {
        Ok(f) => f,
        Err(errors) => {
            set_flash(&session, errors.join(" "));
            return Ok(see_other(FEEDBACK_TAB));
        }
    };
    if find_project(&feedback.project).is_none() {
        set_flash(&session, "Please choose one of the approved projects.");
        return Ok(see_other(FEEDBACK_TAB));
    }

    match state.client.submit_feedback(&feedback).await {
        Ok(()) => {
            log::info!("{} left a {}-star review of {}", user.id, feedback.rating, feedback.project);
            set_flash(&session, "Feedback submitted successfully! Thank you for your input.");
        }
        Err(e) => {
            log::warn!("Feedback from {} was not accepted: {e}", user.id);
            set_flash(&session, format!("Could not submit feedback: {e}"));
        }
    }
    Ok(see_other(FEEDBACK_TAB))
}
