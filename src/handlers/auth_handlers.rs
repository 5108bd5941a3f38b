use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::csrf;
use crate::auth::session::{current_user, set_flash, sign_in, take_flash};
use crate::errors::{AppError, render, see_other};
use crate::models::account::{CurrentUser, LoginForm, SignupForm};
use crate::models::view::{AppView, Page, ViewState, select_view};
use crate::state::AppState;
use crate::templates_structs::{LoginTemplate, SignupTemplate};

const SERVICE_UNAVAILABLE: &str = "Unable to reach the DPR service. Please try again later.";

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

/// Where an already signed-in visitor should go instead of `requested`.
fn redirect_if_signed_in(session: &Session, requested: Page) -> Option<HttpResponse> {
    match select_view(&ViewState::new(current_user(session), requested)) {
        AppView::Login | AppView::Signup => None,
        view => Some(see_other(view.path())),
    }
}

fn login_form(state: &AppState, session: &Session, email: &str, errors: Vec<String>) -> Result<HttpResponse, AppError> {
    render(LoginTemplate {
        app_name: state.app_name.clone(),
        errors,
        flash: take_flash(session),
        email: email.to_string(),
        csrf_token: csrf::get_or_create_token(session),
    })
}

fn signup_form(state: &AppState, session: &Session, form: Option<&SignupForm>, errors: Vec<String>) -> Result<HttpResponse, AppError> {
    render(SignupTemplate {
        app_name: state.app_name.clone(),
        errors,
        name: form.map(|f| f.name.clone()).unwrap_or_default(),
        email: form.map(|f| f.email.clone()).unwrap_or_default(),
        role: form.map(|f| f.role.clone()).unwrap_or_else(|| "Civilian".to_string()),
        csrf_token: csrf::get_or_create_token(session),
    })
}

pub async fn login_page(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if let Some(redirect) = redirect_if_signed_in(&session, Page::Login) {
        return Ok(redirect);
    }
    login_form(&state, &session, "", vec![])
}

pub async fn login_submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let credentials = match form.validate() {
        Ok(c) => c,
        Err(errors) => return login_form(&state, &session, &form.email, errors),
    };

    match state.client.login(&credentials).await {
        Ok(grant) => {
            let user = CurrentUser::from_grant(grant, &credentials.email);
            sign_in(&session, &user)?;
            log::info!("{} signed in as {}", user.email, user.role);
            Ok(see_other("/dashboard"))
        }
        Err(e) if e.is_unauthorized() => {
            let message = e.detail().unwrap_or("Incorrect email or password").to_string();
            login_form(&state, &session, &credentials.email, vec![message])
        }
        Err(e) => {
            log::warn!("Login for {} failed: {e}", credentials.email);
            login_form(&state, &session, &credentials.email, vec![SERVICE_UNAVAILABLE.to_string()])
        }
    }
}

pub async fn signup_page(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if let Some(redirect) = redirect_if_signed_in(&session, Page::Signup) {
        return Ok(redirect);
    }
    signup_form(&state, &session, None, vec![])
}

pub async fn signup_submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let account = match form.validate() {
        Ok(a) => a,
        Err(errors) => return signup_form(&state, &session, Some(&*form), errors),
    };

    match state.client.signup(&account).await {
        Ok(created) => {
            log::info!("Created {} account for {}", created.role, created.email);
            set_flash(&session, "Account created. Please sign in.");
            Ok(see_other("/login"))
        }
        Err(e) if matches!(e.status(), Some(400) | Some(409) | Some(422)) => {
            let message = e.detail().unwrap_or("Could not create the account").to_string();
            signup_form(&state, &session, Some(&*form), vec![message])
        }
        Err(e) => {
            log::warn!("Signup for {} failed: {e}", account.email);
            signup_form(&state, &session, Some(&*form), vec![SERVICE_UNAVAILABLE.to_string()])
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(see_other("/login"))
}
