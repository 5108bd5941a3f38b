use actix_session::Session;

use crate::errors::AppError;
use crate::models::account::{CurrentUser, Role};

const USER_ID: &str = "user_id";
const USER_NAME: &str = "user_name";
const USER_EMAIL: &str = "user_email";
const ROLE: &str = "role";
const FLASH: &str = "flash";

/// Read the signed-in user back out of the session, if there is one.
/// A session with a missing or unrecognised role counts as signed out.
pub fn current_user(session: &Session) -> Option<CurrentUser> {
    let id = session.get::<String>(USER_ID).unwrap_or(None)?;
    let role = session
        .get::<String>(ROLE)
        .unwrap_or(None)?
        .parse::<Role>()
        .ok()?;
    let email = session.get::<String>(USER_EMAIL).unwrap_or(None).unwrap_or_default();
    let name = session
        .get::<String>(USER_NAME)
        .unwrap_or(None)
        .unwrap_or_else(|| email.clone());
    Some(CurrentUser { id, name, email, role })
}

pub fn sign_in(session: &Session, user: &CurrentUser) -> Result<(), AppError> {
    session.renew();
    let insert = |key: &str, value: &str| {
        session
            .insert(key, value)
            .map_err(|e| AppError::Session(format!("Failed to store {key}: {e}")))
    };
    insert(USER_ID, &user.id)?;
    insert(USER_NAME, &user.name)?;
    insert(USER_EMAIL, &user.email)?;
    insert(ROLE, user.role.as_str())
}

pub fn require_user(session: &Session) -> Result<CurrentUser, AppError> {
    current_user(session).ok_or_else(|| AppError::Session("User not logged in".to_string()))
}

/// Check the signed-in user has `role`; returns the user on success.
pub fn require_role(session: &Session, role: Role) -> Result<CurrentUser, AppError> {
    let user = require_user(session)?;
    if user.role == role {
        Ok(user)
    } else {
        Err(AppError::PermissionDenied(format!("{role} only")))
    }
}

pub fn set_flash(session: &Session, message: impl Into<String>) {
    let _ = session.insert(FLASH, message.into());
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH);
    }
    flash
}
