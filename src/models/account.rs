use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auth::validate;

/// The two client roles; each gets its own dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Organization,
    Civilian,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Organization => "Organization",
            Role::Civilian => "Civilian",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organization" => Ok(Role::Organization),
            "civilian" => Ok(Role::Civilian),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}

/// Signed-in user as kept in the cookie session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    /// Session user for a successful login. The DPR service's token reply
    /// usually carries neither a user id nor a name, so the email stands in
    /// for the id and its local part for the name.
    pub fn from_grant(grant: LoginGrant, email: &str) -> Self {
        Self {
            id: grant.user_id.unwrap_or_else(|| email.to_string()),
            name: grant.name.unwrap_or_else(|| name_from_email(email)),
            email: email.to_string(),
            role: grant.role,
        }
    }
}

/// Name to greet a user by when the backend does not send one.
fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => email.to_string(),
    }
}

/// Sign-in credentials. The backend expects an OAuth2 password form, so the
/// email travels as `username`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        [("username", self.email.as_str()), ("password", self.password.as_str())]
    }
}

/// Successful login reply.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub role: Role,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Account creation request.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Account as returned by the signup endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_email(&self.email));
        if self.password.is_empty() {
            errors.push("Password is required".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
    pub csrf_token: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<NewAccount, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.name, "Name", 100));
        errors.extend(validate::validate_email(&self.email));
        errors.extend(validate::validate_password(&self.password));
        if self.password != self.confirm_password {
            errors.push("Passwords do not match".to_string());
        }
        let role = match self.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                errors.push("Please choose Organization or Civilian".to_string());
                None
            }
        };
        match role {
            Some(role) if errors.is_empty() => Ok(NewAccount {
                name: self.name.trim().to_string(),
                email: self.email.trim().to_string(),
                password: self.password.clone(),
                role,
            }),
            _ => Err(errors),
        }
    }
}
