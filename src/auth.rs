//! Identity provider glue: error-code mapping and profile reconciliation

use crate::api::UserType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Known provider error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidCredential,
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
}

impl AuthErrorCode {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "auth/invalid-credential" => Some(AuthErrorCode::InvalidCredential),
            "auth/email-already-in-use" => Some(AuthErrorCode::EmailAlreadyInUse),
            "auth/weak-password" => Some(AuthErrorCode::WeakPassword),
            "auth/invalid-email" => Some(AuthErrorCode::InvalidEmail),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AuthErrorCode::InvalidCredential => "The email or password is incorrect.",
            AuthErrorCode::EmailAlreadyInUse => "This email is already registered.",
            AuthErrorCode::WeakPassword => "The password is too weak.",
            AuthErrorCode::InvalidEmail => "The email address is not valid.",
        }
    }
}

/// Fallback when the provider gives neither a known code nor a message
pub const AUTH_FAILURE: &str = "Sign-in or sign-up failed.";

/// User-facing message for a provider failure
///
/// Known codes map to fixed messages; anything else surfaces the raw provider
/// message.
pub fn auth_error_message(code: Option<&str>, provider_message: Option<&str>) -> String {
    if let Some(known) = code.and_then(AuthErrorCode::parse) {
        return known.message().to_string();
    }

    provider_message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(AUTH_FAILURE)
        .to_string()
}

/// How long a signed-in session survives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistenceMode {
    /// Durable across browser restarts
    #[default]
    Remember,
    /// Cleared when the browser closes
    SessionOnly,
}

impl PersistenceMode {
    pub fn from_remember_me(remember: bool) -> Self {
        if remember {
            PersistenceMode::Remember
        } else {
            PersistenceMode::SessionOnly
        }
    }
}

/// Account as reported by the identity provider
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProfile {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Profile record stored alongside the account, keyed by uid
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_type: Option<UserType>,
    pub created_at: Option<DateTime<Utc>>,
}

/// The signed-in user as the rest of the app sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
}

/// Merge provider identity with the stored profile record
///
/// Name falls back from the record to the display name to the local part of
/// the email; the user type defaults to `University` when no record exists.
pub fn reconcile_profile(
    identity: &IdentityProfile,
    record: Option<&ProfileRecord>,
    entered_email: &str,
) -> UserProfile {
    let non_empty = |s: &Option<String>| {
        s.as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
    };

    let email = non_empty(&identity.email).unwrap_or_else(|| entered_email.to_string());

    let name = record
        .and_then(|r| non_empty(&r.name))
        .or_else(|| non_empty(&identity.display_name))
        .unwrap_or_else(|| entered_email.split('@').next().unwrap_or_default().to_string());

    let user_type = record.and_then(|r| r.user_type).unwrap_or_default();

    UserProfile {
        id: identity.uid.clone(),
        name,
        email,
        user_type,
    }
}
