use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationErrors;
use crate::error::DomainError;

/// Minimum accepted password length on sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// User entity - an account owned by the auth subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, name: Option<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name: name.filter(|n| !n.trim().is_empty()),
            image: None,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name shown next to the user's posts.
    pub fn display_name(&self) -> String {
        display_name_for(self.name.as_deref(), &self.email)
    }
}

/// The explicit name when set, otherwise the local part of the email.
pub fn display_name_for(name: Option<&str>, email: &str) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => email.split('@').next().unwrap_or_default().to_string(),
    }
}

/// Minimal author reference embedded in a blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.display_name(),
        }
    }
}

/// Check sign-up input. Uniqueness of the email is checked by the caller.
pub fn validate_registration(
    email: &str,
    password: &str,
    password_confirmation: &str,
) -> Result<(), DomainError> {
    let mut errors = ValidationErrors::new();

    if email.trim().is_empty() {
        errors.add("email", "can't be blank");
    } else if !EMAIL_SHAPE.is_match(email.trim()) {
        errors.add("email", "is not an email");
    }

    if password.is_empty() {
        errors.add("password", "can't be blank");
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("is too short (minimum is {MIN_PASSWORD_LENGTH} characters)"),
        );
    }

    if password != password_confirmation {
        errors.add("password_confirmation", "doesn't match Password");
    }

    errors.into_result().map_err(DomainError::Validation)
}
