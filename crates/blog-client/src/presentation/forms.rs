use std::collections::BTreeMap;
use std::sync::LazyLock;

use blog_shared::dto::SignUpRequest;
use regex::Regex;

/// Minimum password length accepted by the forms.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// One message per invalid field, keyed by field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.trim().is_empty() {
        errors.insert("email", "Email is required".to_string());
    } else if !EMAIL_SHAPE.is_match(email) {
        errors.insert("email", "Enter a valid email address".to_string());
    }
}

fn check_password(password: &str, errors: &mut FieldErrors) {
    if password.is_empty() {
        errors.insert("password", "Password is required".to_string());
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.insert(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }
}

fn finish(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Login screen input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        finish(errors)
    }
}

/// Sign-up screen input.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() {
            errors.insert("username", "Username is required".to_string());
        }
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if self.password != self.password_confirmation {
            errors.insert("password_confirmation", "Passwords do not match".to_string());
        }
        finish(errors)
    }

    pub fn to_request(&self) -> SignUpRequest {
        SignUpRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
            name: Some(self.username.trim().to_string()),
        }
    }
}
