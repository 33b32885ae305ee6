use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserRef, ValidationErrors};
use crate::error::DomainError;

/// Blog entity - a short text post, optionally attributed to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    pub content: String,
    /// `None` for anonymous posts.
    pub author: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Create a new blog after validating its content.
    pub fn new(content: String, author: Option<UserRef>) -> Result<Self, DomainError> {
        validate_content(&content).map_err(DomainError::Validation)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            content,
            author,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn author_id(&self) -> Option<Uuid> {
        self.author.as_ref().map(|a| a.id)
    }
}

/// Content must contain at least one non-whitespace character.
pub fn validate_content(content: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if content.trim().is_empty() {
        errors.add("content", "can't be blank");
    }
    errors.into_result()
}
