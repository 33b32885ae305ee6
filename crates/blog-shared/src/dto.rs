//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user (`POST /auth`).
///
/// Missing credentials decode as empty strings so they are reported as
/// field errors rather than rejected as malformed JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
    #[serde(default, alias = "username", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request to sign in (`POST /auth/sign_in`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// A user's public information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Minimal author embedded in a blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub name: String,
}

/// A blog as returned by `GET /api/blogs` and `POST /api/blogs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: Uuid,
    pub content: String,
    /// `null` for anonymous posts.
    pub user: Option<AuthorResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/blogs`: `{"blog": {"content": "..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub blog: Option<BlogParams>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogParams {
    #[serde(default)]
    pub content: Option<String>,
}

impl CreateBlogRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            blog: Some(BlogParams {
                content: Some(content.into()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_accepts_username_alias() {
        let req: SignUpRequest = serde_json::from_value(serde_json::json!({
            "email": "a@b.io",
            "password": "password1",
            "password_confirmation": "password1",
            "username": "alice",
        }))
        .unwrap();

        assert_eq!(req.name.as_deref(), Some("alice"));
    }

    #[test]
    fn test_create_blog_request_tolerates_missing_content() {
        let req: CreateBlogRequest =
            serde_json::from_value(serde_json::json!({ "blog": {} })).unwrap();
        assert!(req.blog.unwrap().content.is_none());

        let req: CreateBlogRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(req.blog.is_none());
    }

    #[test]
    fn test_create_blog_request_wire_shape() {
        let json = serde_json::to_value(CreateBlogRequest::new("hello")).unwrap();
        assert_eq!(json, serde_json::json!({ "blog": { "content": "hello" } }));
    }
}
