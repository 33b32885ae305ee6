//! Authentication ports.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Claims carried by an access token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    /// The `uid` header value the token was issued for (the user's email).
    pub uid: String,
    /// The `client` header value the token was issued for.
    pub client: String,
    /// Unique id of this token; matched against the stored session.
    pub token_id: Uuid,
    pub exp: i64,
}

/// A freshly minted access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Token service trait for access-token operations.
pub trait TokenService: Send + Sync {
    /// Mint an access token bound to a user, their uid and a client id.
    fn generate_token(
        &self,
        user_id: Uuid,
        uid: &str,
        client: &str,
    ) -> Result<IssuedToken, AuthError>;

    /// Verify and decode an access token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authentication headers")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Session lookup failed: {0}")]
    Backend(String),
}
