//! Authentication handlers (`/auth`).
//!
//! Successful sign-up and sign-in open a new session and return the token
//! triple in the `access-token`, `client` and `uid` response headers.

use actix_web::{HttpResponse, http::StatusCode, web};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use blog_core::DomainError;
use blog_core::domain::{AuthSession, User, ValidationErrors, validate_registration};
use blog_core::error::RepoError;
use blog_core::ports::AuthError;
use blog_shared::auth::{EXPIRY_HEADER, TOKEN_TYPE_HEADER};
use blog_shared::dto::{SignInRequest, SignUpRequest};
use blog_shared::{ApiResponse, TokenTriple};

use super::views::user_response;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const EMAIL_TAKEN: &str = "has already been taken";

/// Live sessions a user may hold; signing in past this evicts the oldest.
pub const MAX_SESSIONS_PER_USER: usize = 10;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_taken() -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add("email", EMAIL_TAKEN);
    AppError::Validation(errors)
}

/// Mint a token for a fresh client id and record the session behind it.
///
/// The user's expired sessions are dropped, along with any beyond
/// [`MAX_SESSIONS_PER_USER`].
async fn open_session(
    state: &AppState,
    user: &User,
) -> AppResult<(TokenTriple, DateTime<Utc>)> {
    let client = Uuid::new_v4().simple().to_string();
    let issued = state.tokens.generate_token(user.id, &user.email, &client)?;

    state
        .sessions
        .insert(AuthSession::new(
            client.clone(),
            user.id,
            issued.token_id,
            issued.expires_at,
        ))
        .await?;

    let pruned = state
        .sessions
        .prune_for_user(user.id, Utc::now(), MAX_SESSIONS_PER_USER)
        .await?;

    tracing::debug!(user_id = %user.id, client = %client, pruned, "Session opened");
    Ok((
        TokenTriple::new(issued.access_token, client, user.email.clone()),
        issued.expires_at,
    ))
}

fn token_response(
    status: StatusCode,
    user: &User,
    triple: &TokenTriple,
    expires_at: DateTime<Utc>,
) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    for (name, value) in triple.headers() {
        builder.insert_header((name, value.to_string()));
    }
    builder
        .insert_header((TOKEN_TYPE_HEADER, "Bearer"))
        .insert_header((EXPIRY_HEADER, expires_at.timestamp().to_string()))
        .json(ApiResponse::ok(user_response(user)))
}

/// POST /auth
pub async fn sign_up(
    state: web::Data<AppState>,
    body: web::Json<SignUpRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = normalize_email(&req.email);

    let mut errors = match validate_registration(&email, &req.password, &req.password_confirmation)
    {
        Ok(()) => ValidationErrors::new(),
        Err(DomainError::Validation(errors)) => errors,
    };
    if !email.is_empty() && state.users.find_by_email(&email).await?.is_some() {
        errors.add("email", EMAIL_TAKEN);
    }
    errors.into_result()?;

    let password_hash = state.passwords.hash(&req.password)?;
    let user = match state
        .users
        .insert(User::new(email, req.name, password_hash))
        .await
    {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => return Err(email_taken()),
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = %user.id, "User registered");

    let (triple, expires_at) = open_session(&state, &user).await?;
    Ok(token_response(StatusCode::CREATED, &user, &triple, expires_at))
}

/// POST /auth/sign_in
pub async fn sign_in(
    state: web::Data<AppState>,
    body: web::Json<SignInRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&normalize_email(&req.email))
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let (triple, expires_at) = open_session(&state, &user).await?;
    tracing::info!(user_id = %user.id, "User signed in");

    Ok(token_response(StatusCode::OK, &user, &triple, expires_at))
}

/// DELETE /auth/sign_out
pub async fn sign_out(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let identity = identity.0.ok_or_else(|| {
        AppError::NotFound("User was not found or was not logged in.".to_string())
    })?;

    state.sessions.delete(&identity.client).await?;
    tracing::info!(user_id = %identity.user.id, "User signed out");

    Ok(HttpResponse::Ok().json(ApiResponse::done("Signed out successfully.")))
}

/// GET /auth/validate_token
pub async fn validate_token(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(&identity.user))))
}
