//! Authentication extractors.
//!
//! A request is authenticated by the `access-token`, `client` and `uid`
//! headers. The token must verify, be bound to the same `client` and `uid`,
//! and match the live session stored for that client.

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::StatusCode, web};
use chrono::Utc;
use futures::future::LocalBoxFuture;

use blog_core::domain::User;
use blog_core::ports::AuthError;
use blog_shared::{ErrorResponse, TokenTriple};

use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.user.display_name())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
    /// Client id of the session the request was made with.
    pub client: String,
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        if is_credential_error(&self.0) {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your session has expired. Please sign in again."),
            err if is_credential_error(err) => ErrorResponse::unauthorized()
                .with_detail("You need to sign in or sign up before continuing."),
            err => {
                tracing::error!("Authentication backend error: {}", err);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

fn is_credential_error(err: &AuthError) -> bool {
    matches!(
        err,
        AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::MissingAuth
    )
}

/// Read the token triple from request headers.
pub fn token_triple(req: &HttpRequest) -> Option<TokenTriple> {
    TokenTriple::from_lookup(|name| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
    })
}

/// Resolve a token triple to the signed-in user.
pub async fn authenticate(state: &AppState, triple: &TokenTriple) -> Result<Identity, AuthError> {
    let claims = state.tokens.validate_token(&triple.access_token)?;

    if claims.client != triple.client || claims.uid != triple.uid {
        return Err(AuthError::InvalidToken(
            "token was not issued for this client".to_string(),
        ));
    }

    let session = state
        .sessions
        .find_by_id(triple.client.clone())
        .await
        .map_err(|e| AuthError::Backend(e.to_string()))?
        .ok_or_else(|| AuthError::InvalidToken("no session for client".to_string()))?;

    if session.token_id != claims.token_id || session.user_id != claims.user_id {
        return Err(AuthError::InvalidToken("token has been replaced".to_string()));
    }
    if session.is_expired(Utc::now()) {
        return Err(AuthError::TokenExpired);
    }

    let user = state
        .users
        .find_by_id(claims.user_id)
        .await
        .map_err(|e| AuthError::Backend(e.to_string()))?
        .ok_or_else(|| AuthError::InvalidToken("user no longer exists".to_string()))?;

    if user.email != triple.uid {
        return Err(AuthError::InvalidToken("uid does not match user".to_string()));
    }

    Ok(Identity {
        user,
        client: session.client,
    })
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let triple = token_triple(req);

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AuthenticationError(AuthError::Backend(
                    "Server configuration error".to_string(),
                )));
            };
            let triple = triple.ok_or(AuthenticationError(AuthError::MissingAuth))?;

            authenticate(&state, &triple).await.map_err(|e| {
                tracing::debug!(client = %triple.client, "Rejected token triple: {}", e);
                AuthenticationError(e)
            })
        })
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
///
/// Backend failures still surface as errors.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = AuthenticationError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload);

        Box::pin(async move {
            match identity.await {
                Ok(identity) => Ok(OptionalIdentity(Some(identity))),
                Err(AuthenticationError(e)) if is_credential_error(&e) => Ok(OptionalIdentity(None)),
                Err(e) => Err(e),
            }
        })
    }
}
